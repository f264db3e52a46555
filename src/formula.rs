// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Iteration formulas for the escape-time renderers, and the registry
//! that maps user-facing names onto them.
//!
//! Every formula is a `Formula` value that carries its own constants.
//! The registry only knows how to build one from a name and a set of
//! `Constants`, so adding a name never touches the renderer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use num::Complex;

use crate::error::RenderError;

/// The trigonometric and hyperbolic functions the trig formulas can
/// wrap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trig {
    /// sin z
    Sin,
    /// cos z
    Cos,
    /// tan z
    Tan,
    /// cot z = 1 / tan z
    Cot,
    /// sinh z
    Sinh,
    /// cosh z
    Cosh,
    /// tanh z
    Tanh,
    /// asinh z
    Asinh,
    /// acosh z
    Acosh,
    /// atanh z
    Atanh,
}

impl Trig {
    /// Every function, in registry order.
    pub const ALL: [Trig; 10] = [
        Trig::Sin,
        Trig::Cos,
        Trig::Tan,
        Trig::Cot,
        Trig::Sinh,
        Trig::Cosh,
        Trig::Tanh,
        Trig::Asinh,
        Trig::Acosh,
        Trig::Atanh,
    ];

    /// The function's short name, as used in formula names.
    pub fn name(self) -> &'static str {
        match self {
            Trig::Sin => "sin",
            Trig::Cos => "cos",
            Trig::Tan => "tan",
            Trig::Cot => "cot",
            Trig::Sinh => "sinh",
            Trig::Cosh => "cosh",
            Trig::Tanh => "tanh",
            Trig::Asinh => "asinh",
            Trig::Acosh => "acosh",
            Trig::Atanh => "atanh",
        }
    }

    /// Apply the function.
    pub fn apply(self, z: Complex<f64>) -> Complex<f64> {
        match self {
            Trig::Sin => z.sin(),
            Trig::Cos => z.cos(),
            Trig::Tan => z.tan(),
            Trig::Cot => z.tan().inv(),
            Trig::Sinh => z.sinh(),
            Trig::Cosh => z.cosh(),
            Trig::Tanh => z.tanh(),
            Trig::Asinh => z.asinh(),
            Trig::Acosh => z.acosh(),
            Trig::Atanh => z.atanh(),
        }
    }
}

/// How an escape-time render turns an orbit into a palette position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Smoothing {
    /// Sum exp(-|z|) over the orbit and divide by the iteration limit.
    Potential,
    /// Normalized iteration count, n - log2(log|z| / log bail-out).
    NormalizedCount,
}

/// One step of an escape-time iteration, with its constants bound.
#[derive(Copy, Clone)]
pub enum Formula {
    /// z² + c
    Classic {
        /// The Julia constant.
        c: Complex<f64>,
    },
    /// c · trig(z)
    CTrig {
        /// The wrapped function.
        trig: Trig,
        /// The multiplier.
        c: Complex<f64>,
    },
    /// |trig(z)⁴| + c, the absolute value taken per component.
    AbsTrig4 {
        /// The wrapped function.
        trig: Trig,
        /// The Julia constant.
        c: Complex<f64>,
    },
    /// z² + c + k · z₋₁, the Phoenix Julia set.
    Phoenix {
        /// The Julia constant.
        c: Complex<f64>,
        /// Weight of the previous iterate.
        k: Complex<f64>,
    },
    /// z^m + z₀, a Mandelbrot set with a generalized exponent.  The
    /// constant is the orbit's own starting point.
    Power {
        /// The exponent.
        m: f64,
    },
    /// Any other map f(z, c), colored like the Julia family.
    Custom {
        /// The map.
        step: fn(Complex<f64>, Complex<f64>) -> Complex<f64>,
        /// The constant handed to `step`.
        c: Complex<f64>,
    },
}

impl Formula {
    /// The next iterate.  `prev` is the iterate before `z` and `seed`
    /// the first point of the orbit; most formulas ignore both.
    #[inline]
    pub fn next(&self, z: Complex<f64>, prev: Complex<f64>, seed: Complex<f64>) -> Complex<f64> {
        match *self {
            Formula::Classic { c } => z * z + c,
            Formula::CTrig { trig, c } => c * trig.apply(z),
            Formula::AbsTrig4 { trig, c } => {
                let w = trig.apply(z);
                let w2 = w * w;
                let w4 = w2 * w2;
                Complex::new(w4.re.abs(), w4.im.abs()) + c
            }
            Formula::Phoenix { c, k } => z * z + c + k * prev,
            Formula::Power { m } => {
                if m == 2.0 {
                    z * z + seed
                } else {
                    z.powf(m) + seed
                }
            }
            Formula::Custom { step, c } => step(z, c),
        }
    }

    /// The coloring scheme the formula is rendered with.
    pub fn smoothing(&self) -> Smoothing {
        match self {
            Formula::Power { .. } => Smoothing::NormalizedCount,
            _ => Smoothing::Potential,
        }
    }

    fn constants_are_finite(&self) -> bool {
        let finite = |z: &Complex<f64>| z.re.is_finite() && z.im.is_finite();
        match self {
            Formula::Classic { c } | Formula::CTrig { c, .. } | Formula::AbsTrig4 { c, .. } => {
                finite(c)
            }
            Formula::Phoenix { c, k } => finite(c) && finite(k),
            Formula::Power { m } => m.is_finite(),
            Formula::Custom { c, .. } => finite(c),
        }
    }

    /// Reject constants no render can use.
    pub fn check(&self) -> Result<(), RenderError> {
        if self.constants_are_finite() {
            Ok(())
        } else {
            Err(RenderError::InvalidParameter(format!(
                "{:?} has a non-finite constant",
                self
            )))
        }
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Formula::Classic { c } => write!(f, "z^2 + ({})", c),
            Formula::CTrig { trig, c } => write!(f, "({}) * {}(z)", c, trig.name()),
            Formula::AbsTrig4 { trig, c } => write!(f, "|{}(z)^4| + ({})", trig.name(), c),
            Formula::Phoenix { c, k } => write!(f, "z^2 + ({}) + ({}) * z_prev", c, k),
            Formula::Power { m } => write!(f, "z^{} + z0", m),
            Formula::Custom { c, .. } => write!(f, "custom(z, {})", c),
        }
    }
}

/// The constants a formula can be built from.  Each formula takes the
/// ones it needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Constants {
    /// The Julia constant `C`.
    pub c: Complex<f64>,
    /// The Phoenix weight `K`.
    pub k: Complex<f64>,
    /// The Mandelbrot exponent `M`.
    pub m: f64,
}

impl Default for Constants {
    fn default() -> Constants {
        Constants {
            c: Complex::new(0.0, 0.0),
            k: Complex::new(0.0, 0.0),
            m: 2.0,
        }
    }
}

type Constructor = Arc<dyn Fn(&Constants) -> Formula + Send + Sync>;

/// Maps formula names onto formula constructors.
#[derive(Clone, Default)]
pub struct FormulaRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl FormulaRegistry {
    /// An empty registry.
    pub fn new() -> FormulaRegistry {
        FormulaRegistry::default()
    }

    /// A registry holding the built-in Julia formulas: `classic`,
    /// `csin`, `ccos`, `ctan` and `abs_<trig>4` for every `Trig`.  The
    /// Phoenix and Mandelbrot iterations have their own fractal kinds
    /// and defaults, so they are not offered here.
    pub fn builtin() -> FormulaRegistry {
        let mut registry = FormulaRegistry::new();
        registry.register("classic", |k| Formula::Classic { c: k.c });
        for &trig in &[Trig::Sin, Trig::Cos, Trig::Tan] {
            registry.register(&format!("c{}", trig.name()), move |k| Formula::CTrig {
                trig,
                c: k.c,
            });
        }
        for &trig in Trig::ALL.iter() {
            registry.register(&format!("abs_{}4", trig.name()), move |k| {
                Formula::AbsTrig4 { trig, c: k.c }
            });
        }
        registry
    }

    /// Add or replace a formula.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&Constants) -> Formula + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.to_string(), Arc::new(constructor));
    }

    /// Build the formula called `name` from `constants`.
    pub fn lookup(&self, name: &str, constants: &Constants) -> Result<Formula, RenderError> {
        self.constructors
            .get(name.trim())
            .map(|build| build(constants))
            .ok_or_else(|| RenderError::UnknownFormula(name.to_string()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name.trim())
    }

    /// Every registered name.
    pub fn names(&self) -> BTreeSet<String> {
        self.constructors.keys().cloned().collect()
    }
}

/// The process-wide registry of built-in formulas.  Built on first use
/// and never modified.
pub fn registry() -> &'static FormulaRegistry {
    static REGISTRY: OnceLock<FormulaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(FormulaRegistry::builtin)
}

/// The names of the built-in formulas, for validating a request before
/// it becomes a render.
pub fn list_formula_names() -> BTreeSet<String> {
    registry().names()
}
