// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use image::{ImageFormat, RgbaImage};
use log::info;
use num::Complex;

use fractage::config::{self, FractalKind, RenderConfig};
use fractage::formula::{registry, Constants};
use fractage::{
    parse_color, resolve_by_name, Coloring, PaletteStore, PaletteTable, Region, RenderError,
    ResolvedPalette,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn parse_region(s: &str) -> Option<Region> {
    let fields: Vec<f64> = s
        .split(',')
        .map(|f| f64::from_str(f.trim()))
        .collect::<Result<_, _>>()
        .ok()?;
    match fields.as_slice() {
        [x, y, width, height] => Some(Region::new(*x, *y, *width, *height)),
        _ => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    T::from_str(s).map(|_| ()).map_err(|_| err.to_string())
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const THREADS: &str = "threads";
const BACKGROUND: &str = "background";
const PALETTE: &str = "palette";
const PALETTES: &str = "palettes";
const REGION: &str = "region";
const ITERATIONS: &str = "iterations";
const BAIL_OUT: &str = "bail-out";
const FORMULA: &str = "formula";
const C: &str = "c";
const K: &str = "k";
const M: &str = "m";
const A: &str = "a";
const B: &str = "b";
const RESOLUTION: &str = "resolution";
const COLOR: &str = "color";
const SEED: &str = "seed";

fn number(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(|s| validate_number::<f64>(&s, "Could not parse number"))
        .help(help)
}

fn complex(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .short(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse complex number RE,IM"))
        .help(help)
}

fn palettes_arg() -> Arg<'static, 'static> {
    Arg::with_name(PALETTES)
        .long(PALETTES)
        .takes_value(true)
        .help("JSON palette table to use instead of the built-in palettes")
}

/// Options every render takes.
fn raster_args(app: App<'static, 'static>, max_threads: usize) -> App<'static, 'static> {
    app.arg(
        Arg::with_name(OUTPUT)
            .required(true)
            .long(OUTPUT)
            .short("o")
            .takes_value(true)
            .help("Output PNG file"),
    )
    .arg(
        Arg::with_name(SIZE)
            .long(SIZE)
            .short("s")
            .takes_value(true)
            .default_value("800x800")
            .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
            .help("Size of output image"),
    )
    .arg(
        Arg::with_name(THREADS)
            .long(THREADS)
            .short("t")
            .takes_value(true)
            .default_value("1")
            .validator(move |s| {
                validate_range(
                    &s,
                    1,
                    max_threads,
                    "Could not parse thread count",
                    &format!("Thread count must be between 1 and {}", max_threads),
                )
            })
            .help("Number of threads to use in solver"),
    )
    .arg(
        Arg::with_name(BACKGROUND)
            .long(BACKGROUND)
            .takes_value(true)
            .default_value("white")
            .validator(|s| parse_color(&s).map(|_| ()).map_err(|e| e.to_string()))
            .help("Background color"),
    )
}

/// Options every escape-time render takes.
fn escape_args(app: App<'static, 'static>) -> App<'static, 'static> {
    app.arg(
        Arg::with_name(PALETTE)
            .long(PALETTE)
            .short("p")
            .takes_value(true)
            .default_value(config::DEFAULT_PALETTE)
            .help("Name of the color palette"),
    )
    .arg(palettes_arg())
    .arg(
        Arg::with_name(REGION)
            .long(REGION)
            .short("r")
            .takes_value(true)
            .allow_hyphen_values(true)
            .validator(|s| match parse_region(&s) {
                Some(_) => Ok(()),
                None => Err("Could not parse region X,Y,WIDTH,HEIGHT".to_string()),
            })
            .help("Region of the complex plane to draw, as X,Y,WIDTH,HEIGHT"),
    )
    .arg(
        Arg::with_name(ITERATIONS)
            .long(ITERATIONS)
            .short("i")
            .takes_value(true)
            .validator(|s| validate_number::<usize>(&s, "Could not parse iteration count"))
            .help("Iteration limit per point"),
    )
    .arg(number(BAIL_OUT, "Escape radius"))
}

fn args() -> ArgMatches<'static> {
    let max_threads = num_cpus::get();

    App::new("fractage")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time fractal and Hopalong attractor renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(escape_args(raster_args(
            SubCommand::with_name("julia")
                .about("Render a Julia set")
                .arg(
                    Arg::with_name(FORMULA)
                        .long(FORMULA)
                        .short("f")
                        .takes_value(true)
                        .default_value(config::JULIA_DEFAULT_FORMULA)
                        .help("Iteration formula; see the formulas command"),
                )
                .arg(complex(C, "Julia constant RE,IM")),
            max_threads,
        )))
        .subcommand(escape_args(raster_args(
            SubCommand::with_name("phoenix")
                .about("Render the Phoenix Julia set")
                .arg(complex(C, "Julia constant RE,IM"))
                .arg(complex(K, "Weight of the previous iterate RE,IM")),
            max_threads,
        )))
        .subcommand(escape_args(raster_args(
            SubCommand::with_name("mandelbrot")
                .about("Render the Mandelbrot set of z^M + c")
                .arg(number(M, "Exponent M").short(M)),
            max_threads,
        )))
        .subcommand(raster_args(
            SubCommand::with_name("hopalong")
                .about("Render the Hopalong attractor")
                .arg(number(A, "Constant a").short(A))
                .arg(number(B, "Constant b").short(B))
                .arg(number(C, "Constant c").short(C))
                .arg(
                    Arg::with_name(ITERATIONS)
                        .long(ITERATIONS)
                        .short("i")
                        .takes_value(true)
                        .validator(|s| {
                            validate_number::<usize>(&s, "Could not parse iteration count")
                        })
                        .help("Outer iterations"),
                )
                .arg(
                    Arg::with_name(RESOLUTION)
                        .long(RESOLUTION)
                        .takes_value(true)
                        .validator(|s| validate_number::<usize>(&s, "Could not parse resolution"))
                        .help("Each iteration runs resolution² steps"),
                )
                .arg(
                    Arg::with_name(COLOR)
                        .long(COLOR)
                        .takes_value(true)
                        .validator(|s| parse_color(&s).map(|_| ()).map_err(|e| e.to_string()))
                        .help("Draw every point in this color instead of random colors"),
                )
                .arg(
                    Arg::with_name(SEED)
                        .long(SEED)
                        .takes_value(true)
                        .validator(|s| validate_number::<u64>(&s, "Could not parse seed"))
                        .help("Seed for reproducible random colors"),
                ),
            max_threads,
        ))
        .subcommand(SubCommand::with_name("formulas").about("List the iteration formulas"))
        .subcommand(
            SubCommand::with_name("palettes")
                .about("List the color palettes")
                .arg(palettes_arg()),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, RenderError> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(s) => T::from_str(s)
            .map(Some)
            .map_err(|_| RenderError::InvalidParameter(format!("{}: {}", name, s))),
    }
}

fn complex_value(matches: &ArgMatches, name: &str) -> Result<Option<Complex<f64>>, RenderError> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(s) => parse_complex(s)
            .map(Some)
            .ok_or_else(|| RenderError::InvalidParameter(format!("{}: {}", name, s))),
    }
}

fn palette_table(matches: &ArgMatches) -> Result<PaletteTable, failure::Error> {
    match matches.value_of(PALETTES) {
        Some(path) => Ok(PaletteTable::from_json(File::open(path)?)?),
        None => Ok(PaletteTable::builtin()?),
    }
}

/// The palette is irrelevant to the attractor, but a configuration
/// always carries one.
fn unused_palette() -> ResolvedPalette {
    ResolvedPalette::from_colors("none", vec![])
}

fn escape_config(matches: &ArgMatches, fractal: FractalKind) -> Result<RenderConfig, failure::Error> {
    let table = palette_table(matches)?;
    let name = matches.value_of(PALETTE).unwrap_or(config::DEFAULT_PALETTE);
    let palette = resolve_by_name(&table, name)?;
    let mut config = RenderConfig::new(fractal, palette);
    if let Some(region) = matches.value_of(REGION) {
        config.region = parse_region(region)
            .ok_or_else(|| RenderError::InvalidGeometry(region.to_string()))?;
    }
    if let Some(iterations) = value(matches, ITERATIONS)? {
        config.max_iterations = iterations;
    }
    if let Some(bail_out) = value(matches, BAIL_OUT)? {
        config.bail_out = bail_out;
    }
    Ok(config)
}

fn build_config(name: &str, matches: &ArgMatches) -> Result<RenderConfig, failure::Error> {
    let mut config = match name {
        "julia" => {
            let constants = Constants {
                c: complex_value(matches, C)?.unwrap_or(config::JULIA_DEFAULT_C),
                ..Constants::default()
            };
            let formula_name = matches
                .value_of(FORMULA)
                .unwrap_or(config::JULIA_DEFAULT_FORMULA);
            let formula = registry().lookup(formula_name, &constants)?;
            escape_config(matches, FractalKind::Julia(formula))?
        }
        "phoenix" => {
            let c = complex_value(matches, C)?.unwrap_or(config::PHOENIX_DEFAULT_C);
            let k = complex_value(matches, K)?.unwrap_or(config::PHOENIX_DEFAULT_K);
            escape_config(matches, FractalKind::PhoenixJulia { c, k })?
        }
        "mandelbrot" => {
            let m = value(matches, M)?.unwrap_or(config::MANDELBROT_DEFAULT_M);
            escape_config(matches, FractalKind::Mandelbrot { m })?
        }
        _ => {
            let mut params = config::default_hopalong();
            params.a = value(matches, A)?.unwrap_or(params.a);
            params.b = value(matches, B)?.unwrap_or(params.b);
            params.c = value(matches, C)?.unwrap_or(params.c);
            params.iterations = value(matches, ITERATIONS)?.unwrap_or(params.iterations);
            params.resolution = value(matches, RESOLUTION)?.unwrap_or(params.resolution);
            params.coloring = match matches.value_of(COLOR) {
                Some(color) => Coloring::Fixed(parse_color(color)?),
                None => Coloring::Random(value(matches, SEED)?),
            };
            RenderConfig::new(FractalKind::Hopalong(params), unused_palette())
        }
    };

    let size = matches.value_of(SIZE).unwrap_or("800x800");
    let (width, height) = parse_pair::<usize>(size, 'x')
        .ok_or_else(|| RenderError::InvalidGeometry(size.to_string()))?;
    config = config.with_size(width, height);
    if let Some(background) = matches.value_of(BACKGROUND) {
        config.background = parse_color(background)?;
    }
    Ok(config)
}

fn write_image(outfile: &str, image: &RgbaImage) -> Result<(), failure::Error> {
    image.save_with_format(Path::new(outfile), ImageFormat::Png)?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    match matches.subcommand() {
        ("formulas", _) => {
            for name in registry().names() {
                println!("{}", name);
            }
            Ok(())
        }
        ("palettes", Some(sub)) => {
            for name in palette_table(sub)?.names() {
                println!("{}", name);
            }
            Ok(())
        }
        (name, Some(sub)) => {
            let config = build_config(name, sub)?;
            let threads = value(sub, THREADS)?.unwrap_or(1);
            let mut image = RgbaImage::new(config.width as u32, config.height as u32);
            fractage::render(&config, &mut image, threads)?;
            let outfile = sub.value_of(OUTPUT).unwrap_or("fractal.png");
            write_image(outfile, &image)?;
            info!("wrote {}", outfile);
            Ok(())
        }
        _ => Err(RenderError::InvalidParameter("no command given".to_string()).into()),
    }
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
