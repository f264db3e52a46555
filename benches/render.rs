// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;

use criterion::Criterion;

use fractage::config::{default_hopalong, FractalKind, RenderConfig, JULIA_DEFAULT_C};
use fractage::hopalong::Coloring;
use fractage::color::WHITE;
use fractage::{render, Formula, Frame, PaletteTable};

fn palette() -> fractage::ResolvedPalette {
    let table = PaletteTable::builtin().unwrap();
    fractage::resolve_by_name(&table, "orange_blue").unwrap()
}

fn julia(c: &mut Criterion) {
    let config = RenderConfig::new(
        FractalKind::Julia(Formula::Classic { c: JULIA_DEFAULT_C }),
        palette(),
    )
    .with_size(200, 200);
    c.bench_function("julia 200x200", move |b| {
        b.iter(|| {
            let mut frame = Frame::new(200, 200, WHITE);
            render(&config, &mut frame, 1).unwrap();
        })
    });
}

fn julia_threaded(c: &mut Criterion) {
    let config = RenderConfig::new(
        FractalKind::Julia(Formula::Classic { c: JULIA_DEFAULT_C }),
        palette(),
    )
    .with_size(200, 200);
    c.bench_function("julia 200x200 4 threads", move |b| {
        b.iter(|| {
            let mut frame = Frame::new(200, 200, WHITE);
            render(&config, &mut frame, 4).unwrap();
        })
    });
}

fn mandelbrot_fractional(c: &mut Criterion) {
    let config = RenderConfig::new(FractalKind::Mandelbrot { m: 2.5 }, palette()).with_size(200, 150);
    c.bench_function("mandelbrot m=2.5 200x150", move |b| {
        b.iter(|| {
            let mut frame = Frame::new(200, 150, WHITE);
            render(&config, &mut frame, 1).unwrap();
        })
    });
}

fn hopalong(c: &mut Criterion) {
    let mut params = default_hopalong();
    params.iterations = 50_000;
    params.coloring = Coloring::Random(Some(7));
    let config = RenderConfig::new(FractalKind::Hopalong(params), palette()).with_size(200, 200);
    c.bench_function("hopalong 200k steps", move |b| {
        b.iter(|| {
            let mut frame = Frame::new(200, 200, WHITE);
            render(&config, &mut frame, 1).unwrap();
        })
    });
}

criterion_group!(benches, julia, julia_threaded, mandelbrot_fractional, hopalong);
criterion_main!(benches);
