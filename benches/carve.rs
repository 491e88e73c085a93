// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use seamcarver::{compute_costs, Direction, EnergyKind, EnergyMethod, SeamCalculator, SeamCarver};

fn landscape(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let sky = y < height / 3;
        let v = ((x * 13) ^ (y * 7)) % 64;
        if sky {
            Rgb([90 + v as u8, 140 + v as u8, 220])
        } else {
            Rgb([40 + v as u8, 120 + (v * 2) as u8, 30])
        }
    })
}

fn bench_energy(c: &mut Criterion) {
    let image = landscape(320, 240);
    for kind in [EnergyKind::Gradient, EnergyKind::Sobel, EnergyKind::Laplacian].iter() {
        let method = kind.method();
        c.bench_function(&format!("energy {} (320x240)", kind), |b| {
            b.iter(|| method.energy(black_box(&image)))
        });
    }
}

fn bench_costs(c: &mut Criterion) {
    let image = landscape(320, 240);
    let energy = EnergyKind::Gradient.method().energy(&image).unwrap();
    c.bench_function("costs (320x240)", |b| b.iter(|| compute_costs(black_box(&energy))));
}

fn bench_find_seams(c: &mut Criterion) {
    let image = landscape(320, 240);
    let calculator = SeamCalculator::default();
    c.bench_function("find 40 seams (320x240)", |b| {
        b.iter(|| calculator.find_seams(black_box(&image), 40))
    });
}

fn bench_resize(c: &mut Criterion) {
    let image = landscape(200, 150);
    c.bench_function("resize 200x150 to 120x100", |b| {
        b.iter(|| {
            let mut carver = SeamCarver::new(image.clone()).unwrap();
            carver.resize(100, 120).unwrap();
            black_box(carver.into_image())
        })
    });
    c.bench_function("remove 30 horizontal (200x150)", |b| {
        b.iter(|| {
            let mut carver = SeamCarver::new(image.clone()).unwrap();
            black_box(carver.remove(Direction::Horizontal, 30))
        })
    });
}

criterion_group!(benches, bench_energy, bench_costs, bench_find_seams, bench_resize);
criterion_main!(benches);
