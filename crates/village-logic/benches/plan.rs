//! Criterion benchmarks for village planning.
//!
//! Benchmarks:
//!   - plan_village for every layout at the largest editor size (20 houses)
//!   - validate_plan over a finished plan
//!
//! Run with: cargo bench -p village-logic --bench plan

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use village_logic::config::{VillageConfig, VillageLayout, MAX_HOUSES};
use village_logic::plan::plan_village;
use village_logic::validation::validate_plan;

fn bench_plan_village(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_village");

    for layout in VillageLayout::ALL {
        let config = VillageConfig {
            layout,
            house_count: MAX_HOUSES,
            ..Default::default()
        };
        group.bench_function(layout.name(), |b| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(plan_village(black_box(&config), &mut rng)));
        });
    }

    group.finish();
}

fn bench_validate_plan(c: &mut Criterion) {
    let config = VillageConfig {
        house_count: MAX_HOUSES,
        ..Default::default()
    };
    let plan = plan_village(&config, &mut StdRng::seed_from_u64(42));

    c.bench_function("validate_plan", |b| {
        b.iter(|| black_box(validate_plan(black_box(&plan))));
    });
}

criterion_group!(benches, bench_plan_village, bench_validate_plan);
criterion_main!(benches);
