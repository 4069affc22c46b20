use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use scenario_core::{ContextTemplate, TemplateCache};
use scenario_schema::{TemplateId, TemplateRecord};
use serde_json::json;

/// Square map with a two-lane road every eight rows, sidewalks on either side.
fn street_grid(size: u32) -> TemplateRecord {
    let mut grid = Vec::with_capacity(size as usize);
    let mut east = Vec::new();
    let mut west = Vec::new();
    for row in 0..size {
        let code = match row % 8 {
            2 => 3,
            3 | 4 => 9,
            5 => 4,
            _ => 0,
        };
        grid.push(vec![code; size as usize]);
        for col in 0..size {
            match row % 8 {
                3 => west.push([row, col]),
                4 => east.push([row, col]),
                _ => {}
            }
        }
    }
    TemplateRecord {
        id: TemplateId::new(format!("bench-{size}")),
        name: format!("Bench Streets {size}"),
        width: size,
        height: size,
        grid_data: json!(grid),
        lane_config: Some(json!({ "E": east, "W": west })),
    }
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_index");

    for size in [8u32, 16, 32, 48, 64] {
        group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, &size| {
            b.iter_batched(
                || street_grid(size),
                |record| ContextTemplate::from_record(record),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_zones(c: &mut Criterion) {
    let mut group = c.benchmark_group("trident_zones");

    for size in [16u32, 64] {
        let cache = TemplateCache::new();
        if cache.load_records(vec![street_grid(size)]).is_err() {
            continue;
        }
        let id = TemplateId::new(format!("bench-{size}"));
        group.bench_with_input(BenchmarkId::new("all_spawns", size), &size, |b, _| {
            b.iter(|| {
                let template = cache.get_by_id(&id).ok()?;
                let zones: usize = template
                    .spawns()
                    .iter()
                    .map(|spawn| template.trident_zones(*spawn).zone_a.len())
                    .sum();
                Some(zones)
            })
        });
    }

    group.finish();
}

criterion_group!(index_benches, bench_index, bench_zones);
criterion_main!(index_benches);
