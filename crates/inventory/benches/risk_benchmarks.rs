use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use millboard_core::MaterialForecastRecord;
use millboard_inventory::{
    health_distribution, high_risk_materials, predicted_stockouts, stockout_risk_index,
};

/// Deterministic synthetic materials with a spread of coverage values.
fn materials(n: usize) -> Vec<MaterialForecastRecord> {
    (0..n)
        .map(|i| {
            let forecast_7d = 700.0 + (i % 13) as f64 * 50.0;
            let stock = (i % 40) as f64 * 120.0;
            MaterialForecastRecord {
                id: format!("RM-{i:05}"),
                name: format!("Material {i}"),
                current_stock_kg: stock,
                forecast_7d_kg: forecast_7d,
                forecast_14d_kg: forecast_7d * 2.0,
                forecast_30d_kg: forecast_7d * 4.3,
                balance_7d: stock - forecast_7d,
                balance_14d: stock - forecast_7d * 2.0,
                weight: forecast_7d * 4.3,
                date: "2024-03-01".to_string(),
                ..Default::default()
            }
        })
        .collect()
}

fn bench_risk_calculators(c: &mut Criterion) {
    let mut group = c.benchmark_group("inventory_risk");

    for size in [100usize, 1_000, 10_000] {
        let records = materials(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("stockout_risk_index", size), &records, |b, r| {
            b.iter(|| stockout_risk_index(black_box(r)))
        });

        group.bench_with_input(BenchmarkId::new("high_risk_materials", size), &records, |b, r| {
            b.iter(|| high_risk_materials(black_box(r)).within_7d.len())
        });

        group.bench_with_input(BenchmarkId::new("health_distribution", size), &records, |b, r| {
            b.iter(|| health_distribution(black_box(r)))
        });

        group.bench_with_input(BenchmarkId::new("predicted_stockouts", size), &records, |b, r| {
            b.iter(|| predicted_stockouts(black_box(r)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_risk_calculators);
criterion_main!(benches);
