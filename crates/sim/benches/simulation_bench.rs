use chromevo_sim::simulation::{InitialChromosome, Population, PopulationBuilder};
use chromevo_sim::storage::DurablePopulation;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn build(pop_size: usize, length: usize) -> Population {
    PopulationBuilder::new()
        .alphabet(vec![1, 0])
        .chromosome(InitialChromosome::Random { length })
        .population_size(pop_size)
        .goal(1.0)
        .seed(42)
        .build()
        .unwrap()
}

fn bench_population_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_init");

    group.bench_function("random_200x200", |b| {
        b.iter(|| black_box(build(black_box(200), black_box(200))))
    });

    group.finish();
}

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");

    for &pop_size in &[50, 500] {
        group.throughput(Throughput::Elements(pop_size as u64));
        group.bench_with_input(
            BenchmarkId::new("in_memory", pop_size),
            &pop_size,
            |b, &pop_size| {
                b.iter_batched(
                    || build(pop_size, 200),
                    |mut pop| {
                        pop.generation_step().unwrap();
                        black_box(pop)
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_durable_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("durable_step");
    let pop_size = 50;
    let dir = tempfile::tempdir().unwrap();

    group.throughput(Throughput::Elements(pop_size as u64));
    group.sample_size(10);

    group.bench_function("sqlite_50x200", |b| {
        b.iter_batched(
            || {
                let organisms = build(pop_size, 200).organisms().to_vec();
                DurablePopulation::create(dir.path().join("bench.sqlite"), 1.0, None, organisms)
                    .unwrap()
                    .with_seed(7)
            },
            |mut pop| {
                pop.generation_step().unwrap();
                pop.close().unwrap();
            },
            criterion::BatchSize::PerIteration,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_population_init,
    bench_generation_step,
    bench_durable_step
);
criterion_main!(benches);
