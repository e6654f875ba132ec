use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use covergen::{
    combinatorics::CombinationIndexer,
    coverage::CoverageSet,
    rng::{RandomNumberGenerator, TicketSampler},
};

fn bench_rank_unrank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_unrank");
    let indexer = CombinationIndexer::new(60, 6).unwrap();
    let subset = [3, 11, 27, 38, 49, 60];
    let last = indexer.total() - 1;

    group.bench_function("rank", |b| b.iter(|| indexer.rank(black_box(&subset))));
    group.bench_function("unrank", |b| b.iter(|| indexer.unrank(black_box(last / 2))));
    group.finish();
}

fn bench_ticket_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticket_enumeration");
    group.sample_size(20);
    let indexer = CombinationIndexer::new(60, 6).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(1);

    // C(m,6) ranks per ticket.
    for ticket_size in [10, 20, 30].iter() {
        let ticket = TicketSampler::new(60, *ticket_size).sample(rng.next_seed());
        group.bench_with_input(BenchmarkId::new("for_each", ticket_size), &ticket, |b, ticket| {
            b.iter(|| {
                let mut sum = 0u64;
                indexer.for_each_subset_rank(black_box(ticket.elements()), |rank| {
                    sum = sum.wrapping_add(rank)
                });
                sum
            })
        });
    }
    group.finish();
}

fn bench_mark_ticket(c: &mut Criterion) {
    let mut group = c.benchmark_group("mark_ticket");
    group.sample_size(20);
    let indexer = CombinationIndexer::new(60, 6).unwrap();
    let ticket = TicketSampler::new(60, 30).sample(7);
    let mut coverage = CoverageSet::for_indexer(&indexer).unwrap();

    group.bench_function("60_6_30", |b| {
        b.iter(|| {
            coverage.clear();
            coverage.mark_ticket(&indexer, black_box(&ticket))
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rank_unrank,
    bench_ticket_enumeration,
    bench_mark_ticket
);
criterion_main!(benches);
