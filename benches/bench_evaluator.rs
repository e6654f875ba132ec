use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use covergen::{
    config::{DesignContext, DesignParameters},
    coverage::CoverageSet,
    evaluator::{BatchEvaluator, WorkerPool},
    evolution::{Challenge, CoverageChallenge},
    phenotype::Individual,
    rng::{RandomNumberGenerator, TicketSampler},
    reducer::{ReductionOptions, Reducer},
    ticket::TicketCollection,
};

fn bench_batch_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_evaluation");
    group.sample_size(10);
    let context = DesignContext::new(DesignParameters::new(40, 5, 15)).unwrap();
    let coverage = CoverageSet::for_indexer(context.indexer()).unwrap();
    let snapshot = coverage.snapshot();
    let mut rng = RandomNumberGenerator::from_seed(3);

    for threads in [1, 4].iter() {
        let pool = WorkerPool::new(*threads).unwrap();
        let evaluator = BatchEvaluator::new(&context, &pool);
        let seeds = rng.fetch_seeds(64);

        group.bench_with_input(BenchmarkId::new("best_of_64", threads), &seeds, |b, seeds| {
            b.iter(|| evaluator.evaluate_best(black_box(&snapshot), black_box(seeds)))
        });
    }
    group.finish();
}

fn bench_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");
    group.sample_size(10);
    let context = DesignContext::new(DesignParameters::new(30, 4, 10)).unwrap();
    let challenge = CoverageChallenge::new(&context);
    let sampler = TicketSampler::new(30, 10);
    let mut rng = RandomNumberGenerator::from_seed(5);

    for tickets in [10, 50].iter() {
        let individual = Individual::random(&sampler, *tickets, 0.1, &mut rng);
        group.bench_with_input(BenchmarkId::new("score", tickets), &individual, |b, ind| {
            b.iter(|| challenge.score(black_box(ind)))
        });
    }
    group.finish();
}

fn bench_ticket_pruning(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticket_pruning");
    group.sample_size(10);
    let context = DesignContext::new(DesignParameters::new(20, 3, 8)).unwrap();
    let sampler = TicketSampler::new(20, 8);
    let mut rng = RandomNumberGenerator::from_seed(9);
    let tickets: TicketCollection = (0..40).map(|_| sampler.sample(rng.next_seed())).collect();
    let options = ReductionOptions::builder().coverage_goal(0.8).build();

    group.bench_function("40_tickets", |b| {
        b.iter(|| {
            let mut work = tickets.clone();
            let mut reducer = Reducer::new(&context, options.clone()).unwrap();
            reducer.prune_tickets(black_box(&mut work)).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_batch_evaluation, bench_fitness, bench_ticket_pruning);
criterion_main!(benches);
