use std::collections::HashSet;

use covergen::{
    config::{DesignContext, DesignParameters, LogLevel},
    construction::{ConstructionStrategy, Termination},
    coverage::verify,
    evaluator::WorkerPool,
    evolution::{
        Challenge, CoverageChallenge, EvolutionLauncher, EvolutionOptions, EvolutionaryCoordinator,
    },
    phenotype::{Individual, Phenotype},
    rng::{RandomNumberGenerator, TicketSampler},
    selection::TournamentSelection,
    strategy::CrossoverStrategy,
};

fn context() -> DesignContext {
    DesignContext::new(DesignParameters::new(12, 3, 6)).unwrap()
}

#[test]
fn test_elitism_best_never_decreases() {
    let context = context();
    let options = EvolutionOptions::builder()
        .num_generations(15)
        .population_size(12)
        .tickets_per_individual(5)
        .mutation_rate(0.5)
        .num_threads(2)
        .log_level(LogLevel::Minimal)
        .build();
    let sampler = TicketSampler::new(12, 6);
    let mut rng = RandomNumberGenerator::from_seed(4);
    let population: Vec<Individual> = (0..12)
        .map(|_| Individual::random(&sampler, 5, 0.5, &mut rng))
        .collect();

    let launcher: EvolutionLauncher<Individual, CrossoverStrategy, CoverageChallenge> =
        EvolutionLauncher::new(
            CrossoverStrategy,
            CoverageChallenge::new(&context),
            TournamentSelection::default(),
        );
    let pool = WorkerPool::new(2).unwrap();
    let result = launcher.evolve(&options, population, &pool, &mut rng).unwrap();

    assert_eq!(result.history.len(), 15);
    assert!(result
        .history
        .windows(2)
        .all(|w| w[0].best_so_far <= w[1].best_so_far));
    for stats in &result.history {
        assert!(stats.best <= stats.best_so_far);
        assert!(stats.mean <= stats.best as f64);
    }
    assert_eq!(result.score, result.history.last().unwrap().best_so_far);

    let challenge = CoverageChallenge::new(&context);
    assert_eq!(challenge.score(&result.pheno).unwrap(), result.score);
}

#[test]
fn test_coordinator_reports_verified_coverage() {
    let context = context();
    let options = EvolutionOptions::builder()
        .num_generations(8)
        .population_size(16)
        .tickets_per_individual(7)
        .seed(31)
        .build();
    let coordinator = EvolutionaryCoordinator::new(&context, options.clone()).unwrap();
    let construction = coordinator.construct(&mut options.create_rng()).unwrap();

    assert_eq!(construction.termination, Termination::GenerationsCompleted);
    assert_eq!(construction.tickets.len(), 7);
    assert_eq!(construction.statistics.steps, 8);

    let indexer = context.indexer();
    let brute_force: HashSet<_> = construction
        .tickets
        .iter()
        .flat_map(|t| indexer.subset_ranks(t.elements()))
        .collect();
    assert_eq!(construction.report.covered as usize, brute_force.len());
    assert_eq!(verify(&context, &construction.tickets).unwrap(), construction.report);
    assert!(construction.progress.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let context = context();
    let options = EvolutionOptions::builder()
        .num_generations(4)
        .population_size(8)
        .tickets_per_individual(4)
        .seed(77)
        .build();
    let coordinator = EvolutionaryCoordinator::new(&context, options.clone()).unwrap();
    let first = coordinator.run(&mut options.create_rng()).unwrap();
    let second = coordinator.run(&mut options.create_rng()).unwrap();
    assert_eq!(first.tickets, second.tickets);
    assert_eq!(first.progress, second.progress);
}

#[test]
fn test_mutation_preserves_ticket_invariants() {
    let sampler = TicketSampler::new(12, 6);
    let mut rng = RandomNumberGenerator::from_seed(12);
    let mut individual = Individual::random(&sampler, 10, 1.0, &mut rng);
    for _ in 0..50 {
        individual.mutate(&mut rng);
    }
    for ticket in individual.tickets() {
        assert_eq!(ticket.len(), 6);
        assert!(ticket.elements().windows(2).all(|w| w[0] < w[1]));
        assert!(ticket.elements().iter().all(|&e| (1..=12).contains(&e)));
    }
}
