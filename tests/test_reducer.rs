use covergen::{
    config::{DesignContext, DesignParameters, LogLevel},
    coverage::verify,
    greedy::{GreedyCoordinator, GreedyOptions},
    io::parse_tickets,
    reducer::{reduce, ReductionMode, ReductionOptions, Reducer},
    rng::{RandomNumberGenerator, TicketSampler},
    ticket::TicketCollection,
    CoverError,
};

fn random_collection(sampler: &TicketSampler, count: usize, seed: u64) -> TicketCollection {
    let mut rng = RandomNumberGenerator::from_seed(seed);
    (0..count).map(|_| sampler.sample(rng.next_seed())).collect()
}

#[test]
fn test_ticket_pruning_safety() {
    let context = DesignContext::new(DesignParameters::new(10, 3, 5)).unwrap();
    let sampler = TicketSampler::new(10, 5);

    for seed in 0..5 {
        let original = random_collection(&sampler, 40, seed);
        let before = verify(&context, &original).unwrap();
        // Ask for slightly less than the collection achieves so there is room to prune.
        let goal = before.fraction() * 0.9;
        let options = ReductionOptions::builder()
            .coverage_goal(goal)
            .log_level(LogLevel::Verbose)
            .build();

        let mut pruned = original.clone();
        let outcome = reduce(&context, options, &mut pruned).unwrap();
        let after = verify(&context, &pruned).unwrap();

        assert_eq!(after, outcome.report);
        assert!(after.covered >= outcome.required);
        assert!(pruned.len() <= original.len());
        assert_eq!(pruned.len() + outcome.tickets_removed, original.len());
        // Survivors keep their relative order.
        let mut remaining = pruned.iter().peekable();
        for ticket in original.iter() {
            if remaining.peek() == Some(&ticket) {
                remaining.next();
            }
        }
        assert!(remaining.next().is_none());
    }
}

#[test]
fn test_ticket_pruning_reaches_fixed_point() {
    let context = DesignContext::new(DesignParameters::new(10, 3, 5)).unwrap();
    let sampler = TicketSampler::new(10, 5);
    let mut tickets = random_collection(&sampler, 30, 9);
    let options = ReductionOptions::builder().coverage_goal(0.7).build();
    let mut reducer = Reducer::new(&context, options).unwrap();

    let first = reducer.prune_tickets(&mut tickets).unwrap();
    let second = reducer.prune_tickets(&mut tickets).unwrap();
    assert_eq!(second.tickets_removed, 0);
    assert_eq!(second.passes, 1);
    assert_eq!(second.report, first.report);

    // Every survivor is needed.
    for index in 0..tickets.len() {
        let without = verify(&context, &tickets.without(index)).unwrap();
        assert!(without.covered < first.required);
    }
}

#[test]
fn test_element_pruning_after_greedy() {
    let context = DesignContext::new(DesignParameters::new(10, 3, 6)).unwrap();
    let options = GreedyOptions::builder()
        .target_coverage(1.0)
        .max_tickets(40)
        .batch_size(16)
        .build();
    let construction = GreedyCoordinator::new(&context, options)
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(6))
        .unwrap();

    let mut tickets = construction.tickets.clone();
    let options = ReductionOptions::builder()
        .coverage_goal(0.9)
        .mode(ReductionMode::Elements)
        .log_level(LogLevel::Minimal)
        .build();
    let outcome = Reducer::new(&context, options)
        .unwrap()
        .reduce(&mut tickets)
        .unwrap();

    assert_eq!(tickets.len(), construction.tickets.len());
    assert!(outcome.report.covered >= outcome.required);
    assert!(tickets.iter().all(|t| t.len() >= 3));
    let shrunk: usize = construction
        .tickets
        .iter()
        .zip(tickets.iter())
        .map(|(before, after)| {
            assert!(before.is_superset_of(after.elements()));
            before.len() - after.len()
        })
        .sum();
    assert_eq!(shrunk, outcome.elements_removed);
}

#[test]
fn test_unreachable_goal_removes_nothing() {
    let context = DesignContext::new(DesignParameters::new(10, 3, 5)).unwrap();
    let sampler = TicketSampler::new(10, 5);
    let mut tickets = random_collection(&sampler, 3, 2);
    let original = tickets.clone();
    let options = ReductionOptions::builder().coverage_goal(1.0).build();
    let outcome = reduce(&context, options, &mut tickets).unwrap();
    assert_eq!(outcome.tickets_removed, 0);
    assert_eq!(tickets, original);
}

#[test]
fn test_invalid_goal_rejected() {
    let context = DesignContext::new(DesignParameters::new(10, 3, 5)).unwrap();
    let options = ReductionOptions::builder().coverage_goal(1.5).build();
    assert!(Reducer::new(&context, options).is_err());
}

#[test]
fn test_file_from_another_universe_is_an_error() {
    // Parsed against a 60-number universe, then checked against a 6-number design.
    let tickets = parse_tickets("1,2,3\n1,2,30\n", 60).unwrap();
    let context = DesignContext::new(DesignParameters::new(6, 2, 3)).unwrap();

    assert!(matches!(
        verify(&context, &tickets),
        Err(CoverError::InvalidTicket(_))
    ));

    let mut pruned = tickets.clone();
    assert!(matches!(
        reduce(&context, ReductionOptions::default(), &mut pruned),
        Err(CoverError::InvalidTicket(_))
    ));
    assert_eq!(pruned, tickets);
}
