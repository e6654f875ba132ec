use crate::combinatorics::Rank;
use crate::error::{CoverError, Result};
use crate::phenotype::Phenotype;
use crate::rng::RandomNumberGenerator;

/// Tournament selection: draw `tournament_size` distinct individuals at random, keep the
/// `winners` fittest of them, and repeat until enough individuals are selected.
///
/// Individuals can win several tournaments, so the selection may hold duplicates. Within a
/// tournament, equal fitness is resolved in draw order.
///
/// # Examples
///
/// ```
/// use covergen::phenotype::{Individual, Phenotype};
/// use covergen::rng::{RandomNumberGenerator, TicketSampler};
/// use covergen::selection::TournamentSelection;
///
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let sampler = TicketSampler::new(12, 4);
/// let population: Vec<Individual> =
///     (0..6).map(|_| Individual::random(&sampler, 3, 0.1, &mut rng)).collect();
/// let fitness = vec![5, 9, 1, 7, 3, 8];
///
/// let selection = TournamentSelection::default();
/// let selected = selection.select(&population, &fitness, 6, &mut rng).unwrap();
/// assert_eq!(selected.len(), 6);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    winners: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0, or `winners` is 0 or exceeds it.
    pub fn new(tournament_size: usize, winners: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(CoverError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if winners < 1 || winners > tournament_size {
            return Err(CoverError::Configuration(format!(
                "Tournament winners ({}) must be between 1 and {}",
                winners, tournament_size
            )));
        }
        Ok(Self {
            tournament_size,
            winners,
        })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn winners(&self) -> usize {
        self.winners
    }

    /// Runs a single tournament and returns the indices of its winners, fittest first.
    fn run_tournament(&self, fitness: &[Rank], rng: &mut RandomNumberGenerator) -> Vec<usize> {
        let mut contenders = rng.distinct_indices(fitness.len(), self.tournament_size);
        contenders.sort_by(|&a, &b| fitness[b].cmp(&fitness[a]));
        contenders.truncate(self.winners);
        contenders
    }

    /// Selects `num_to_select` individuals from `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty, if `fitness` and `population` differ in
    /// length, or if the population is smaller than one tournament.
    pub fn select<P: Phenotype>(
        &self,
        population: &[P],
        fitness: &[Rank],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<P>> {
        if population.is_empty() {
            return Err(CoverError::EmptyPopulation);
        }

        if fitness.len() != population.len() {
            return Err(CoverError::Configuration(format!(
                "Fitness vector length ({}) doesn't match population length ({})",
                fitness.len(),
                population.len()
            )));
        }

        if population.len() < self.tournament_size {
            return Err(CoverError::Configuration(format!(
                "Population ({}) is smaller than the tournament size ({})",
                population.len(),
                self.tournament_size
            )));
        }

        let mut selected = Vec::with_capacity(num_to_select);
        while selected.len() < num_to_select {
            for winner in self.run_tournament(fitness, rng) {
                if selected.len() == num_to_select {
                    break;
                }
                selected.push(population[winner].clone());
            }
        }

        Ok(selected)
    }
}

impl Default for TournamentSelection {
    /// Four contenders, two winners.
    fn default() -> Self {
        Self {
            tournament_size: 4,
            winners: 2,
        }
    }
}
