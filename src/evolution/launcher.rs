use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::{debug, info};

use super::{challenge::Challenge, options::EvolutionOptions};
use crate::{
    combinatorics::Rank,
    error::{CoverError, OptionExt, Result},
    evaluator::WorkerPool,
    phenotype::Phenotype,
    rng::RandomNumberGenerator,
    selection::TournamentSelection,
    strategy::BreedStrategy,
};

/// Fitness figures for one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    /// Best fitness within this generation.
    pub best: Rank,
    pub mean: f64,
    /// Best fitness seen in this or any earlier generation.
    pub best_so_far: Rank,
}

/// Represents the result of an evolution: the best phenotype ever scored and its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult<Pheno: Phenotype> {
    /// The evolved phenotype.
    pub pheno: Pheno,
    /// The fitness score of the phenotype.
    pub score: Rank,
    /// One entry per generation, in order.
    pub history: Vec<GenerationStats>,
}

/// Manages the evolution process using a specified breeding strategy and challenge.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<Pheno, Strategy, Chall>
where
    Pheno: Phenotype,
    Chall: Challenge<Pheno>,
    Strategy: BreedStrategy<Pheno>,
{
    strategy: Strategy,
    challenge: Chall,
    selection: TournamentSelection,
    _marker: PhantomData<Pheno>,
}

impl<Pheno, Strategy, Chall> EvolutionLauncher<Pheno, Strategy, Chall>
where
    Pheno: Phenotype,
    Chall: Challenge<Pheno> + Send + Sync,
    Strategy: BreedStrategy<Pheno>,
{
    /// Creates a new `EvolutionLauncher` with the specified breeding strategy, challenge and
    /// selection.
    pub fn new(strategy: Strategy, challenge: Chall, selection: TournamentSelection) -> Self {
        Self {
            strategy,
            challenge,
            selection,
            _marker: PhantomData,
        }
    }

    /// Scores every individual, on the pool when the population reaches the parallel
    /// threshold and inline otherwise. Scores keep population order.
    fn score_population(
        &self,
        population: &[Pheno],
        options: &EvolutionOptions,
        pool: &WorkerPool,
    ) -> Result<Vec<Rank>> {
        if population.len() >= options.get_parallel_threshold() {
            pool.install(|| {
                population
                    .par_iter()
                    .map(|individual| self.challenge.score(individual))
                    .collect()
            })
        } else {
            population
                .iter()
                .map(|individual| self.challenge.score(individual))
                .collect()
        }
    }

    /// Evolves `population` for `num_generations` generations.
    ///
    /// The running best is replaced only by a strictly fitter individual, so the returned
    /// score never falls below any generation's best.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options fail validation
    /// - The initial population is empty
    /// - Fitness scoring, selection or breeding fails
    pub fn evolve(
        &self,
        options: &EvolutionOptions,
        initial_population: Vec<Pheno>,
        pool: &WorkerPool,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult<Pheno>> {
        options.validate()?;
        if initial_population.is_empty() {
            return Err(CoverError::EmptyPopulation);
        }

        let log_level = options.get_log_level();
        let mut population = initial_population;
        let mut best: Option<(Pheno, Rank)> = None;
        let mut history = Vec::with_capacity(options.get_num_generations());

        for generation in 0..options.get_num_generations() {
            let fitness = self.score_population(&population, options, pool)?;

            // Earliest individual wins ties.
            let (leader, &leader_score) = fitness
                .iter()
                .enumerate()
                .rev()
                .max_by_key(|(_, score)| **score)
                .ok_or_else_cover(|| CoverError::EmptyPopulation)?;
            let mean = fitness.iter().sum::<Rank>() as f64 / fitness.len() as f64;

            let improved = best
                .as_ref()
                .map_or(true, |(_, best_score)| leader_score > *best_score);
            if improved {
                best = Some((population[leader].clone(), leader_score));
                if log_level.minimal() {
                    info!(generation, fitness = leader_score, "new best individual");
                }
            }
            let best_so_far = best.as_ref().map_or(leader_score, |(_, score)| *score);

            if log_level.verbose() {
                debug!(
                    generation,
                    best = leader_score,
                    mean,
                    best_so_far,
                    "generation scored"
                );
            }
            history.push(GenerationStats {
                generation,
                best: leader_score,
                mean,
                best_so_far,
            });

            if generation + 1 < options.get_num_generations() {
                let parents = self.selection.select(
                    &population,
                    &fitness,
                    options.get_population_size(),
                    rng,
                )?;
                population = self.strategy.breed(&parents, options, rng)?;
            }
        }

        let (pheno, score) = best.ok_or_else_cover(|| {
            CoverError::Other("Evolution completed without scoring any individual".to_string())
        })?;
        Ok(EvolutionResult {
            pheno,
            score,
            history,
        })
    }
}
