use super::BreedStrategy;
use crate::error::{CoverError, Result};
use crate::evolution::options::EvolutionOptions;
use crate::phenotype::Phenotype;
use crate::rng::RandomNumberGenerator;

/// # CrossoverStrategy
///
/// Pairs two distinct parents at random, recombines them into two children and mutates
/// both. Repeats until the next generation holds `population_size` individuals.
///
/// A single parent is copied and mutated instead of recombined.
#[derive(Debug, Clone, Default)]
pub struct CrossoverStrategy;

impl<Pheno> BreedStrategy<Pheno> for CrossoverStrategy
where
    Pheno: Phenotype,
{
    fn breed(
        &self,
        parents: &[Pheno],
        evol_options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Pheno>> {
        if parents.is_empty() {
            return Err(CoverError::EmptyPopulation);
        }

        let target = evol_options.get_population_size();
        let mut children: Vec<Pheno> = Vec::with_capacity(target + 1);

        while children.len() < target {
            if parents.len() < 2 {
                let mut child = parents[0].clone();
                child.mutate(rng);
                children.push(child);
                continue;
            }

            let pair = rng.distinct_indices(parents.len(), 2);
            let (mut first, mut second) = parents[pair[0]].crossover(&parents[pair[1]], rng);
            first.mutate(rng);
            second.mutate(rng);
            children.push(first);
            children.push(second);
        }

        children.truncate(target);
        Ok(children)
    }
}
