use crate::config::EvolutionConfig;
use crate::genome::Genome;
use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;

/// One generation of genomes plus the settings used to breed the next
#[derive(Resource, Debug, Clone)]
pub struct Population {
    pub config: EvolutionConfig,
    pub generation: u32,
    genomes: Vec<Genome>,
    next_id: u32,
}

impl Population {
    pub fn new(config: EvolutionConfig, rng: &mut impl Rng) -> Self {
        let genomes = (0..config.population_size as u32)
            .map(|id| Genome::random(id, config.hidden_nodes, rng))
            .collect();
        Self {
            next_id: config.population_size as u32,
            config,
            generation: 0,
            genomes,
        }
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// The current generation, handed out for evaluation; fitness is written in place
    pub fn genomes_mut(&mut self) -> &mut [Genome] {
        &mut self.genomes
    }

    pub fn best(&self) -> Option<&Genome> {
        self.genomes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Replace the evaluated generation with its offspring
    pub fn evolve(&mut self, rng: &mut impl Rng) {
        self.genomes
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let size = self.config.population_size;
        let parent_count = ((size as f32 * self.config.survival_threshold).ceil() as usize)
            .clamp(1, self.genomes.len().max(1));
        let mut next: Vec<Genome> = self
            .genomes
            .iter()
            .take(self.config.elitism)
            .map(|g| Genome {
                fitness: 0.0,
                ..g.clone()
            })
            .collect();

        let parents = &self.genomes[..parent_count];
        while next.len() < size {
            let (Some(a), Some(b)) = (parents.choose(rng), parents.choose(rng)) else {
                break;
            };
            let id = self.next_id;
            self.next_id += 1;
            let mut child = Genome::crossover(id, a, b, rng);
            child.mutate(&self.config, rng);
            next.push(child);
        }

        self.genomes = next;
        self.generation += 1;
    }
}
