use crate::config::*;
use rand::Rng;
use std::fmt;

/// Weights of a fixed-topology feed-forward controller plus its fitness
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    pub id: u32,
    pub weights: Vec<f32>,
    pub fitness: f32,
}

/// Number of weights (biases included) for a network with the given hidden width
pub fn weight_count(hidden_nodes: usize) -> usize {
    layer_sizes(hidden_nodes)
        .windows(2)
        .map(|pair| (pair[0] + 1) * pair[1])
        .sum()
}

fn layer_sizes(hidden_nodes: usize) -> Vec<usize> {
    if hidden_nodes == 0 {
        vec![NETWORK_INPUTS, 1]
    } else {
        vec![NETWORK_INPUTS, hidden_nodes, 1]
    }
}

impl Genome {
    /// Create a genome with weights drawn uniformly from [-1, 1)
    pub fn random(id: u32, hidden_nodes: usize, rng: &mut impl Rng) -> Self {
        let weights = (0..weight_count(hidden_nodes))
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        Self {
            id,
            weights,
            fitness: 0.0,
        }
    }

    /// Child with each weight taken from either parent with equal odds
    pub fn crossover(id: u32, a: &Genome, b: &Genome, rng: &mut impl Rng) -> Self {
        let weights = a
            .weights
            .iter()
            .zip(&b.weights)
            .map(|(&wa, &wb)| if rng.gen_bool(0.5) { wa } else { wb })
            .collect();
        Self {
            id,
            weights,
            fitness: 0.0,
        }
    }

    /// Perturb or replace weights in place according to the config rates
    pub fn mutate(&mut self, config: &EvolutionConfig, rng: &mut impl Rng) {
        for weight in self.weights.iter_mut() {
            if rng.gen_bool(config.weight_replace_rate as f64) {
                *weight = rng.gen_range(-1.0..1.0);
            } else if rng.gen_bool(config.weight_mutate_rate as f64) {
                let power = config.weight_mutate_power;
                if power > 0.0 {
                    *weight += rng.gen_range(-power..power);
                }
            }
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "genome #{} (fitness {:.1}) [", self.id, self.fitness)?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.2}", w)?;
        }
        write!(f, "]")
    }
}

/// One dense layer: `outputs` rows of `inputs` weights followed by a bias
#[derive(Debug, Clone, PartialEq)]
struct Layer {
    inputs: usize,
    weights: Vec<f32>,
}

/// Feed-forward network decoded from a genome, tanh on every node
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    pub fn from_genome(genome: &Genome, hidden_nodes: usize) -> Self {
        let sizes = layer_sizes(hidden_nodes);
        debug_assert_eq!(genome.weights.len(), weight_count(hidden_nodes));

        let mut offset = 0;
        let layers = sizes
            .windows(2)
            .map(|pair| {
                let len = (pair[0] + 1) * pair[1];
                let layer = Layer {
                    inputs: pair[0],
                    weights: genome.weights[offset..offset + len].to_vec(),
                };
                offset += len;
                layer
            })
            .collect();
        Self { layers }
    }

    pub fn activate(&self, inputs: &[f32]) -> f32 {
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer
                .weights
                .chunks_exact(layer.inputs + 1)
                .map(|row| {
                    let (weights, bias) = row.split_at(layer.inputs);
                    let sum: f32 = weights.iter().zip(&values).map(|(w, v)| w * v).sum();
                    (sum + bias[0]).tanh()
                })
                .collect();
        }
        values.first().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn weight_counts_include_biases() {
        assert_eq!(weight_count(0), NETWORK_INPUTS + 1);
        assert_eq!(weight_count(4), (NETWORK_INPUTS + 1) * 4 + 5);
    }

    #[test]
    fn direct_network_is_tanh_of_weighted_sum() {
        let genome = Genome {
            id: 0,
            weights: vec![0.5, -0.25, 0.0, 0.1],
            fitness: 0.0,
        };
        let net = Network::from_genome(&genome, 0);
        let out = net.activate(&[1.0, 2.0, 3.0]);
        assert!((out - (0.5f32 - 0.5 + 0.0 + 0.1).tanh()).abs() < 1e-6);
    }

    #[test]
    fn hidden_layer_output_is_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let genome = Genome::random(0, 4, &mut rng);
        let net = Network::from_genome(&genome, 4);
        let out = net.activate(&[350.0, 50.0, 150.0]);
        assert!((-1.0..=1.0).contains(&out));
    }

    #[test]
    fn crossover_takes_each_weight_from_a_parent() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = Genome::random(0, 2, &mut rng);
        let b = Genome::random(1, 2, &mut rng);
        let child = Genome::crossover(2, &a, &b, &mut rng);
        for (i, w) in child.weights.iter().enumerate() {
            assert!(*w == a.weights[i] || *w == b.weights[i]);
        }
        assert_eq!(child.fitness, 0.0);
    }

    #[test]
    fn mutation_without_rates_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut genome = Genome::random(0, 0, &mut rng);
        let before = genome.clone();
        let config = EvolutionConfig {
            weight_mutate_rate: 0.0,
            weight_replace_rate: 0.0,
            ..EvolutionConfig::default()
        };
        genome.mutate(&config, &mut rng);
        assert_eq!(genome, before);
    }
}
