use crate::bird::Bird;
use crate::genome::Network;

/// Birds of one round and, when evolving, the network and genome index
/// controlling each of them. Index `i` names the same bird in all three lists.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    birds: Vec<Bird>,
    networks: Vec<Network>,
    genomes: Vec<usize>,
}

impl Roster {
    /// A single player-controlled bird
    pub fn player(bird: Bird) -> Self {
        Self {
            birds: vec![bird],
            ..Self::default()
        }
    }

    /// Birds flown by networks, each tied to the genome it was built from
    pub fn piloted(entries: impl IntoIterator<Item = (Network, usize, Bird)>) -> Self {
        let mut roster = Self::default();
        for (network, genome, bird) in entries {
            roster.networks.push(network);
            roster.genomes.push(genome);
            roster.birds.push(bird);
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.birds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.birds.is_empty()
    }

    /// Whether birds are controlled by networks rather than the player
    pub fn is_piloted(&self) -> bool {
        !self.networks.is_empty()
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn birds_mut(&mut self) -> &mut [Bird] {
        &mut self.birds
    }

    pub fn network(&self, index: usize) -> Option<&Network> {
        self.networks.get(index)
    }

    /// Index into the population's genomes for the bird at `index`
    pub fn genome(&self, index: usize) -> Option<usize> {
        self.genomes.get(index).copied()
    }

    pub fn genome_indices(&self) -> &[usize] {
        &self.genomes
    }

    /// Drop a bird together with its controller
    pub fn remove(&mut self, index: usize) -> Bird {
        if self.is_piloted() {
            self.networks.remove(index);
            self.genomes.remove(index);
        }
        let bird = self.birds.remove(index);
        debug_assert!(self.is_consistent());
        bird
    }

    /// Drop every listed bird; indices refer to positions before any removal
    pub fn remove_all(&mut self, mut indices: Vec<usize>) -> Vec<Bird> {
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().rev().map(|i| self.remove(i)).collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.networks.len() == self.genomes.len()
            && (self.networks.is_empty() || self.networks.len() == self.birds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;

    fn piloted(n: usize) -> Roster {
        Roster::piloted((0..n).map(|i| {
            let genome = Genome {
                id: i as u32,
                weights: vec![i as f32; 4],
                fitness: 0.0,
            };
            (Network::from_genome(&genome, 0), i, Bird::new(i as u32, 230, 100.0 + i as f32))
        }))
    }

    #[test]
    fn removal_keeps_lists_aligned() {
        let mut roster = piloted(6);
        roster.remove(2);
        roster.remove_all(vec![4, 0, 4]);

        assert!(roster.is_consistent());
        assert_eq!(roster.len(), 3);
        for (i, bird) in roster.birds().iter().enumerate() {
            // Bird ids and genome indices were created equal and must stay paired
            assert_eq!(roster.genome(i), Some(bird.id as usize));
            let expected = Network::from_genome(
                &Genome {
                    id: bird.id,
                    weights: vec![bird.id as f32; 4],
                    fitness: 0.0,
                },
                0,
            );
            assert_eq!(roster.network(i), Some(&expected));
        }
    }

    #[test]
    fn removing_everything_empties_all_lists() {
        let mut roster = piloted(3);
        roster.remove_all(vec![0, 1, 2]);
        assert!(roster.is_empty());
        assert!(roster.is_consistent());
        assert!(roster.genome_indices().is_empty());
    }

    #[test]
    fn player_roster_has_no_controllers() {
        let mut roster = Roster::player(Bird::new(0, 230, 350.0));
        assert!(!roster.is_piloted());
        assert_eq!(roster.genome(0), None);
        roster.remove(0);
        assert!(roster.is_empty());
        assert!(roster.is_consistent());
    }
}
