use crate::base::Base;
use crate::bird::Bird;
use crate::config::*;
use crate::genome::{Genome, Network};
use crate::pipe::{Pipe, PipeId};
use crate::population::Population;
use crate::roster::Roster;
use crate::sprites::SpriteMasks;
use bevy::prelude::*;
use rand::Rng;
use rand::rngs::StdRng;

/// Who flies the birds
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Manual,
    Evolve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    /// Every bird has died
    Extinct,
    /// The configured score limit was reached with birds still alive
    ScoreLimit,
}

/// Random source shared by pipe placement and evolution
#[derive(Resource)]
pub struct SimRng(pub StdRng);

/// Jump requested by the player since the last tick
#[derive(Resource, Default)]
pub struct PlayerInput {
    pub jump: bool,
}

/// Results across rounds, shown in the HUD
#[derive(Resource, Default, Debug)]
pub struct Scoreboard {
    pub rounds: u32,
    pub best_score: u32,
    pub best_fitness: Option<f32>,
}

/// State of the round being played: birds, pipes, ground, and score
#[derive(Resource, Debug, Clone)]
pub struct Round {
    pub roster: Roster,
    pub pipes: Vec<Pipe>,
    pub base: Base,
    pub score: u32,
    pub ticks: u64,
    pub status: RoundStatus,
    pub score_limit: Option<u32>,
    next_pipe_id: PipeId,
}

impl Round {
    pub fn new(roster: Roster, score_limit: Option<u32>, rng: &mut impl Rng) -> Self {
        Self {
            roster,
            pipes: vec![Pipe::new(0, FIRST_PIPE_X, rng)],
            base: Base::new(FLOOR),
            score: 0,
            ticks: 0,
            status: RoundStatus::Running,
            score_limit,
            next_pipe_id: 1,
        }
    }

    pub fn player(rng: &mut impl Rng) -> Self {
        Self::new(
            Roster::player(Bird::new(0, BIRD_START_X, BIRD_START_Y)),
            None,
            rng,
        )
    }

    /// One network-flown bird per genome of the current generation
    pub fn evolving(population: &Population, rng: &mut impl Rng) -> Self {
        let hidden = population.config.hidden_nodes;
        let roster = Roster::piloted(population.genomes().iter().enumerate().map(|(i, genome)| {
            (
                Network::from_genome(genome, hidden),
                i,
                Bird::new(i as u32, BIRD_START_X, BIRD_START_Y),
            )
        }));
        Self::new(roster, population.config.score_limit, rng)
    }

    /// Index of the pipe the birds should aim for: the first one until the
    /// birds have cleared its right edge
    pub fn target_pipe(&self) -> Option<usize> {
        let bird_x = self.roster.birds().first()?.x as f32;
        match self.pipes.first() {
            Some(first) if self.pipes.len() > 1 && bird_x > first.right_edge() => Some(1),
            Some(_) => Some(0),
            None => None,
        }
    }

    /// Advance the whole round by one tick
    pub fn step(
        &mut self,
        player_jump: bool,
        genomes: &mut [Genome],
        masks: &SpriteMasks,
        rng: &mut impl Rng,
    ) -> RoundStatus {
        if self.roster.is_empty() {
            self.status = RoundStatus::Extinct;
            return self.status;
        }

        self.move_birds(player_jump, genomes);
        self.base.advance();

        // Pipes: collisions, passing, retirement
        let mut hit = Vec::new();
        let mut add_pipe = false;
        let mut retired = Vec::new();
        for pipe in self.pipes.iter_mut() {
            for (i, bird) in self.roster.birds().iter().enumerate() {
                if !hit.contains(&i) && pipe.collides(bird, masks) {
                    hit.push(i);
                }
            }

            let passed_by_survivor = self
                .roster
                .birds()
                .iter()
                .enumerate()
                .any(|(i, bird)| !hit.contains(&i) && pipe.x < bird.x as f32);
            if !pipe.passed && passed_by_survivor {
                pipe.passed = true;
                add_pipe = true;
            }

            if pipe.off_screen() {
                retired.push(pipe.id);
            }
            pipe.advance();
        }

        for &i in &hit {
            if let Some(genome) = self.roster.genome(i).and_then(|g| genomes.get_mut(g)) {
                genome.fitness -= COLLISION_PENALTY;
            }
        }
        self.roster.remove_all(hit);

        if add_pipe {
            self.score += 1;
            for &g in self.roster.genome_indices() {
                if let Some(genome) = genomes.get_mut(g) {
                    genome.fitness += PIPE_REWARD;
                }
            }
            let id = self.next_pipe_id;
            self.next_pipe_id += 1;
            self.pipes.push(Pipe::new(id, SPAWN_PIPE_X, rng));
        }
        self.pipes.retain(|p| !retired.contains(&p.id));

        let grounded = self
            .roster
            .birds()
            .iter()
            .enumerate()
            .filter(|(_, bird)| bird.out_of_bounds())
            .map(|(i, _)| i)
            .collect();
        self.roster.remove_all(grounded);

        self.ticks += 1;
        self.status = if self.roster.is_empty() {
            RoundStatus::Extinct
        } else if self.score_limit.is_some_and(|limit| self.score >= limit) {
            RoundStatus::ScoreLimit
        } else {
            RoundStatus::Running
        };
        self.status
    }

    /// Reward survival, integrate every bird, and let networks decide to jump
    fn move_birds(&mut self, player_jump: bool, genomes: &mut [Genome]) {
        let target = self
            .target_pipe()
            .and_then(|i| self.pipes.get(i))
            .map(|p| (p.height, p.bottom));
        let piloted = self.roster.is_piloted();

        for i in 0..self.roster.len() {
            if let Some(genome) = self.roster.genome(i).and_then(|g| genomes.get_mut(g)) {
                genome.fitness += SURVIVAL_REWARD;
            }

            let bird = &mut self.roster.birds_mut()[i];
            if !piloted && player_jump {
                bird.jump();
            }
            bird.advance();
            let y = bird.y;

            let wants_jump = match (self.roster.network(i), target) {
                (Some(network), Some((height, bottom))) => {
                    network.activate(&[y, (y - height).abs(), (y - bottom).abs()]) > JUMP_THRESHOLD
                }
                _ => false,
            };
            if wants_jump {
                self.roster.birds_mut()[i].jump();
            }
        }
    }
}

/// Fixed-tick system advancing the round
pub fn step_round(
    mut round: ResMut<Round>,
    masks: Res<SpriteMasks>,
    mut rng: ResMut<SimRng>,
    mut input: ResMut<PlayerInput>,
    population: Option<ResMut<Population>>,
) {
    if round.status != RoundStatus::Running {
        return;
    }
    let jump = std::mem::take(&mut input.jump);
    match population {
        Some(mut population) => {
            round.step(jump, population.genomes_mut(), &masks, &mut rng.0);
        }
        None => {
            round.step(jump, &mut [], &masks, &mut rng.0);
        }
    }
}

/// Fixed-tick system that closes a finished round and starts the next one
pub fn finish_round(
    mut round: ResMut<Round>,
    mode: Res<GameMode>,
    mut rng: ResMut<SimRng>,
    mut scoreboard: ResMut<Scoreboard>,
    population: Option<ResMut<Population>>,
    mut exit: EventWriter<AppExit>,
) {
    if round.status == RoundStatus::Running {
        return;
    }

    scoreboard.rounds += 1;
    scoreboard.best_score = scoreboard.best_score.max(round.score);

    match (*mode, population) {
        (GameMode::Evolve, Some(mut population)) => {
            let best = population.best().map(|g| (g.id, g.fitness));
            if let Some((_, fitness)) = best {
                scoreboard.best_fitness = Some(
                    scoreboard
                        .best_fitness
                        .map_or(fitness, |previous| previous.max(fitness)),
                );
            }
            info!(
                "generation {} finished after {} ticks: score {}, best genome {:?}",
                population.generation, round.ticks, round.score, best
            );
            if round.status == RoundStatus::ScoreLimit {
                if let Some(genome) = population.best() {
                    info!("score limit reached by {}", genome);
                }
            }

            if population.generation + 1 >= population.config.generations {
                info!(
                    "evolution finished after {} generations, best score {}",
                    population.generation + 1,
                    scoreboard.best_score
                );
                exit.send(AppExit::Success);
                return;
            }

            population.evolve(&mut rng.0);
            *round = Round::evolving(&population, &mut rng.0);
        }
        (GameMode::Evolve, None) => {
            warn!("evolve mode without a population, stopping");
            exit.send(AppExit::Success);
        }
        (GameMode::Manual, _) => {
            info!(
                "round {} over: score {} (best {})",
                scoreboard.rounds, round.score, scoreboard.best_score
            );
            *round = Round::player(&mut rng.0);
        }
    }
}
