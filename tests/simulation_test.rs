use bevy::prelude::*;
use flappy_evo::bird::{BirdSprite, sync_bird_sprites};
use flappy_evo::config::EvolutionConfig;
use flappy_evo::population::Population;
use flappy_evo::round::{GameMode, Round, RoundStatus, Scoreboard, SimRng};
use flappy_evo::sprites::{SpriteHandles, SpriteMasks};
use flappy_evo::{SimulationPlugin, SimulationState};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn small_config() -> EvolutionConfig {
    EvolutionConfig {
        population_size: 6,
        generations: 2,
        score_limit: Some(2),
        ..EvolutionConfig::default()
    }
}

/// Headless app running the fixed-rate simulation only
fn evolving_app(config: EvolutionConfig) -> App {
    let mut rng = StdRng::seed_from_u64(2024);
    let population = Population::new(config, &mut rng);
    let round = Round::evolving(&population, &mut rng);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .insert_resource(GameMode::Evolve)
        .insert_resource(SpriteMasks::generate())
        .insert_resource(round)
        .insert_resource(population)
        .insert_resource(SimRng(rng));
    app
}

fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

/// Evolution runs every generation and then asks the app to exit
#[test]
fn test_evolution_runs_all_generations() {
    let mut app = evolving_app(small_config());

    let mut ticks = 0;
    while app.should_exit().is_none() && ticks < 10_000 {
        tick(&mut app);
        ticks += 1;
    }

    assert!(app.should_exit().is_some(), "app never exited after {ticks} ticks");
    let population = app.world().resource::<Population>();
    assert_eq!(population.generation, 1);
    assert_eq!(population.genomes().len(), 6);
    assert_eq!(app.world().resource::<Scoreboard>().rounds, 2);
}

/// Every bird of a generation gets a fitness once its round is over
#[test]
fn test_round_writes_fitness_into_genomes() {
    let mut app = evolving_app(EvolutionConfig {
        generations: 5,
        ..small_config()
    });

    while app.world().resource::<Scoreboard>().rounds == 0 {
        tick(&mut app);
    }

    // The finished generation was bred into a fresh one with zeroed fitness
    let population = app.world().resource::<Population>();
    assert_eq!(population.generation, 1);
    assert!(population.genomes().iter().all(|g| g.fitness == 0.0));
    assert!(app.world().resource::<Scoreboard>().best_fitness.is_some_and(|f| f > 0.0));

    let round = app.world().resource::<Round>();
    assert_eq!(round.roster.len(), 6);
    assert_eq!(round.status, RoundStatus::Running);
}

/// Pausing freezes the round
#[test]
fn test_paused_simulation_does_not_tick() {
    let mut app = evolving_app(small_config());
    app.insert_resource(SimulationState::Paused);

    for _ in 0..10 {
        tick(&mut app);
    }
    assert_eq!(app.world().resource::<Round>().ticks, 0);

    app.insert_resource(SimulationState::Running);
    tick(&mut app);
    assert_eq!(app.world().resource::<Round>().ticks, 1);
}

/// A player who never flaps hits the ground and a new round starts
#[test]
fn test_manual_round_restarts_after_crash() {
    let mut rng = StdRng::seed_from_u64(7);
    let round = Round::player(&mut rng);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .insert_resource(GameMode::Manual)
        .insert_resource(SpriteMasks::generate())
        .insert_resource(round)
        .insert_resource(SimRng(rng));

    for _ in 0..100 {
        tick(&mut app);
    }

    assert!(app.world().resource::<Scoreboard>().rounds >= 1);
    assert!(app.should_exit().is_none());
    assert_eq!(app.world().resource::<Round>().roster.len(), 1);
}

/// Bird sprites follow the roster: spawned for new birds, despawned for dead ones
#[test]
fn test_bird_sprites_follow_roster() {
    let mut rng = StdRng::seed_from_u64(1);
    let population = Population::new(
        EvolutionConfig {
            population_size: 3,
            ..EvolutionConfig::default()
        },
        &mut rng,
    );
    let round = Round::evolving(&population, &mut rng);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SpriteHandles {
            bird: [Handle::default(), Handle::default(), Handle::default()],
            pipe: Handle::default(),
            base: Handle::default(),
            background: Handle::default(),
        })
        .insert_resource(round)
        .add_systems(Update, sync_bird_sprites);

    app.update();
    let count = app.world_mut().query::<&BirdSprite>().iter(app.world()).count();
    assert_eq!(count, 3);

    app.world_mut().resource_mut::<Round>().roster.remove(1);
    app.update();
    let ids: Vec<u32> = app
        .world_mut()
        .query::<&BirdSprite>()
        .iter(app.world())
        .map(|s| s.0)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&1));
}
