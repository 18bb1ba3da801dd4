use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::{EguiContexts, EguiPlugin, egui};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;

use flappy_evo::base::{spawn_base_tiles, sync_base_tiles};
use flappy_evo::bird::sync_bird_sprites;
use flappy_evo::config::*;
use flappy_evo::input::read_player_input;
use flappy_evo::pipe::sync_pipe_sprites;
use flappy_evo::population::Population;
use flappy_evo::render::{setup_camera, spawn_background};
use flappy_evo::round::{GameMode, Round, Scoreboard, SimRng};
use flappy_evo::sprites::setup_sprites;
use flappy_evo::{SimulationPlugin, SimulationState};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Fly a single bird with space or left click
    Manual,
    /// Evolve a population of network-controlled birds
    Evolve,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Flappy bird with neuro-evolved pilots")]
struct Cli {
    #[arg(long, value_enum, default_value = "evolve")]
    mode: Mode,

    /// Path to an evolution config YAML file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of generations to evolve
    #[arg(long)]
    generations: Option<u32>,

    /// Seed for pipe placement and evolution
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EvolutionConfig::from_yaml_file(path)
            .with_context(|| format!("loading evolution config {}", path.display()))?,
        None => EvolutionConfig::default(),
    };
    if let Some(generations) = cli.generations {
        config.generations = generations;
    }
    config.validate().context("checking evolution config")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Flappy Evo".to_string(),
            resolution: WindowResolution::new(WIN_WIDTH, WIN_HEIGHT),
            resizable: false,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(EguiPlugin)
    .add_plugins(SimulationPlugin);

    match cli.mode {
        Mode::Manual => {
            app.insert_resource(GameMode::Manual)
                .insert_resource(Round::player(&mut rng));
        }
        Mode::Evolve => {
            let population = Population::new(config, &mut rng);
            app.insert_resource(GameMode::Evolve)
                .insert_resource(Round::evolving(&population, &mut rng))
                .insert_resource(population);
        }
    }

    app.insert_resource(SimRng(rng))
        .add_systems(
            Startup,
            (
                setup_camera,
                (setup_sprites, (spawn_background, spawn_base_tiles)).chain(),
            ),
        )
        .add_systems(
            Update,
            (
                read_player_input,
                ui_system,
                sync_bird_sprites,
                sync_pipe_sprites,
                sync_base_tiles,
            ),
        )
        .run();

    Ok(())
}

fn ui_system(
    mut contexts: EguiContexts,
    mode: Res<GameMode>,
    round: Res<Round>,
    scoreboard: Res<Scoreboard>,
    population: Option<Res<Population>>,
    mut simulation_state: ResMut<SimulationState>,
) {
    egui::Window::new("Flappy Evo")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                let button_text = if *simulation_state == SimulationState::Running {
                    "⏸ Pause"
                } else {
                    "▶ Resume"
                };
                if ui.button(button_text).clicked() {
                    *simulation_state = simulation_state.toggled();
                }
                ui.label(format!("State: {:?}", *simulation_state));
            });

            ui.separator();
            ui.heading(format!("Score: {}", round.score));
            ui.label(format!("Best score: {}", scoreboard.best_score));
            ui.label(format!("Birds alive: {}", round.roster.len()));

            if let Some(population) = population.as_ref() {
                ui.separator();
                ui.label(format!(
                    "Generation: {} / {}",
                    population.generation + 1,
                    population.config.generations
                ));
                if let Some(best) = population.best() {
                    ui.label(format!("Leader fitness: {:.1}", best.fitness));
                }
                if let Some(best) = scoreboard.best_fitness {
                    ui.label(format!("Best fitness so far: {:.1}", best));
                }
            }

            ui.separator();
            ui.label("Controls:");
            if *mode == GameMode::Manual {
                ui.label("• Space / Left Click - Flap");
            }
            ui.label("• P - Pause");
        });
}
