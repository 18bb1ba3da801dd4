pub mod base;
pub mod bird;
pub mod config;
pub mod genome;
pub mod input;
pub mod mask;
pub mod pipe;
pub mod population;
pub mod render;
pub mod roster;
pub mod round;
pub mod sprites;

use bevy::prelude::*;
use config::TICK_RATE_HZ;
use round::{PlayerInput, Scoreboard, finish_round, step_round};

/// Resource to control simulation state
#[derive(Resource, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum SimulationState {
    #[default]
    Running,
    Paused,
}

impl SimulationState {
    pub fn toggled(self) -> Self {
        match self {
            SimulationState::Running => SimulationState::Paused,
            SimulationState::Paused => SimulationState::Running,
        }
    }
}

/// Fixed-rate round simulation. The caller provides `Round`, `GameMode`,
/// `SimRng`, `SpriteMasks` and, when evolving, `Population`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .init_resource::<PlayerInput>()
            .init_resource::<Scoreboard>()
            .init_resource::<SimulationState>()
            .add_systems(
                FixedUpdate,
                (step_round, finish_round)
                    .chain()
                    .run_if(|state: Res<SimulationState>| *state == SimulationState::Running),
            );
    }
}
