use crate::SimulationState;
use crate::round::PlayerInput;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

/// Space or left click flaps; P toggles pause
pub fn read_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    mut input: ResMut<PlayerInput>,
    mut state: ResMut<SimulationState>,
) {
    // Clicks on the HUD are not flaps
    let over_hud = contexts.ctx_mut().wants_pointer_input();

    if keys.just_pressed(KeyCode::Space)
        || (mouse_button.just_pressed(MouseButton::Left) && !over_hud)
    {
        input.jump = true;
    }

    if keys.just_pressed(KeyCode::KeyP) {
        *state = state.toggled();
    }
}
