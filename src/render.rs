use crate::config::*;
use crate::sprites::SpriteHandles;
use bevy::prelude::*;

#[derive(Component)]
pub struct MainCamera;

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLayer {
    Background,
    Pipe,
    Base,
    Bird,
}

impl SpriteLayer {
    pub fn z(self) -> f32 {
        match self {
            SpriteLayer::Background => 0.0,
            SpriteLayer::Pipe => 1.0,
            SpriteLayer::Base => 2.0,
            SpriteLayer::Bird => 3.0,
        }
    }
}

/// Convert a sprite's top-left corner in screen space (origin top-left, y
/// down) into the world-space centre Bevy draws sprites at
pub fn screen_to_world(x: f32, y: f32, width: f32, height: f32, layer: SpriteLayer) -> Vec3 {
    Vec3::new(
        x + width / 2.0 - WIN_WIDTH / 2.0,
        WIN_HEIGHT / 2.0 - (y + height / 2.0),
        layer.z(),
    )
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera, Transform::from_xyz(0.0, 0.0, 0.0)));
}

pub fn spawn_background(mut commands: Commands, handles: Res<SpriteHandles>) {
    commands.spawn((
        Sprite::from_image(handles.background.clone()),
        Transform::from_translation(screen_to_world(
            0.0,
            0.0,
            WIN_WIDTH,
            WIN_HEIGHT,
            SpriteLayer::Background,
        )),
    ));
}
