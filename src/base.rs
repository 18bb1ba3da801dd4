use crate::config::*;
use crate::render::{SpriteLayer, screen_to_world};
use crate::round::Round;
use crate::sprites::SpriteHandles;
use bevy::prelude::*;

/// Two ground tiles scrolling in a loop
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
}

impl Base {
    pub const WIDTH: f32 = BASE_WIDTH as f32;

    pub fn new(y: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: Self::WIDTH,
        }
    }

    /// Scroll both tiles; a tile that leaves the screen moves behind the other
    pub fn advance(&mut self) {
        self.x1 -= SCROLL_VELOCITY;
        self.x2 -= SCROLL_VELOCITY;

        if self.x1 + Self::WIDTH < 0.0 {
            self.x1 = self.x2 + Self::WIDTH;
        }
        if self.x2 + Self::WIDTH < 0.0 {
            self.x2 = self.x1 + Self::WIDTH;
        }
    }
}

/// Index of the ground tile a sprite draws
#[derive(Component)]
pub struct BaseTile(pub usize);

pub fn spawn_base_tiles(mut commands: Commands, handles: Res<SpriteHandles>) {
    for tile in 0..2 {
        commands.spawn((
            BaseTile(tile),
            Sprite::from_image(handles.base.clone()),
            Transform::default(),
        ));
    }
}

pub fn sync_base_tiles(round: Res<Round>, mut tiles: Query<(&BaseTile, &mut Transform)>) {
    for (tile, mut transform) in tiles.iter_mut() {
        let x = if tile.0 == 0 { round.base.x1 } else { round.base.x2 };
        transform.translation = screen_to_world(
            x,
            round.base.y,
            BASE_WIDTH as f32,
            BASE_HEIGHT as f32,
            SpriteLayer::Base,
        );
    }
}
