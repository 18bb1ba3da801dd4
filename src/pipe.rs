use crate::bird::Bird;
use crate::config::*;
use crate::render::{SpriteLayer, screen_to_world};
use crate::round::Round;
use crate::sprites::{SpriteHandles, SpriteMasks};
use bevy::prelude::*;
use rand::Rng;

pub type PipeId = u32;

/// A top/bottom pipe pair with a randomly placed gap
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: PipeId,
    pub x: f32,
    /// Y of the gap's upper edge
    pub height: f32,
    /// Y of the top pipe's upper-left corner (negative, drawn above the screen)
    pub top: f32,
    /// Y of the bottom pipe's upper-left corner
    pub bottom: f32,
    pub passed: bool,
}

impl Pipe {
    pub fn new(id: PipeId, x: f32, rng: &mut impl Rng) -> Self {
        let mut pipe = Self {
            id,
            x,
            height: 0.0,
            top: 0.0,
            bottom: 0.0,
            passed: false,
        };
        pipe.set_height(rng.gen_range(PIPE_MIN_HEIGHT..PIPE_MAX_HEIGHT) as f32);
        pipe
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
        self.top = height - PIPE_HEIGHT as f32;
        self.bottom = height + PIPE_GAP;
    }

    pub fn advance(&mut self) {
        self.x -= SCROLL_VELOCITY;
    }

    /// Fully scrolled past the left edge
    pub fn off_screen(&self) -> bool {
        self.x + (PIPE_WIDTH as f32) < 0.0
    }

    /// Right edge, used to pick which pipe the birds look at
    pub fn right_edge(&self) -> f32 {
        self.x + PIPE_WIDTH as f32
    }

    /// Pixel-exact test of the bird's current frame against both pipes
    pub fn collides(&self, bird: &Bird, masks: &SpriteMasks) -> bool {
        let bird_mask = bird.mask(masks);
        let bird_y = bird.y.round() as i32;
        let dx = self.x.round() as i32 - bird.x;

        let top_offset = (dx, self.top.round() as i32 - bird_y);
        let bottom_offset = (dx, self.bottom.round() as i32 - bird_y);

        bird_mask.overlap(&masks.pipe_top, top_offset).is_some()
            || bird_mask.overlap(&masks.pipe_bottom, bottom_offset).is_some()
    }
}

/// Links a sprite entity to a pipe; `flipped` marks the top half
#[derive(Component)]
pub struct PipeSprite {
    pub id: PipeId,
    pub flipped: bool,
}

/// System that mirrors the round's pipes into sprite entities
pub fn sync_pipe_sprites(
    mut commands: Commands,
    round: Res<Round>,
    handles: Res<SpriteHandles>,
    mut sprites: Query<(Entity, &PipeSprite, &mut Transform)>,
) {
    let mut drawn = Vec::with_capacity(round.pipes.len());

    for (entity, link, mut transform) in sprites.iter_mut() {
        match round.pipes.iter().find(|p| p.id == link.id) {
            Some(pipe) => {
                transform.translation = pipe_translation(pipe, link.flipped);
                if !link.flipped {
                    drawn.push(pipe.id);
                }
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for pipe in round.pipes.iter().filter(|p| !drawn.contains(&p.id)) {
        for flipped in [true, false] {
            commands.spawn((
                PipeSprite { id: pipe.id, flipped },
                Sprite {
                    image: handles.pipe.clone(),
                    flip_y: flipped,
                    ..default()
                },
                Transform::from_translation(pipe_translation(pipe, flipped)),
            ));
        }
    }
}

fn pipe_translation(pipe: &Pipe, flipped: bool) -> Vec3 {
    let y = if flipped { pipe.top } else { pipe.bottom };
    screen_to_world(pipe.x, y, PIPE_WIDTH as f32, PIPE_HEIGHT as f32, SpriteLayer::Pipe)
}
