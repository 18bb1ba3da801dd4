use crate::config::*;
use crate::mask::CollisionMask;
use crate::render::{SpriteLayer, screen_to_world};
use crate::round::Round;
use crate::sprites::{SpriteHandles, SpriteMasks};
use bevy::prelude::*;
use std::collections::HashMap;

/// Stable identity of a bird across its lifetime, used to pair it with a sprite
pub type BirdId = u32;

/// A bird's kinematic state, tilt, and wing animation
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub id: BirdId,
    pub x: i32,
    pub y: f32,
    pub vel: f32,
    pub tick_count: u32,
    /// Height at the last jump; tilt stays nose-up until the bird drops below it
    pub height: f32,
    pub tilt: f32,
    pub img_count: u32,
    pub frame: usize,
}

impl Bird {
    pub fn new(id: BirdId, x: i32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            vel: 0.0,
            tick_count: 0,
            height: y,
            tilt: 0.0,
            img_count: 0,
            frame: 0,
        }
    }

    pub fn jump(&mut self) {
        self.vel = JUMP_VELOCITY;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// Vertical displacement for the current tick count, clamped and boosted
    pub fn displacement(&self) -> f32 {
        let t = self.tick_count as f32;
        let mut d = self.vel * t + GRAVITY * t * t;
        if d >= MAX_FALL_SPEED {
            d = MAX_FALL_SPEED;
        }
        if d < 0.0 {
            d -= RISE_BOOST;
        }
        d
    }

    /// Advance one tick: integrate position, update tilt and wing frame
    pub fn advance(&mut self) {
        self.tick_count += 1;
        let d = self.displacement();
        self.y += d;

        if d < 0.0 || self.y < self.height + TILT_HOLD_MARGIN {
            if self.tilt < MAX_ROTATION {
                self.tilt = MAX_ROTATION;
            }
        } else if self.tilt > MIN_ROTATION {
            self.tilt = (self.tilt - ROT_VEL).max(MIN_ROTATION);
        }

        self.animate();
    }

    /// Cycle wing frames 0,1,2,1,0; a diving bird holds its wings level
    fn animate(&mut self) {
        self.img_count += 1;

        self.frame = if self.img_count < ANIMATION_TIME {
            0
        } else if self.img_count < ANIMATION_TIME * 2 {
            1
        } else if self.img_count < ANIMATION_TIME * 3 {
            2
        } else if self.img_count < ANIMATION_TIME * 4 {
            1
        } else {
            self.img_count = 0;
            0
        };

        if self.tilt <= DIVE_TILT {
            self.frame = 1;
            self.img_count = ANIMATION_TIME * 2;
        }
    }

    pub fn mask<'a>(&self, masks: &'a SpriteMasks) -> &'a CollisionMask {
        &masks.bird[self.frame]
    }

    /// Touching the ground or flown off the top of the screen
    pub fn out_of_bounds(&self) -> bool {
        self.y + BIRD_HEIGHT as f32 >= FLOOR || self.y < 0.0
    }
}

/// Links a sprite entity to the bird it draws
#[derive(Component)]
pub struct BirdSprite(pub BirdId);

/// System that mirrors the round's birds into sprite entities
pub fn sync_bird_sprites(
    mut commands: Commands,
    round: Res<Round>,
    handles: Res<SpriteHandles>,
    mut sprites: Query<(Entity, &BirdSprite, &mut Sprite, &mut Transform)>,
) {
    let birds: HashMap<BirdId, &Bird> = round.roster.birds().iter().map(|b| (b.id, b)).collect();
    let mut drawn = Vec::with_capacity(birds.len());

    for (entity, link, mut sprite, mut transform) in sprites.iter_mut() {
        match birds.get(&link.0) {
            Some(bird) => {
                sprite.image = handles.bird[bird.frame].clone();
                *transform = bird_transform(bird);
                drawn.push(link.0);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for bird in round.roster.birds() {
        if !drawn.contains(&bird.id) {
            commands.spawn((
                BirdSprite(bird.id),
                Sprite::from_image(handles.bird[bird.frame].clone()),
                bird_transform(bird),
            ));
        }
    }
}

/// Rotate around the sprite centre, like the unrotated frame's centre on screen
fn bird_transform(bird: &Bird) -> Transform {
    let position = screen_to_world(
        bird.x as f32,
        bird.y,
        BIRD_WIDTH as f32,
        BIRD_HEIGHT as f32,
        SpriteLayer::Bird,
    );
    Transform::from_translation(position).with_rotation(Quat::from_rotation_z(bird.tilt.to_radians()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_resets_velocity_and_ticks_together() {
        let mut bird = Bird::new(0, BIRD_START_X, BIRD_START_Y);
        for _ in 0..7 {
            bird.advance();
        }
        bird.jump();
        assert_eq!(bird.vel, JUMP_VELOCITY);
        assert_eq!(bird.tick_count, 0);
        assert_eq!(bird.height, bird.y);
    }

    #[test]
    fn first_tick_after_jump_rises_with_boost() {
        let mut bird = Bird::new(0, BIRD_START_X, 300.0);
        bird.jump();
        bird.advance();
        // -10.5 + 1.5 = -9, boosted by 2
        assert_eq!(bird.y, 300.0 - 11.0);
        assert_eq!(bird.tilt, MAX_ROTATION);
    }

    #[test]
    fn fall_speed_is_clamped() {
        let mut bird = Bird::new(0, BIRD_START_X, 0.0);
        let mut last = bird.y;
        for _ in 0..30 {
            bird.advance();
            assert!(bird.y - last <= MAX_FALL_SPEED);
            last = bird.y;
        }
        assert_eq!(bird.displacement(), MAX_FALL_SPEED);
    }

    #[test]
    fn tilt_stays_within_bounds() {
        let mut bird = Bird::new(0, BIRD_START_X, 0.0);
        for tick in 0..200 {
            if tick % 37 == 0 {
                bird.jump();
            }
            bird.advance();
            assert!(
                (MIN_ROTATION..=MAX_ROTATION).contains(&bird.tilt),
                "tilt {} out of range at tick {}",
                bird.tilt,
                tick
            );
        }
    }

    #[test]
    fn long_dive_bottoms_out_at_min_rotation() {
        let mut bird = Bird::new(0, BIRD_START_X, 0.0);
        for _ in 0..40 {
            bird.advance();
        }
        assert_eq!(bird.tilt, MIN_ROTATION);
        assert_eq!(bird.frame, 1);
    }

    #[test]
    fn wings_cycle_through_frames() {
        let mut bird = Bird::new(0, BIRD_START_X, 300.0);
        let mut frames = Vec::new();
        for _ in 0..(ANIMATION_TIME * 4 + 1) {
            // Keep the bird climbing so it never dives
            bird.jump();
            bird.advance();
            frames.push(bird.frame);
        }
        assert_eq!(frames[0], 0);
        assert_eq!(frames[ANIMATION_TIME as usize], 1);
        assert_eq!(frames[ANIMATION_TIME as usize * 2], 2);
        assert_eq!(frames[ANIMATION_TIME as usize * 3], 1);
        assert_eq!(frames[ANIMATION_TIME as usize * 4], 0);
    }

    #[test]
    fn ground_and_sky_are_out_of_bounds() {
        assert!(Bird::new(0, 0, FLOOR - BIRD_HEIGHT as f32).out_of_bounds());
        assert!(Bird::new(0, 0, -1.0).out_of_bounds());
        assert!(!Bird::new(0, 0, BIRD_START_Y).out_of_bounds());
    }
}
