use crate::config::*;
use crate::mask::CollisionMask;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

/// Tightly packed RGBA8 pixel buffer
#[derive(Debug, Clone)]
pub struct RgbaSprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaSprite {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = ((y * self.width + x) * 4) as usize;
            self.pixels[i..i + 4].copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 4]) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.put(x, y, color);
            }
        }
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: [u8; 4]) {
        for y in 0..self.height {
            for x in 0..self.width {
                let nx = (x as f32 + 0.5 - cx) / rx;
                let ny = (y as f32 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.put(x, y, color);
                }
            }
        }
    }

    pub fn mask(&self) -> CollisionMask {
        CollisionMask::from_rgba(self.width, self.height, &self.pixels)
    }

    pub fn to_image(&self) -> Image {
        Image::new(
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            self.pixels.clone(),
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD,
        )
    }
}

const BIRD_BODY: [u8; 4] = [247, 201, 49, 255];
const BIRD_WING: [u8; 4] = [250, 250, 240, 255];
const BIRD_BEAK: [u8; 4] = [240, 110, 40, 255];
const BIRD_EYE: [u8; 4] = [20, 20, 20, 255];
const PIPE_BODY: [u8; 4] = [115, 190, 46, 255];
const PIPE_SHADE: [u8; 4] = [85, 140, 35, 255];
const GROUND: [u8; 4] = [222, 216, 149, 255];
const GRASS: [u8; 4] = [115, 190, 46, 255];

/// Bird sprite for one wing frame (0 = wing up, 1 = level, 2 = down)
pub fn bird_frame(frame: usize) -> RgbaSprite {
    let (w, h) = (BIRD_WIDTH as f32, BIRD_HEIGHT as f32);
    let mut sprite = RgbaSprite::new(BIRD_WIDTH, BIRD_HEIGHT);

    sprite.fill_ellipse(w * 0.45, h * 0.5, w * 0.4, h * 0.42, BIRD_BODY);
    sprite.fill_rect(
        (w * 0.78) as u32,
        (h * 0.5) as u32,
        BIRD_WIDTH,
        (h * 0.7) as u32,
        BIRD_BEAK,
    );
    sprite.fill_ellipse(w * 0.62, h * 0.32, 4.0, 4.0, BIRD_EYE);

    // Raised and lowered wings poke out of the body outline
    let wing_y = match frame {
        0 => h * 0.12,
        1 => h * 0.5,
        _ => h * 0.88,
    };
    sprite.fill_ellipse(w * 0.28, wing_y, w * 0.16, h * 0.14, BIRD_WING);
    sprite
}

/// Upright pipe with its lip at the top edge
pub fn pipe_sprite() -> RgbaSprite {
    let mut sprite = RgbaSprite::new(PIPE_WIDTH, PIPE_HEIGHT);
    sprite.fill_rect(6, 0, PIPE_WIDTH - 6, PIPE_HEIGHT, PIPE_BODY);
    sprite.fill_rect(6, 0, 16, PIPE_HEIGHT, PIPE_SHADE);
    sprite.fill_rect(0, 0, PIPE_WIDTH, 40, PIPE_BODY);
    sprite.fill_rect(0, 36, PIPE_WIDTH, 40, PIPE_SHADE);
    sprite
}

pub fn base_sprite() -> RgbaSprite {
    let mut sprite = RgbaSprite::new(BASE_WIDTH, BASE_HEIGHT);
    sprite.fill_rect(0, 0, BASE_WIDTH, BASE_HEIGHT, GROUND);
    sprite.fill_rect(0, 0, BASE_WIDTH, 20, GRASS);
    for stripe in (0..BASE_WIDTH).step_by(24) {
        sprite.fill_rect(stripe, 8, stripe + 12, 20, PIPE_SHADE);
    }
    sprite
}

pub fn background_sprite() -> RgbaSprite {
    let (w, h) = (WIN_WIDTH as u32, WIN_HEIGHT as u32);
    let mut sprite = RgbaSprite::new(w, h);
    for y in 0..h {
        let t = y as f32 / h as f32;
        let color = [
            (78.0 + 60.0 * t) as u8,
            (192.0 + 30.0 * t) as u8,
            (202.0 + 20.0 * t) as u8,
            255,
        ];
        sprite.fill_rect(0, y, w, y + 1, color);
    }
    sprite
}

/// Opacity masks used by the collision test
#[derive(Resource, Debug, Clone)]
pub struct SpriteMasks {
    pub bird: [CollisionMask; 3],
    pub pipe_top: CollisionMask,
    pub pipe_bottom: CollisionMask,
}

impl SpriteMasks {
    pub fn generate() -> Self {
        let pipe_bottom = pipe_sprite().mask();
        Self {
            bird: [bird_frame(0).mask(), bird_frame(1).mask(), bird_frame(2).mask()],
            pipe_top: pipe_bottom.flipped_vertically(),
            pipe_bottom,
        }
    }
}

/// Image handles for rendering
#[derive(Resource)]
pub struct SpriteHandles {
    pub bird: [Handle<Image>; 3],
    pub pipe: Handle<Image>,
    pub base: Handle<Image>,
    pub background: Handle<Image>,
}

/// Startup system that builds all sprites and their masks
pub fn setup_sprites(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let bird = [0, 1, 2].map(|frame| images.add(bird_frame(frame).to_image()));

    commands.insert_resource(SpriteHandles {
        bird,
        pipe: images.add(pipe_sprite().to_image()),
        base: images.add(base_sprite().to_image()),
        background: images.add(background_sprite().to_image()),
    });
    commands.insert_resource(SpriteMasks::generate());
}
