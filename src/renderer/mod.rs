//! Ragdoll rendering
//!
//! `shapes` turns the world into a backend-agnostic draw list; the canvas
//! backend (wasm only) paints that list onto a 2D context.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use shapes::{Frame, Shape, frame};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH};

/// Canvas size plus the world region fitted into it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// World-space region to show
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            min: Vec2::ZERO,
            max: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
        }
    }

    pub fn resized(self, width: f32, height: f32) -> Self {
        Self { width, height, ..self }
    }

    /// Uniform world-to-canvas scale that fits the region
    pub fn scale(&self) -> f32 {
        let size = self.max - self.min;
        if size.x <= 0.0 || size.y <= 0.0 {
            return 1.0;
        }
        (self.width / size.x).min(self.height / size.y)
    }

    /// World point in canvas pixels, region centred
    pub fn to_canvas(&self, world: Vec2) -> Vec2 {
        let scale = self.scale();
        let size = (self.max - self.min) * scale;
        let margin = (Vec2::new(self.width, self.height) - size) / 2.0;
        (world - self.min) * scale + margin
    }
}
