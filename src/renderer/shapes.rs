//! Draw list extraction

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Body, World};

/// One visible body, ready to paint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub label: String,
    /// World-space corners, clockwise from top-left
    pub corners: [Vec2; 4],
    /// Corner radii matching `corners`
    pub chamfer: [f32; 4],
    pub fill: String,
    /// Centre to the middle of the right edge; shows the body's rotation
    pub angle_indicator: (Vec2, Vec2),
}

/// Everything to draw this frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub shapes: Vec<Shape>,
}

fn body_shape(body: &Body) -> Shape {
    Shape {
        label: body.label.clone(),
        corners: body.corners(),
        chamfer: body.chamfer,
        fill: body.style.fill.clone(),
        angle_indicator: (
            body.position,
            body.world_point(Vec2::new(body.width / 2.0, 0.0)),
        ),
    }
}

/// Draw list for every visible body, in insertion order
pub fn frame(world: &World) -> Frame {
    Frame {
        shapes: world
            .bodies()
            .iter()
            .filter(|b| b.style.visible)
            .map(body_shape)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BodyDesc, PhysicsWorld, RenderStyle};

    #[test]
    fn test_hidden_bodies_are_skipped() {
        let mut world = World::default();
        world.add_body(
            BodyDesc::rectangle("handle", Vec2::ZERO, 20.0, 20.0).with_style(RenderStyle::hidden()),
        );
        world.add_body(
            BodyDesc::rectangle("chest", Vec2::new(10.0, 10.0), 4.0, 2.0)
                .with_style(RenderStyle::filled("#E0A423")),
        );

        let frame = frame(&world);
        assert_eq!(frame.shapes.len(), 1);
        let chest = &frame.shapes[0];
        assert_eq!(chest.label, "chest");
        assert_eq!(chest.fill, "#E0A423");
        assert_eq!(chest.corners[0], Vec2::new(8.0, 9.0));
        assert_eq!(chest.angle_indicator, (Vec2::new(10.0, 10.0), Vec2::new(12.0, 10.0)));
    }
}
