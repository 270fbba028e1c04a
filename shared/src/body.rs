use crate::vector::Vector2;
use serde::{Deserialize, Serialize};

///Collision shape attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    ///Axis-aligned rectangle centred on the body position.
    Rectangle { width: f32, height: f32 },
    ///Body without extent. Never collides with anything.
    Point,
}

///World-space extents of a rectangle body.
///
/// `top` is the smaller y coordinate, `bottom` the larger one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

///Represents a kinematic body on the world plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    ///The positional center of the body.
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    pub shape: Shape,
}

impl Body {
    pub fn new(shape: Shape) -> Self {
        Self {
            position: Vector2::ZERO,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            shape,
        }
    }

    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(Shape::Rectangle { width, height })
    }

    pub fn point() -> Self {
        Self::new(Shape::Point)
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vector2::new(x, y);
        self
    }

    pub fn with_velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vector2::new(x, y);
        self
    }

    ///Advances the body by `dt` seconds.
    ///
    /// Velocity is updated before position. There is no clamping and no
    /// sub-stepping, so a large `dt` can carry a fast body through a thin wall.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity = self.velocity.add(&self.acceleration.scale(dt));
        self.position = self.position.add(&self.velocity.scale(dt));
    }

    ///Returns the world-space extents, or `None` for shapes without area.
    pub fn edges(&self) -> Option<Edges> {
        match self.shape {
            Shape::Rectangle { width, height } => Some(Edges {
                left: self.position.x - width / 2.0,
                right: self.position.x + width / 2.0,
                top: self.position.y - height / 2.0,
                bottom: self.position.y + height / 2.0,
            }),
            Shape::Point => None,
        }
    }

    ///Checks whether two bodies overlap.
    ///
    /// Rectangles that only touch along an edge do not overlap. Any pair that
    /// is not rectangle against rectangle is unsupported and never overlaps.
    pub fn overlaps(&self, other: &Body) -> bool {
        match (self.edges(), other.edges()) {
            (Some(a), Some(b)) => {
                !(a.right <= b.left || a.left >= b.right || a.bottom <= b.top || a.top >= b.bottom)
            }
            _ => false,
        }
    }
}
