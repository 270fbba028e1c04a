//! Minimum-translation push-out between two overlapping rectangles.

use crate::body::Body;
use crate::vector::Vector2;

/// Fraction of the incoming speed kept after a contact. Zero is fully inelastic.
pub const BOUNCE: f32 = 0.0;

/// Which of the two bodies passed to [`resolve_collision`] gets displaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    First,
    Second,
}

/// Axis along which a contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// New state for the displaced body. The other body is never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub mover: Mover,
    pub axis: Axis,
    pub position: Vector2,
    pub velocity: Vector2,
}

impl Resolution {
    /// Writes the resolved state back into whichever body moved.
    pub fn apply(&self, first: &mut Body, second: &mut Body) {
        let target = match self.mover {
            Mover::First => first,
            Mover::Second => second,
        };
        target.position = self.position;
        target.velocity = self.velocity;
    }
}

/// Resolves a contact between two bodies.
///
/// The second body is treated as the mover when it has any velocity,
/// otherwise the first one is. Returns `None` when both arguments are the same
/// body, when either shape is not a rectangle, or when they do not overlap.
pub fn resolve_collision(first: &Body, second: &Body) -> Option<Resolution> {
    if std::ptr::eq(first, second) {
        return None;
    }

    let mover = if second.velocity.magnitude() != 0.0 {
        Mover::Second
    } else {
        Mover::First
    };

    let (moving, stationary) = match mover {
        Mover::First => (first, second),
        Mover::Second => (second, first),
    };

    let (axis, position, velocity) = push_out(moving, stationary)?;
    Some(Resolution {
        mover,
        axis,
        position,
        velocity,
    })
}

/// Pushes `moving` out of `stationary` along the axis of least overlap.
///
/// Ties go to the x axis. Velocity on the resolved axis is only touched when
/// it points into the obstacle.
pub fn push_out(moving: &Body, stationary: &Body) -> Option<(Axis, Vector2, Vector2)> {
    let a = moving.edges()?;
    let b = stationary.edges()?;

    let overlap_x = (a.right - b.left).min(b.right - a.left);
    let overlap_y = (a.bottom - b.top).min(b.bottom - a.top);

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let mut position = moving.position;
    let mut velocity = moving.velocity;

    if overlap_x <= overlap_y {
        if moving.position.x < stationary.position.x {
            position.x -= overlap_x;
            if velocity.x > 0.0 {
                velocity.x *= -BOUNCE;
            }
        } else {
            position.x += overlap_x;
            if velocity.x < 0.0 {
                velocity.x *= -BOUNCE;
            }
        }
        Some((Axis::X, position, velocity))
    } else {
        if moving.position.y < stationary.position.y {
            position.y -= overlap_y;
            if velocity.y > 0.0 {
                velocity.y *= -BOUNCE;
            }
        } else {
            position.y += overlap_y;
            if velocity.y < 0.0 {
                velocity.y *= -BOUNCE;
            }
        }
        Some((Axis::Y, position, velocity))
    }
}
