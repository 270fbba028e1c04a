use crate::body::Body;
use crate::vector::Vector2;
use crate::{WALL_SIZE, WALL_SYMBOL};
use serde::{Deserialize, Serialize};

/// A playable arena: grid rows plus the point every player (re)spawns at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub walls: Vec<String>,
    pub spawn_position: Vector2,
}

impl Map {
    pub fn new(rows: &[&str], spawn: [f32; 2]) -> Self {
        Self {
            walls: rows.iter().map(|row| row.to_string()).collect(),
            spawn_position: spawn.into(),
        }
    }

    pub fn wall_bodies(&self) -> Vec<Body> {
        wall_bodies(&self.walls)
    }
}

/// Grid coordinates `(column, row)` of every wall cell, row by row.
///
/// Rows may have different lengths. Every character other than the wall
/// symbol is open floor.
pub fn wall_cells<S: AsRef<str>>(rows: &[S]) -> Vec<(usize, usize)> {
    rows.iter()
        .enumerate()
        .flat_map(|(row, line)| {
            line.as_ref()
                .chars()
                .enumerate()
                .filter(|(_, symbol)| *symbol == WALL_SYMBOL)
                .map(move |(column, _)| (column, row))
        })
        .collect()
}

/// Builds one static square body per wall cell, centred on its grid coordinates.
pub fn wall_bodies<S: AsRef<str>>(rows: &[S]) -> Vec<Body> {
    wall_cells(rows)
        .into_iter()
        .map(|(column, row)| {
            Body::rectangle(WALL_SIZE, WALL_SIZE).with_position(column as f32, row as f32)
        })
        .collect()
}
