//! ECS Components
//!
//! Components carried by entities that take part in exploration.

use serde::{Deserialize, Serialize};

use crate::world::bounds::Rect;

// ============================================================================
// Position & Movement
// ============================================================================

/// Cell coordinate on the map grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Continuous position in world units (tile lattice scaled by tile size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &WorldPos) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// World units moved per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

// ============================================================================
// Identity & Naming
// ============================================================================

/// Name component for entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

// ============================================================================
// Exploration
// ============================================================================

/// The kinds of entity able to clear fog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorerKind {
    /// Moved directly by the input layer
    Walker,
    /// Trails another explorer
    Follower,
}

/// Clears fog around the entity's world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explorer {
    pub kind: ExplorerKind,
    /// Half-extent of the square exploration footprint
    pub radius: f32,
    pub active: bool,
}

impl Explorer {
    pub fn new(kind: ExplorerKind, radius: f32) -> Self {
        Self {
            kind,
            radius,
            active: true,
        }
    }

    /// Footprint centred on `pos`
    pub fn bounds_at(&self, pos: WorldPos) -> Rect {
        Rect::around(pos.x, pos.y, self.radius)
    }
}

/// Keeps the entity within `distance` of its leader
#[derive(Debug, Clone, Copy)]
pub struct Follow {
    pub leader: hecs::Entity,
    pub distance: f32,
    /// Maximum world units covered per tick
    pub speed: f32,
}
