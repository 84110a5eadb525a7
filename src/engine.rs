//! Capability interface to the external simulation engine.
//!
//! The visualization driver never looks inside the simulation: it sees only
//! the small contract defined here. Each frame the driver calls
//! [`SimulationEngine::advance`] to move the world one discrete step forward
//! and [`SimulationEngine::snapshot`] to read back the entities to paint.
//! Training is a separate, user-initiated call to
//! [`SimulationEngine::evolve`] that may run for a long time and returns a
//! textual summary of the new generation.
//!
//! All three operations are fallible: an [`EngineError`] is treated as fatal
//! by the frame loop (see [`crate::driver`]), which matches the "fail the
//! frame, never continue with corrupted state" policy.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot data model
// ---------------------------------------------------------------------------

/// A food item in normalized world coordinates.
///
/// Both axes live in `[0, 1]`; food has no orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub x: f32,
    pub y: f32,
}

/// An animal in normalized world coordinates.
///
/// `rotation` is the heading in radians, measured from the +Y axis rotating
/// toward +X (screen convention: rotation 0 points straight down the
/// surface's Y axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

/// A point-in-time read of the whole world.
///
/// Fetched once per frame, owned by the frame driver for that frame, and
/// superseded by the next frame's snapshot. Entity ordering is whatever the
/// engine produced; the driver preserves it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub foods: Vec<FoodItem>,
    pub animals: Vec<Animal>,
}

impl WorldSnapshot {
    /// Total number of entities in the snapshot (foods + animals).
    pub fn entity_count(&self) -> usize {
        self.foods.len() + self.animals.len()
    }
}

// ---------------------------------------------------------------------------
// Training summary
// ---------------------------------------------------------------------------

/// Fitness statistics reported by one training/evolution run.
///
/// The `Display` form is the engine's textual contract:
/// `min=…, max=…, avg=…` with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Lowest fitness across the evaluated population.
    pub min_fitness: f32,
    /// Highest fitness across the evaluated population.
    pub max_fitness: f32,
    /// Mean fitness across the evaluated population.
    pub avg_fitness: f32,
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min={:.2}, max={:.2}, avg={:.2}",
            self.min_fitness, self.max_fitness, self.avg_fitness
        )
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced by the simulation engine.
///
/// The driver does not retry any of these; a fault during a frame stops the
/// render loop, a fault during training is logged and the activation is
/// abandoned.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine failed while advancing the world one step.
    #[error("engine fault while stepping the simulation: {0}")]
    Step(String),

    /// The engine failed while running its training procedure.
    #[error("engine fault during training: {0}")]
    Training(String),

    /// The engine failed while producing a world snapshot.
    #[error("engine fault while reading the world snapshot: {0}")]
    Snapshot(String),
}

// ---------------------------------------------------------------------------
// SimulationEngine
// ---------------------------------------------------------------------------

/// Opaque handle to the simulation engine.
///
/// Implemented by whatever owns the real simulation (or by a scripted fake
/// in tests). The handle is singly owned by the driver and mutated in place;
/// the single-threaded event loop guarantees `advance` and `evolve` never
/// run concurrently.
pub trait SimulationEngine {
    /// Advance the simulation by exactly one discrete step.
    fn advance(&mut self) -> Result<(), EngineError>;

    /// Run the training/evolution procedure to completion.
    ///
    /// May take non-trivial wall-clock time; blocks the caller until done.
    fn evolve(&mut self) -> Result<TrainingSummary, EngineError>;

    /// Read the current world state.
    ///
    /// Called after [`advance`](Self::advance) each frame, so the snapshot
    /// reflects post-step state.
    fn snapshot(&self) -> Result<WorldSnapshot, EngineError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
