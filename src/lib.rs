//! Flockview -- real-time 2D viewer driver for a life simulation.
//!
//! The crate connects an external simulation engine (anything implementing
//! [`SimulationEngine`](engine::SimulationEngine)) to a windowed display.
//! Every display refresh it advances the engine one step, snapshots the
//! world, maps each entity from the normalized unit square into pixel
//! coordinates, and paints it as a marker: animals as white triangles whose
//! nose points along their heading, food as green circles.
//!
//! Training (evolving the population for a full generation) is triggered
//! manually with the `T` key; the summary fitness statistics are logged.
//!
//! # Quick Start
//!
//! ```no_run
//! use flockview::demo::DemoEngine;
//! use flockview::driver::DriverConfig;
//!
//! flockview::render::run_windowed(DemoEngine::new(), DriverConfig::default()).unwrap();
//! ```
//!
//! Everything except the GPU layer is headless: the coordinate mapper,
//! the marker geometry, and the frame driver compile and test without a
//! window (disable the default `renderer` feature).

#![deny(unsafe_code)]

pub mod demo;
pub mod driver;
pub mod engine;
pub mod render;
pub mod scene;
pub mod viewport;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common viewer usage.
pub mod prelude {
    pub use crate::demo::DemoEngine;
    pub use crate::driver::{frame_commands, DriverConfig, FrameDriver};
    pub use crate::engine::{
        Animal, EngineError, FoodItem, SimulationEngine, TrainingSummary, WorldSnapshot,
    };
    pub use crate::scene::DrawCommand;
    pub use crate::viewport::Viewport;

    #[cfg(feature = "renderer")]
    pub use crate::render::{run_windowed, FrameRenderer, PixelCamera};
}
