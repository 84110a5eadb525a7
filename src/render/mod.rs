//! Windowed wgpu layer for the frame driver.
//!
//! This module is feature-gated behind `renderer` (on by default). When the
//! feature is disabled the crate stays headless: the driver, the marker
//! geometry, and the coordinate mapper all compile and test without a GPU.
//!
//! The GPU layer never owns the frame logic -- it clears the surface,
//! tessellates the [`DrawCommand`](crate::scene::DrawCommand) list produced
//! by [`FrameDriver::run_frame`](crate::driver::FrameDriver::run_frame),
//! presents, and re-arms the redraw.

#[cfg(feature = "renderer")]
pub mod app;

#[cfg(feature = "renderer")]
pub mod renderer;

#[cfg(feature = "renderer")]
pub use app::run_windowed;

#[cfg(feature = "renderer")]
pub use renderer::{FrameRenderer, PixelCamera};
