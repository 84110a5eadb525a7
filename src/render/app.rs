//! Windowed application runner for the frame driver.
//!
//! Provides [`run_windowed`], which takes ownership of a simulation engine
//! and drives it inside a winit event loop. Each `RedrawRequested` event
//! runs one frame (advance one step, snapshot, extract draw commands),
//! renders it, and re-arms the redraw so the loop runs once per display
//! refresh.
//!
//! Input:
//!
//! * `T` runs the engine's training procedure synchronously between frames
//!   and logs the fitness summary.
//! * `Escape` or closing the window shuts down.
//!
//! This module is feature-gated behind `renderer`.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use super::renderer::FrameRenderer;
use crate::driver::{DriverConfig, FrameDriver};
use crate::engine::SimulationEngine;
use crate::viewport::Viewport;

/// Run the simulation in a window.
///
/// Takes ownership of the engine and blocks until the window is closed.
/// The window is created non-resizable at the configured logical size; the
/// device scale factor is read once at startup and fixes the pixel viewport
/// for the whole run.
///
/// # Errors
///
/// Returns an error if the event loop cannot be created or if window or
/// renderer initialization fails.
pub fn run_windowed<E: SimulationEngine>(
    engine: E,
    config: DriverConfig,
) -> Result<(), anyhow::Error> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App {
        state: AppState::Pending { engine, config },
        init_failed: false,
    };

    event_loop.run_app(&mut app)?;

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize windowed driver (see logs for details)"
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state machine
// ---------------------------------------------------------------------------

/// Internal state of the windowed app.
///
/// Winit 0.30 requires that window creation happens inside the
/// `ApplicationHandler::resumed` callback, so we use a two-phase state
/// machine: `Pending` (before window creation) and `Running` (window +
/// renderer are initialized).
enum AppState<E> {
    /// Waiting for `resumed` to create the window and renderer.
    Pending { engine: E, config: DriverConfig },
    /// Window and renderer are initialized; the frame loop is running.
    Running {
        driver: FrameDriver<E>,
        renderer: FrameRenderer,
        /// Set after an engine fault. The window stays open but no further
        /// frames are scheduled.
        halted: bool,
    },
    /// Temporary placeholder used during state transitions.
    Transitioning,
}

/// The winit application handler that drives the frame loop.
struct App<E> {
    state: AppState<E>,
    /// Set to `true` if initialization fails (window or renderer), so
    /// `run_windowed` can return an error after the event loop exits.
    init_failed: bool,
}

impl<E: SimulationEngine> ApplicationHandler for App<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only transition from Pending -> Running.
        let state = std::mem::replace(&mut self.state, AppState::Transitioning);
        match state {
            AppState::Pending { engine, config } => {
                let window_attrs = WindowAttributes::default()
                    .with_title(config.window_title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
                    .with_resizable(false);

                match event_loop.create_window(window_attrs) {
                    Ok(window) => {
                        let window = Arc::new(window);
                        // The scale factor is read once here and never
                        // refreshed, even if the window later migrates to a
                        // display with a different density.
                        let scale_factor = window.scale_factor();
                        let viewport =
                            Viewport::from_logical(config.width, config.height, scale_factor);

                        match pollster::block_on(FrameRenderer::new(window.clone())) {
                            Ok(renderer) => {
                                tracing::info!(
                                    width = config.width,
                                    height = config.height,
                                    scale_factor,
                                    "viewer window created successfully"
                                );
                                // Kick off the first frame so the render loop starts
                                // even on backends that don't send an initial
                                // RedrawRequested event.
                                window.request_redraw();
                                self.state = AppState::Running {
                                    driver: FrameDriver::new(engine, viewport),
                                    renderer,
                                    halted: false,
                                };
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to initialize renderer -- exiting");
                                self.init_failed = true;
                                self.state = AppState::Pending { engine, config };
                                event_loop.exit();
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create window -- exiting");
                        self.init_failed = true;
                        self.state = AppState::Pending { engine, config };
                        event_loop.exit();
                    }
                }
            }
            AppState::Running {
                driver,
                renderer,
                halted,
            } => {
                // Already running; put state back.
                self.state = AppState::Running {
                    driver,
                    renderer,
                    halted,
                };
            }
            AppState::Transitioning => {
                // Should not happen; no-op.
                tracing::warn!("resumed called during state transition");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &mut self.state {
            AppState::Running {
                driver,
                renderer,
                halted,
            } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!(
                        frames = driver.frame_count(),
                        "window close requested -- shutting down"
                    );
                    event_loop.exit();
                }
                WindowEvent::KeyboardInput { event: key_ev, .. } => {
                    if key_ev.state == ElementState::Pressed && !key_ev.repeat {
                        match key_ev.physical_key {
                            PhysicalKey::Code(KeyCode::KeyT) => {
                                if *halted {
                                    tracing::warn!("training ignored: driver is halted");
                                } else {
                                    // Runs to completion on this thread; the
                                    // frame loop resumes on the next redraw.
                                    match driver.train() {
                                        Ok(summary) => {
                                            tracing::info!(%summary, "training finished");
                                        }
                                        Err(e) => {
                                            tracing::error!(error = %e, "training failed -- halting");
                                            *halted = true;
                                        }
                                    }
                                }
                            }
                            PhysicalKey::Code(KeyCode::Escape) => {
                                event_loop.exit();
                            }
                            _ => {}
                        }
                    }
                }
                WindowEvent::Resized(new_size) => {
                    // The window is non-resizable; this fires for
                    // compositor-driven changes and surface recovery. The
                    // viewport keeps its startup dimensions.
                    tracing::debug!(
                        width = new_size.width,
                        height = new_size.height,
                        "surface resized"
                    );
                    renderer.resize(new_size);
                }
                WindowEvent::RedrawRequested => {
                    if *halted {
                        return;
                    }

                    // Phase 1: Advance the simulation one step and extract
                    // the frame's draw commands.
                    let commands = match driver.run_frame() {
                        Ok(commands) => commands,
                        Err(e) => {
                            tracing::error!(error = %e, "engine fault -- halting frame loop");
                            *halted = true;
                            return;
                        }
                    };

                    // Phase 2: Render the frame.
                    match renderer.render(&commands) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            // Reconfigure surface on loss.
                            let size = renderer.window().inner_size();
                            renderer.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("GPU out of memory -- exiting");
                            event_loop.exit();
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "surface error during render");
                        }
                    }

                    // Re-arm for the next display refresh.
                    renderer.window().request_redraw();
                }
                _ => {}
            },
            _ => {
                // Not yet initialized; ignore window events.
            }
        }
    }
}
