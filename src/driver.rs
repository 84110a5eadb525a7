//! The per-frame control loop and the manual training trigger.
//!
//! [`FrameDriver`] owns the engine handle and the viewport. Each frame it
//! advances the simulation exactly one step, reads back the post-step
//! snapshot, and maps every entity into a [`DrawCommand`] list for the GPU
//! layer to paint. The windowed runner (see [`crate::render`]) clears the
//! surface, renders the commands, and re-arms itself for the next display
//! refresh.
//!
//! Both entity kinds come from the same post-step snapshot, so a frame is
//! always internally consistent; there is no way to paint food from one
//! world state and animals from another.
//!
//! Training is deliberately independent of the frame loop: it runs
//! synchronously on the same thread, in between frame callbacks, and the
//! frame loop neither pauses nor coordinates with it.

use tracing::debug;

use crate::engine::{EngineError, SimulationEngine, TrainingSummary, WorldSnapshot};
use crate::scene::DrawCommand;
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// DriverConfig
// ---------------------------------------------------------------------------

/// Startup configuration for the windowed driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Title for the OS window.
    pub window_title: String,
    /// Logical window width; multiplied by the device scale factor at
    /// startup to obtain the pixel viewport.
    pub width: u32,
    /// Logical window height.
    pub height: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            window_title: "Flockview".to_owned(),
            width: 800,
            height: 600,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame extraction
// ---------------------------------------------------------------------------

/// Map one world snapshot into draw commands.
///
/// Food first, then animals, preserving the snapshot's entity order -- so
/// animals paint on top of food, and two identical snapshots always produce
/// identical command lists.
pub fn frame_commands(snapshot: &WorldSnapshot, viewport: &Viewport) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(snapshot.entity_count());

    for food in &snapshot.foods {
        commands.push(DrawCommand::for_food(viewport, food.x, food.y));
    }

    for animal in &snapshot.animals {
        commands.push(DrawCommand::for_animal(
            viewport,
            animal.x,
            animal.y,
            animal.rotation,
        ));
    }

    commands
}

// ---------------------------------------------------------------------------
// FrameDriver
// ---------------------------------------------------------------------------

/// Drives the simulation one step per display refresh and extracts the
/// frame's draw commands.
///
/// The driver has two states: idle (constructed, no frame run yet) and
/// running (the windowed layer re-arms it every refresh). There is no
/// terminal state short of process teardown -- or an engine fault, which the
/// caller treats as fatal by simply not scheduling another frame.
pub struct FrameDriver<E> {
    engine: E,
    viewport: Viewport,
    frame_counter: u64,
}

impl<E: SimulationEngine> FrameDriver<E> {
    /// Take ownership of the engine handle and fix the viewport for the
    /// driver's lifetime.
    pub fn new(engine: E, viewport: Viewport) -> Self {
        Self {
            engine,
            viewport,
            frame_counter: 0,
        }
    }

    /// Run one frame: advance the engine a single step, snapshot the
    /// post-step world, and map it to draw commands.
    ///
    /// # Errors
    ///
    /// Any [`EngineError`] from `advance` or `snapshot` aborts the frame and
    /// is returned untouched. The driver performs no retry; the caller is
    /// expected to stop re-arming the loop.
    pub fn run_frame(&mut self) -> Result<Vec<DrawCommand>, EngineError> {
        self.engine.advance()?;
        let snapshot = self.engine.snapshot()?;

        self.frame_counter += 1;
        debug!(
            frame = self.frame_counter,
            foods = snapshot.foods.len(),
            animals = snapshot.animals.len(),
            "frame extracted"
        );

        Ok(frame_commands(&snapshot, &self.viewport))
    }

    /// Run the engine's training procedure to completion.
    ///
    /// Blocks the calling context until the engine returns; on the
    /// single-threaded event loop this pauses rendering for the duration,
    /// which is the intended behavior.
    pub fn train(&mut self) -> Result<TrainingSummary, EngineError> {
        self.engine.evolve()
    }

    /// Number of frames successfully extracted so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// The fixed pixel viewport this driver maps into.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Read-only access to the engine handle.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Animal, FoodItem};

    /// A fake engine that serves scripted snapshots and records the call
    /// sequence, so tests can assert on ordering and invocation counts.
    struct ScriptedEngine {
        snapshots: Vec<WorldSnapshot>,
        steps_taken: usize,
        calls: Vec<&'static str>,
        fail_on_advance: bool,
        fail_on_snapshot: bool,
    }

    impl ScriptedEngine {
        fn new(snapshots: Vec<WorldSnapshot>) -> Self {
            Self {
                snapshots,
                steps_taken: 0,
                calls: Vec::new(),
                fail_on_advance: false,
                fail_on_snapshot: false,
            }
        }

        /// The snapshot the engine currently serves: indexed by how many
        /// steps have been taken, clamped to the last scripted entry.
        fn current(&self) -> WorldSnapshot {
            let idx = self.steps_taken.min(self.snapshots.len() - 1);
            self.snapshots[idx].clone()
        }
    }

    impl SimulationEngine for ScriptedEngine {
        fn advance(&mut self) -> Result<(), EngineError> {
            self.calls.push("advance");
            if self.fail_on_advance {
                return Err(EngineError::Step("scripted failure".to_owned()));
            }
            self.steps_taken += 1;
            Ok(())
        }

        fn evolve(&mut self) -> Result<TrainingSummary, EngineError> {
            self.calls.push("evolve");
            Ok(TrainingSummary {
                min_fitness: 1.0,
                max_fitness: 9.0,
                avg_fitness: 4.0,
            })
        }

        fn snapshot(&self) -> Result<WorldSnapshot, EngineError> {
            if self.fail_on_snapshot {
                return Err(EngineError::Snapshot("scripted failure".to_owned()));
            }
            Ok(self.current())
        }
    }

    fn viewport_800x600() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    // -- scenario: food mapping ---------------------------------------------

    #[test]
    fn food_at_center_maps_to_surface_center() {
        let snapshot = WorldSnapshot {
            foods: vec![FoodItem { x: 0.5, y: 0.5 }],
            animals: vec![],
        };

        let commands = frame_commands(&snapshot, &viewport_800x600());
        assert_eq!(
            commands,
            vec![DrawCommand::PointMarker {
                x: 400.0,
                y: 300.0,
                radius: 4.0
            }]
        );
    }

    // -- scenario: animal mapping -------------------------------------------

    #[test]
    fn animal_maps_with_size_from_width_and_untouched_rotation() {
        let snapshot = WorldSnapshot {
            foods: vec![],
            animals: vec![Animal {
                x: 0.25,
                y: 0.75,
                rotation: 0.0,
            }],
        };

        let commands = frame_commands(&snapshot, &viewport_800x600());
        assert_eq!(
            commands,
            vec![DrawCommand::DirectionalMarker {
                x: 200.0,
                y: 450.0,
                size: 8.0,
                rotation: 0.0
            }]
        );

        // Nose vertex sits 1.5 * size = 12 pixels along +Y from the center.
        let mut vertices = Vec::new();
        commands[0].tessellate(&mut vertices);
        assert!((vertices[0][0] - 200.0).abs() < 1e-4);
        assert!((vertices[0][1] - 462.0).abs() < 1e-4);
    }

    // -- ordering and idempotence -------------------------------------------

    #[test]
    fn food_commands_precede_animal_commands() {
        let snapshot = WorldSnapshot {
            foods: vec![FoodItem { x: 0.1, y: 0.1 }],
            animals: vec![Animal {
                x: 0.9,
                y: 0.9,
                rotation: 1.0,
            }],
        };

        let commands = frame_commands(&snapshot, &viewport_800x600());
        assert!(matches!(commands[0], DrawCommand::PointMarker { .. }));
        assert!(matches!(commands[1], DrawCommand::DirectionalMarker { .. }));
    }

    #[test]
    fn identical_snapshots_produce_identical_frames() {
        let snapshot = WorldSnapshot {
            foods: vec![FoodItem { x: 0.2, y: 0.8 }, FoodItem { x: 0.6, y: 0.4 }],
            animals: vec![Animal {
                x: 0.5,
                y: 0.5,
                rotation: 2.5,
            }],
        };
        // Same scripted world served on every step.
        let engine = ScriptedEngine::new(vec![snapshot]);
        let mut driver = FrameDriver::new(engine, viewport_800x600());

        let first = driver.run_frame().unwrap();
        let second = driver.run_frame().unwrap();
        assert_eq!(first, second);
        assert_eq!(driver.frame_count(), 2);
    }

    // -- step/snapshot ordering ---------------------------------------------

    #[test]
    fn frame_renders_post_step_state() {
        let before = WorldSnapshot {
            foods: vec![FoodItem { x: 0.0, y: 0.0 }],
            animals: vec![],
        };
        let after = WorldSnapshot {
            foods: vec![FoodItem { x: 1.0, y: 1.0 }],
            animals: vec![],
        };
        let engine = ScriptedEngine::new(vec![before, after]);
        let mut driver = FrameDriver::new(engine, viewport_800x600());

        let commands = driver.run_frame().unwrap();
        // The frame must reflect the world *after* the step, not before.
        assert_eq!(
            commands,
            vec![DrawCommand::PointMarker {
                x: 800.0,
                y: 600.0,
                radius: 4.0
            }]
        );
        assert_eq!(driver.engine().calls, vec!["advance"]);
    }

    #[test]
    fn each_frame_advances_exactly_one_step() {
        let engine = ScriptedEngine::new(vec![WorldSnapshot::default()]);
        let mut driver = FrameDriver::new(engine, viewport_800x600());

        for _ in 0..5 {
            driver.run_frame().unwrap();
        }
        assert_eq!(driver.engine().steps_taken, 5);
    }

    // -- fault propagation ---------------------------------------------------

    #[test]
    fn advance_fault_aborts_the_frame() {
        let mut engine = ScriptedEngine::new(vec![WorldSnapshot::default()]);
        engine.fail_on_advance = true;
        let mut driver = FrameDriver::new(engine, viewport_800x600());

        let err = driver.run_frame().unwrap_err();
        assert!(matches!(err, EngineError::Step(_)));
        // The failed frame does not count.
        assert_eq!(driver.frame_count(), 0);
    }

    #[test]
    fn snapshot_fault_aborts_the_frame_after_the_step() {
        let mut engine = ScriptedEngine::new(vec![WorldSnapshot::default()]);
        engine.fail_on_snapshot = true;
        let mut driver = FrameDriver::new(engine, viewport_800x600());

        let err = driver.run_frame().unwrap_err();
        assert!(matches!(err, EngineError::Snapshot(_)));
        // The step itself still happened; the frame was abandoned afterwards.
        assert_eq!(driver.engine().steps_taken, 1);
    }

    // -- training trigger ----------------------------------------------------

    #[test]
    fn train_invokes_evolve_exactly_once() {
        let engine = ScriptedEngine::new(vec![WorldSnapshot::default()]);
        let mut driver = FrameDriver::new(engine, viewport_800x600());

        driver.run_frame().unwrap();
        let summary = driver.train().unwrap();
        driver.run_frame().unwrap();

        assert_eq!(summary.to_string(), "min=1.00, max=9.00, avg=4.00");
        assert_eq!(
            driver.engine().calls,
            vec!["advance", "evolve", "advance"],
            "training interleaves between frames without extra engine calls"
        );
    }
}
