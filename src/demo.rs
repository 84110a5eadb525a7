//! A tiny, seeded stand-in engine so the viewer runs without the real
//! simulation.
//!
//! Animals wander: each step they jitter their heading, move a fixed
//! distance along it, and wrap around the unit square. Food sits still until
//! an animal passes close enough, at which point it is eaten and respawns
//! elsewhere. `evolve` rescatters the population and reports min/max/avg
//! food eaten as the generation's fitness summary.
//!
//! None of the excluded machinery lives here -- no genetics, no neural
//! policy, no fitness-driven selection. This is scripted motion with just
//! enough life to exercise the driver end to end.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::engine::{
    Animal, EngineError, FoodItem, SimulationEngine, TrainingSummary, WorldSnapshot,
};

/// Default RNG seed; fixed so two default demo runs look identical.
const DEFAULT_SEED: u64 = 0x5EED_F00D_CAFE_0001;

/// Population sizes for the demo world.
const ANIMAL_COUNT: usize = 40;
const FOOD_COUNT: usize = 60;

/// Distance travelled per step, in normalized world units.
const STEP_DISTANCE: f32 = 0.002;

/// Maximum heading change per step, in radians.
const TURN_JITTER: f32 = 0.08;

/// An animal eats any food within this normalized distance.
const EAT_RADIUS: f32 = 0.015;

struct DemoAnimal {
    x: f32,
    y: f32,
    rotation: f32,
    eaten: u32,
}

/// Seeded wandering world implementing [`SimulationEngine`].
pub struct DemoEngine {
    rng: Pcg32,
    animals: Vec<DemoAnimal>,
    foods: Vec<FoodItem>,
    generation: u32,
}

impl DemoEngine {
    /// Build a demo world from an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let animals = (0..ANIMAL_COUNT)
            .map(|_| DemoAnimal {
                x: rng.gen_range(0.0..1.0),
                y: rng.gen_range(0.0..1.0),
                rotation: rng.gen_range(0.0..std::f32::consts::TAU),
                eaten: 0,
            })
            .collect();

        let foods = (0..FOOD_COUNT)
            .map(|_| FoodItem {
                x: rng.gen_range(0.0..1.0),
                y: rng.gen_range(0.0..1.0),
            })
            .collect();

        Self {
            rng,
            animals,
            foods,
            generation: 0,
        }
    }

    /// Build a demo world from the fixed default seed.
    pub fn new() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }

    /// Completed generations so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Default for DemoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine for DemoEngine {
    fn advance(&mut self) -> Result<(), EngineError> {
        for animal in &mut self.animals {
            animal.rotation += self.rng.gen_range(-TURN_JITTER..TURN_JITTER);
            // Heading convention matches the markers: rotation 0 moves
            // along +Y, positive rotation leans toward -X.
            animal.x = (animal.x - animal.rotation.sin() * STEP_DISTANCE).rem_euclid(1.0);
            animal.y = (animal.y + animal.rotation.cos() * STEP_DISTANCE).rem_euclid(1.0);
        }

        for food in &mut self.foods {
            let eaten_by = self.animals.iter_mut().find(|a| {
                let dx = a.x - food.x;
                let dy = a.y - food.y;
                dx * dx + dy * dy <= EAT_RADIUS * EAT_RADIUS
            });
            if let Some(animal) = eaten_by {
                animal.eaten += 1;
                food.x = self.rng.gen_range(0.0..1.0);
                food.y = self.rng.gen_range(0.0..1.0);
            }
        }

        Ok(())
    }

    fn evolve(&mut self) -> Result<TrainingSummary, EngineError> {
        let min = self.animals.iter().map(|a| a.eaten).min().unwrap_or(0);
        let max = self.animals.iter().map(|a| a.eaten).max().unwrap_or(0);
        let total: u32 = self.animals.iter().map(|a| a.eaten).sum();
        let avg = total as f32 / self.animals.len().max(1) as f32;

        for animal in &mut self.animals {
            animal.x = self.rng.gen_range(0.0..1.0);
            animal.y = self.rng.gen_range(0.0..1.0);
            animal.rotation = self.rng.gen_range(0.0..std::f32::consts::TAU);
            animal.eaten = 0;
        }
        for food in &mut self.foods {
            food.x = self.rng.gen_range(0.0..1.0);
            food.y = self.rng.gen_range(0.0..1.0);
        }

        self.generation += 1;
        debug!(generation = self.generation, "demo world rescattered");

        Ok(TrainingSummary {
            min_fitness: min as f32,
            max_fitness: max as f32,
            avg_fitness: avg,
        })
    }

    fn snapshot(&self) -> Result<WorldSnapshot, EngineError> {
        Ok(WorldSnapshot {
            foods: self.foods.clone(),
            animals: self
                .animals
                .iter()
                .map(|a| Animal {
                    x: a.x,
                    y: a.y,
                    rotation: a.rotation,
                })
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
