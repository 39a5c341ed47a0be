use rand::prelude::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::warn;

/// Above this fraction of the population the sampler switches from
/// collision draws to a full shuffle.
const FULL_SHUFFLE_FRACTION: f64 = 0.7;

/// Fixed-capacity experience store with FIFO eviction.
pub struct ReplayMemory<T> {
    samples: Vec<T>,
    max_capacity: usize,
}

impl<T> ReplayMemory<T> {
    pub fn new(max_capacity: usize) -> Self {
        assert!(max_capacity > 0);
        ReplayMemory {
            samples: Vec::with_capacity(max_capacity),
            max_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn add_sample(&mut self, sample: T) {
        self.samples.push(sample);
        if self.samples.len() > self.max_capacity {
            self.samples.remove(0);
        }
    }

    /// Draws `n` distinct samples uniformly, without replacement. Requests
    /// beyond the current population return everything.
    pub fn sample(&self, n: usize) -> Vec<&T> {
        let population = self.samples.len();
        if n >= population {
            if n > population {
                warn!(
                    requested = n,
                    population, "sampling more transitions than stored, returning all"
                );
            }
            return self.samples.iter().collect();
        }
        let indices = if n as f64 > FULL_SHUFFLE_FRACTION * population as f64 {
            Self::shuffled_prefix(population, n)
        } else {
            Self::draw_distinct(population, n)
        };
        indices.into_iter().map(|i| &self.samples[i]).collect()
    }

    fn shuffled_prefix(population: usize, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..population).collect();
        indices.shuffle(&mut rand::thread_rng());
        indices.truncate(n);
        indices
    }

    fn draw_distinct(population: usize, n: usize) -> Vec<usize> {
        let mut rng = rand::thread_rng();
        let mut chosen: HashSet<usize> = HashSet::with_capacity(n);
        let mut collisions = 0;
        let collision_cap = 16 * n.max(1);
        while chosen.len() < n {
            if !chosen.insert(rng.gen_range(0..population)) {
                collisions += 1;
                if collisions >= collision_cap {
                    return Self::shuffled_prefix(population, n);
                }
            }
        }
        chosen.into_iter().collect()
    }
}
