// Output collection for particles produced by reactions
//
// NuclearReaction::react pushes the extra neutrons of (n,2n), (n,3n), ...
// reactions here; the transport loop drains the bank in FIFO order.

use crate::particle::Particle;
use std::collections::VecDeque;

/// FIFO queue of particles waiting to be transported.
#[derive(Debug, Clone)]
pub struct ParticleBank {
    queue: VecDeque<Particle>,
}

impl ParticleBank {
    pub fn new() -> Self {
        ParticleBank {
            queue: VecDeque::new(),
        }
    }

    /// Bank a secondary particle emitted by a reaction
    pub fn bank_secondary(&mut self, particle: Particle) {
        self.queue.push_back(particle);
    }

    /// Next particle to transport, oldest first
    pub fn pop_particle(&mut self) -> Option<Particle> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.queue.iter()
    }
}

impl Default for ParticleBank {
    fn default() -> Self {
        Self::new()
    }
}
