// Neutron reactions: cross sections plus the collision outcome

use crate::bank::ParticleBank;
use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::reaction_type::NuclearReactionType;
use crate::scatter::ScatteringDistribution;
use crate::utilities::{find_lower_bin_index, is_sorted_ascending};
use std::sync::Arc;

/// Cross section of one reaction on the nuclide's shared energy grid.
///
/// `values[i]` belongs to `energy_grid[threshold_index + i]`, so the table
/// runs from the threshold to the top of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionCrossSection {
    energy_grid: Arc<Vec<f64>>,
    values: Arc<Vec<f64>>,
    threshold_index: usize,
}

impl ReactionCrossSection {
    pub fn new(
        energy_grid: Arc<Vec<f64>>,
        values: Arc<Vec<f64>>,
        threshold_index: usize,
    ) -> ScatterResult<Self> {
        if threshold_index >= energy_grid.len() {
            return Err(ScatterError::InvalidDistribution(format!(
                "threshold index {} is outside an energy grid of {} points",
                threshold_index,
                energy_grid.len()
            )));
        }
        if values.len() != energy_grid.len() - threshold_index {
            return Err(ScatterError::InvalidDistribution(format!(
                "{} cross section values for {} grid points above the threshold",
                values.len(),
                energy_grid.len() - threshold_index
            )));
        }
        if !is_sorted_ascending(&energy_grid) {
            return Err(ScatterError::UnsortedGrid { what: "energy grid" });
        }
        Ok(ReactionCrossSection {
            energy_grid,
            values,
            threshold_index,
        })
    }

    pub fn threshold_index(&self) -> usize {
        self.threshold_index
    }

    pub fn threshold_energy(&self) -> f64 {
        self.energy_grid[self.threshold_index]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cross section (b) at `energy`, linear in energy between grid points
    /// and zero below the threshold or above the grid.
    pub fn evaluate(&self, energy: f64) -> f64 {
        let grid = &self.energy_grid[..];
        let max_energy = grid[grid.len() - 1];
        if !(energy >= self.threshold_energy()) || energy > max_energy {
            return 0.0;
        }
        if energy == max_energy {
            return self.values[self.values.len() - 1];
        }

        let bin = find_lower_bin_index(grid, energy).max(self.threshold_index);
        let i = bin - self.threshold_index;
        let (e0, e1) = (grid[bin], grid[bin + 1]);
        let (v0, v1) = (self.values[i], self.values[i + 1]);
        // repeated grid point
        if e1 == e0 {
            return v1;
        }
        v0 + (energy - e0) * (v1 - v0) / (e1 - e0)
    }
}

/// What a reaction does to the incoming neutron.
#[derive(Debug, Clone)]
pub enum ReactionKind {
    /// `multiplicity` neutrons leave the collision, each sampled from
    /// `distribution`
    Scattering {
        multiplicity: u32,
        distribution: Arc<ScatteringDistribution>,
    },
    /// The neutron is removed
    Absorption,
}

#[derive(Debug, Clone)]
pub struct NuclearReaction {
    reaction_type: NuclearReactionType,
    /// Target temperature as kT (MeV)
    temperature: f64,
    q_value: f64,
    cross_section: ReactionCrossSection,
    kind: ReactionKind,
    reset_secondary_collision_number: bool,
}

impl NuclearReaction {
    pub fn new_scattering(
        reaction_type: NuclearReactionType,
        temperature: f64,
        q_value: f64,
        cross_section: ReactionCrossSection,
        multiplicity: u32,
        distribution: Arc<ScatteringDistribution>,
        reset_secondary_collision_number: bool,
    ) -> ScatterResult<Self> {
        if multiplicity == 0 {
            return Err(ScatterError::InvalidDistribution(format!(
                "{reaction_type} is a scattering reaction with zero multiplicity"
            )));
        }
        Ok(NuclearReaction {
            reaction_type,
            temperature,
            q_value,
            cross_section,
            kind: ReactionKind::Scattering {
                multiplicity,
                distribution,
            },
            reset_secondary_collision_number,
        })
    }

    pub fn new_absorption(
        reaction_type: NuclearReactionType,
        temperature: f64,
        q_value: f64,
        cross_section: ReactionCrossSection,
    ) -> Self {
        NuclearReaction {
            reaction_type,
            temperature,
            q_value,
            cross_section,
            kind: ReactionKind::Absorption,
            reset_secondary_collision_number: false,
        }
    }

    pub fn reaction_type(&self) -> NuclearReactionType {
        self.reaction_type
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn q_value(&self) -> f64 {
        self.q_value
    }

    pub fn kind(&self) -> &ReactionKind {
        &self.kind
    }

    pub fn cross_section(&self) -> &ReactionCrossSection {
        &self.cross_section
    }

    #[inline]
    pub fn get_cross_section(&self, energy: f64) -> f64 {
        self.cross_section.evaluate(energy)
    }

    pub fn threshold_energy(&self) -> f64 {
        self.cross_section.threshold_energy()
    }

    /// Neutrons leaving the collision (zero for absorption)
    pub fn number_of_emitted_particles(&self) -> u32 {
        match self.kind {
            ReactionKind::Scattering { multiplicity, .. } => multiplicity,
            ReactionKind::Absorption => 0,
        }
    }

    /// Apply the reaction to `particle`.
    ///
    /// For a scattering reaction the extra `multiplicity - 1` neutrons are
    /// cloned from the incoming state, scattered independently and banked
    /// before the incoming neutron itself is scattered in place.
    pub fn react<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        bank: &mut ParticleBank,
        rng: &mut R,
    ) {
        match &self.kind {
            ReactionKind::Scattering {
                multiplicity,
                distribution,
            } => {
                if !particle.has_physical_energy() {
                    log::warn!(
                        "{}: skipping scatter of a neutron with energy {} MeV",
                        self.reaction_type,
                        particle.energy
                    );
                    return;
                }
                for _ in 1..*multiplicity {
                    let mut secondary = particle.clone_as_secondary(self.reset_secondary_collision_number);
                    distribution.scatter_neutron(&mut secondary, self.temperature, rng);
                    bank.bank_secondary(secondary);
                }
                distribution.scatter_neutron(particle, self.temperature, rng);
            }
            ReactionKind::Absorption => {
                particle.alive = false;
            }
        }
    }
}
