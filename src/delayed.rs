// Delayed neutron emission from fission product precursor groups

use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::scatter::{validate_atomic_weight_ratio, ScatteringDistribution};
use crate::stats::OneDDistribution;
use std::sync::Arc;

/// One precursor group: its decay constant, its probability of being the
/// emitter as a function of incident energy, and the outgoing distribution
/// of the delayed neutron.
#[derive(Debug, Clone)]
pub struct PrecursorGroup {
    /// Decay constant (1/s)
    pub decay_constant: f64,
    pub emission_probability: OneDDistribution,
    pub emission_distribution: Arc<ScatteringDistribution>,
}

/// Delayed neutron emission over a set of precursor groups.
#[derive(Debug, Clone)]
pub struct DelayedNeutronEmissionDistribution {
    atomic_weight_ratio: f64,
    groups: Vec<PrecursorGroup>,
}

impl DelayedNeutronEmissionDistribution {
    pub fn new(
        atomic_weight_ratio: f64,
        decay_constants: Vec<f64>,
        emission_probabilities: Vec<OneDDistribution>,
        emission_distributions: Vec<Arc<ScatteringDistribution>>,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("delayed neutron emission", atomic_weight_ratio)?;
        let n = decay_constants.len();
        if n == 0 || emission_probabilities.len() != n || emission_distributions.len() != n {
            return Err(ScatterError::InvalidDistribution(format!(
                "delayed emission needs matching non-empty group data, got {} decay constants, {} probabilities and {} distributions",
                n,
                emission_probabilities.len(),
                emission_distributions.len()
            )));
        }
        if let Some(bad) = decay_constants.iter().find(|l| !(l.is_finite() && **l > 0.0)) {
            return Err(ScatterError::InvalidDistribution(format!(
                "precursor decay constant {bad} must be finite and positive"
            )));
        }

        let groups = decay_constants
            .into_iter()
            .zip(emission_probabilities)
            .zip(emission_distributions)
            .map(
                |((decay_constant, emission_probability), emission_distribution)| PrecursorGroup {
                    decay_constant,
                    emission_probability,
                    emission_distribution,
                },
            )
            .collect();

        Ok(DelayedNeutronEmissionDistribution {
            atomic_weight_ratio,
            groups,
        })
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn groups(&self) -> &[PrecursorGroup] {
        &self.groups
    }

    /// Pick the emitting group for a neutron of the given energy.
    ///
    /// The group probabilities evaluated at `energy` form a CDF; the first
    /// group whose running sum exceeds a uniform draw is chosen. `None` means
    /// the probabilities never reach the draw, i.e. the table is malformed.
    pub fn select_precursor_group<R: RandomSource + ?Sized>(
        &self,
        energy: f64,
        rng: &mut R,
    ) -> Option<usize> {
        let draw = rng.random();
        let mut cumulative = 0.0;
        for (index, group) in self.groups.iter().enumerate() {
            cumulative += group.emission_probability.evaluate(energy);
            if draw < cumulative {
                return Some(index);
            }
        }
        None
    }

    /// Exponential emission delay (s) of the given group
    pub fn sample_emission_time<R: RandomSource + ?Sized>(&self, group: usize, rng: &mut R) -> f64 {
        -(1.0 - rng.random()).ln() / self.groups[group].decay_constant
    }

    pub fn scatter_neutron<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        temperature: f64,
        rng: &mut R,
    ) {
        let group = match self.select_precursor_group(particle.energy, rng) {
            Some(group) => group,
            None => {
                let last = self.groups.len() - 1;
                log::warn!(
                    "precursor group probabilities at {:e} MeV do not reach the random draw; using group {}",
                    particle.energy,
                    last
                );
                last
            }
        };

        let emission_time = self.sample_emission_time(group, rng);
        self.groups[group]
            .emission_distribution
            .scatter_neutron(particle, temperature, rng);
        particle.time += emission_time;
    }
}
