// Scattering distribution dispatch

use crate::delayed::DelayedNeutronEmissionDistribution;
use crate::elastic::ElasticScatteringDistribution;
use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::inelastic::InelasticLevelScatteringDistribution;
use crate::particle::Particle;
use crate::secondary_kalbach::Law44ScatteringDistribution;
use crate::secondary_law61::Law61ScatteringDistribution;
use crate::secondary_uncorrelated::IndependentEnergyAngleDistribution;

/// How a neutron leaves a collision for one reaction of one nuclide.
///
/// Distributions are built once while tables load and are only read
/// afterwards, so they can be shared between threads behind an `Arc`.
#[derive(Debug, Clone)]
pub enum ScatteringDistribution {
    Elastic(ElasticScatteringDistribution),
    IndependentEnergyAngle(IndependentEnergyAngleDistribution),
    InelasticLevel(InelasticLevelScatteringDistribution),
    Law44(Law44ScatteringDistribution),
    Law61(Law61ScatteringDistribution),
    DelayedNeutronEmission(DelayedNeutronEmissionDistribution),
}

impl ScatteringDistribution {
    /// Update the particle's energy, direction and (for delayed emission)
    /// time for one collision with a target at `temperature` (kT, MeV).
    pub fn scatter_neutron<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        temperature: f64,
        rng: &mut R,
    ) {
        match self {
            ScatteringDistribution::Elastic(dist) => dist.scatter_neutron(particle, temperature, rng),
            ScatteringDistribution::IndependentEnergyAngle(dist) => {
                dist.scatter_neutron(particle, temperature, rng)
            }
            ScatteringDistribution::InelasticLevel(dist) => {
                dist.scatter_neutron(particle, temperature, rng)
            }
            ScatteringDistribution::Law44(dist) => dist.scatter_neutron(particle, temperature, rng),
            ScatteringDistribution::Law61(dist) => dist.scatter_neutron(particle, temperature, rng),
            ScatteringDistribution::DelayedNeutronEmission(dist) => {
                dist.scatter_neutron(particle, temperature, rng)
            }
        }
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        match self {
            ScatteringDistribution::Elastic(dist) => dist.atomic_weight_ratio(),
            ScatteringDistribution::IndependentEnergyAngle(dist) => dist.atomic_weight_ratio(),
            ScatteringDistribution::InelasticLevel(dist) => dist.atomic_weight_ratio(),
            ScatteringDistribution::Law44(dist) => dist.atomic_weight_ratio(),
            ScatteringDistribution::Law61(dist) => dist.atomic_weight_ratio(),
            ScatteringDistribution::DelayedNeutronEmission(dist) => dist.atomic_weight_ratio(),
        }
    }

    /// Short name of the variant, used in log messages
    pub fn kind(&self) -> &'static str {
        match self {
            ScatteringDistribution::Elastic(_) => "elastic",
            ScatteringDistribution::IndependentEnergyAngle(_) => "independent energy-angle",
            ScatteringDistribution::InelasticLevel(_) => "inelastic level",
            ScatteringDistribution::Law44(_) => "Kalbach-Mann",
            ScatteringDistribution::Law61(_) => "tabular correlated energy-angle",
            ScatteringDistribution::DelayedNeutronEmission(_) => "delayed neutron emission",
        }
    }
}

/// Check an atomic weight ratio read from `table`
pub fn validate_atomic_weight_ratio(table: &str, value: f64) -> ScatterResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ScatterError::InvalidAtomicWeightRatio {
            table: table.to_string(),
            value,
        })
    }
}
