// Uncorrelated outgoing energy and angle

use crate::angular_distribution::AngularDistribution;
use crate::energy_distribution::EnergyDistribution;
use crate::error::ScatterResult;
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::physics::{rotate_particle_direction, FrameConversion};
use crate::scatter::validate_atomic_weight_ratio;
use std::sync::Arc;

/// Outgoing energy and cosine sampled independently from their own tables,
/// then mapped into the lab with the reaction's frame conversion.
#[derive(Debug, Clone)]
pub struct IndependentEnergyAngleDistribution {
    atomic_weight_ratio: f64,
    energy_distribution: EnergyDistribution,
    angular_distribution: Arc<AngularDistribution>,
    frame: FrameConversion,
}

impl IndependentEnergyAngleDistribution {
    pub fn new(
        atomic_weight_ratio: f64,
        energy_distribution: EnergyDistribution,
        angular_distribution: Arc<AngularDistribution>,
        frame: FrameConversion,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("independent energy-angle scattering", atomic_weight_ratio)?;
        Ok(IndependentEnergyAngleDistribution {
            atomic_weight_ratio,
            energy_distribution,
            angular_distribution,
            frame,
        })
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn energy_distribution(&self) -> &EnergyDistribution {
        &self.energy_distribution
    }

    pub fn angular_distribution(&self) -> &Arc<AngularDistribution> {
        &self.angular_distribution
    }

    pub fn frame(&self) -> FrameConversion {
        self.frame
    }

    /// Sample `(lab energy, lab cosine)` for a neutron of energy `incoming_energy`
    pub fn sample_energy_and_angle<R: RandomSource + ?Sized>(
        &self,
        incoming_energy: f64,
        rng: &mut R,
    ) -> (f64, f64) {
        let sys_energy = self.energy_distribution.sample_energy(incoming_energy, rng);
        let sys_mu = self
            .angular_distribution
            .sample_angle_cosine(incoming_energy, rng);

        // the lab cosine depends on the lab energy, so convert the energy first
        let lab_energy = self.frame.convert_to_lab_energy(
            incoming_energy,
            sys_energy,
            sys_mu,
            self.atomic_weight_ratio,
        );
        let lab_mu = self.frame.convert_to_lab_angle_cosine(
            incoming_energy,
            sys_energy,
            lab_energy,
            sys_mu,
            self.atomic_weight_ratio,
        );
        (lab_energy, lab_mu)
    }

    pub fn scatter_neutron<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        _temperature: f64,
        rng: &mut R,
    ) {
        let (energy, mu) = self.sample_energy_and_angle(particle.energy, rng);
        particle.energy = energy;
        rotate_particle_direction(particle, mu, rng);
    }
}
