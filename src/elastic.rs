// Elastic scattering off a free gas target

use crate::angular_distribution::AngularDistribution;
use crate::config::SimulationProperties;
use crate::error::ScatterResult;
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::scatter::validate_atomic_weight_ratio;
use crate::physics::{
    center_of_mass_velocity, rotate_direction, sample_azimuthal_angle,
    sample_free_gas_target_velocity, transform_velocity_from_frame, transform_velocity_to_frame,
    TargetVelocity,
};
use std::sync::Arc;

/// Elastic scattering with thermal target motion.
///
/// The scattering cosine is tabulated in the center-of-mass frame and looked
/// up with the neutron's lab energy rather than its energy relative to the
/// moving target.
#[derive(Debug, Clone)]
pub struct ElasticScatteringDistribution {
    atomic_weight_ratio: f64,
    properties: SimulationProperties,
    angular_distribution: Arc<AngularDistribution>,
}

impl ElasticScatteringDistribution {
    pub fn new(
        atomic_weight_ratio: f64,
        angular_distribution: Arc<AngularDistribution>,
        properties: &SimulationProperties,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("elastic scattering", atomic_weight_ratio)?;
        Ok(ElasticScatteringDistribution {
            atomic_weight_ratio,
            properties: properties.clone(),
            angular_distribution,
        })
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn angular_distribution(&self) -> &Arc<AngularDistribution> {
        &self.angular_distribution
    }

    /// Target velocity for one collision; see [`sample_free_gas_target_velocity`]
    pub fn sample_target_velocity<R: RandomSource + ?Sized>(
        &self,
        particle: &Particle,
        temperature: f64,
        rng: &mut R,
    ) -> TargetVelocity {
        sample_free_gas_target_velocity(
            particle,
            self.atomic_weight_ratio,
            temperature,
            &self.properties,
            rng,
        )
    }

    /// Scatter the neutron elastically off a target at `temperature` (kT, MeV)
    pub fn scatter_neutron<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        temperature: f64,
        rng: &mut R,
    ) {
        let awr = self.atomic_weight_ratio;
        let neutron_velocity = particle.velocity();
        let target_velocity = self
            .sample_target_velocity(particle, temperature, rng)
            .velocity();

        let cm_velocity = center_of_mass_velocity(&neutron_velocity, &target_velocity, awr);
        let neutron_cm_velocity = transform_velocity_to_frame(&neutron_velocity, &cm_velocity);
        let cm_speed = neutron_cm_velocity.norm();

        let mu_cm = self
            .angular_distribution
            .sample_angle_cosine(particle.energy, rng);
        let phi = sample_azimuthal_angle(rng);

        // neutron at rest in the CM frame: nothing to rotate
        if cm_speed <= 0.0 {
            return;
        }

        let cm_direction = neutron_cm_velocity / cm_speed;
        let scattered_cm_velocity = rotate_direction(&cm_direction, mu_cm, phi) * cm_speed;
        let lab_velocity = transform_velocity_from_frame(&scattered_cm_velocity, &cm_velocity);
        let lab_speed = lab_velocity.norm();

        if lab_speed > 0.0 {
            particle.set_direction(lab_velocity);
            particle.set_speed(lab_speed);
        }
    }
}
