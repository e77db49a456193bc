// Inelastic scattering to a discrete excited level of the target (MT 51-90)

use crate::angular_distribution::AngularDistribution;
use crate::energy_distribution::LevelInelasticEnergyDistribution;
use crate::error::ScatterResult;
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::physics::rotate_particle_direction;
use crate::scatter::validate_atomic_weight_ratio;
use std::sync::Arc;

/// Two-body level scattering with a tabulated center-of-mass cosine.
///
/// The CM outgoing energy is `mass_ratio * (E - threshold)` with
/// `threshold = (A+1)/A |Q|` and `mass_ratio = (A/(A+1))^2`.
#[derive(Debug, Clone)]
pub struct InelasticLevelScatteringDistribution {
    atomic_weight_ratio: f64,
    threshold: f64,
    mass_ratio: f64,
    angular_distribution: Arc<AngularDistribution>,
}

impl InelasticLevelScatteringDistribution {
    pub fn new(
        atomic_weight_ratio: f64,
        q_value: f64,
        angular_distribution: Arc<AngularDistribution>,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("inelastic level scattering", atomic_weight_ratio)?;
        let level = LevelInelasticEnergyDistribution::from_q_value(q_value, atomic_weight_ratio);
        Self::from_level_law(atomic_weight_ratio, &level, angular_distribution)
    }

    /// Use the parameters of a tabulated law 3 entry
    pub fn from_level_law(
        atomic_weight_ratio: f64,
        level: &LevelInelasticEnergyDistribution,
        angular_distribution: Arc<AngularDistribution>,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("inelastic level scattering", atomic_weight_ratio)?;
        Ok(InelasticLevelScatteringDistribution {
            atomic_weight_ratio,
            threshold: level.param_a(),
            mass_ratio: level.param_b(),
            angular_distribution,
        })
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mass_ratio(&self) -> f64 {
        self.mass_ratio
    }

    pub fn scatter_neutron<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        _temperature: f64,
        rng: &mut R,
    ) {
        let e_in = particle.energy;
        let a_plus_1 = self.atomic_weight_ratio + 1.0;

        let e_cm = (self.mass_ratio * (e_in - self.threshold)).max(0.0);
        let mu_cm = self.angular_distribution.sample_angle_cosine(e_in, rng);

        let e_out = e_cm
            + (e_in + 2.0 * mu_cm * a_plus_1 * (e_in * e_cm).sqrt()) / (a_plus_1 * a_plus_1);
        let mu_lab = if e_out > 0.0 {
            (mu_cm * (e_cm / e_out).sqrt() + (e_in / e_out).sqrt() / a_plus_1).clamp(-1.0, 1.0)
        } else {
            mu_cm
        };

        particle.energy = e_out;
        rotate_particle_direction(particle, mu_lab, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angular_distribution::isotropic_angular_distribution;
    use crate::fast_rng::FakeStream;
    use crate::physics::FrameConversion;
    use crate::stats::OneDDistribution;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parameters_from_q_value() {
        let dist = InelasticLevelScatteringDistribution::new(1.0, -1.0, isotropic_angular_distribution()).unwrap();
        assert_eq!(dist.threshold(), 2.0);
        assert_eq!(dist.mass_ratio(), 0.25);
    }

    #[test]
    fn test_matches_cm_frame_conversion() {
        let awr = 55.454;
        let q = -0.846;
        let angular = Arc::new(
            AngularDistribution::new(vec![(1e-11, OneDDistribution::delta(0.4))], true).unwrap(),
        );
        let dist = InelasticLevelScatteringDistribution::new(awr, q, angular).unwrap();
        let mut particle = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 2.0);
        let mut stream = FakeStream::new(vec![0.25]);

        dist.scatter_neutron(&mut particle, 0.0, &mut stream);

        let level = LevelInelasticEnergyDistribution::from_q_value(q, awr);
        let e_cm = level.sample_energy(2.0);
        let cm = FrameConversion::CenterOfMass;
        let e_lab = cm.convert_to_lab_energy(2.0, e_cm, 0.4, awr);
        let mu_lab = cm.convert_to_lab_angle_cosine(2.0, e_cm, e_lab, 0.4, awr);

        assert_relative_eq!(particle.energy, e_lab, max_relative = 1e-12);
        assert_relative_eq!(particle.direction[2], mu_lab, max_relative = 1e-10);
        // delta cosine draws nothing; one draw for the azimuth
        assert_eq!(stream.draws(), 1);
    }

    #[test]
    fn test_energy_loss_and_unit_direction() {
        let awr = 11.8969;
        let dist = InelasticLevelScatteringDistribution::new(awr, -4.4389, isotropic_angular_distribution()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let mut particle = Particle::new([0.0; 3], [0.0, 0.6, 0.8], 14.0);
            dist.scatter_neutron(&mut particle, 0.0, &mut rng);
            assert!(particle.energy > 0.0 && particle.energy < 14.0 - 4.4389 + 1e-9);
            assert_abs_diff_eq!(particle.direction_vector().norm(), 1.0, epsilon = 1e-12);
        }
    }
}
