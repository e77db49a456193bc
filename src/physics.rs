// Scattering kinematics shared by the scattering distributions

use crate::config::SimulationProperties;
use crate::fast_rng::RandomSource;
use crate::particle::{Particle, NEUTRON_REST_MASS_ENERGY, SPEED_OF_LIGHT};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Uniform azimuthal angle on [0, 2π)
#[inline]
pub fn sample_azimuthal_angle<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    2.0 * PI * rng.random()
}

/// Rotate a unit direction through the polar angle with cosine `mu` and the
/// azimuthal angle `phi`.
///
/// The result is renormalised, so `u_old` only needs to be a unit vector up
/// to round-off.
pub fn rotate_direction(u_old: &Vector3<f64>, mu: f64, phi: f64) -> Vector3<f64> {
    let mu = mu.clamp(-1.0, 1.0);
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (u, v, w) = (u_old.x, u_old.y, u_old.z);

    let rotated = if 1.0 - w * w > 1e-10 {
        let b = (1.0 - w * w).sqrt();
        Vector3::new(
            mu * u + sin_theta * (u * w * cos_phi - v * sin_phi) / b,
            mu * v + sin_theta * (v * w * cos_phi + u * sin_phi) / b,
            mu * w - sin_theta * b * cos_phi,
        )
    } else {
        // travelling along z: rotate about the y axis instead
        let b = (1.0 - v * v).sqrt();
        Vector3::new(
            mu * u + sin_theta * (u * v * cos_phi + w * sin_phi) / b,
            mu * v - sin_theta * b * cos_phi,
            mu * w + sin_theta * (v * w * cos_phi - u * sin_phi) / b,
        )
    };
    rotated.normalize()
}

/// Rotate the particle's direction by `mu` about a freshly sampled azimuth
pub fn rotate_particle_direction<R: RandomSource + ?Sized>(
    particle: &mut Particle,
    mu: f64,
    rng: &mut R,
) {
    let phi = sample_azimuthal_angle(rng);
    let direction = rotate_direction(&particle.direction_vector(), mu, phi);
    particle.set_direction(direction);
}

/// Center-of-mass velocity of a neutron and a target of mass ratio `awr`
#[inline]
pub fn center_of_mass_velocity(
    neutron_velocity: &Vector3<f64>,
    target_velocity: &Vector3<f64>,
    awr: f64,
) -> Vector3<f64> {
    (neutron_velocity + awr * target_velocity) / (awr + 1.0)
}

/// Velocity seen from a frame moving with `frame_velocity`
#[inline]
pub fn transform_velocity_to_frame(
    velocity: &Vector3<f64>,
    frame_velocity: &Vector3<f64>,
) -> Vector3<f64> {
    velocity - frame_velocity
}

/// Velocity in the lab from one measured in a frame moving with `frame_velocity`
#[inline]
pub fn transform_velocity_from_frame(
    velocity: &Vector3<f64>,
    frame_velocity: &Vector3<f64>,
) -> Vector3<f64> {
    velocity + frame_velocity
}

/// Reference frame of tabulated secondary energies and cosines, and the
/// conversion of sampled values into the lab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameConversion {
    /// Tabulated values are already lab values
    Lab,
    /// Tabulated values are center-of-mass values; two-body kinematics maps
    /// them into the lab
    CenterOfMass,
}

impl FrameConversion {
    /// Frame implied by the sign of a TYR entry (negative means CM)
    pub fn from_tyr(tyr: i64) -> Self {
        if tyr < 0 {
            FrameConversion::CenterOfMass
        } else {
            FrameConversion::Lab
        }
    }

    pub fn is_center_of_mass(&self) -> bool {
        matches!(self, FrameConversion::CenterOfMass)
    }

    /// Lab outgoing energy for a system frame energy and cosine
    pub fn convert_to_lab_energy(
        &self,
        incoming_energy: f64,
        outgoing_energy: f64,
        scattering_angle_cosine: f64,
        awr: f64,
    ) -> f64 {
        match self {
            FrameConversion::Lab => outgoing_energy,
            FrameConversion::CenterOfMass => {
                let a_plus_1 = awr + 1.0;
                outgoing_energy
                    + (incoming_energy
                        + 2.0
                            * scattering_angle_cosine
                            * a_plus_1
                            * (incoming_energy * outgoing_energy).sqrt())
                        / (a_plus_1 * a_plus_1)
            }
        }
    }

    /// Lab scattering cosine. `lab_energy` must come from
    /// [`FrameConversion::convert_to_lab_energy`] for the same inputs.
    pub fn convert_to_lab_angle_cosine(
        &self,
        incoming_energy: f64,
        outgoing_energy: f64,
        lab_energy: f64,
        scattering_angle_cosine: f64,
        awr: f64,
    ) -> f64 {
        match self {
            FrameConversion::Lab => scattering_angle_cosine,
            FrameConversion::CenterOfMass => {
                if lab_energy <= 0.0 {
                    return scattering_angle_cosine;
                }
                let mu = scattering_angle_cosine * (outgoing_energy / lab_energy).sqrt()
                    + (incoming_energy / lab_energy).sqrt() / (awr + 1.0);
                mu.clamp(-1.0, 1.0)
            }
        }
    }
}

/// Outcome of the free gas target velocity draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetVelocity {
    /// Target treated as at rest
    Stationary,
    /// Sampled thermal velocity (cm/s)
    Thermal(Vector3<f64>),
}

impl TargetVelocity {
    pub fn velocity(&self) -> Vector3<f64> {
        match self {
            TargetVelocity::Stationary => Vector3::zeros(),
            TargetVelocity::Thermal(v) => *v,
        }
    }
}

/// Sample the velocity of a target nucleus in a free gas at temperature
/// `temperature` (kT in MeV), weighted by the relative speed to the neutron.
///
/// Fast neutrons (`E > free_gas_threshold * kT`) hitting targets heavier than
/// a neutron see a stationary target. Otherwise the target speed is drawn
/// from a mixture of the C49 and C61 schemes and accepted with probability
/// `|v_n - v_t| / (v_n + v_t)`.
pub fn sample_free_gas_target_velocity<R: RandomSource + ?Sized>(
    neutron: &Particle,
    awr: f64,
    temperature: f64,
    properties: &SimulationProperties,
    rng: &mut R,
) -> TargetVelocity {
    if neutron.energy > properties.free_gas_threshold * temperature && awr > 1.0 {
        return TargetVelocity::Stationary;
    }
    if temperature <= 0.0 {
        return TargetVelocity::Stationary;
    }

    let neutron_speed = neutron.speed();
    let beta = (awr * NEUTRON_REST_MASS_ENERGY / (2.0 * temperature)).sqrt() / SPEED_OF_LIGHT;
    let beta_vn = beta * neutron_speed;
    let alpha = 1.0 / (1.0 + PI.sqrt() * beta_vn / 2.0);

    let mut iterations = 0usize;
    let (beta_vt, mu) = loop {
        if let Some(max_iterations) = properties.free_gas_max_iterations {
            if iterations >= max_iterations {
                log::warn!(
                    "free gas sampling gave up after {} iterations (E = {:e} MeV, kT = {:e} MeV); using a stationary target",
                    iterations,
                    neutron.energy,
                    temperature
                );
                return TargetVelocity::Stationary;
            }
        }
        iterations += 1;

        let beta_vt_sq = if rng.random() < alpha {
            // C49: y exp(-y)
            let r1 = rng.random().max(f64::MIN_POSITIVE);
            let r2 = rng.random().max(f64::MIN_POSITIVE);
            -(r1 * r2).ln()
        } else {
            // C61: y^2 exp(-y^2)
            let r1 = rng.random().max(f64::MIN_POSITIVE);
            let r2 = rng.random().max(f64::MIN_POSITIVE);
            let c = (PI / 2.0 * rng.random()).cos();
            -r1.ln() - r2.ln() * c * c
        };
        let beta_vt = beta_vt_sq.sqrt();
        let mu = 2.0 * rng.random() - 1.0;

        let accept_prob = (beta_vn * beta_vn + beta_vt_sq - 2.0 * beta_vn * beta_vt * mu)
            .max(0.0)
            .sqrt()
            / (beta_vn + beta_vt);

        if rng.random() < accept_prob {
            break (beta_vt, mu);
        }
    };

    let target_speed = beta_vt / beta;
    let phi = sample_azimuthal_angle(rng);
    let direction = rotate_direction(&neutron.direction_vector(), mu, phi);
    TargetVelocity::Thermal(direction * target_speed)
}
