// Neutron state mutated by scattering distributions and reactions

use nalgebra::Vector3;

/// Neutron rest mass energy (MeV)
pub const NEUTRON_REST_MASS_ENERGY: f64 = 939.56542052;
/// Speed of light (cm/s)
pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

/// Relativistic speed (cm/s) of a neutron with the given kinetic energy (MeV)
#[inline]
pub fn speed_from_energy(energy: f64) -> f64 {
    let m = NEUTRON_REST_MASS_ENERGY;
    SPEED_OF_LIGHT * (energy * (energy + 2.0 * m)).sqrt() / (energy + m)
}

/// Kinetic energy (MeV) of a neutron moving with the given speed (cm/s).
///
/// Uses gamma - 1 = beta^2 / (s (1 + s)) with s = sqrt(1 - beta^2), which
/// keeps full precision for thermal speeds where gamma is within 1e-12 of 1.
#[inline]
pub fn energy_from_speed(speed: f64) -> f64 {
    let beta = speed / SPEED_OF_LIGHT;
    let beta_sq = beta * beta;
    let s = (1.0 - beta_sq).sqrt();
    NEUTRON_REST_MASS_ENERGY * beta_sq / (s * (1.0 + s))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: [f64; 3],
    /// Unit direction of flight
    pub direction: [f64; 3],
    /// Kinetic energy (MeV)
    pub energy: f64,
    /// Time since the source event (s)
    pub time: f64,
    pub weight: f64,
    pub alive: bool,
    /// Number of reaction generations between this particle and its source
    pub generation: u32,
    pub collision_number: u32,
}

impl Particle {
    pub fn new(position: [f64; 3], direction: [f64; 3], energy: f64) -> Self {
        if !(energy.is_finite() && energy > 0.0) {
            log::warn!("particle created with non-physical energy {energy} MeV");
        }
        Self {
            position,
            direction,
            energy,
            time: 0.0,
            weight: 1.0,
            alive: true,
            generation: 0,
            collision_number: 0,
        }
    }

    /// Finite and positive kinetic energy
    #[inline]
    pub fn has_physical_energy(&self) -> bool {
        self.energy.is_finite() && self.energy > 0.0
    }

    /// Speed in cm/s
    #[inline]
    pub fn speed(&self) -> f64 {
        speed_from_energy(self.energy)
    }

    /// Set the energy from a speed in cm/s
    #[inline]
    pub fn set_speed(&mut self, speed: f64) {
        self.energy = energy_from_speed(speed);
    }

    #[inline]
    pub fn direction_vector(&self) -> Vector3<f64> {
        Vector3::new(self.direction[0], self.direction[1], self.direction[2])
    }

    /// Set the direction, normalising away round-off
    pub fn set_direction(&mut self, direction: Vector3<f64>) {
        let norm = direction.norm();
        debug_assert!(norm > 0.0 && norm.is_finite());
        self.direction = [
            direction.x / norm,
            direction.y / norm,
            direction.z / norm,
        ];
    }

    /// Velocity vector (cm/s)
    #[inline]
    pub fn velocity(&self) -> Vector3<f64> {
        self.direction_vector() * self.speed()
    }

    /// Copy of this particle as the next generation, used for the extra
    /// neutrons of a multiplicity reaction.
    pub fn clone_as_secondary(&self, reset_collision_number: bool) -> Particle {
        let mut secondary = self.clone();
        secondary.generation += 1;
        if reset_collision_number {
            secondary.collision_number = 0;
        }
        secondary
    }
}
