// Kalbach-Mann correlated energy-angle scattering (ACE law 44)

use crate::energy_distribution::{EnergySample, TabularEnergyDistribution};
use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::physics::{rotate_particle_direction, FrameConversion};
use crate::scatter::validate_atomic_weight_ratio;

/// How the Kalbach R and A parameters vary between outgoing energy points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArInterpolation {
    Histogram,
    LinLin,
}

/// Kalbach-Mann parameters on the outgoing energy grid of one incident energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Law44ArDistribution {
    outgoing_energy_grid: Vec<f64>,
    a_values: Vec<f64>,
    r_values: Vec<f64>,
    interpolation: ArInterpolation,
}

impl Law44ArDistribution {
    pub fn new(
        outgoing_energy_grid: Vec<f64>,
        a_values: Vec<f64>,
        r_values: Vec<f64>,
        interpolation: ArInterpolation,
    ) -> ScatterResult<Self> {
        if outgoing_energy_grid.is_empty()
            || outgoing_energy_grid.len() != a_values.len()
            || outgoing_energy_grid.len() != r_values.len()
        {
            return Err(ScatterError::InvalidDistribution(format!(
                "Kalbach-Mann table has {} energies, {} A values and {} R values",
                outgoing_energy_grid.len(),
                a_values.len(),
                r_values.len()
            )));
        }
        Ok(Law44ArDistribution {
            outgoing_energy_grid,
            a_values,
            r_values,
            interpolation,
        })
    }

    pub fn interpolation(&self) -> ArInterpolation {
        self.interpolation
    }

    /// `(A, R)` at `energy_prime`, which lies in the outgoing bin `outgoing_bin_index`
    pub fn evaluate(&self, outgoing_bin_index: usize, energy_prime: f64) -> (f64, f64) {
        let i = outgoing_bin_index.min(self.outgoing_energy_grid.len() - 1);
        match self.interpolation {
            ArInterpolation::Histogram => (self.a_values[i], self.r_values[i]),
            ArInterpolation::LinLin => {
                if i + 1 >= self.outgoing_energy_grid.len() {
                    return (self.a_values[i], self.r_values[i]);
                }
                let e0 = self.outgoing_energy_grid[i];
                let e1 = self.outgoing_energy_grid[i + 1];
                if e1 <= e0 {
                    return (self.a_values[i], self.r_values[i]);
                }
                let f = (energy_prime - e0) / (e1 - e0);
                (
                    self.a_values[i] + f * (self.a_values[i + 1] - self.a_values[i]),
                    self.r_values[i] + f * (self.r_values[i + 1] - self.r_values[i]),
                )
            }
        }
    }
}

/// Sample a cosine from the Kalbach-Mann angular shape with slope `a` and
/// precompound fraction `r`. Consumes two random numbers.
pub fn sample_kalbach_mann_cosine<R: RandomSource + ?Sized>(a: f64, r: f64, rng: &mut R) -> f64 {
    let rand1 = rng.random();
    let random_num = rng.random();

    // vanishing slope degenerates to isotropic
    if a.abs() < 1e-10 {
        return 2.0 * random_num - 1.0;
    }

    let mu = if rand1 > r {
        let t = (2.0 * random_num - 1.0) * a.sinh();
        (t + (t * t + 1.0).sqrt()).ln() / a
    } else {
        (random_num * a.exp() + (1.0 - random_num) * (-a).exp()).ln() / a
    };
    mu.clamp(-1.0, 1.0)
}

/// Law 44 scattering: a tabulated outgoing energy with the cosine correlated
/// through the Kalbach-Mann parameters of the sampled outgoing bin.
#[derive(Debug, Clone)]
pub struct Law44ScatteringDistribution {
    atomic_weight_ratio: f64,
    energy_distribution: TabularEnergyDistribution,
    ar_distributions: Vec<Law44ArDistribution>,
    frame: FrameConversion,
}

impl Law44ScatteringDistribution {
    /// One `Law44ArDistribution` per incident energy of `energy_distribution`
    pub fn new(
        atomic_weight_ratio: f64,
        energy_distribution: TabularEnergyDistribution,
        ar_distributions: Vec<Law44ArDistribution>,
        frame: FrameConversion,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("Kalbach-Mann scattering", atomic_weight_ratio)?;
        if ar_distributions.len() != energy_distribution.energy_grid().len() {
            return Err(ScatterError::InvalidDistribution(format!(
                "{} Kalbach-Mann tables for {} incident energies",
                ar_distributions.len(),
                energy_distribution.energy_grid().len()
            )));
        }
        Ok(Law44ScatteringDistribution {
            atomic_weight_ratio,
            energy_distribution,
            ar_distributions,
            frame,
        })
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn energy_distribution(&self) -> &TabularEnergyDistribution {
        &self.energy_distribution
    }

    pub fn frame(&self) -> FrameConversion {
        self.frame
    }

    /// Sample the system frame energy (with its bins) and the correlated cosine
    pub fn sample_energy_and_angle<R: RandomSource + ?Sized>(
        &self,
        incoming_energy: f64,
        rng: &mut R,
    ) -> (EnergySample, f64) {
        let sample = self.energy_distribution.sample(incoming_energy, rng);
        let (a, r) = self.ar_distributions[sample.incoming_bin_index]
            .evaluate(sample.outgoing_bin_index, sample.energy_prime);
        let mu = sample_kalbach_mann_cosine(a, r, rng);
        (sample, mu)
    }

    pub fn scatter_neutron<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        _temperature: f64,
        rng: &mut R,
    ) {
        let e_in = particle.energy;
        let (sample, sys_mu) = self.sample_energy_and_angle(e_in, rng);
        let lab_energy = self.frame.convert_to_lab_energy(
            e_in,
            sample.energy,
            sys_mu,
            self.atomic_weight_ratio,
        );
        let lab_mu = self.frame.convert_to_lab_angle_cosine(
            e_in,
            sample.energy,
            lab_energy,
            sys_mu,
            self.atomic_weight_ratio,
        );
        particle.energy = lab_energy;
        rotate_particle_direction(particle, lab_mu, rng);
    }
}
