// Tabulated correlated energy-angle scattering (ACE law 61)

use crate::energy_distribution::{EnergySample, TabularEnergyDistribution};
use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::particle::Particle;
use crate::physics::{rotate_particle_direction, FrameConversion};
use crate::scatter::validate_atomic_weight_ratio;
use crate::secondary_kalbach::ArInterpolation;
use crate::stats::OneDDistribution;

/// Cosine tables attached to the outgoing energy points of one incident energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Law61AngleTable {
    outgoing_energy_grid: Vec<f64>,
    cosine_distributions: Vec<OneDDistribution>,
    interpolation: ArInterpolation,
}

impl Law61AngleTable {
    pub fn new(
        outgoing_energy_grid: Vec<f64>,
        cosine_distributions: Vec<OneDDistribution>,
        interpolation: ArInterpolation,
    ) -> ScatterResult<Self> {
        if outgoing_energy_grid.is_empty() || outgoing_energy_grid.len() != cosine_distributions.len() {
            return Err(ScatterError::InvalidDistribution(format!(
                "law 61 table has {} outgoing energies and {} cosine tables",
                outgoing_energy_grid.len(),
                cosine_distributions.len()
            )));
        }
        Ok(Law61AngleTable {
            outgoing_energy_grid,
            cosine_distributions,
            interpolation,
        })
    }

    pub fn interpolation(&self) -> ArInterpolation {
        self.interpolation
    }

    pub fn cosine_distributions(&self) -> &[OneDDistribution] {
        &self.cosine_distributions
    }

    /// Sample a cosine for `energy_prime` in the outgoing bin `outgoing_bin_index`.
    ///
    /// Histogram tables use the bin's own cosine table. Lin-lin tables pick
    /// the upper neighbour with probability equal to the position of
    /// `energy_prime` inside the bin, which costs one extra draw.
    pub fn sample_cosine<R: RandomSource + ?Sized>(
        &self,
        outgoing_bin_index: usize,
        energy_prime: f64,
        rng: &mut R,
    ) -> f64 {
        let last = self.outgoing_energy_grid.len() - 1;
        let mut i = outgoing_bin_index.min(last);
        if self.interpolation == ArInterpolation::LinLin && i < last {
            let e0 = self.outgoing_energy_grid[i];
            let e1 = self.outgoing_energy_grid[i + 1];
            if e1 > e0 && rng.random() < (energy_prime - e0) / (e1 - e0) {
                i += 1;
            }
        }
        self.cosine_distributions[i].sample(rng).clamp(-1.0, 1.0)
    }
}

/// Law 61 scattering: a tabulated outgoing energy whose cosine is drawn
/// from the table of the sampled outgoing bin.
#[derive(Debug, Clone)]
pub struct Law61ScatteringDistribution {
    atomic_weight_ratio: f64,
    energy_distribution: TabularEnergyDistribution,
    angle_tables: Vec<Law61AngleTable>,
    frame: FrameConversion,
}

impl Law61ScatteringDistribution {
    /// One `Law61AngleTable` per incident energy of `energy_distribution`
    pub fn new(
        atomic_weight_ratio: f64,
        energy_distribution: TabularEnergyDistribution,
        angle_tables: Vec<Law61AngleTable>,
        frame: FrameConversion,
    ) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio("law 61 scattering", atomic_weight_ratio)?;
        if angle_tables.len() != energy_distribution.energy_grid().len() {
            return Err(ScatterError::InvalidDistribution(format!(
                "{} law 61 angle tables for {} incident energies",
                angle_tables.len(),
                energy_distribution.energy_grid().len()
            )));
        }
        Ok(Law61ScatteringDistribution {
            atomic_weight_ratio,
            energy_distribution,
            angle_tables,
            frame,
        })
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn energy_distribution(&self) -> &TabularEnergyDistribution {
        &self.energy_distribution
    }

    pub fn angle_tables(&self) -> &[Law61AngleTable] {
        &self.angle_tables
    }

    pub fn frame(&self) -> FrameConversion {
        self.frame
    }

    pub fn sample_energy_and_angle<R: RandomSource + ?Sized>(
        &self,
        incoming_energy: f64,
        rng: &mut R,
    ) -> (EnergySample, f64) {
        let sample = self.energy_distribution.sample(incoming_energy, rng);
        let mu = self.angle_tables[sample.incoming_bin_index].sample_cosine(
            sample.outgoing_bin_index,
            sample.energy_prime,
            rng,
        );
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
        let lab_energy =
            self.frame
                .convert_to_lab_energy(e_in, sample.energy, sys_mu, self.atomic_weight_ratio);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FakeStream;
    use approx::assert_abs_diff_eq;

    fn two_point_table(interpolation: ArInterpolation) -> Law61AngleTable {
        Law61AngleTable::new(
            vec![0.0, 2.0],
            vec![OneDDistribution::delta(-0.5), OneDDistribution::delta(0.5)],
            interpolation,
        )
        .unwrap()
    }

    #[test]
    fn test_histogram_uses_bin_table() {
        let table = two_point_table(ArInterpolation::Histogram);
        let mut stream = FakeStream::new(vec![0.0]);
        assert_eq!(table.sample_cosine(0, 1.9, &mut stream), -0.5);
        assert_eq!(table.sample_cosine(1, 2.0, &mut stream), 0.5);
        assert_eq!(stream.draws(), 0);
    }

    #[test]
    fn test_lin_lin_picks_neighbour_by_position() {
        let table = two_point_table(ArInterpolation::LinLin);
        // E' = 1.5 sits 3/4 of the way up the bin
        let mut stream = FakeStream::new(vec![0.7, 0.8]);
        assert_eq!(table.sample_cosine(0, 1.5, &mut stream), 0.5);
        assert_eq!(table.sample_cosine(0, 1.5, &mut stream), -0.5);
        assert_eq!(stream.draws(), 2);
    }

    #[test]
    fn test_mismatched_tables_rejected() {
        assert!(Law61AngleTable::new(vec![1.0], vec![], ArInterpolation::LinLin).is_err());

        let energy = TabularEnergyDistribution::new(vec![
            (1.0, OneDDistribution::delta(0.5)),
            (2.0, OneDDistribution::delta(1.0)),
        ])
        .unwrap();
        let tables = vec![two_point_table(ArInterpolation::Histogram)];
        assert!(Law61ScatteringDistribution::new(1.0, energy, tables, FrameConversion::Lab).is_err());
    }

    #[test]
    fn test_scatter_in_lab_frame() {
        let energy = TabularEnergyDistribution::new(vec![(
            1.0,
            OneDDistribution::histogram(vec![0.0, 2.0], vec![0.5]).unwrap(),
        )])
        .unwrap();
        let tables = vec![Law61AngleTable::new(
            vec![0.0, 2.0],
            vec![OneDDistribution::delta(0.25), OneDDistribution::delta(0.75)],
            ArInterpolation::Histogram,
        )
        .unwrap()];
        let dist = Law61ScatteringDistribution::new(4.0, energy, tables, FrameConversion::Lab).unwrap();

        let mut particle = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 3.0);
        // energy draw, then the azimuth
        let mut stream = FakeStream::new(vec![0.5, 0.0]);
        dist.scatter_neutron(&mut particle, 0.0, &mut stream);

        assert_abs_diff_eq!(particle.energy, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(particle.direction[2], 0.25, epsilon = 1e-12);
        assert_eq!(stream.draws(), 2);
    }
}
