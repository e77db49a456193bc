// Outgoing energy distributions for the ACE energy laws 1, 3, 4, 5, 7, 9 and 11

use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::stats::OneDDistribution;
use crate::utilities::{find_lower_bin_index, interpolate_linear, is_strictly_ascending};
use std::f64::consts::PI;

/// Result of a tabulated energy draw, carrying the grid bins it came from so
/// a correlated angle sampler can reuse them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySample {
    /// Outgoing energy after unit-base interpolation
    pub energy: f64,
    /// Incident energy bin whose table was sampled
    pub incoming_bin_index: usize,
    /// Bin of the sampled table the value fell in
    pub outgoing_bin_index: usize,
    /// Raw value drawn from the sampled table before rescaling
    pub energy_prime: f64,
}

/// Outgoing energy tables on an incident energy grid, sampled with unit-base
/// interpolation. Shared by law 1 (equiprobable bins), law 4 and law 44.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularEnergyDistribution {
    energy_grid: Vec<f64>,
    outgoing_distributions: Vec<OneDDistribution>,
}

impl TabularEnergyDistribution {
    pub fn new(table: Vec<(f64, OneDDistribution)>) -> ScatterResult<Self> {
        if table.is_empty() {
            return Err(ScatterError::InvalidDistribution(
                "energy distribution needs at least one incident energy".to_string(),
            ));
        }
        let (energy_grid, outgoing_distributions): (Vec<f64>, Vec<OneDDistribution>) =
            table.into_iter().unzip();
        if !is_strictly_ascending(&energy_grid) {
            return Err(ScatterError::UnsortedGrid {
                what: "energy distribution incident energy",
            });
        }
        Ok(TabularEnergyDistribution {
            energy_grid,
            outgoing_distributions,
        })
    }

    pub fn energy_grid(&self) -> &[f64] {
        &self.energy_grid
    }

    pub fn outgoing_distributions(&self) -> &[OneDDistribution] {
        &self.outgoing_distributions
    }

    /// Sample an outgoing energy and report the bins used.
    ///
    /// Outside the incident grid the end table is sampled directly. Inside,
    /// one of the bracketing tables is chosen with its interpolation weight
    /// and its sample is mapped onto the interpolated outgoing energy range:
    ///
    /// `E = E_lower + (E' - E'_min) (E_upper - E_lower) / (E'_max - E'_min)`
    pub fn sample<R: RandomSource + ?Sized>(&self, incoming_energy: f64, rng: &mut R) -> EnergySample {
        let n = self.energy_grid.len();

        if n == 1 || incoming_energy < self.energy_grid[0] {
            return self.sample_boundary(0, rng);
        }
        if incoming_energy >= self.energy_grid[n - 1] {
            return self.sample_boundary(n - 1, rng);
        }

        let lower = find_lower_bin_index(&self.energy_grid, incoming_energy);
        let upper = lower + 1;
        let interpolation_fraction = (incoming_energy - self.energy_grid[lower])
            / (self.energy_grid[upper] - self.energy_grid[lower]);

        let sampled_bin = if rng.random() < interpolation_fraction {
            upper
        } else {
            lower
        };
        let sampled_dist = &self.outgoing_distributions[sampled_bin];
        let (energy_prime, outgoing_bin_index) = sampled_dist.sample_with_index(rng);

        let lower_dist = &self.outgoing_distributions[lower];
        let upper_dist = &self.outgoing_distributions[upper];
        let energy_lower = lower_dist.lower_bound()
            + interpolation_fraction * (upper_dist.lower_bound() - lower_dist.lower_bound());
        let energy_upper = lower_dist.upper_bound()
            + interpolation_fraction * (upper_dist.upper_bound() - lower_dist.upper_bound());

        let subdist_lower = sampled_dist.lower_bound();
        let subdist_upper = sampled_dist.upper_bound();
        let energy = if subdist_upper > subdist_lower {
            energy_lower
                + (energy_prime - subdist_lower) * (energy_upper - energy_lower)
                    / (subdist_upper - subdist_lower)
        } else {
            energy_lower
        };

        EnergySample {
            energy,
            incoming_bin_index: sampled_bin,
            outgoing_bin_index,
            energy_prime,
        }
    }

    fn sample_boundary<R: RandomSource + ?Sized>(&self, index: usize, rng: &mut R) -> EnergySample {
        let (energy, outgoing_bin_index) = self.outgoing_distributions[index].sample_with_index(rng);
        EnergySample {
            energy,
            incoming_bin_index: index,
            outgoing_bin_index,
            energy_prime: energy,
        }
    }
}

/// Law 3 discrete level scattering: `E' = b (E - a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelInelasticEnergyDistribution {
    param_a: f64,
    param_b: f64,
}

impl LevelInelasticEnergyDistribution {
    /// From the raw table parameters `a = (A+1)/A |Q|` and `b = (A/(A+1))^2`
    pub fn new(param_a: f64, param_b: f64) -> Self {
        LevelInelasticEnergyDistribution { param_a, param_b }
    }

    /// From the reaction Q-value (MeV) and the atomic weight ratio
    pub fn from_q_value(q_value: f64, atomic_weight_ratio: f64) -> Self {
        let a = atomic_weight_ratio;
        LevelInelasticEnergyDistribution {
            param_a: (a + 1.0) / a * q_value.abs(),
            param_b: (a / (a + 1.0)).powi(2),
        }
    }

    pub fn param_a(&self) -> f64 {
        self.param_a
    }

    pub fn param_b(&self) -> f64 {
        self.param_b
    }

    /// Center-of-mass outgoing energy, never negative
    pub fn sample_energy(&self, incoming_energy: f64) -> f64 {
        if !(incoming_energy.is_finite() && incoming_energy > 0.0) {
            log::warn!("level scattering sampled at non-physical energy {incoming_energy} MeV");
            return 0.0;
        }
        (self.param_b * (incoming_energy - self.param_a)).max(0.0)
    }
}

/// Piecewise linear function of incident energy used for the spectrum
/// parameters of laws 5, 7, 9 and 11.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyDependentParameter {
    energy_grid: Vec<f64>,
    values: Vec<f64>,
}

impl EnergyDependentParameter {
    pub fn new(energy_grid: Vec<f64>, values: Vec<f64>) -> ScatterResult<Self> {
        if energy_grid.is_empty() || energy_grid.len() != values.len() {
            return Err(ScatterError::InvalidDistribution(format!(
                "parameter table has {} energies and {} values",
                energy_grid.len(),
                values.len()
            )));
        }
        if !is_strictly_ascending(&energy_grid) {
            return Err(ScatterError::UnsortedGrid {
                what: "spectrum parameter",
            });
        }
        Ok(EnergyDependentParameter { energy_grid, values })
    }

    pub fn evaluate(&self, energy: f64) -> f64 {
        interpolate_linear(&self.energy_grid, &self.values, energy)
    }
}

/// Draw from a Maxwellian `sqrt(E) exp(-E/T)` with temperature `t`
fn sample_maxwellian<R: RandomSource + ?Sized>(t: f64, rng: &mut R) -> f64 {
    let r1 = rng.random().max(f64::MIN_POSITIVE);
    let r2 = rng.random().max(f64::MIN_POSITIVE);
    let c = (PI / 2.0 * rng.random()).cos();
    -t * (r1.ln() + r2.ln() * c * c)
}

/// Law 5 general evaporation spectrum: `E' = x theta(E)` with `x` drawn
/// from a table of equiprobable bins.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralEvaporationDistribution {
    theta: EnergyDependentParameter,
    x: OneDDistribution,
}

impl GeneralEvaporationDistribution {
    pub fn new(theta: EnergyDependentParameter, x_values: Vec<f64>) -> ScatterResult<Self> {
        Ok(GeneralEvaporationDistribution {
            theta,
            x: OneDDistribution::equiprobable_bin(x_values)?,
        })
    }

    pub fn sample_energy<R: RandomSource + ?Sized>(&self, incoming_energy: f64, rng: &mut R) -> f64 {
        self.x.sample(rng) * self.theta.evaluate(incoming_energy)
    }
}

/// Law 7 simple Maxwell fission spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxwellFissionDistribution {
    theta: EnergyDependentParameter,
    restriction_energy: f64,
}

impl MaxwellFissionDistribution {
    pub fn new(theta: EnergyDependentParameter, restriction_energy: f64) -> Self {
        MaxwellFissionDistribution {
            theta,
            restriction_energy,
        }
    }

    /// Rejects draws above `E - U`; when `E <= U` the spectrum is sampled
    /// without the restriction.
    pub fn sample_energy<R: RandomSource + ?Sized>(&self, incoming_energy: f64, rng: &mut R) -> f64 {
        let theta = self.theta.evaluate(incoming_energy);
        let max_energy = incoming_energy - self.restriction_energy;
        loop {
            let energy = sample_maxwellian(theta, rng);
            if max_energy <= 0.0 || energy <= max_energy {
                return energy;
            }
        }
    }
}

/// Law 9 evaporation spectrum `E exp(-E/T)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaporationDistribution {
    theta: EnergyDependentParameter,
    restriction_energy: f64,
}

impl EvaporationDistribution {
    pub fn new(theta: EnergyDependentParameter, restriction_energy: f64) -> Self {
        EvaporationDistribution {
            theta,
            restriction_energy,
        }
    }

    pub fn sample_energy<R: RandomSource + ?Sized>(&self, incoming_energy: f64, rng: &mut R) -> f64 {
        let theta = self.theta.evaluate(incoming_energy);
        let y = (incoming_energy - self.restriction_energy) / theta;
        // v is the CDF mass below the restriction; unrestricted when E <= U
        let v = if y > 0.0 { 1.0 - (-y).exp() } else { 1.0 };
        loop {
            let r1 = rng.random();
            let r2 = rng.random();
            let x = -((1.0 - v * r1) * (1.0 - v * r2)).max(f64::MIN_POSITIVE).ln();
            if y <= 0.0 || x <= y {
                return x * theta;
            }
        }
    }
}

/// Law 11 energy dependent Watt spectrum `exp(-E/a) sinh(sqrt(b E))`.
#[derive(Debug, Clone, PartialEq)]
pub struct WattDistribution {
    a: EnergyDependentParameter,
    b: EnergyDependentParameter,
    restriction_energy: f64,
}

impl WattDistribution {
    pub fn new(
        a: EnergyDependentParameter,
        b: EnergyDependentParameter,
        restriction_energy: f64,
    ) -> Self {
        WattDistribution {
            a,
            b,
            restriction_energy,
        }
    }

    pub fn sample_energy<R: RandomSource + ?Sized>(&self, incoming_energy: f64, rng: &mut R) -> f64 {
        let a = self.a.evaluate(incoming_energy);
        let b = self.b.evaluate(incoming_energy);
        let max_energy = incoming_energy - self.restriction_energy;
        loop {
            let w = sample_maxwellian(a, rng);
            let energy = w + a * a * b / 4.0 + (2.0 * rng.random() - 1.0) * (a * a * b * w).sqrt();
            if energy >= 0.0 && (max_energy <= 0.0 || energy <= max_energy) {
                return energy;
            }
        }
    }
}

/// Outgoing energy distribution of a reaction, one variant per ACE law.
#[derive(Debug, Clone, PartialEq)]
pub enum EnergyDistribution {
    EquiprobableBins(TabularEnergyDistribution),
    LevelInelastic(LevelInelasticEnergyDistribution),
    Tabular(TabularEnergyDistribution),
    GeneralEvaporation(GeneralEvaporationDistribution),
    MaxwellFission(MaxwellFissionDistribution),
    Evaporation(EvaporationDistribution),
    Watt(WattDistribution),
}

impl EnergyDistribution {
    /// ACE law number of this distribution
    pub fn law(&self) -> u32 {
        match self {
            EnergyDistribution::EquiprobableBins(_) => 1,
            EnergyDistribution::LevelInelastic(_) => 3,
            EnergyDistribution::Tabular(_) => 4,
            EnergyDistribution::GeneralEvaporation(_) => 5,
            EnergyDistribution::MaxwellFission(_) => 7,
            EnergyDistribution::Evaporation(_) => 9,
            EnergyDistribution::Watt(_) => 11,
        }
    }

    pub fn sample_energy<R: RandomSource + ?Sized>(&self, incoming_energy: f64, rng: &mut R) -> f64 {
        match self {
            EnergyDistribution::EquiprobableBins(dist) | EnergyDistribution::Tabular(dist) => {
                dist.sample(incoming_energy, rng).energy
            }
            EnergyDistribution::LevelInelastic(dist) => dist.sample_energy(incoming_energy),
            EnergyDistribution::GeneralEvaporation(dist) => dist.sample_energy(incoming_energy, rng),
            EnergyDistribution::MaxwellFission(dist) => dist.sample_energy(incoming_energy, rng),
            EnergyDistribution::Evaporation(dist) => dist.sample_energy(incoming_energy, rng),
            EnergyDistribution::Watt(dist) => dist.sample_energy(incoming_energy, rng),
        }
    }

    /// Tabulated draw with bin bookkeeping, available for the tabulated laws
    pub fn sample_energy_with_bins<R: RandomSource + ?Sized>(
        &self,
        incoming_energy: f64,
        rng: &mut R,
    ) -> Option<EnergySample> {
        match self {
            EnergyDistribution::EquiprobableBins(dist) | EnergyDistribution::Tabular(dist) => {
                Some(dist.sample(incoming_energy, rng))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FakeStream;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_energy_table() -> TabularEnergyDistribution {
        TabularEnergyDistribution::new(vec![
            (
                1.0,
                OneDDistribution::equiprobable_bin(vec![0.0, 0.5, 1.0]).unwrap(),
            ),
            (
                3.0,
                OneDDistribution::equiprobable_bin(vec![1.0, 2.0, 3.0]).unwrap(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_level_inelastic_parameters() {
        let dist = LevelInelasticEnergyDistribution::from_q_value(-1.0, 1.0);
        assert_eq!(dist.param_a(), 2.0);
        assert_eq!(dist.param_b(), 0.25);
        assert_eq!(dist.sample_energy(3.0), 0.25);
        assert_eq!(dist.sample_energy(6.0), 1.0);
        assert_eq!(dist.sample_energy(f64::NAN), 0.0);
        assert_eq!(dist.sample_energy(-1.0), 0.0);
    }

    #[test]
    fn test_level_inelastic_raw_parameters() {
        let dist = EnergyDistribution::LevelInelastic(LevelInelasticEnergyDistribution::new(1.0, 0.5));
        let mut stream = FakeStream::new(vec![0.5]);
        assert_eq!(dist.sample_energy(3.0, &mut stream), 1.0);
        assert_eq!(dist.sample_energy(5.0, &mut stream), 2.0);
        assert_eq!(stream.draws(), 0);
        assert_eq!(dist.law(), 3);
        assert!(dist.sample_energy_with_bins(3.0, &mut stream).is_none());
    }

    #[test]
    fn test_tabular_below_and_above_grid() {
        let dist = two_energy_table();
        let mut stream = FakeStream::new(vec![0.25]);

        let sample = dist.sample(0.5, &mut stream);
        assert_abs_diff_eq!(sample.energy, 0.25, epsilon = 1e-12);
        assert_eq!(sample.incoming_bin_index, 0);
        assert_eq!(sample.outgoing_bin_index, 0);
        assert_eq!(sample.energy_prime, sample.energy);

        let sample = dist.sample(3.0, &mut stream);
        assert_abs_diff_eq!(sample.energy, 1.5, epsilon = 1e-12);
        assert_eq!(sample.incoming_bin_index, 1);
    }

    #[test]
    fn test_unit_base_interpolation() {
        // E = 2 is halfway: the outgoing range interpolates to [0.5, 2.0]
        let dist = two_energy_table();

        // 0.4 < 0.5 picks the upper table; 0.75 lands at 2.5 in [1, 3]
        let mut stream = FakeStream::new(vec![0.4, 0.75]);
        let sample = dist.sample(2.0, &mut stream);
        assert_eq!(sample.incoming_bin_index, 1);
        assert_eq!(sample.outgoing_bin_index, 1);
        assert_abs_diff_eq!(sample.energy_prime, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sample.energy, 0.5 + 0.75 * 1.5, epsilon = 1e-12);

        // 0.6 picks the lower table; 0.75 lands at 0.75 in [0, 1]
        let mut stream = FakeStream::new(vec![0.6, 0.75]);
        let sample = dist.sample(2.0, &mut stream);
        assert_eq!(sample.incoming_bin_index, 0);
        assert_abs_diff_eq!(sample.energy_prime, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(sample.energy, 0.5 + 0.75 * 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unsorted_grid_rejected() {
        let result = TabularEnergyDistribution::new(vec![
            (2.0, OneDDistribution::delta(1.0)),
            (2.0, OneDDistribution::delta(1.0)),
        ]);
        assert!(matches!(result, Err(ScatterError::UnsortedGrid { .. })));
    }

    #[test]
    fn test_general_evaporation_scales_with_theta() {
        let theta = EnergyDependentParameter::new(vec![1.0, 3.0], vec![1.0, 2.0]).unwrap();
        let dist = EnergyDistribution::GeneralEvaporation(
            GeneralEvaporationDistribution::new(theta, vec![0.0, 1.0, 4.0]).unwrap(),
        );
        assert_eq!(dist.law(), 5);

        // 0.75 lands halfway through the second bin: x = 2.5, theta(2) = 1.5
        let mut stream = FakeStream::new(vec![0.75]);
        assert_abs_diff_eq!(dist.sample_energy(2.0, &mut stream), 3.75, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.sample_energy(5.0, &mut stream), 5.0, epsilon = 1e-12);
        assert_eq!(stream.draws(), 2);

        let theta = EnergyDependentParameter::new(vec![1.0], vec![1.0]).unwrap();
        assert!(GeneralEvaporationDistribution::new(theta, vec![1.0]).is_err());
    }

    #[test]
    fn test_maxwell_respects_restriction() {
        let theta = EnergyDependentParameter::new(vec![1e-11, 20.0], vec![1.3, 1.4]).unwrap();
        let dist = EnergyDistribution::MaxwellFission(MaxwellFissionDistribution::new(theta, 0.5));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let e = dist.sample_energy(2.0, &mut rng);
            assert!(e >= 0.0 && e <= 1.5, "energy {} violates restriction", e);
        }
        assert_eq!(dist.law(), 7);
    }

    #[test]
    fn test_maxwell_fixed_stream() {
        let theta = EnergyDependentParameter::new(vec![1.0], vec![2.0]).unwrap();
        let dist = MaxwellFissionDistribution::new(theta, 0.0);
        // cos(pi/2 * 1/3) = sqrt(3)/2
        let mut stream = FakeStream::new(vec![0.5, 0.25, 1.0 / 3.0]);
        let expected = -2.0 * (0.5f64.ln() + 0.25f64.ln() * 0.75);
        assert_abs_diff_eq!(dist.sample_energy(10.0, &mut stream), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_evaporation_respects_restriction() {
        let theta = EnergyDependentParameter::new(vec![1.0, 20.0], vec![0.5, 1.0]).unwrap();
        let dist = EnergyDistribution::Evaporation(EvaporationDistribution::new(theta, 1.0));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let e = dist.sample_energy(4.0, &mut rng);
            assert!(e >= 0.0 && e <= 3.0 + 1e-12);
        }
    }

    #[test]
    fn test_watt_samples_positive() {
        let a = EnergyDependentParameter::new(vec![1e-11, 20.0], vec![0.988, 1.0]).unwrap();
        let b = EnergyDependentParameter::new(vec![1e-11, 20.0], vec![2.249, 2.3]).unwrap();
        let dist = EnergyDistribution::Watt(WattDistribution::new(a, b, -20.0));
        let mut rng = StdRng::seed_from_u64(42);
        let mut total = 0.0;
        let n = 20000;
        for _ in 0..n {
            let e = dist.sample_energy(1.0, &mut rng);
            assert!(e >= 0.0 && e <= 21.0);
            total += e;
        }
        // mean of the Watt spectrum is 3a/2 + a^2 b / 4, about 2.03 MeV here
        let mean = total / n as f64;
        assert!((mean - 2.03).abs() < 0.1, "mean {} far from 2.03", mean);
    }
}
