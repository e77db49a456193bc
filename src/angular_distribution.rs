// Energy dependent scattering cosine distributions

use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::stats::OneDDistribution;
use crate::utilities::{find_lower_bin_index, is_strictly_ascending};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Isotropic distribution shared by every reaction without tabulated
/// angular data (including all delayed neutron precursor groups).
static ISOTROPIC: Lazy<Arc<AngularDistribution>> =
    Lazy::new(|| Arc::new(AngularDistribution::isotropic()));

/// Handle to the shared isotropic angular distribution
pub fn isotropic_angular_distribution() -> Arc<AngularDistribution> {
    Arc::clone(&ISOTROPIC)
}

/// Cosine distribution tabulated on an incident energy grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularDistribution {
    energy_grid: Vec<f64>,
    cosine_distributions: Vec<OneDDistribution>,
    is_cm_distribution: bool,
}

impl AngularDistribution {
    /// Build from `(incident energy, cosine distribution)` pairs. Energies
    /// must be strictly ascending.
    pub fn new(
        table: Vec<(f64, OneDDistribution)>,
        is_cm_distribution: bool,
    ) -> ScatterResult<Self> {
        if table.is_empty() {
            return Err(ScatterError::InvalidDistribution(
                "angular distribution needs at least one incident energy".to_string(),
            ));
        }
        let (energy_grid, cosine_distributions): (Vec<f64>, Vec<OneDDistribution>) =
            table.into_iter().unzip();
        if !is_strictly_ascending(&energy_grid) {
            return Err(ScatterError::UnsortedGrid {
                what: "angular distribution incident energy",
            });
        }
        Ok(AngularDistribution {
            energy_grid,
            cosine_distributions,
            is_cm_distribution,
        })
    }

    /// Isotropic in the center-of-mass frame at every energy
    pub fn isotropic() -> Self {
        AngularDistribution {
            energy_grid: vec![0.0],
            cosine_distributions: vec![OneDDistribution::Uniform {
                lower: -1.0,
                upper: 1.0,
            }],
            is_cm_distribution: true,
        }
    }

    pub fn is_cm_distribution(&self) -> bool {
        self.is_cm_distribution
    }

    pub fn energy_grid(&self) -> &[f64] {
        &self.energy_grid
    }

    pub fn cosine_distributions(&self) -> &[OneDDistribution] {
        &self.cosine_distributions
    }

    /// Sample a scattering cosine for a neutron of the given incident energy.
    ///
    /// Between grid points one of the two bracketing tables is picked with
    /// probability proportional to its interpolation weight; the chosen table
    /// is sampled as is. Round-off outside [-1, 1] is clamped.
    pub fn sample_angle_cosine<R: RandomSource + ?Sized>(
        &self,
        incoming_energy: f64,
        rng: &mut R,
    ) -> f64 {
        let n = self.energy_grid.len();
        let index = if n == 1 || incoming_energy < self.energy_grid[0] {
            0
        } else if incoming_energy >= self.energy_grid[n - 1] {
            n - 1
        } else {
            let lower = find_lower_bin_index(&self.energy_grid, incoming_energy);
            let e_lo = self.energy_grid[lower];
            let e_hi = self.energy_grid[lower + 1];
            let interpolation_fraction = (incoming_energy - e_lo) / (e_hi - e_lo);
            if rng.random() < interpolation_fraction {
                lower + 1
            } else {
                lower
            }
        };

        let cosine = self.cosine_distributions[index].sample(rng);
        if cosine.abs() > 1.0 {
            cosine.signum()
        } else {
            cosine
        }
    }
}
