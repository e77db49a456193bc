// Delayed neutron emission from the ACE BDD, DNEDL and DNED blocks

use crate::ace_energy_factory::{create_coupled_distribution, create_energy_distribution, determine_law};
use crate::ace_table::{calculate_dist_array_sizes, NuclideTable, TableSlice};
use crate::angular_distribution::isotropic_angular_distribution;
use crate::delayed::DelayedNeutronEmissionDistribution;
use crate::error::{ScatterError, ScatterResult};
use crate::physics::FrameConversion;
use crate::scatter::{validate_atomic_weight_ratio, ScatteringDistribution};
use crate::secondary_uncorrelated::IndependentEnergyAngleDistribution;
use crate::stats::OneDDistribution;
use std::sync::Arc;

/// MT number of delayed fission neutrons, used to label parsing errors
const DELAYED_NEUTRON_MT: u32 = 455;

/// BDD decay constants are tabulated per shake (1e-8 s)
const SHAKES_PER_SECOND: f64 = 1e8;

/// Builds the precursor groups of a fissionable nuclide.
///
/// Each BDD group entry is `DEC | NR | NE | E(NE) | P(NE)`; the matching
/// DNEDL locator points at a DLW-format entry in DNED. Delayed neutrons are
/// emitted isotropically in the lab unless their entry is law 44.
#[derive(Debug, Clone)]
pub struct DelayedNeutronEmissionDistributionFactory<'a> {
    table: &'a NuclideTable,
    atomic_weight_ratio: f64,
    decay_constants: Vec<f64>,
    emission_probabilities: Vec<OneDDistribution>,
    dned_start_index: Vec<usize>,
    dned_size: Vec<usize>,
}

impl<'a> DelayedNeutronEmissionDistributionFactory<'a> {
    pub fn new(table: &'a NuclideTable) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio(&table.name, table.atomic_weight_ratio)?;
        let num_groups = table.dnedl.len();

        let mut factory = DelayedNeutronEmissionDistributionFactory {
            table,
            atomic_weight_ratio,
            decay_constants: Vec::with_capacity(num_groups),
            emission_probabilities: Vec::with_capacity(num_groups),
            dned_start_index: Vec::with_capacity(num_groups),
            dned_size: Vec::with_capacity(num_groups),
        };
        if num_groups > 0 {
            factory.initialize_basic_data(num_groups)?;
            factory.initialize_emission_locations()?;
        }
        Ok(factory)
    }

    fn initialize_basic_data(&mut self, num_groups: usize) -> ScatterResult<()> {
        let bdd = TableSlice::new(&self.table.name, "BDD", DELAYED_NEUTRON_MT, &self.table.bdd);
        if bdd.is_empty() {
            return Err(ScatterError::MissingBlock {
                table: self.table.name.clone(),
                block: "BDD",
            });
        }

        let mut index = 0i64;
        for _ in 0..num_groups {
            let decay_constant = bdd.get(index)? * SHAKES_PER_SECOND;
            if bdd.get_int(index + 1)? != 0 {
                return Err(ScatterError::MultipleInterpolationRegions {
                    table: self.table.name.clone(),
                    block: "BDD",
                    reaction: DELAYED_NEUTRON_MT,
                });
            }
            let num_energies = bdd.get_index(index + 2)?;
            let ne = num_energies as i64;
            let energies = bdd.values(index + 3, num_energies)?;
            let probabilities = bdd.values(index + 3 + ne, num_energies)?;

            self.decay_constants.push(decay_constant);
            self.emission_probabilities
                .push(OneDDistribution::tabular(energies, probabilities)?);
            index += 3 + 2 * ne;
        }
        Ok(())
    }

    fn initialize_emission_locations(&mut self) -> ScatterResult<()> {
        let dnedl = TableSlice::new(&self.table.name, "DNEDL", DELAYED_NEUTRON_MT, &self.table.dnedl);
        let sizes = calculate_dist_array_sizes(&self.table.name, "DNEDL", &self.table.dnedl, &self.table.dned)?;
        for (i, size) in sizes.into_iter().enumerate() {
            let location = dnedl.get_int(i as i64)?;
            if location <= 0 {
                return Err(dnedl.out_of_range(location));
            }
            self.dned_start_index.push(location as usize - 1);
            self.dned_size.push(size);
        }
        Ok(())
    }

    pub fn number_of_groups(&self) -> usize {
        self.decay_constants.len()
    }

    /// Decay constants in 1/s
    pub fn decay_constants(&self) -> &[f64] {
        &self.decay_constants
    }

    pub fn emission_probabilities(&self) -> &[OneDDistribution] {
        &self.emission_probabilities
    }

    fn create_group_distribution(&self, group: usize) -> ScatterResult<ScatteringDistribution> {
        let start = self.dned_start_index[group];
        let dned_array = TableSlice::new(&self.table.name, "DNED", DELAYED_NEUTRON_MT, &self.table.dned)
            .sub_slice(start as i64, self.dned_size[group])?;

        if matches!(determine_law(&dned_array, start)?, 44 | 61) {
            create_coupled_distribution(&dned_array, start, self.atomic_weight_ratio, FrameConversion::Lab)
        } else {
            Ok(ScatteringDistribution::IndependentEnergyAngle(
                IndependentEnergyAngleDistribution::new(
                    self.atomic_weight_ratio,
                    create_energy_distribution(&dned_array, start)?,
                    isotropic_angular_distribution(),
                    FrameConversion::Lab,
                )?,
            ))
        }
    }

    /// The delayed emission distribution, or `None` when the table has no
    /// precursor data.
    pub fn create_emission_distribution(&self) -> ScatterResult<Option<DelayedNeutronEmissionDistribution>> {
        if self.number_of_groups() == 0 {
            return Ok(None);
        }
        let distributions = (0..self.number_of_groups())
            .map(|group| self.create_group_distribution(group).map(Arc::new))
            .collect::<ScatterResult<Vec<_>>>()?;

        log::info!(
            "{}: built delayed neutron emission over {} precursor groups",
            self.table.name,
            distributions.len()
        );
        DelayedNeutronEmissionDistribution::new(
            self.atomic_weight_ratio,
            self.decay_constants.clone(),
            self.emission_probabilities.clone(),
            distributions,
        )
        .map(Some)
    }
}
