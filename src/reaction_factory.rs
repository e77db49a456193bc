// Builds the neutron reactions of one ACE nuclide table

use crate::ace_table::{NuclideTable, TableSlice};
use crate::config::SimulationProperties;
use crate::delayed_neutron_factory::DelayedNeutronEmissionDistributionFactory;
use crate::error::{ScatterError, ScatterResult};
use crate::reaction::{NuclearReaction, ReactionCrossSection};
use crate::reaction_type::NuclearReactionType;
use crate::scatter::ScatteringDistribution;
use crate::scattering_factory::NuclearScatteringDistributionFactory;
use std::collections::HashMap;
use std::sync::Arc;

/// TYR value marking fission neutrons
const FISSION_TYR: u32 = 19;

/// TYR values above this locate an energy-dependent multiplicity
const MAX_FIXED_MULTIPLICITY: u32 = 100;

/// How the TYR entry of a reaction classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionCategory {
    Absorption,
    /// Fixed number of outgoing neutrons
    Scattering(u32),
    Fission,
    EnergyDependentMultiplicity,
}

impl ReactionCategory {
    pub fn from_tyr(tyr: i64) -> Self {
        match tyr.unsigned_abs() as u32 {
            0 => ReactionCategory::Absorption,
            FISSION_TYR => ReactionCategory::Fission,
            m if m > MAX_FIXED_MULTIPLICITY => ReactionCategory::EnergyDependentMultiplicity,
            m => ReactionCategory::Scattering(m),
        }
    }
}

/// Scattering and absorption reactions of one nuclide at one temperature.
///
/// Fission and energy-dependent multiplicity reactions are recognised and
/// skipped; the delayed neutron distribution is built whenever the table
/// carries precursor data.
#[derive(Debug, Clone)]
pub struct NeutronNuclearReactionFactory {
    table_name: String,
    energy_grid: Arc<Vec<f64>>,
    q_values: HashMap<NuclearReactionType, f64>,
    threshold_indices: HashMap<NuclearReactionType, usize>,
    cross_sections: HashMap<NuclearReactionType, Arc<Vec<f64>>>,
    scattering_reactions: HashMap<NuclearReactionType, NuclearReaction>,
    absorption_reactions: HashMap<NuclearReactionType, NuclearReaction>,
    delayed_neutron_emission: Option<Arc<ScatteringDistribution>>,
}

impl NeutronNuclearReactionFactory {
    pub fn new(table: &NuclideTable, properties: &SimulationProperties) -> ScatterResult<Self> {
        properties.validate()?;
        let scattering_factory = NuclearScatteringDistributionFactory::new(table)?;

        let mut factory = NeutronNuclearReactionFactory {
            table_name: table.name.clone(),
            energy_grid: Arc::new(table.energy_grid.clone()),
            q_values: HashMap::new(),
            threshold_indices: HashMap::new(),
            cross_sections: HashMap::new(),
            scattering_reactions: HashMap::new(),
            absorption_reactions: HashMap::new(),
            delayed_neutron_emission: None,
        };
        if factory.energy_grid.is_empty() {
            return Err(ScatterError::MissingBlock {
                table: table.name.clone(),
                block: "ESZ",
            });
        }

        let categories = factory.initialize_reaction_data(table)?;
        factory.create_scattering_reactions(table, &categories, &scattering_factory, properties)?;
        factory.create_absorption_reactions(table, &categories)?;

        factory.delayed_neutron_emission = DelayedNeutronEmissionDistributionFactory::new(table)?
            .create_emission_distribution()?
            .map(|dist| Arc::new(ScatteringDistribution::DelayedNeutronEmission(dist)));

        log::info!(
            "{}: {} scattering and {} absorption reactions, {} delayed neutron groups",
            factory.table_name,
            factory.scattering_reactions.len(),
            factory.absorption_reactions.len(),
            match factory.delayed_neutron_emission.as_deref() {
                Some(ScatteringDistribution::DelayedNeutronEmission(dist)) => dist.groups().len(),
                _ => 0,
            }
        );
        Ok(factory)
    }

    /// Read Q-values, thresholds and cross sections from LQR, LSIG and SIG,
    /// returning the TYR category of every recognised reaction.
    fn initialize_reaction_data(
        &mut self,
        table: &NuclideTable,
    ) -> ScatterResult<Vec<(NuclearReactionType, ReactionCategory)>> {
        table.validate()?;
        self.q_values.insert(NuclearReactionType::Elastic, 0.0);
        self.threshold_indices.insert(NuclearReactionType::Elastic, 0);
        self.cross_sections.insert(
            NuclearReactionType::Elastic,
            Arc::new(table.elastic_cross_section.clone()),
        );

        let lsig = TableSlice::new(&table.name, "LSIG", 0, &table.lsig);
        let sig = TableSlice::new(&table.name, "SIG", 0, &table.sig);
        let tyr = TableSlice::new(&table.name, "TYR", 0, &table.tyr);

        let mut categories = Vec::with_capacity(table.mtr.len());
        for (i, mt) in table.reaction_numbers()?.into_iter().enumerate() {
            let reaction_type = match NuclearReactionType::from_mt(mt) {
                Ok(reaction_type) => reaction_type,
                Err(_) => {
                    log::debug!("{}: skipping MT {} with no neutron reaction type", table.name, mt);
                    continue;
                }
            };

            let sig = sig.for_reaction(mt);
            let location = lsig.for_reaction(mt).get_int(i as i64)?;
            let start = location - 1;
            let threshold_index = sig.get_index(start)?.checked_sub(1).ok_or_else(|| sig.out_of_range(start))?;
            let num_values = sig.get_index(start + 1)?;
            if threshold_index + num_values != self.energy_grid.len() {
                return Err(ScatterError::MismatchedBlockLengths {
                    table: table.name.clone(),
                    block: "SIG",
                    expected: self.energy_grid.len().saturating_sub(threshold_index),
                    found: num_values,
                });
            }

            self.q_values.insert(reaction_type, table.lqr[i]);
            self.threshold_indices.insert(reaction_type, threshold_index);
            self.cross_sections
                .insert(reaction_type, Arc::new(sig.values(start + 2, num_values)?));
            categories.push((reaction_type, ReactionCategory::from_tyr(tyr.get_int(i as i64)?)));
        }
        Ok(categories)
    }

    fn cross_section(&self, reaction_type: NuclearReactionType) -> ScatterResult<ReactionCrossSection> {
        match (
            self.cross_sections.get(&reaction_type),
            self.threshold_indices.get(&reaction_type),
        ) {
            (Some(values), Some(threshold_index)) => {
                ReactionCrossSection::new(self.energy_grid.clone(), values.clone(), *threshold_index)
            }
            _ => Err(ScatterError::MissingReaction {
                table: self.table_name.clone(),
                reaction: reaction_type.mt(),
            }),
        }
    }

    fn create_scattering_reactions(
        &mut self,
        table: &NuclideTable,
        categories: &[(NuclearReactionType, ReactionCategory)],
        scattering_factory: &NuclearScatteringDistributionFactory<'_>,
        properties: &SimulationProperties,
    ) -> ScatterResult<()> {
        let elastic = std::iter::once((NuclearReactionType::Elastic, ReactionCategory::Scattering(1)));
        for (reaction_type, category) in elastic.chain(categories.iter().copied()) {
            let multiplicity = match category {
                ReactionCategory::Scattering(multiplicity) => multiplicity,
                ReactionCategory::Fission => {
                    log::debug!("{}: skipping fission reaction {}", table.name, reaction_type);
                    continue;
                }
                ReactionCategory::EnergyDependentMultiplicity => {
                    log::debug!(
                        "{}: skipping {} with an energy dependent multiplicity",
                        table.name,
                        reaction_type
                    );
                    continue;
                }
                ReactionCategory::Absorption => continue,
            };

            let distribution = scattering_factory.create_scattering_distribution(reaction_type, properties)?;
            let reaction = NuclearReaction::new_scattering(
                reaction_type,
                table.temperature,
                self.q_values.get(&reaction_type).copied().unwrap_or(0.0),
                self.cross_section(reaction_type)?,
                multiplicity,
                distribution,
                properties.reset_secondary_collision_number,
            )?;
            self.scattering_reactions.insert(reaction_type, reaction);
        }
        Ok(())
    }

    fn create_absorption_reactions(
        &mut self,
        table: &NuclideTable,
        categories: &[(NuclearReactionType, ReactionCategory)],
    ) -> ScatterResult<()> {
        for (reaction_type, category) in categories {
            if *category != ReactionCategory::Absorption {
                continue;
            }
            let reaction = NuclearReaction::new_absorption(
                *reaction_type,
                table.temperature,
                self.q_values.get(reaction_type).copied().unwrap_or(0.0),
                self.cross_section(*reaction_type)?,
            );
            log::debug!("{}: built absorption reaction {}", table.name, reaction_type);
            self.absorption_reactions.insert(*reaction_type, reaction);
        }
        Ok(())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn energy_grid(&self) -> &Arc<Vec<f64>> {
        &self.energy_grid
    }

    pub fn q_values(&self) -> &HashMap<NuclearReactionType, f64> {
        &self.q_values
    }

    /// 0-based index of each reaction's first grid point
    pub fn threshold_indices(&self) -> &HashMap<NuclearReactionType, usize> {
        &self.threshold_indices
    }

    pub fn scattering_reactions(&self) -> &HashMap<NuclearReactionType, NuclearReaction> {
        &self.scattering_reactions
    }

    pub fn absorption_reactions(&self) -> &HashMap<NuclearReactionType, NuclearReaction> {
        &self.absorption_reactions
    }

    pub fn delayed_neutron_emission_distribution(&self) -> Option<&Arc<ScatteringDistribution>> {
        self.delayed_neutron_emission.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_category_from_tyr() {
        assert_eq!(ReactionCategory::from_tyr(0), ReactionCategory::Absorption);
        assert_eq!(ReactionCategory::from_tyr(-1), ReactionCategory::Scattering(1));
        assert_eq!(ReactionCategory::from_tyr(2), ReactionCategory::Scattering(2));
        assert_eq!(ReactionCategory::from_tyr(19), ReactionCategory::Fission);
        assert_eq!(ReactionCategory::from_tyr(-19), ReactionCategory::Fission);
        assert_eq!(
            ReactionCategory::from_tyr(120),
            ReactionCategory::EnergyDependentMultiplicity
        );
    }
}
