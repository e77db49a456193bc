// Scattering distributions for every reaction of an ACE neutron table

use crate::ace_angular_factory::create_angular_distribution;
use crate::ace_energy_factory::{create_coupled_distribution, create_energy_distribution};
use crate::ace_table::{calculate_dist_array_sizes, NuclideTable, TableSlice};
use crate::angular_distribution::{isotropic_angular_distribution, AngularDistribution};
use crate::config::SimulationProperties;
use crate::elastic::ElasticScatteringDistribution;
use crate::energy_distribution::EnergyDistribution;
use crate::error::{ScatterError, ScatterResult};
use crate::inelastic::InelasticLevelScatteringDistribution;
use crate::physics::FrameConversion;
use crate::reaction_type::NuclearReactionType;
use crate::scatter::{validate_atomic_weight_ratio, ScatteringDistribution};
use crate::secondary_uncorrelated::IndependentEnergyAngleDistribution;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const ELASTIC_MT: u32 = 2;

/// Locates the angular and energy data of each secondary-neutron reaction
/// and builds its [`ScatteringDistribution`] on request.
///
/// Elastic scattering has no energy data; its angular data is always the
/// first LAND entry, so LAND entry `i + 1` and LDLW entry `i` belong to the
/// reaction at MTR position `i`.
#[derive(Debug, Clone)]
pub struct NuclearScatteringDistributionFactory<'a> {
    table: &'a NuclideTable,
    atomic_weight_ratio: f64,
    reaction_ordering: HashMap<u32, usize>,
    reaction_cm_scattering: HashMap<u32, bool>,
    reactions_with_isotropic_scattering_only: HashSet<u32>,
    reactions_with_coupled_energy_angle_dist: HashSet<u32>,
    reaction_angular_dist_start_index: HashMap<u32, usize>,
    reaction_angular_dist_size: HashMap<u32, usize>,
    reaction_energy_dist_start_index: HashMap<u32, usize>,
    reaction_energy_dist_size: HashMap<u32, usize>,
}

impl<'a> NuclearScatteringDistributionFactory<'a> {
    pub fn new(table: &'a NuclideTable) -> ScatterResult<Self> {
        let atomic_weight_ratio = validate_atomic_weight_ratio(&table.name, table.atomic_weight_ratio)?;
        table.validate()?;

        let mut factory = NuclearScatteringDistributionFactory {
            table,
            atomic_weight_ratio,
            reaction_ordering: HashMap::new(),
            reaction_cm_scattering: HashMap::new(),
            reactions_with_isotropic_scattering_only: HashSet::new(),
            reactions_with_coupled_energy_angle_dist: HashSet::new(),
            reaction_angular_dist_start_index: HashMap::new(),
            reaction_angular_dist_size: HashMap::new(),
            reaction_energy_dist_start_index: HashMap::new(),
            reaction_energy_dist_size: HashMap::new(),
        };
        factory.initialize_reaction_ordering()?;
        factory.initialize_angular_dists()?;
        factory.initialize_energy_dists()?;
        Ok(factory)
    }

    fn block(&self, block: &'static str, data: &'a [f64]) -> TableSlice<'a> {
        TableSlice::new(&self.table.name, block, 0, data)
    }

    fn initialize_reaction_ordering(&mut self) -> ScatterResult<()> {
        let tyr = self.block("TYR", &self.table.tyr);
        for (i, mt) in self.table.reaction_numbers()?.into_iter().enumerate() {
            let tyr_value = tyr.for_reaction(mt).get_int(i as i64)?;
            if tyr_value != 0 {
                self.reaction_ordering.insert(mt, i);
                self.reaction_cm_scattering.insert(mt, tyr_value < 0);
            }
        }
        self.reaction_cm_scattering.insert(ELASTIC_MT, true);
        Ok(())
    }

    fn initialize_angular_dists(&mut self) -> ScatterResult<()> {
        if self.table.land.is_empty() {
            return Err(ScatterError::MissingBlock {
                table: self.table.name.clone(),
                block: "LAND",
            });
        }
        let land = self.block("LAND", &self.table.land);
        let sizes = calculate_dist_array_sizes(&self.table.name, "LAND", &self.table.land, &self.table.and)?;

        let mut entries: Vec<(u32, usize)> = vec![(ELASTIC_MT, 0)];
        entries.extend(self.reaction_ordering.iter().map(|(mt, i)| (*mt, i + 1)));

        for (mt, land_index) in entries {
            let value = land.for_reaction(mt).get_int(land_index as i64)?;
            match value {
                v if v > 0 => {
                    self.reaction_angular_dist_start_index.insert(mt, v as usize - 1);
                    self.reaction_angular_dist_size.insert(mt, sizes[land_index]);
                }
                0 => {
                    self.reactions_with_isotropic_scattering_only.insert(mt);
                }
                -1 if mt != ELASTIC_MT => {
                    self.reactions_with_coupled_energy_angle_dist.insert(mt);
                }
                value => {
                    return Err(ScatterError::UnknownAngularLocation {
                        table: self.table.name.clone(),
                        reaction: mt,
                        value,
                    })
                }
            }
        }
        Ok(())
    }

    fn initialize_energy_dists(&mut self) -> ScatterResult<()> {
        let ldlw = self.block("LDLW", &self.table.ldlw);
        let sizes = calculate_dist_array_sizes(&self.table.name, "LDLW", &self.table.ldlw, &self.table.dlw)?;

        for (mt, i) in &self.reaction_ordering {
            let ldlw = ldlw.for_reaction(*mt);
            let location = ldlw.get_int(*i as i64)?;
            if location <= 0 {
                return Err(ldlw.out_of_range(location));
            }
            self.reaction_energy_dist_start_index.insert(*mt, location as usize - 1);
            self.reaction_energy_dist_size.insert(*mt, sizes[*i]);
        }
        Ok(())
    }

    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    /// MT number to MTR position of every reaction with secondary neutrons
    pub fn reaction_ordering(&self) -> &HashMap<u32, usize> {
        &self.reaction_ordering
    }

    /// MT number to `true` when the reaction is tabulated in the CM frame
    pub fn reaction_cm_scattering(&self) -> &HashMap<u32, bool> {
        &self.reaction_cm_scattering
    }

    pub fn reactions_with_isotropic_scattering_only(&self) -> &HashSet<u32> {
        &self.reactions_with_isotropic_scattering_only
    }

    pub fn reactions_with_coupled_energy_angle_dist(&self) -> &HashSet<u32> {
        &self.reactions_with_coupled_energy_angle_dist
    }

    pub fn reaction_angular_dist_start_index(&self) -> &HashMap<u32, usize> {
        &self.reaction_angular_dist_start_index
    }

    pub fn reaction_angular_dist_size(&self) -> &HashMap<u32, usize> {
        &self.reaction_angular_dist_size
    }

    pub fn reaction_energy_dist_start_index(&self) -> &HashMap<u32, usize> {
        &self.reaction_energy_dist_start_index
    }

    pub fn reaction_energy_dist_size(&self) -> &HashMap<u32, usize> {
        &self.reaction_energy_dist_size
    }

    pub fn has_scattering_distribution(&self, mt: u32) -> bool {
        mt == ELASTIC_MT || self.reaction_energy_dist_start_index.contains_key(&mt)
    }

    /// Sorted MT numbers that have a scattering distribution, elastic included
    pub fn reactions_with_scattering_distributions(&self) -> Vec<u32> {
        let mut reactions: Vec<u32> = self.reaction_energy_dist_start_index.keys().copied().collect();
        reactions.push(ELASTIC_MT);
        reactions.sort_unstable();
        reactions
    }

    fn is_cm(&self, mt: u32) -> bool {
        self.reaction_cm_scattering.get(&mt).copied().unwrap_or(false)
    }

    fn create_angular(&self, mt: u32) -> ScatterResult<Arc<AngularDistribution>> {
        if self.reactions_with_isotropic_scattering_only.contains(&mt) {
            return Ok(isotropic_angular_distribution());
        }
        let (start, size) = match (
            self.reaction_angular_dist_start_index.get(&mt),
            self.reaction_angular_dist_size.get(&mt),
        ) {
            (Some(start), Some(size)) => (*start, *size),
            _ => {
                return Err(ScatterError::MissingReaction {
                    table: self.table.name.clone(),
                    reaction: mt,
                })
            }
        };
        let and_array = TableSlice::new(&self.table.name, "AND", mt, &self.table.and)
            .sub_slice(start as i64, size)?;
        Ok(Arc::new(create_angular_distribution(&and_array, start, self.is_cm(mt))?))
    }

    fn energy_array(&self, mt: u32) -> ScatterResult<(TableSlice<'a>, usize)> {
        match (
            self.reaction_energy_dist_start_index.get(&mt),
            self.reaction_energy_dist_size.get(&mt),
        ) {
            (Some(start), Some(size)) => {
                let dlw_array = TableSlice::new(&self.table.name, "DLW", mt, &self.table.dlw)
                    .sub_slice(*start as i64, *size)?;
                Ok((dlw_array, *start))
            }
            _ => Err(ScatterError::MissingReaction {
                table: self.table.name.clone(),
                reaction: mt,
            }),
        }
    }

    /// Build the distribution of `reaction_type`.
    ///
    /// Law 3 energy data yields a level scattering distribution (and must be
    /// tabulated in the CM frame); other uncoupled laws are paired with their
    /// angular table and coupled reactions must use law 44 or 61.
    pub fn create_scattering_distribution(
        &self,
        reaction_type: NuclearReactionType,
        properties: &SimulationProperties,
    ) -> ScatterResult<Arc<ScatteringDistribution>> {
        let mt = reaction_type.mt();
        if !self.has_scattering_distribution(mt) {
            return Err(ScatterError::MissingReaction {
                table: self.table.name.clone(),
                reaction: mt,
            });
        }
        let is_cm = self.is_cm(mt);
        let frame = if is_cm {
            FrameConversion::CenterOfMass
        } else {
            FrameConversion::Lab
        };

        let distribution = if self.reactions_with_coupled_energy_angle_dist.contains(&mt) {
            let (dlw_array, start) = self.energy_array(mt)?;
            create_coupled_distribution(&dlw_array, start, self.atomic_weight_ratio, frame)?
        } else {
            let angular = self.create_angular(mt)?;
            if mt == ELASTIC_MT {
                ScatteringDistribution::Elastic(ElasticScatteringDistribution::new(
                    self.atomic_weight_ratio,
                    angular,
                    properties,
                )?)
            } else {
                let (dlw_array, start) = self.energy_array(mt)?;
                match create_energy_distribution(&dlw_array, start)? {
                    EnergyDistribution::LevelInelastic(level) => {
                        if !is_cm {
                            return Err(ScatterError::LevelLawNotInCenterOfMass {
                                table: self.table.name.clone(),
                                reaction: mt,
                            });
                        }
                        ScatteringDistribution::InelasticLevel(
                            InelasticLevelScatteringDistribution::from_level_law(
                                self.atomic_weight_ratio,
                                &level,
                                angular,
                            )?,
                        )
                    }
                    energy => ScatteringDistribution::IndependentEnergyAngle(
                        IndependentEnergyAngleDistribution::new(
                            self.atomic_weight_ratio,
                            energy,
                            angular,
                            frame,
                        )?,
                    ),
                }
            }
        };

        let law = match &distribution {
            ScatteringDistribution::IndependentEnergyAngle(dist) => dist.energy_distribution().law(),
            ScatteringDistribution::InelasticLevel(_) => 3,
            ScatteringDistribution::Law44(_) => 44,
            ScatteringDistribution::Law61(_) => 61,
            _ => 0,
        };
        log::debug!(
            "{}: built {} distribution for {} (law {}, {} frame)",
            self.table.name,
            distribution.kind(),
            reaction_type,
            law,
            if is_cm { "CM" } else { "lab" }
        );
        Ok(Arc::new(distribution))
    }
}
