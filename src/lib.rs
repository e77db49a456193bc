// Modules for the scattering core, re-exported for library users
mod ace_angular_factory;
mod ace_energy_factory;
mod ace_table;
mod angular_distribution;
mod bank;
mod config;
mod delayed;
mod delayed_neutron_factory;
mod elastic;
mod energy_distribution;
mod error;
mod fast_rng;
mod inelastic;
mod particle;
mod physics;
mod reaction;
mod reaction_factory;
mod reaction_type;
mod scatter;
mod scattering_factory;
mod secondary_kalbach;
mod secondary_law61;
mod secondary_uncorrelated;
mod stats;
mod utilities;

pub use ace_angular_factory::create_angular_distribution;
pub use ace_energy_factory::{
    create_coupled_distribution, create_energy_distribution, create_law44_distribution,
    create_law61_distribution, determine_law, read_dlw_header, DlwHeader,
};
pub use ace_table::{calculate_dist_array_sizes, BlockLocation, NuclideTable, TableSlice};
pub use angular_distribution::{isotropic_angular_distribution, AngularDistribution};
pub use bank::ParticleBank;
pub use config::{SimulationProperties, DEFAULT_FREE_GAS_THRESHOLD};
pub use delayed::{DelayedNeutronEmissionDistribution, PrecursorGroup};
pub use delayed_neutron_factory::DelayedNeutronEmissionDistributionFactory;
pub use elastic::ElasticScatteringDistribution;
pub use energy_distribution::{
    EnergyDependentParameter, EnergyDistribution, EnergySample, EvaporationDistribution,
    GeneralEvaporationDistribution, LevelInelasticEnergyDistribution, MaxwellFissionDistribution, TabularEnergyDistribution,
    WattDistribution,
};
pub use error::{ScatterError, ScatterResult};
pub use fast_rng::{FakeStream, FastRng, RandomSource, HISTORY_STRIDE};
pub use inelastic::InelasticLevelScatteringDistribution;
pub use particle::{
    energy_from_speed, speed_from_energy, Particle, NEUTRON_REST_MASS_ENERGY, SPEED_OF_LIGHT,
};
pub use physics::{
    rotate_direction, rotate_particle_direction, sample_azimuthal_angle,
    sample_free_gas_target_velocity, FrameConversion, TargetVelocity,
};
pub use reaction::{NuclearReaction, ReactionCrossSection, ReactionKind};
pub use reaction_factory::{NeutronNuclearReactionFactory, ReactionCategory};
pub use reaction_type::NuclearReactionType;
pub use scatter::{validate_atomic_weight_ratio, ScatteringDistribution};
pub use scattering_factory::NuclearScatteringDistributionFactory;
pub use secondary_kalbach::{
    sample_kalbach_mann_cosine, ArInterpolation, Law44ArDistribution, Law44ScatteringDistribution,
};
pub use secondary_law61::{Law61AngleTable, Law61ScatteringDistribution};
pub use secondary_uncorrelated::IndependentEnergyAngleDistribution;
pub use stats::OneDDistribution;
pub use utilities::{find_lower_bin_index, interpolate_linear};
