// Simulation properties consumed while building and sampling distributions
use crate::error::{ScatterError, ScatterResult};
use serde::{Deserialize, Serialize};

/// Default free gas threshold in units of kT.
pub const DEFAULT_FREE_GAS_THRESHOLD: f64 = 1000.0;

/// Immutable snapshot of the settings that influence neutron scattering.
///
/// A value is built once before a run (in code or from JSON) and handed by
/// reference to the distribution factories. Distributions copy the fields
/// they need at construction, so changing a `SimulationProperties` after
/// the factories have run has no effect on already built distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationProperties {
    /// Neutrons faster than `free_gas_threshold * kT` see a stationary
    /// target when the atomic weight ratio is above one.
    pub free_gas_threshold: f64,
    /// Optional cap on free gas rejection iterations. `None` retries until a
    /// target velocity is accepted.
    pub free_gas_max_iterations: Option<usize>,
    /// Whether secondaries banked by multiplicity reactions start with a
    /// collision number of zero.
    pub reset_secondary_collision_number: bool,
}

impl Default for SimulationProperties {
    fn default() -> Self {
        SimulationProperties {
            free_gas_threshold: DEFAULT_FREE_GAS_THRESHOLD,
            free_gas_max_iterations: None,
            reset_secondary_collision_number: true,
        }
    }
}

impl SimulationProperties {
    /// Create the default set of properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties from a JSON document. Missing fields take their
    /// default values.
    pub fn from_json_str(json: &str) -> ScatterResult<Self> {
        let properties: SimulationProperties = serde_json::from_str(json)?;
        properties.validate()?;
        Ok(properties)
    }

    /// Serialize the properties to a JSON string
    pub fn to_json_string(&self) -> ScatterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the properties describe a usable configuration
    pub fn validate(&self) -> ScatterResult<()> {
        if !self.free_gas_threshold.is_finite() || self.free_gas_threshold <= 0.0 {
            return Err(ScatterError::InvalidConfig(format!(
                "free gas threshold must be finite and positive, got {}",
                self.free_gas_threshold
            )));
        }
        if self.free_gas_max_iterations == Some(0) {
            return Err(ScatterError::InvalidConfig(
                "free gas iteration cap must be at least one".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_free_gas_threshold(mut self, threshold: f64) -> Self {
        self.free_gas_threshold = threshold;
        self
    }

    pub fn with_free_gas_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.free_gas_max_iterations = max_iterations;
        self
    }

    pub fn with_reset_secondary_collision_number(mut self, reset: bool) -> Self {
        self.reset_secondary_collision_number = reset;
        self
    }
}
