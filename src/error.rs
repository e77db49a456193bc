// Error types for table parsing and distribution construction

use thiserror::Error;

/// Fatal construction-time failures.
///
/// Every variant that originates from table data names the table it came
/// from so a failed nuclide load can be traced back to the offending file.
#[derive(Error, Debug)]
pub enum ScatterError {
    #[error("table {table}: multiple interpolation regions in {block} for MT {reaction} are not supported")]
    MultipleInterpolationRegions {
        table: String,
        block: &'static str,
        reaction: u32,
    },

    #[error("table {table}: multiple energy laws for MT {reaction} are not supported")]
    MultipleLaws { table: String, reaction: u32 },

    #[error("table {table}: energy law {law} for MT {reaction} is not supported")]
    UnsupportedLaw {
        table: String,
        reaction: u32,
        law: i64,
    },

    #[error("table {table}: unknown interpolation flag {flag} in {block} for MT {reaction}")]
    UnknownInterpolationFlag {
        table: String,
        block: &'static str,
        reaction: u32,
        flag: i64,
    },

    #[error("table {table}: mixed discrete/continuous outgoing spectra for MT {reaction} are not supported")]
    DiscreteLinesNotSupported { table: String, reaction: u32 },

    #[error("table {table}: index {index} out of range for {block} (len {len}) while reading MT {reaction}")]
    IndexOutOfRange {
        table: String,
        block: &'static str,
        reaction: u32,
        index: i64,
        len: usize,
    },

    #[error("table {table}: required block {block} is missing")]
    MissingBlock { table: String, block: &'static str },

    #[error("table {table}: block {block} has {found} entries but {expected} were expected")]
    MismatchedBlockLengths {
        table: String,
        block: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} grid is not sorted in ascending order")]
    UnsortedGrid { what: &'static str },

    #[error("{table}: atomic weight ratio {value} must be finite and positive")]
    InvalidAtomicWeightRatio { table: String, value: f64 },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("unknown MT number {0}")]
    UnknownMtNumber(u32),

    #[error("table {table}: level scattering law for MT {reaction} must be tabulated in the center-of-mass frame")]
    LevelLawNotInCenterOfMass { table: String, reaction: u32 },

    #[error("table {table}: unknown angular distribution locator {value} for MT {reaction}")]
    UnknownAngularLocation {
        table: String,
        reaction: u32,
        value: i64,
    },

    #[error("table {table}: no scattering distribution available for MT {reaction}")]
    MissingReaction { table: String, reaction: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type ScatterResult<T> = Result<T, ScatterError>;
