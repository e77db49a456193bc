// Raw ACE nuclide data blocks and checked access into them

use crate::error::{ScatterError, ScatterResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The continuous-energy neutron blocks of one ACE table, as handed over by
/// an external loader.
///
/// All blocks keep the XSS representation: integers are stored as doubles
/// and every locator inside a block is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NuclideTable {
    /// Table identifier, e.g. `1001.80c`
    pub name: String,
    pub atomic_weight_ratio: f64,
    /// Temperature as kT (MeV)
    #[serde(default)]
    pub temperature: f64,
    /// Shared incident energy grid (MeV)
    #[serde(default)]
    pub energy_grid: Vec<f64>,
    #[serde(default)]
    pub elastic_cross_section: Vec<f64>,
    /// MT numbers of the tabulated reactions
    #[serde(default)]
    pub mtr: Vec<f64>,
    /// Q-values
    #[serde(default)]
    pub lqr: Vec<f64>,
    /// Multiplicity and reference frame
    #[serde(default)]
    pub tyr: Vec<f64>,
    #[serde(default)]
    pub lsig: Vec<f64>,
    #[serde(default)]
    pub sig: Vec<f64>,
    #[serde(default)]
    pub land: Vec<f64>,
    #[serde(default)]
    pub and: Vec<f64>,
    #[serde(default)]
    pub ldlw: Vec<f64>,
    #[serde(default)]
    pub dlw: Vec<f64>,
    /// Delayed neutron precursor basic data
    #[serde(default)]
    pub bdd: Vec<f64>,
    #[serde(default)]
    pub dnedl: Vec<f64>,
    #[serde(default)]
    pub dned: Vec<f64>,
}

impl NuclideTable {
    pub fn from_json_str(json: &str) -> ScatterResult<Self> {
        let table: NuclideTable = serde_json::from_str(json)?;
        Ok(table)
    }

    pub fn to_json_string(&self) -> ScatterResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the block lengths that must agree reaction by reaction
    pub fn validate(&self) -> ScatterResult<()> {
        if self.mtr.is_empty() {
            return Err(ScatterError::MissingBlock {
                table: self.name.clone(),
                block: "MTR",
            });
        }
        let n = self.mtr.len();
        for (block, values) in [("TYR", &self.tyr), ("LQR", &self.lqr), ("LSIG", &self.lsig)] {
            if values.len() != n {
                return Err(ScatterError::MismatchedBlockLengths {
                    table: self.name.clone(),
                    block,
                    expected: n,
                    found: values.len(),
                });
            }
        }
        if self.elastic_cross_section.len() != self.energy_grid.len() {
            return Err(ScatterError::MismatchedBlockLengths {
                table: self.name.clone(),
                block: "elastic cross section",
                expected: self.energy_grid.len(),
                found: self.elastic_cross_section.len(),
            });
        }
        Ok(())
    }

    /// MT number of each MTR entry, in table order
    pub fn reaction_numbers(&self) -> ScatterResult<Vec<u32>> {
        let mtr = TableSlice::new(&self.name, "MTR", 0, &self.mtr);
        (0..self.mtr.len())
            .map(|i| mtr.get_index(i as i64).map(|mt| mt as u32))
            .collect()
    }
}

/// A 1-based locator read from a location block (LAND, LDLW, DNEDL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLocation {
    /// No data: isotropic scattering or nothing tabulated
    None,
    /// 0-based start of the data in the paired block
    Location(usize),
    /// Shares the data starting at this 0-based index
    SharedWith(usize),
}

impl BlockLocation {
    pub fn from_raw(value: f64) -> Self {
        let value = value.round() as i64;
        if value > 0 {
            BlockLocation::Location(value as usize - 1)
        } else if value < 0 {
            BlockLocation::SharedWith(value.unsigned_abs() as usize - 1)
        } else {
            BlockLocation::None
        }
    }
}

/// Number of elements of `data` owned by each entry of `locations`.
///
/// Distinct start locations are sorted and each span runs to the next start
/// (the last one to the end of `data`). Entries without data get a size of
/// zero and shared entries copy the size of the location they point at.
pub fn calculate_dist_array_sizes(
    table: &str,
    block: &'static str,
    locations: &[f64],
    data: &[f64],
) -> ScatterResult<Vec<usize>> {
    let parsed: Vec<BlockLocation> = locations.iter().map(|v| BlockLocation::from_raw(*v)).collect();

    let mut starts: Vec<usize> = Vec::with_capacity(parsed.len());
    for location in &parsed {
        if let BlockLocation::Location(start) = *location {
            if start >= data.len() {
                return Err(ScatterError::IndexOutOfRange {
                    table: table.to_string(),
                    block,
                    reaction: 0,
                    index: start as i64,
                    len: data.len(),
                });
            }
            starts.push(start);
        }
    }
    starts.sort_unstable();
    starts.dedup();

    let mut span_sizes = BTreeMap::new();
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(data.len());
        span_sizes.insert(*start, end - start);
    }

    let sizes = parsed
        .iter()
        .map(|location| match location {
            BlockLocation::None => 0,
            BlockLocation::Location(start) | BlockLocation::SharedWith(start) => {
                span_sizes.get(start).copied().unwrap_or(0)
            }
        })
        .collect();
    Ok(sizes)
}

/// Bounds-checked view of one block (or one reaction's part of it).
///
/// Out-of-range reads become [`ScatterError::IndexOutOfRange`] naming the
/// table, the block and the reaction being parsed.
#[derive(Debug, Clone, Copy)]
pub struct TableSlice<'a> {
    table: &'a str,
    block: &'static str,
    reaction: u32,
    data: &'a [f64],
}

impl<'a> TableSlice<'a> {
    pub fn new(table: &'a str, block: &'static str, reaction: u32, data: &'a [f64]) -> Self {
        TableSlice {
            table,
            block,
            reaction,
            data,
        }
    }

    pub fn table(&self) -> &'a str {
        self.table
    }

    pub fn block(&self) -> &'static str {
        self.block
    }

    pub fn reaction(&self) -> u32 {
        self.reaction
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    pub fn out_of_range(&self, index: i64) -> ScatterError {
        ScatterError::IndexOutOfRange {
            table: self.table.to_string(),
            block: self.block,
            reaction: self.reaction,
            index,
            len: self.data.len(),
        }
    }

    pub fn get(&self, index: i64) -> ScatterResult<f64> {
        if index < 0 {
            return Err(self.out_of_range(index));
        }
        self.data
            .get(index as usize)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Integer stored at `index`
    pub fn get_int(&self, index: i64) -> ScatterResult<i64> {
        let value = self.get(index)?;
        if !value.is_finite() {
            return Err(self.out_of_range(index));
        }
        Ok(value.round() as i64)
    }

    /// Non-negative integer (a count or a locator) stored at `index`
    pub fn get_index(&self, index: i64) -> ScatterResult<usize> {
        let value = self.get_int(index)?;
        if value < 0 {
            return Err(ScatterError::IndexOutOfRange {
                table: self.table.to_string(),
                block: self.block,
                reaction: self.reaction,
                index: value,
                len: self.data.len(),
            });
        }
        Ok(value as usize)
    }

    /// `len` consecutive values starting at `start`
    pub fn values(&self, start: i64, len: usize) -> ScatterResult<Vec<f64>> {
        Ok(self.range(start, len)?.to_vec())
    }

    /// Sub-view of `len` values starting at `start`, keeping the labels
    pub fn sub_slice(&self, start: i64, len: usize) -> ScatterResult<TableSlice<'a>> {
        Ok(TableSlice {
            data: self.range(start, len)?,
            ..*self
        })
    }

    /// Same data, reported under a different MT number
    pub fn for_reaction(&self, reaction: u32) -> TableSlice<'a> {
        TableSlice { reaction, ..*self }
    }

    fn range(&self, start: i64, len: usize) -> ScatterResult<&'a [f64]> {
        if start < 0 {
            return Err(self.out_of_range(start));
        }
        let begin = start as usize;
        let end = begin
            .checked_add(len)
            .ok_or_else(|| self.out_of_range(start))?;
        if end > self.data.len() {
            return Err(self.out_of_range(end as i64 - 1));
        }
        Ok(&self.data[begin..end])
    }
}
