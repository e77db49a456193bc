// Angular distributions from the ACE AND block

use crate::ace_table::TableSlice;
use crate::angular_distribution::AngularDistribution;
use crate::error::{ScatterError, ScatterResult};
use crate::stats::OneDDistribution;

/// Number of boundaries of the 32 equiprobable cosine bins
const EQUIPROBABLE_BOUNDARIES: usize = 33;

/// Build the angular distribution of one reaction.
///
/// `and_array` is the reaction's part of the AND block, which starts at
/// `start_index` (0-based) within the full block:
///
/// ```text
/// NE | E(1..NE) | LC(1..NE) | cosine tables
/// ```
///
/// A positive LC locates 33 equiprobable bin boundaries, a negative LC a
/// tabular `JJ, NP, CSOUT, PDF, CDF` entry and zero means isotropic at that
/// energy. Locators are 1-based relative to the full AND block.
pub fn create_angular_distribution(
    and_array: &TableSlice<'_>,
    start_index: usize,
    is_cm_distribution: bool,
) -> ScatterResult<AngularDistribution> {
    let num_energies = and_array.get_index(0)?;
    if num_energies == 0 {
        return Err(ScatterError::InvalidDistribution(format!(
            "table {}: empty angular distribution for MT {}",
            and_array.table(),
            and_array.reaction()
        )));
    }
    let energies = and_array.values(1, num_energies)?;
    let locators = and_array.values(1 + num_energies as i64, num_energies)?;

    let mut table = Vec::with_capacity(num_energies);
    for (energy, locator) in energies.into_iter().zip(locators) {
        let locator = locator.round() as i64;
        let cosine_dist = if locator == 0 {
            OneDDistribution::uniform(-1.0, 1.0)?
        } else {
            let index = locator.abs() - start_index as i64 - 1;
            if locator > 0 {
                let boundaries = and_array.values(index, EQUIPROBABLE_BOUNDARIES)?;
                OneDDistribution::equiprobable_bin(boundaries)?
            } else {
                create_tabular_cosine_distribution(and_array, index)?
            }
        };
        table.push((energy, cosine_dist));
    }

    AngularDistribution::new(table, is_cm_distribution)
}

/// `JJ, NP, CSOUT(NP), PDF(NP), CDF(NP)` starting at `index`; also the
/// layout of the law 61 cosine tables in DLW
pub(crate) fn create_tabular_cosine_distribution(
    and_array: &TableSlice<'_>,
    index: i64,
) -> ScatterResult<OneDDistribution> {
    let interpolation = and_array.get_int(index)?;
    let num_points = and_array.get_index(index + 1)?;
    let cosines = and_array.values(index + 2, num_points)?;

    match interpolation {
        1 => {
            let pdf = and_array.values(index + 2 + num_points as i64, num_points.saturating_sub(1))?;
            OneDDistribution::histogram(cosines, pdf)
        }
        2 => {
            let pdf = and_array.values(index + 2 + num_points as i64, num_points)?;
            OneDDistribution::tabular(cosines, pdf)
        }
        flag => Err(ScatterError::UnknownInterpolationFlag {
            table: and_array.table().to_string(),
            block: and_array.block(),
            reaction: and_array.reaction(),
            flag,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FakeStream;

    fn equiprobable_boundaries() -> Vec<f64> {
        (0..EQUIPROBABLE_BOUNDARIES)
            .map(|i| -1.0 + 2.0 * i as f64 / 32.0)
            .collect()
    }

    #[test]
    fn test_mixed_angular_tables() {
        // offset 10 into the AND block: three energies, isotropic,
        // equiprobable and tabular
        let start = 10usize;
        let mut block = vec![3.0, 1e-11, 1.0, 20.0];
        let equiprobable_at = start + block.len() + 3;
        let tabular_at = equiprobable_at + EQUIPROBABLE_BOUNDARIES;
        block.push(0.0);
        block.push((equiprobable_at + 1) as f64);
        block.push(-((tabular_at + 1) as f64));
        block.extend(equiprobable_boundaries());
        block.extend([2.0, 3.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0]);

        let slice = TableSlice::new("test.80c", "AND", 51, &block);
        let dist = create_angular_distribution(&slice, start, true).unwrap();

        assert!(dist.is_cm_distribution());
        assert_eq!(dist.energy_grid(), &[1e-11, 1.0, 20.0]);
        assert!(matches!(
            dist.cosine_distributions()[0],
            OneDDistribution::Uniform { .. }
        ));
        assert!(matches!(
            dist.cosine_distributions()[1],
            OneDDistribution::EquiprobableBin { .. }
        ));
        assert!(matches!(
            dist.cosine_distributions()[2],
            OneDDistribution::Tabular { .. }
        ));

        // above the grid the last (tabular) table is sampled directly
        let mut stream = FakeStream::new(vec![0.999]);
        let mu = dist.sample_angle_cosine(30.0, &mut stream);
        assert!(mu > 0.9 && mu <= 1.0);
    }

    #[test]
    fn test_histogram_cosine_table() {
        let block = vec![1.0, 1.0, -4.0, 1.0, 3.0, -1.0, 0.0, 1.0, 0.25, 0.75, 0.0, 0.25, 1.0];
        let slice = TableSlice::new("test.80c", "AND", 2, &block);
        let dist = create_angular_distribution(&slice, 0, true).unwrap();
        match &dist.cosine_distributions()[0] {
            OneDDistribution::Histogram { values, .. } => assert_eq!(values, &vec![0.25, 0.75]),
            other => panic!("expected a histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_interpolation_flag() {
        let block = vec![1.0, 1.0, -4.0, 5.0, 2.0, -1.0, 1.0, 0.5, 0.5, 0.0, 1.0];
        let slice = TableSlice::new("test.80c", "AND", 2, &block);
        let result = create_angular_distribution(&slice, 0, true);
        assert!(matches!(
            result,
            Err(ScatterError::UnknownInterpolationFlag { flag: 5, reaction: 2, .. })
        ));
    }

    #[test]
    fn test_truncated_table_is_an_error() {
        let block = vec![2.0, 1.0, 2.0, 5.0];
        let slice = TableSlice::new("test.80c", "AND", 2, &block);
        assert!(matches!(
            create_angular_distribution(&slice, 0, true),
            Err(ScatterError::IndexOutOfRange { block: "AND", .. })
        ));
    }
}
