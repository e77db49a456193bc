// Energy distributions from the ACE DLW (and DNED) blocks

use crate::ace_table::TableSlice;
use crate::ace_angular_factory::create_tabular_cosine_distribution;
use crate::energy_distribution::{
    EnergyDependentParameter, EnergyDistribution, EvaporationDistribution,
    GeneralEvaporationDistribution, LevelInelasticEnergyDistribution, MaxwellFissionDistribution, TabularEnergyDistribution,
    WattDistribution,
};
use crate::error::{ScatterError, ScatterResult};
use crate::physics::FrameConversion;
use crate::scatter::ScatteringDistribution;
use crate::secondary_kalbach::{ArInterpolation, Law44ArDistribution, Law44ScatteringDistribution};
use crate::secondary_law61::{Law61AngleTable, Law61ScatteringDistribution};
use crate::stats::OneDDistribution;

/// Header of one reaction's entry in a DLW-format block.
///
/// ```text
/// LNW | LAW | IDAT | NR | ... | LDAT
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlwHeader {
    pub law: i64,
    /// 0-based index of LDAT within the reaction's slice
    pub ldat_index: i64,
}

/// Read and check the law header. Only a single law without interpolation
/// regions on its applicability range is supported.
pub fn read_dlw_header(dlw_array: &TableSlice<'_>, start_index: usize) -> ScatterResult<DlwHeader> {
    if dlw_array.get_int(0)? != 0 {
        return Err(ScatterError::MultipleLaws {
            table: dlw_array.table().to_string(),
            reaction: dlw_array.reaction(),
        });
    }
    let law = dlw_array.get_int(1)?;
    let idat = dlw_array.get_int(2)?;
    check_no_interpolation_regions(dlw_array, 3)?;

    Ok(DlwHeader {
        law,
        ldat_index: idat - start_index as i64 - 1,
    })
}

/// ACE law number of a reaction's energy distribution
pub fn determine_law(dlw_array: &TableSlice<'_>, start_index: usize) -> ScatterResult<i64> {
    Ok(read_dlw_header(dlw_array, start_index)?.law)
}

fn check_no_interpolation_regions(array: &TableSlice<'_>, index: i64) -> ScatterResult<()> {
    if array.get_int(index)? != 0 {
        return Err(ScatterError::MultipleInterpolationRegions {
            table: array.table().to_string(),
            block: array.block(),
            reaction: array.reaction(),
        });
    }
    Ok(())
}

fn unknown_flag(array: &TableSlice<'_>, flag: i64) -> ScatterError {
    ScatterError::UnknownInterpolationFlag {
        table: array.table().to_string(),
        block: array.block(),
        reaction: array.reaction(),
        flag,
    }
}

/// Build the uncoupled energy distribution of one reaction.
///
/// `dlw_array` is the reaction's part of the block, which starts at
/// `start_index` (0-based) within the full block. Coupled energy-angle laws
/// are built by [`create_coupled_distribution`] instead.
pub fn create_energy_distribution(
    dlw_array: &TableSlice<'_>,
    start_index: usize,
) -> ScatterResult<EnergyDistribution> {
    let header = read_dlw_header(dlw_array, start_index)?;
    let ldat = header.ldat_index;

    match header.law {
        1 => create_law1_distribution(dlw_array, ldat),
        3 => {
            let param_a = dlw_array.get(ldat)?;
            let param_b = dlw_array.get(ldat + 1)?;
            Ok(EnergyDistribution::LevelInelastic(
                LevelInelasticEnergyDistribution::new(param_a, param_b),
            ))
        }
        4 => create_law4_distribution(dlw_array, ldat, start_index),
        5 => create_law5_distribution(dlw_array, ldat),
        7 => {
            let (theta, restriction_energy) = read_spectrum_parameter(dlw_array, ldat)?;
            Ok(EnergyDistribution::MaxwellFission(MaxwellFissionDistribution::new(
                theta,
                restriction_energy,
            )))
        }
        9 => {
            let (theta, restriction_energy) = read_spectrum_parameter(dlw_array, ldat)?;
            Ok(EnergyDistribution::Evaporation(EvaporationDistribution::new(
                theta,
                restriction_energy,
            )))
        }
        11 => create_law11_distribution(dlw_array, ldat),
        law => Err(ScatterError::UnsupportedLaw {
            table: dlw_array.table().to_string(),
            reaction: dlw_array.reaction(),
            law,
        }),
    }
}

/// Law 1: `NR | NE | E(NE) | NET | Eout(NET) for each E`
fn create_law1_distribution(dlw_array: &TableSlice<'_>, ldat: i64) -> ScatterResult<EnergyDistribution> {
    check_no_interpolation_regions(dlw_array, ldat)?;
    let num_energies = dlw_array.get_index(ldat + 1)?;
    let energies = dlw_array.values(ldat + 2, num_energies)?;
    let num_bounds = dlw_array.get_index(ldat + 2 + num_energies as i64)?;
    let bounds_start = ldat + 3 + num_energies as i64;

    let mut table = Vec::with_capacity(num_energies);
    for (i, energy) in energies.into_iter().enumerate() {
        let bounds = dlw_array.values(bounds_start + (i * num_bounds) as i64, num_bounds)?;
        table.push((energy, OneDDistribution::equiprobable_bin(bounds)?));
    }
    Ok(EnergyDistribution::EquiprobableBins(TabularEnergyDistribution::new(table)?))
}

/// Law 4: `NR | NE | E(NE) | L(NE)`, each L locating `INTT | NP | Eout | PDF | CDF`
fn create_law4_distribution(
    dlw_array: &TableSlice<'_>,
    ldat: i64,
    start_index: usize,
) -> ScatterResult<EnergyDistribution> {
    let (energies, locations) = read_locator_table(dlw_array, ldat, start_index)?;

    let mut table = Vec::with_capacity(energies.len());
    for (energy, index) in energies.into_iter().zip(locations) {
        table.push((energy, create_outgoing_distribution(dlw_array, index)?));
    }
    Ok(EnergyDistribution::Tabular(TabularEnergyDistribution::new(table)?))
}

/// Incident energies and the 0-based slice indices of their tables
fn read_locator_table(
    dlw_array: &TableSlice<'_>,
    ldat: i64,
    start_index: usize,
) -> ScatterResult<(Vec<f64>, Vec<i64>)> {
    check_no_interpolation_regions(dlw_array, ldat)?;
    let num_energies = dlw_array.get_index(ldat + 1)?;
    let energies = dlw_array.values(ldat + 2, num_energies)?;
    let locations = dlw_array
        .values(ldat + 2 + num_energies as i64, num_energies)?
        .into_iter()
        .map(|l| l.round() as i64 - start_index as i64 - 1)
        .collect();
    Ok((energies, locations))
}

/// One law 4 outgoing energy table starting at `index`.
///
/// INTT = 1 is a histogram, 2 lin-lin, and `10 * ND + INTT` with `ND = NP`
/// a set of discrete lines. Mixed discrete and continuous spectra are
/// rejected.
fn create_outgoing_distribution(dlw_array: &TableSlice<'_>, index: i64) -> ScatterResult<OneDDistribution> {
    let flag = dlw_array.get_int(index)?;
    let num_points = dlw_array.get_index(index + 1)?;
    let np = num_points as i64;
    let energies = dlw_array.values(index + 2, num_points)?;

    match flag {
        1 => OneDDistribution::histogram(
            energies,
            dlw_array.values(index + 2 + np, num_points.saturating_sub(1))?,
        ),
        2 => OneDDistribution::tabular(energies, dlw_array.values(index + 2 + np, num_points)?),
        3..=9 => Err(ScatterError::DiscreteLinesNotSupported {
            table: dlw_array.table().to_string(),
            reaction: dlw_array.reaction(),
        }),
        flag if flag >= 10 => {
            if flag / 10 != np {
                return Err(ScatterError::DiscreteLinesNotSupported {
                    table: dlw_array.table().to_string(),
                    reaction: dlw_array.reaction(),
                });
            }
            if num_points == 1 {
                return Ok(OneDDistribution::delta(energies[0]));
            }
            let cdf = dlw_array.values(index + 2 + 2 * np, num_points)?;
            create_discrete_lines(energies, &cdf)
        }
        flag => Err(unknown_flag(dlw_array, flag)),
    }
}

/// Discrete lines from their tabulated CDF. Newer evaluations list the
/// lines in descending energy order.
fn create_discrete_lines(mut energies: Vec<f64>, cdf: &[f64]) -> ScatterResult<OneDDistribution> {
    let mut probabilities: Vec<f64> = cdf
        .iter()
        .scan(0.0, |previous, c| {
            let p = c - *previous;
            *previous = *c;
            Some(p.max(0.0))
        })
        .collect();
    if energies.first() > energies.last() {
        energies.reverse();
        probabilities.reverse();
    }
    OneDDistribution::discrete(energies, probabilities)
}

/// Law 5: `NR | NE | E(NE) | theta(NE) | NET | X(NET)`
fn create_law5_distribution(dlw_array: &TableSlice<'_>, ldat: i64) -> ScatterResult<EnergyDistribution> {
    check_no_interpolation_regions(dlw_array, ldat)?;
    let num_energies = dlw_array.get_index(ldat + 1)?;
    let ne = num_energies as i64;
    let theta = EnergyDependentParameter::new(
        dlw_array.values(ldat + 2, num_energies)?,
        dlw_array.values(ldat + 2 + ne, num_energies)?,
    )?;
    let num_x = dlw_array.get_index(ldat + 2 + 2 * ne)?;
    let x_values = dlw_array.values(ldat + 3 + 2 * ne, num_x)?;
    Ok(EnergyDistribution::GeneralEvaporation(GeneralEvaporationDistribution::new(
        theta, x_values,
    )?))
}

/// Laws 7 and 9: `NR | NE | E(NE) | theta(NE) | U`
fn read_spectrum_parameter(
    dlw_array: &TableSlice<'_>,
    ldat: i64,
) -> ScatterResult<(EnergyDependentParameter, f64)> {
    check_no_interpolation_regions(dlw_array, ldat)?;
    let num_energies = dlw_array.get_index(ldat + 1)?;
    let ne = num_energies as i64;
    let energies = dlw_array.values(ldat + 2, num_energies)?;
    let theta = dlw_array.values(ldat + 2 + ne, num_energies)?;
    let restriction_energy = dlw_array.get(ldat + 2 + 2 * ne)?;
    Ok((EnergyDependentParameter::new(energies, theta)?, restriction_energy))
}

/// Law 11: `NR | NE | E | a(E) | NR | NE | E | b(E) | U`
fn create_law11_distribution(dlw_array: &TableSlice<'_>, ldat: i64) -> ScatterResult<EnergyDistribution> {
    check_no_interpolation_regions(dlw_array, ldat)?;
    let num_a = dlw_array.get_index(ldat + 1)?;
    let na = num_a as i64;
    let a = EnergyDependentParameter::new(
        dlw_array.values(ldat + 2, num_a)?,
        dlw_array.values(ldat + 2 + na, num_a)?,
    )?;

    let b_start = ldat + 2 + 2 * na;
    check_no_interpolation_regions(dlw_array, b_start)?;
    let num_b = dlw_array.get_index(b_start + 1)?;
    let nb = num_b as i64;
    let b = EnergyDependentParameter::new(
        dlw_array.values(b_start + 2, num_b)?,
        dlw_array.values(b_start + 2 + nb, num_b)?,
    )?;

    let restriction_energy = dlw_array.get(b_start + 2 + 2 * nb)?;
    Ok(EnergyDistribution::Watt(WattDistribution::new(a, b, restriction_energy)))
}

/// Build the correlated energy-angle distribution of a reaction whose
/// angular data lives in its DLW entry (law 44 or law 61).
pub fn create_coupled_distribution(
    dlw_array: &TableSlice<'_>,
    start_index: usize,
    atomic_weight_ratio: f64,
    frame: FrameConversion,
) -> ScatterResult<ScatteringDistribution> {
    match determine_law(dlw_array, start_index)? {
        44 => Ok(ScatteringDistribution::Law44(create_law44_distribution(
            dlw_array,
            start_index,
            atomic_weight_ratio,
            frame,
        )?)),
        61 => Ok(ScatteringDistribution::Law61(create_law61_distribution(
            dlw_array,
            start_index,
            atomic_weight_ratio,
            frame,
        )?)),
        law => Err(ScatterError::UnsupportedLaw {
            table: dlw_array.table().to_string(),
            reaction: dlw_array.reaction(),
            law,
        }),
    }
}

/// Incident energies and table locations of a coupled law, after checking
/// the header names `expected_law`
fn read_coupled_header(
    dlw_array: &TableSlice<'_>,
    start_index: usize,
    expected_law: i64,
) -> ScatterResult<(Vec<f64>, Vec<i64>)> {
    let header = read_dlw_header(dlw_array, start_index)?;
    if header.law != expected_law {
        return Err(ScatterError::UnsupportedLaw {
            table: dlw_array.table().to_string(),
            reaction: dlw_array.reaction(),
            law: header.law,
        });
    }
    read_locator_table(dlw_array, header.ldat_index, start_index)
}

/// `INTT | NP | Eout(NP) | PDF(NP) | CDF(NP)` at `index`, shared by the
/// coupled laws. Returns the outgoing grid, its distribution and how the
/// per-point angular data is interpolated.
fn create_coupled_outgoing_table(
    dlw_array: &TableSlice<'_>,
    index: i64,
) -> ScatterResult<(Vec<f64>, OneDDistribution, ArInterpolation)> {
    let flag = dlw_array.get_int(index)?;
    let num_points = dlw_array.get_index(index + 1)?;
    let np = num_points as i64;
    let outgoing = dlw_array.values(index + 2, num_points)?;

    match flag {
        1 => {
            let pdf = dlw_array.values(index + 2 + np, num_points.saturating_sub(1))?;
            let dist = OneDDistribution::histogram(outgoing.clone(), pdf)?;
            Ok((outgoing, dist, ArInterpolation::Histogram))
        }
        2 => {
            let pdf = dlw_array.values(index + 2 + np, num_points)?;
            let dist = OneDDistribution::tabular(outgoing.clone(), pdf)?;
            Ok((outgoing, dist, ArInterpolation::LinLin))
        }
        // 10 * ND + INTT with ND discrete lines ahead of the continuum
        flag if flag >= 10 => Err(ScatterError::DiscreteLinesNotSupported {
            table: dlw_array.table().to_string(),
            reaction: dlw_array.reaction(),
        }),
        flag => Err(unknown_flag(dlw_array, flag)),
    }
}

/// Build a Kalbach-Mann (law 44) correlated distribution.
///
/// Each incident energy locates `INTT | NP | Eout | PDF | CDF | R | A`;
/// only histogram and lin-lin tables are supported.
pub fn create_law44_distribution(
    dlw_array: &TableSlice<'_>,
    start_index: usize,
    atomic_weight_ratio: f64,
    frame: FrameConversion,
) -> ScatterResult<Law44ScatteringDistribution> {
    let (energies, locations) = read_coupled_header(dlw_array, start_index, 44)?;

    let mut energy_table = Vec::with_capacity(energies.len());
    let mut ar_distributions = Vec::with_capacity(energies.len());
    for (energy, index) in energies.into_iter().zip(locations) {
        let (outgoing, energy_dist, interpolation) = create_coupled_outgoing_table(dlw_array, index)?;
        let np = outgoing.len() as i64;
        let r_values = dlw_array.values(index + 2 + 3 * np, outgoing.len())?;
        let a_values = dlw_array.values(index + 2 + 4 * np, outgoing.len())?;

        energy_table.push((energy, energy_dist));
        ar_distributions.push(Law44ArDistribution::new(
            outgoing,
            a_values,
            r_values,
            interpolation,
        )?);
    }

    Law44ScatteringDistribution::new(
        atomic_weight_ratio,
        TabularEnergyDistribution::new(energy_table)?,
        ar_distributions,
        frame,
    )
}

/// Build a tabular correlated (law 61) distribution.
///
/// Each incident energy locates `INTT | NP | Eout | PDF | CDF | LC`, and
/// every nonzero LC locates a `JJ | NP | CSOUT | PDF | CDF` cosine table.
/// LC = 0 means isotropic at that outgoing energy.
pub fn create_law61_distribution(
    dlw_array: &TableSlice<'_>,
    start_index: usize,
    atomic_weight_ratio: f64,
    frame: FrameConversion,
) -> ScatterResult<Law61ScatteringDistribution> {
    let (energies, locations) = read_coupled_header(dlw_array, start_index, 61)?;

    let mut energy_table = Vec::with_capacity(energies.len());
    let mut angle_tables = Vec::with_capacity(energies.len());
    for (energy, index) in energies.into_iter().zip(locations) {
        let (outgoing, energy_dist, interpolation) = create_coupled_outgoing_table(dlw_array, index)?;
        let np = outgoing.len() as i64;

        let mut cosine_distributions = Vec::with_capacity(outgoing.len());
        for locator in dlw_array.values(index + 2 + 3 * np, outgoing.len())? {
            let locator = locator.round() as i64;
            let cosines = if locator == 0 {
                OneDDistribution::uniform(-1.0, 1.0)?
            } else {
                create_tabular_cosine_distribution(dlw_array, locator - start_index as i64 - 1)?
            };
            cosine_distributions.push(cosines);
        }

        energy_table.push((energy, energy_dist));
        angle_tables.push(Law61AngleTable::new(outgoing, cosine_distributions, interpolation)?);
    }

    Law61ScatteringDistribution::new(
        atomic_weight_ratio,
        TabularEnergyDistribution::new(energy_table)?,
        angle_tables,
        frame,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FakeStream;
    use approx::assert_relative_eq;

    /// DLW entry starting at `start` with LDAT right after the header
    fn dlw_entry(start: usize, law: f64, ldat: &[f64]) -> Vec<f64> {
        let idat = (start + 4 + 1) as f64;
        let mut block = vec![0.0, law, idat, 0.0];
        block.extend_from_slice(ldat);
        block
    }

    #[test]
    fn test_law3_reads_raw_parameters() {
        let block = dlw_entry(20, 3.0, &[1.0, 0.5]);
        let slice = TableSlice::new("test.80c", "DLW", 51, &block);
        let dist = create_energy_distribution(&slice, 20).unwrap();
        assert_eq!(dist.law(), 3);
        let mut stream = FakeStream::new(vec![0.5]);
        assert_eq!(dist.sample_energy(3.0, &mut stream), 1.0);
        assert_eq!(dist.sample_energy(5.0, &mut stream), 2.0);
        assert_eq!(stream.draws(), 0);
    }

    #[test]
    fn test_law1_equiprobable_bins() {
        let ldat = [0.0, 2.0, 1.0, 10.0, 3.0, 0.0, 0.5, 1.0, 0.0, 1.0, 2.0];
        let block = dlw_entry(0, 1.0, &ldat);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        let dist = create_energy_distribution(&slice, 0).unwrap();
        assert_eq!(dist.law(), 1);

        // at the lowest grid energy only the first table contributes
        let mut stream = FakeStream::new(vec![0.75]);
        let energy = dist.sample_energy(1.0, &mut stream);
        assert!((0.5..=1.0).contains(&energy));
    }

    fn law4_block(start: usize, intt: f64) -> Vec<f64> {
        // LDAT: NR, NE=1, E, L, then INTT NP Eout PDF CDF
        let table_at = start + 4 + 4;
        let ldat = [
            0.0,
            1.0,
            1.0,
            (table_at + 1) as f64,
            intt,
            3.0,
            0.0,
            1.0,
            2.0,
            0.5,
            0.5,
            0.0,
            0.0,
            0.5,
            1.0,
        ];
        dlw_entry(start, 4.0, &ldat)
    }

    #[test]
    fn test_law4_interpolation_flags() {
        let block = law4_block(7, 2.0);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        match create_energy_distribution(&slice, 7).unwrap() {
            EnergyDistribution::Tabular(table) => assert!(matches!(
                table.outgoing_distributions()[0],
                OneDDistribution::Tabular { .. }
            )),
            other => panic!("unexpected distribution {other:?}"),
        }

        let block = law4_block(7, 1.0);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        match create_energy_distribution(&slice, 7).unwrap() {
            EnergyDistribution::Tabular(table) => assert!(matches!(
                table.outgoing_distributions()[0],
                OneDDistribution::Histogram { .. }
            )),
            other => panic!("unexpected distribution {other:?}"),
        }

        let block = law4_block(7, 5.0);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        assert!(matches!(
            create_energy_distribution(&slice, 7),
            Err(ScatterError::DiscreteLinesNotSupported { reaction: 16, .. })
        ));

        let block = law4_block(7, 0.0);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        assert!(matches!(
            create_energy_distribution(&slice, 7),
            Err(ScatterError::UnknownInterpolationFlag { flag: 0, .. })
        ));
    }

    #[test]
    fn test_law4_descending_discrete_lines() {
        // three lines listed high to low with CDF 0.2, 0.5, 1.0
        let ldat = [
            0.0, 1.0, 1.0, 9.0, 32.0, 3.0, 3.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.2, 0.5, 1.0,
        ];
        let block = dlw_entry(0, 4.0, &ldat);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        let dist = create_energy_distribution(&slice, 0).unwrap();
        let table = match dist {
            EnergyDistribution::Tabular(table) => table,
            other => panic!("unexpected distribution {other:?}"),
        };
        match &table.outgoing_distributions()[0] {
            OneDDistribution::Discrete { values, cdf } => {
                assert_eq!(values, &vec![1.0, 2.0, 3.0]);
                assert_relative_eq!(cdf[0], 0.5, max_relative = 1e-12);
                assert_relative_eq!(cdf[1], 0.8, max_relative = 1e-12);
                assert_eq!(cdf[2], 1.0);
            }
            other => panic!("expected discrete lines, got {other:?}"),
        }
    }

    #[test]
    fn test_single_discrete_line_is_a_delta() {
        let ldat = [0.0, 1.0, 1.0, 9.0, 11.0, 1.0, 0.7, 0.0, 1.0];
        let block = dlw_entry(0, 4.0, &ldat);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        let mut stream = FakeStream::new(vec![0.3]);
        let dist = create_energy_distribution(&slice, 0).unwrap();
        assert_eq!(dist.sample_energy(2.0, &mut stream), 0.7);
    }

    #[test]
    fn test_spectrum_laws() {
        // law 9 with theta = 1 MeV and U = 0.5 MeV
        let block = dlw_entry(0, 9.0, &[0.0, 2.0, 1.0, 20.0, 1.0, 1.0, 0.5]);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);
        let dist = create_energy_distribution(&slice, 0).unwrap();
        assert_eq!(dist.law(), 9);

        let block = dlw_entry(0, 7.0, &[0.0, 1.0, 1.0, 1.3, -5.0]);
        let slice = TableSlice::new("test.80c", "DLW", 18, &block);
        assert_eq!(create_energy_distribution(&slice, 0).unwrap().law(), 7);

        let watt = [0.0, 1.0, 1.0, 0.988, 0.0, 1.0, 1.0, 2.249, -5.0];
        let block = dlw_entry(0, 11.0, &watt);
        let slice = TableSlice::new("test.80c", "DLW", 18, &block);
        assert_eq!(create_energy_distribution(&slice, 0).unwrap().law(), 11);
    }

    #[test]
    fn test_law5_general_evaporation() {
        // theta rises from 1 to 2 MeV; X in two equiprobable bins
        let ldat = [0.0, 2.0, 1.0, 3.0, 1.0, 2.0, 3.0, 0.0, 1.0, 4.0];
        let block = dlw_entry(0, 5.0, &ldat);
        let slice = TableSlice::new("test.80c", "DLW", 91, &block);
        let dist = create_energy_distribution(&slice, 0).unwrap();
        assert_eq!(dist.law(), 5);
        let mut stream = FakeStream::new(vec![0.75]);
        assert_relative_eq!(dist.sample_energy(2.0, &mut stream), 3.75, max_relative = 1e-12);

        let truncated = dlw_entry(0, 5.0, &ldat[..8]);
        let slice = TableSlice::new("test.80c", "DLW", 91, &truncated);
        assert!(matches!(
            create_energy_distribution(&slice, 0),
            Err(ScatterError::IndexOutOfRange { .. })
        ));
    }

    /// Law 61 entry at `start`: one incident energy, a histogram outgoing
    /// table on [0, 2] whose first point has a histogram cosine table on
    /// [0.5, 1] and whose second point is isotropic.
    fn law61_block(start: usize) -> Vec<f64> {
        let table_at = start + 8 + 1;
        let cosines_at = start + 18 + 1;
        let ldat = [
            0.0, 1.0, 1.0, table_at as f64,
            1.0, 2.0, 0.0, 2.0, 0.5, 0.0, 0.0, 1.0, cosines_at as f64, 0.0,
            1.0, 2.0, 0.5, 1.0, 2.0, 0.0, 0.0, 1.0,
        ];
        dlw_entry(start, 61.0, &ldat)
    }

    #[test]
    fn test_law61_distribution() {
        let start = 2usize;
        let block = law61_block(start);
        let slice = TableSlice::new("test.80c", "DLW", 91, &block);

        let dist = create_law61_distribution(&slice, start, 8.93, FrameConversion::Lab).unwrap();
        let angles = &dist.angle_tables()[0];
        assert_eq!(angles.interpolation(), ArInterpolation::Histogram);
        assert!(matches!(angles.cosine_distributions()[0], OneDDistribution::Histogram { .. }));
        assert!(matches!(angles.cosine_distributions()[1], OneDDistribution::Uniform { .. }));

        // E' = 0.5 in bin 0, cosine from the [0.5, 1] table
        let mut stream = FakeStream::new(vec![0.25, 0.5]);
        let (sample, mu) = dist.sample_energy_and_angle(1.0, &mut stream);
        assert_relative_eq!(sample.energy, 0.5, max_relative = 1e-12);
        assert_relative_eq!(mu, 0.75, max_relative = 1e-12);

        let mut bad = block.clone();
        bad[18] = 3.0;
        let slice = TableSlice::new("test.80c", "DLW", 91, &bad);
        assert!(matches!(
            create_law61_distribution(&slice, start, 8.93, FrameConversion::Lab),
            Err(ScatterError::UnknownInterpolationFlag { flag: 3, .. })
        ));
    }

    #[test]
    fn test_coupled_dispatch() {
        let block = law61_block(0);
        let slice = TableSlice::new("test.80c", "DLW", 91, &block);
        let dist = create_coupled_distribution(&slice, 0, 8.93, FrameConversion::CenterOfMass).unwrap();
        assert!(matches!(dist, ScatteringDistribution::Law61(_)));

        let block = dlw_entry(0, 4.0, &[0.0, 1.0, 1.0, 9.0, 11.0, 1.0, 0.7, 0.0, 1.0]);
        let slice = TableSlice::new("test.80c", "DLW", 91, &block);
        assert!(matches!(
            create_coupled_distribution(&slice, 0, 8.93, FrameConversion::Lab),
            Err(ScatterError::UnsupportedLaw { law: 4, .. })
        ));
    }

    #[test]
    fn test_header_errors() {
        let mut block = dlw_entry(0, 3.0, &[1.0, 0.5]);
        block[0] = 12.0;
        let slice = TableSlice::new("test.80c", "DLW", 51, &block);
        assert!(matches!(
            create_energy_distribution(&slice, 0),
            Err(ScatterError::MultipleLaws { reaction: 51, .. })
        ));

        let mut block = dlw_entry(0, 3.0, &[1.0, 0.5]);
        block[3] = 1.0;
        let slice = TableSlice::new("test.80c", "DLW", 51, &block);
        assert!(matches!(
            create_energy_distribution(&slice, 0),
            Err(ScatterError::MultipleInterpolationRegions { block: "DLW", .. })
        ));

        let block = dlw_entry(0, 66.0, &[1.0, 0.5]);
        let slice = TableSlice::new("test.80c", "DLW", 51, &block);
        assert!(matches!(
            create_energy_distribution(&slice, 0),
            Err(ScatterError::UnsupportedLaw { law: 66, .. })
        ));
    }

    #[test]
    fn test_law44_distribution() {
        // NE = 2, each with a two point lin-lin table
        let start = 3usize;
        let first = start + 4 + 6;
        let second = first + 12;
        let mut ldat = vec![0.0, 2.0, 1.0, 20.0, (first + 1) as f64, (second + 1) as f64];
        for _ in 0..2 {
            ldat.extend([2.0, 2.0, 0.0, 10.0, 0.1, 0.1, 0.0, 1.0, 0.2, 0.4, 1.0, 3.0]);
        }
        let block = dlw_entry(start, 44.0, &ldat);
        let slice = TableSlice::new("test.80c", "DLW", 16, &block);

        assert_eq!(determine_law(&slice, start).unwrap(), 44);
        let dist =
            create_law44_distribution(&slice, start, 8.93, FrameConversion::CenterOfMass).unwrap();
        assert_eq!(dist.energy_distribution().energy_grid(), &[1.0, 20.0]);
        assert!(dist.frame().is_center_of_mass());

        // 10 + INTT marks discrete lines; a zero INTT is still a line table
        for flag in [10.0, 12.0] {
            let mut lines = ldat.clone();
            lines[6] = flag;
            let block = dlw_entry(start, 44.0, &lines);
            let slice = TableSlice::new("test.80c", "DLW", 16, &block);
            assert!(matches!(
                create_law44_distribution(&slice, start, 8.93, FrameConversion::Lab),
                Err(ScatterError::DiscreteLinesNotSupported { reaction: 16, .. })
            ));
        }

        let law4 = dlw_entry(start, 4.0, &ldat);
        let slice = TableSlice::new("test.80c", "DLW", 16, &law4);
        assert!(matches!(
            create_law44_distribution(&slice, start, 8.93, FrameConversion::Lab),
            Err(ScatterError::UnsupportedLaw { law: 4, .. })
        ));
    }
}
