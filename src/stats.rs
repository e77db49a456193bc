// One-dimensional distributions used to build energy and cosine tables

use crate::error::{ScatterError, ScatterResult};
use crate::fast_rng::RandomSource;
use crate::utilities::{find_lower_bin_index, is_sorted_ascending};

/// Univariate distribution over an independent variable (an energy or a
/// scattering cosine).
///
/// `Histogram` and `Tabular` keep the raw tabulated values so that
/// [`OneDDistribution::evaluate`] returns the table as given, while the
/// stored CDF is normalised to one for sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum OneDDistribution {
    Uniform {
        lower: f64,
        upper: f64,
    },
    Delta {
        location: f64,
    },
    /// Bins of equal probability between consecutive boundaries
    EquiprobableBin {
        bin_boundaries: Vec<f64>,
    },
    /// Piecewise constant density, `values[i]` on `[bin_boundaries[i], bin_boundaries[i + 1])`
    Histogram {
        bin_boundaries: Vec<f64>,
        values: Vec<f64>,
        cdf: Vec<f64>,
        norm: f64,
    },
    /// Piecewise linear density through the points `(x[i], y[i])`
    Tabular {
        x: Vec<f64>,
        y: Vec<f64>,
        cdf: Vec<f64>,
        norm: f64,
    },
    Discrete {
        values: Vec<f64>,
        cdf: Vec<f64>,
    },
}

fn invalid(message: String) -> ScatterError {
    ScatterError::InvalidDistribution(message)
}

fn check_grid(kind: &str, grid: &[f64]) -> ScatterResult<()> {
    if grid.len() < 2 {
        return Err(invalid(format!("{kind} needs at least two grid points")));
    }
    if grid.iter().any(|v| !v.is_finite()) {
        return Err(invalid(format!("{kind} grid contains non-finite values")));
    }
    if !is_sorted_ascending(grid) || grid[0] >= grid[grid.len() - 1] {
        return Err(ScatterError::UnsortedGrid { what: "distribution" });
    }
    Ok(())
}

fn check_values(kind: &str, values: &[f64]) -> ScatterResult<()> {
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid(format!("{kind} values must be finite and non-negative")));
    }
    Ok(())
}

/// Normalise a running integral so that its last entry is one
fn normalise_cdf(kind: &str, mut cdf: Vec<f64>) -> ScatterResult<(Vec<f64>, f64)> {
    let norm = cdf.last().copied().unwrap_or(0.0);
    if !(norm > 0.0) || !norm.is_finite() {
        return Err(invalid(format!("{kind} does not integrate to a positive value")));
    }
    for c in cdf.iter_mut() {
        *c /= norm;
    }
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
    Ok((cdf, norm))
}

impl OneDDistribution {
    pub fn uniform(lower: f64, upper: f64) -> ScatterResult<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(invalid(format!(
                "uniform bounds [{lower}, {upper}] are not an interval"
            )));
        }
        Ok(OneDDistribution::Uniform { lower, upper })
    }

    pub fn delta(location: f64) -> Self {
        OneDDistribution::Delta { location }
    }

    pub fn equiprobable_bin(bin_boundaries: Vec<f64>) -> ScatterResult<Self> {
        check_grid("equiprobable bin", &bin_boundaries)?;
        Ok(OneDDistribution::EquiprobableBin { bin_boundaries })
    }

    pub fn histogram(bin_boundaries: Vec<f64>, values: Vec<f64>) -> ScatterResult<Self> {
        check_grid("histogram", &bin_boundaries)?;
        if values.len() != bin_boundaries.len() - 1 {
            return Err(invalid(format!(
                "histogram has {} boundaries but {} bin values",
                bin_boundaries.len(),
                values.len()
            )));
        }
        check_values("histogram", &values)?;

        let mut cdf = Vec::with_capacity(bin_boundaries.len());
        cdf.push(0.0);
        for (i, value) in values.iter().enumerate() {
            let width = bin_boundaries[i + 1] - bin_boundaries[i];
            cdf.push(cdf[i] + value * width);
        }
        let (cdf, norm) = normalise_cdf("histogram", cdf)?;

        Ok(OneDDistribution::Histogram {
            bin_boundaries,
            values,
            cdf,
            norm,
        })
    }

    pub fn tabular(x: Vec<f64>, y: Vec<f64>) -> ScatterResult<Self> {
        check_grid("tabular", &x)?;
        if x.len() != y.len() {
            return Err(invalid(format!(
                "tabular has {} grid points but {} values",
                x.len(),
                y.len()
            )));
        }
        check_values("tabular", &y)?;

        let mut cdf = Vec::with_capacity(x.len());
        cdf.push(0.0);
        for i in 0..x.len() - 1 {
            cdf.push(cdf[i] + 0.5 * (y[i] + y[i + 1]) * (x[i + 1] - x[i]));
        }
        let (cdf, norm) = normalise_cdf("tabular", cdf)?;

        Ok(OneDDistribution::Tabular { x, y, cdf, norm })
    }

    /// Discrete lines at `values` with the given (unnormalised) probabilities
    pub fn discrete(values: Vec<f64>, probabilities: Vec<f64>) -> ScatterResult<Self> {
        if values.is_empty() || values.len() != probabilities.len() {
            return Err(invalid(format!(
                "discrete distribution has {} values and {} probabilities",
                values.len(),
                probabilities.len()
            )));
        }
        if !is_sorted_ascending(&values) {
            return Err(ScatterError::UnsortedGrid { what: "discrete" });
        }
        check_values("discrete", &probabilities)?;

        let mut cdf = Vec::with_capacity(values.len());
        let mut running = 0.0;
        for p in &probabilities {
            running += p;
            cdf.push(running);
        }
        let (cdf, _) = normalise_cdf("discrete", cdf)?;

        Ok(OneDDistribution::Discrete { values, cdf })
    }

    /// Sample a value, returning it with the index of the bin (or line) it
    /// came from.
    ///
    /// A delta distribution consumes no random numbers; every other variant
    /// consumes exactly one.
    pub fn sample_with_index<R: RandomSource + ?Sized>(&self, rng: &mut R) -> (f64, usize) {
        match self {
            OneDDistribution::Uniform { lower, upper } => {
                (lower + rng.random() * (upper - lower), 0)
            }
            OneDDistribution::Delta { location } => (*location, 0),
            OneDDistribution::EquiprobableBin { bin_boundaries } => {
                let n_bins = bin_boundaries.len() - 1;
                let scaled = rng.random() * n_bins as f64;
                let bin = (scaled.floor() as usize).min(n_bins - 1);
                let fraction = scaled - bin as f64;
                let lo = bin_boundaries[bin];
                let hi = bin_boundaries[bin + 1];
                (lo + fraction * (hi - lo), bin)
            }
            OneDDistribution::Histogram {
                bin_boundaries,
                values,
                cdf,
                norm,
            } => {
                let r = rng.random();
                let bin = find_lower_bin_index(cdf, r);
                let pdf = values[bin] / norm;
                let lo = bin_boundaries[bin];
                let hi = bin_boundaries[bin + 1];
                let value = if pdf > 0.0 { lo + (r - cdf[bin]) / pdf } else { lo };
                (value.clamp(lo, hi), bin)
            }
            OneDDistribution::Tabular { x, y, cdf, norm } => {
                let r = rng.random();
                let bin = find_lower_bin_index(cdf, r);
                let x0 = x[bin];
                let x1 = x[bin + 1];
                let p0 = y[bin] / norm;
                let p1 = y[bin + 1] / norm;
                let remainder = r - cdf[bin];

                let value = if x1 <= x0 {
                    x0
                } else {
                    let slope = (p1 - p0) / (x1 - x0);
                    if slope == 0.0 {
                        if p0 > 0.0 {
                            x0 + remainder / p0
                        } else {
                            x0
                        }
                    } else {
                        let disc = (p0 * p0 + 2.0 * slope * remainder).max(0.0);
                        x0 + (disc.sqrt() - p0) / slope
                    }
                };
                (value.clamp(x0, x1), bin)
            }
            OneDDistribution::Discrete { values, cdf } => {
                let r = rng.random();
                let index = cdf
                    .iter()
                    .position(|&c| r < c)
                    .unwrap_or(values.len() - 1);
                (values[index], index)
            }
        }
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample_with_index(rng).0
    }

    /// Value of the distribution at `x`, zero outside its support.
    ///
    /// Tabulated variants return the raw table value (unnormalised).
    pub fn evaluate(&self, x: f64) -> f64 {
        if x < self.lower_bound() || x > self.upper_bound() {
            return 0.0;
        }
        match self {
            OneDDistribution::Uniform { lower, upper } => 1.0 / (upper - lower),
            OneDDistribution::Delta { location } => {
                if x == *location {
                    1.0
                } else {
                    0.0
                }
            }
            OneDDistribution::EquiprobableBin { bin_boundaries } => {
                let n_bins = bin_boundaries.len() - 1;
                let bin = find_lower_bin_index(bin_boundaries, x);
                let width = bin_boundaries[bin + 1] - bin_boundaries[bin];
                if width > 0.0 {
                    1.0 / (n_bins as f64 * width)
                } else {
                    0.0
                }
            }
            OneDDistribution::Histogram {
                bin_boundaries,
                values,
                ..
            } => values[find_lower_bin_index(bin_boundaries, x)],
            OneDDistribution::Tabular { x: grid, y, .. } => {
                let bin = find_lower_bin_index(grid, x);
                let (x0, x1) = (grid[bin], grid[bin + 1]);
                if x1 > x0 {
                    y[bin] + (x - x0) * (y[bin + 1] - y[bin]) / (x1 - x0)
                } else {
                    y[bin]
                }
            }
            OneDDistribution::Discrete { values, cdf } => values
                .iter()
                .position(|v| *v == x)
                .map(|i| if i == 0 { cdf[0] } else { cdf[i] - cdf[i - 1] })
                .unwrap_or(0.0),
        }
    }

    /// Normalised probability density at `x`
    pub fn evaluate_pdf(&self, x: f64) -> f64 {
        match self {
            OneDDistribution::Histogram { norm, .. } | OneDDistribution::Tabular { norm, .. } => {
                self.evaluate(x) / norm
            }
            _ => self.evaluate(x),
        }
    }

    pub fn lower_bound(&self) -> f64 {
        match self {
            OneDDistribution::Uniform { lower, .. } => *lower,
            OneDDistribution::Delta { location } => *location,
            OneDDistribution::EquiprobableBin { bin_boundaries }
            | OneDDistribution::Histogram { bin_boundaries, .. } => bin_boundaries[0],
            OneDDistribution::Tabular { x, .. } => x[0],
            OneDDistribution::Discrete { values, .. } => values[0],
        }
    }

    pub fn upper_bound(&self) -> f64 {
        match self {
            OneDDistribution::Uniform { upper, .. } => *upper,
            OneDDistribution::Delta { location } => *location,
            OneDDistribution::EquiprobableBin { bin_boundaries }
            | OneDDistribution::Histogram { bin_boundaries, .. } => {
                bin_boundaries[bin_boundaries.len() - 1]
            }
            OneDDistribution::Tabular { x, .. } => x[x.len() - 1],
            OneDDistribution::Discrete { values, .. } => values[values.len() - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FakeStream;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_sample() {
        let dist = OneDDistribution::uniform(-1.0, 1.0).unwrap();
        let mut stream = FakeStream::new(vec![0.5, 0.0, 0.75]);
        assert_eq!(dist.sample(&mut stream), 0.0);
        assert_eq!(dist.sample(&mut stream), -1.0);
        assert_eq!(dist.sample(&mut stream), 0.5);
        assert_eq!(dist.evaluate(0.3), 0.5);
        assert_eq!(dist.evaluate(1.5), 0.0);
    }

    #[test]
    fn test_uniform_rejects_empty_interval() {
        assert!(OneDDistribution::uniform(1.0, 1.0).is_err());
        assert!(OneDDistribution::uniform(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_delta_draws_nothing() {
        let dist = OneDDistribution::delta(2.5);
        let mut stream = FakeStream::new(vec![0.3]);
        assert_eq!(dist.sample_with_index(&mut stream), (2.5, 0));
        assert_eq!(stream.draws(), 0);
        assert_eq!(dist.lower_bound(), 2.5);
        assert_eq!(dist.upper_bound(), 2.5);
    }

    #[test]
    fn test_equiprobable_bin_sample() {
        let dist = OneDDistribution::equiprobable_bin(vec![-1.0, 0.0, 0.5, 1.0]).unwrap();
        let mut stream = FakeStream::new(vec![0.5, 0.0, 0.999999]);

        let (value, bin) = dist.sample_with_index(&mut stream);
        assert_abs_diff_eq!(value, 0.25, epsilon = 1e-12);
        assert_eq!(bin, 1);

        let (value, bin) = dist.sample_with_index(&mut stream);
        assert_eq!(value, -1.0);
        assert_eq!(bin, 0);

        let (value, bin) = dist.sample_with_index(&mut stream);
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-5);
        assert_eq!(bin, 2);
    }

    #[test]
    fn test_histogram_sample() {
        // density 1 on [0, 1) and 0.5 on [1, 3): each half of the probability
        let dist = OneDDistribution::histogram(vec![0.0, 1.0, 3.0], vec![1.0, 0.5]).unwrap();
        let mut stream = FakeStream::new(vec![0.25, 0.75]);

        let (value, bin) = dist.sample_with_index(&mut stream);
        assert_abs_diff_eq!(value, 0.5, epsilon = 1e-12);
        assert_eq!(bin, 0);

        let (value, bin) = dist.sample_with_index(&mut stream);
        assert_abs_diff_eq!(value, 2.0, epsilon = 1e-12);
        assert_eq!(bin, 1);

        assert_eq!(dist.evaluate(2.0), 0.5);
        assert_abs_diff_eq!(dist.evaluate_pdf(2.0), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_histogram_skips_empty_bins() {
        let dist =
            OneDDistribution::histogram(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 0.0, 1.0]).unwrap();
        let mut stream = FakeStream::new(vec![0.5, 0.75]);
        let (value, bin) = dist.sample_with_index(&mut stream);
        assert_eq!(bin, 2);
        assert_abs_diff_eq!(value, 2.0, epsilon = 1e-12);
        let (value, _) = dist.sample_with_index(&mut stream);
        assert_abs_diff_eq!(value, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_tabular_linear_density() {
        // pdf(x) = 2x on [0, 1] so the CDF is x^2
        let dist = OneDDistribution::tabular(vec![0.0, 1.0], vec![0.0, 2.0]).unwrap();
        let mut stream = FakeStream::new(vec![0.25, 0.81]);
        assert_abs_diff_eq!(dist.sample(&mut stream), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.sample(&mut stream), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.evaluate(0.5), 1.0, epsilon = 1e-12);
        assert_eq!(dist.evaluate(1.5), 0.0);
    }

    #[test]
    fn test_tabular_flat_density() {
        let dist = OneDDistribution::tabular(vec![0.0, 2.0], vec![3.0, 3.0]).unwrap();
        let mut stream = FakeStream::new(vec![0.5]);
        assert_abs_diff_eq!(dist.sample(&mut stream), 1.0, epsilon = 1e-12);
        assert_eq!(dist.evaluate(1.0), 3.0);
        assert_abs_diff_eq!(dist.evaluate_pdf(1.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_tabular_samples_stay_in_bounds() {
        let dist =
            OneDDistribution::tabular(vec![0.1, 0.5, 2.0, 4.0], vec![0.0, 3.0, 1.0, 0.2]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10000 {
            let (value, bin) = dist.sample_with_index(&mut rng);
            assert!((0.1..=4.0).contains(&value));
            assert!(bin < 3);
        }
    }

    #[test]
    fn test_discrete_sample() {
        let dist = OneDDistribution::discrete(vec![1.0, 2.0, 3.0], vec![0.2, 0.3, 0.5]).unwrap();
        let mut stream = FakeStream::new(vec![0.1, 0.3, 0.99]);
        assert_eq!(dist.sample_with_index(&mut stream), (1.0, 0));
        assert_eq!(dist.sample_with_index(&mut stream), (2.0, 1));
        assert_eq!(dist.sample_with_index(&mut stream), (3.0, 2));
        assert_abs_diff_eq!(dist.evaluate(2.0), 0.3, epsilon = 1e-12);
        assert_eq!(dist.evaluate(2.5), 0.0);
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(matches!(
            OneDDistribution::histogram(vec![0.0, 1.0, 2.0], vec![1.0]),
            Err(ScatterError::InvalidDistribution(_))
        ));
        assert!(matches!(
            OneDDistribution::tabular(vec![1.0, 0.0], vec![1.0, 1.0]),
            Err(ScatterError::UnsortedGrid { .. })
        ));
        assert!(matches!(
            OneDDistribution::tabular(vec![0.0, 1.0], vec![0.0, 0.0]),
            Err(ScatterError::InvalidDistribution(_))
        ));
        assert!(OneDDistribution::tabular(vec![0.0, 1.0], vec![1.0, -1.0]).is_err());
        assert!(OneDDistribution::equiprobable_bin(vec![1.0]).is_err());
        assert!(OneDDistribution::discrete(vec![2.0, 1.0], vec![0.5, 0.5]).is_err());
    }
}
