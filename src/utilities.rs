// Grid searching and interpolation helpers

/// Index `i` of the grid bin holding `x`, so that `grid[i] <= x < grid[i + 1]`.
///
/// Values below the grid map to bin 0 and values at or above the last point
/// map to the last bin (`grid.len() - 2`). The grid needs at least two points.
pub fn find_lower_bin_index(grid: &[f64], x: f64) -> usize {
    debug_assert!(grid.len() >= 2);
    let last_bin = grid.len() - 2;
    if x <= grid[0] {
        return 0;
    }
    if x >= grid[grid.len() - 1] {
        return last_bin;
    }

    // invariant: grid[low] <= x < grid[high]
    let mut low = 0usize;
    let mut high = grid.len() - 1;
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if grid[mid] <= x {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// Linear interpolation of tabulated `y(x)`.
///
/// Outside the tabulated range the end values are returned.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    if x.len() == 1 {
        return y[0];
    }
    if x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[x.len() - 1] {
        return y[y.len() - 1];
    }

    let idx = find_lower_bin_index(x, x_new);
    let x1 = x[idx];
    let x2 = x[idx + 1];
    let y1 = y[idx];
    let y2 = y[idx + 1];
    y1 + (x_new - x1) * (y2 - y1) / (x2 - x1)
}

/// True when the values never decrease
pub fn is_sorted_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// True when every value is strictly larger than the previous one
pub fn is_strictly_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_lower_bin_index() {
        let grid = [1.0, 2.0, 4.0, 8.0];
        assert_eq!(find_lower_bin_index(&grid, 0.5), 0);
        assert_eq!(find_lower_bin_index(&grid, 1.0), 0);
        assert_eq!(find_lower_bin_index(&grid, 1.5), 0);
        assert_eq!(find_lower_bin_index(&grid, 2.0), 1);
        assert_eq!(find_lower_bin_index(&grid, 7.9), 2);
        assert_eq!(find_lower_bin_index(&grid, 8.0), 2);
        assert_eq!(find_lower_bin_index(&grid, 100.0), 2);
    }

    #[test]
    fn test_interpolate_linear() {
        let x = [0.0, 1.0, 3.0];
        let y = [0.0, 10.0, 30.0];
        assert_eq!(interpolate_linear(&x, &y, 0.5), 5.0);
        assert_eq!(interpolate_linear(&x, &y, 2.0), 20.0);
        assert_eq!(interpolate_linear(&x, &y, -1.0), 0.0);
        assert_eq!(interpolate_linear(&x, &y, 5.0), 30.0);
        assert_eq!(interpolate_linear(&[2.0], &[7.0], 100.0), 7.0);
        assert!(interpolate_linear(&[], &[], 1.0).is_nan());
    }

    #[test]
    fn test_sorted_checks() {
        assert!(is_sorted_ascending(&[1.0, 1.0, 2.0]));
        assert!(!is_strictly_ascending(&[1.0, 1.0, 2.0]));
        assert!(is_strictly_ascending(&[1.0, 2.0]));
        assert!(!is_sorted_ascending(&[2.0, 1.0]));
        assert!(is_strictly_ascending(&[]));
    }
}
