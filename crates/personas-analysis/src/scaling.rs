//! Per-dimension standardization to zero mean and unit variance.

/// Fitted column statistics. Scale uses the population standard deviation;
/// a zero-variance column keeps a scale of 1 so it standardizes to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler<const D: usize> {
    pub mean: [f64; D],
    pub scale: [f64; D],
}

impl<const D: usize> StandardScaler<D> {
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit(rows: &[[f64; D]]) -> Self {
        let mut mean = [0.0; D];
        let mut scale = [1.0; D];
        if rows.is_empty() {
            return Self { mean, scale };
        }
        let n = rows.len() as f64;

        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = [0.0; D];
        for row in rows {
            for d in 0..D {
                var[d] += (row[d] - mean[d]).powi(2);
            }
        }
        for d in 0..D {
            let std = (var[d] / n).sqrt();
            if std > f64::EPSILON {
                scale[d] = std;
            }
        }

        Self { mean, scale }
    }

    #[must_use]
    pub fn transform(&self, rows: &[[f64; D]]) -> Vec<[f64; D]> {
        rows.iter()
            .map(|row| std::array::from_fn(|d| (row[d] - self.mean[d]) / self.scale[d]))
            .collect()
    }
}

/// Fit a scaler on `rows` and return the standardized rows.
#[must_use]
pub fn standardize<const D: usize>(rows: &[[f64; D]]) -> Vec<[f64; D]> {
    StandardScaler::fit(rows).transform(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardized_columns_have_zero_mean_unit_variance() {
        let rows = [[1.0, 10.0], [2.0, 20.0], [3.0, 60.0], [6.0, 30.0]];
        let scaled = standardize(&rows);
        for d in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[d]).sum::<f64>() / 4.0;
            let var: f64 = scaled.iter().map(|r| (r[d] - mean).powi(2)).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-12, "column {d} mean {mean}");
            assert!((var - 1.0).abs() < 1e-12, "column {d} variance {var}");
        }
    }

    #[test]
    fn constant_column_standardizes_to_zero() {
        let rows = [[0.5, 1.0], [0.5, 2.0], [0.5, 3.0]];
        let scaled = standardize(&rows);
        assert!(scaled.iter().all(|r| r[0] == 0.0));
    }

    #[test]
    fn empty_input_stays_empty() {
        let rows: [[f64; 3]; 0] = [];
        assert!(standardize(&rows).is_empty());
    }
}
