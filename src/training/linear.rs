//! Linear model implementations

use ndarray::{Array1, Array2, Axis};

use crate::error::TrainingError;

use super::candidates::Estimator;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Column-wise standardization fitted on training rows. Constant columns
/// get a unit scale so they map to zero.
#[derive(Debug, Clone)]
struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Standardizer {
    fn fit(x: &Array2<f64>) -> Self {
        let mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 1e-12 { s } else { 1.0 });
        Self { mean, scale }
    }

    /// Standardize and prepend a bias column of ones.
    fn transform_with_bias(&self, x: &Array2<f64>) -> Array2<f64> {
        let z = (x - &self.mean) / &self.scale;
        Array2::from_shape_fn((x.nrows(), x.ncols() + 1), |(i, j)| {
            if j == 0 {
                1.0
            } else {
                z[[i, j - 1]]
            }
        })
    }
}

fn check_finite(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
    if x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(TrainingError::NonFinite("training data"))
    }
}

/// Solve `a · w = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, TrainingError> {
    let n = b.len();
    let tolerance = 1e-12 * a.diag().iter().fold(1.0_f64, |m, v| m.max(v.abs()));

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot, col]].abs() <= tolerance {
            return Err(TrainingError::Singular);
        }
        if pivot != col {
            for k in 0..n {
                a.swap([pivot, k], [col, k]);
            }
            b.swap(pivot, col);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut w = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[[i, j]] * w[j];
        }
        w[i] = sum / a[[i, i]];
    }
    Ok(w)
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

/// Least squares with a small ridge penalty, solved from the normal equations.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    ridge: f64,
    scaler: Option<Standardizer>,
    weights: Option<Array1<f64>>,
}

impl LinearRegression {
    pub fn new(ridge: f64) -> Self {
        Self {
            ridge,
            scaler: None,
            weights: None,
        }
    }
}

impl Estimator for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
        check_finite(x, y)?;
        let scaler = Standardizer::fit(x);
        let xb = scaler.transform_with_bias(x);

        let mut gram = xb.t().dot(&xb);
        // No penalty on the intercept.
        for k in 1..gram.nrows() {
            gram[[k, k]] += self.ridge * x.nrows() as f64;
        }
        let rhs = xb.t().dot(y);

        self.weights = Some(solve(gram, rhs)?);
        self.scaler = Some(scaler);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        let (Some(scaler), Some(w)) = (&self.scaler, &self.weights) else {
            return Err(TrainingError::NotFitted);
        };
        Ok(scaler.transform_with_bias(x).dot(w))
    }
}

// ---------------------------------------------------------------------------
// Logistic regression
// ---------------------------------------------------------------------------

/// Multinomial (softmax) logistic regression fitted by batch gradient
/// descent with an L2 penalty. Predicts class indices.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    n_classes: usize,
    max_iter: usize,
    learning_rate: f64,
    ridge: f64,
    scaler: Option<Standardizer>,
    /// (n_features + 1) × n_classes, bias in row 0.
    weights: Option<Array2<f64>>,
}

impl LogisticRegression {
    pub fn new(n_classes: usize, max_iter: usize, learning_rate: f64, ridge: f64) -> Self {
        Self {
            n_classes,
            max_iter,
            learning_rate,
            ridge,
            scaler: None,
            weights: None,
        }
    }

    fn probabilities(xb: &Array2<f64>, w: &Array2<f64>) -> Array2<f64> {
        let mut p = xb.dot(w);
        for mut row in p.rows_mut() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            row.mapv_inplace(|v| (v - max).exp());
            let total = row.sum();
            row /= total;
        }
        p
    }
}

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), TrainingError> {
        if self.n_classes < 2 {
            return Err(TrainingError::SingleClass(format!(
                "{} distinct value",
                self.n_classes
            )));
        }
        check_finite(x, y)?;

        let scaler = Standardizer::fit(x);
        let xb = scaler.transform_with_bias(x);
        let n = xb.nrows() as f64;

        let mut onehot = Array2::zeros((xb.nrows(), self.n_classes));
        for (i, &label) in y.iter().enumerate() {
            onehot[[i, label as usize]] = 1.0;
        }

        let mut w = Array2::zeros((xb.ncols(), self.n_classes));
        for _ in 0..self.max_iter {
            let residual = Self::probabilities(&xb, &w) - &onehot;
            let mut grad = xb.t().dot(&residual) / n;
            let mut penalty = w.clone() * self.ridge;
            penalty.row_mut(0).fill(0.0);
            grad += &penalty;
            w.scaled_add(-self.learning_rate, &grad);
        }

        if w.iter().any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFinite("logistic weights"));
        }
        self.weights = Some(w);
        self.scaler = Some(scaler);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainingError> {
        let (Some(scaler), Some(w)) = (&self.scaler, &self.weights) else {
            return Err(TrainingError::NotFitted);
        };
        let p = Self::probabilities(&scaler.transform_with_bias(x), w);
        Ok(p.rows()
            .into_iter()
            .map(|row| argmax(row.iter().copied()) as f64)
            .collect())
    }
}

/// Index of the largest value; the lowest index wins ties.
pub(crate) fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}
