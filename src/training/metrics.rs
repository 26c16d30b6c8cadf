//! Evaluation metrics over predictions pooled from every fold

/// Percent correct plus class-frequency weighted precision and recall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationMetrics {
    pub pct_correct: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
}

impl ClassificationMetrics {
    pub fn summary(&self) -> String {
        format!(
            "Accuracy: {:.2}%, Precision: {:.3}, Recall: {:.3}",
            self.pct_correct, self.weighted_precision, self.weighted_recall
        )
    }
}

/// `actual` and `predicted` are class indices below `n_classes`.
pub fn classification(actual: &[usize], predicted: &[usize], n_classes: usize) -> ClassificationMetrics {
    let n = actual.len();
    let mut confusion = vec![vec![0usize; n_classes]; n_classes];
    for (&a, &p) in actual.iter().zip(predicted) {
        confusion[a][p] += 1;
    }

    let correct: usize = (0..n_classes).map(|c| confusion[c][c]).sum();
    let mut weighted_precision = 0.0;
    let mut weighted_recall = 0.0;
    for c in 0..n_classes {
        let actual_c: usize = confusion[c].iter().sum();
        let predicted_c: usize = confusion.iter().map(|row| row[c]).sum();
        let tp = confusion[c][c] as f64;
        let precision = if predicted_c > 0 { tp / predicted_c as f64 } else { 0.0 };
        let recall = if actual_c > 0 { tp / actual_c as f64 } else { 0.0 };
        weighted_precision += precision * actual_c as f64;
        weighted_recall += recall * actual_c as f64;
    }

    let n = n.max(1) as f64;
    ClassificationMetrics {
        pct_correct: 100.0 * correct as f64 / n,
        weighted_precision: weighted_precision / n,
        weighted_recall: weighted_recall / n,
    }
}

/// Correlation between predicted and actual values plus mean absolute error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub correlation: f64,
    pub mean_absolute_error: f64,
}

impl RegressionMetrics {
    pub fn summary(&self) -> String {
        format!(
            "Correlation: {:.3}, Mean Error: {:.3}",
            self.correlation, self.mean_absolute_error
        )
    }
}

/// Correlation is 0 when either side has no variance.
pub fn regression(actual: &[f64], predicted: &[f64]) -> RegressionMetrics {
    let n = actual.len().max(1) as f64;
    let mean_a = actual.iter().sum::<f64>() / n;
    let mean_p = predicted.iter().sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_p, mut abs_err) = (0.0, 0.0, 0.0, 0.0);
    for (&a, &p) in actual.iter().zip(predicted) {
        cov += (a - mean_a) * (p - mean_p);
        var_a += (a - mean_a).powi(2);
        var_p += (p - mean_p).powi(2);
        abs_err += (a - p).abs();
    }

    let correlation = if var_a * var_p > 0.0 {
        cov / (var_a * var_p).sqrt()
    } else {
        0.0
    };
    RegressionMetrics {
        correlation,
        mean_absolute_error: abs_err / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_weighted_scores() {
        // class 0: 3 samples, 2 right; class 1: 1 sample, right.
        let actual = [0, 0, 0, 1];
        let predicted = [0, 0, 1, 1];
        let m = classification(&actual, &predicted, 2);

        assert!((m.pct_correct - 75.0).abs() < 1e-9);
        // precision: c0 = 2/2, c1 = 1/2 → (3*1 + 1*0.5) / 4
        assert!((m.weighted_precision - 0.875).abs() < 1e-9);
        // recall: c0 = 2/3, c1 = 1 → (3*2/3 + 1) / 4
        assert!((m.weighted_recall - 0.75).abs() < 1e-9);
        assert_eq!(m.summary(), "Accuracy: 75.00%, Precision: 0.875, Recall: 0.750");
    }

    #[test]
    fn test_regression_perfect_and_constant() {
        let m = regression(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((m.correlation - 1.0).abs() < 1e-9);
        assert!((m.mean_absolute_error - 2.0).abs() < 1e-9);

        let flat = regression(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]);
        assert_eq!(flat.correlation, 0.0);
    }
}
