//! First-order statistics of the numeric columns.
//!
//! `std` is the population deviation. Skew and kurtosis are the
//! bias-corrected sample estimators (kurtosis in excess form); they are
//! `None` below 3 and 4 values respectively.

use serde::Serialize;

use crate::parser::{numeric_columns, Restaurant};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: &'static str,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub skew: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Statistics for every numeric column; empty when there are no rows
pub fn describe(rows: &[&Restaurant]) -> Vec<ColumnStats> {
    numeric_columns()
        .into_iter()
        .filter_map(|column| {
            let values: Vec<f64> = rows.iter().filter_map(|r| r.numeric(column)).collect();
            column_stats(column, &values)
        })
        .collect()
}

pub fn column_stats(column: &'static str, values: &[f64]) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let nf = n as f64;
    let min = sorted[0];
    let max = sorted[n - 1];
    let mean = sorted.iter().sum::<f64>() / nf;
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    // central moment sums
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in &sorted {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }

    let skew = (n >= 3).then(|| {
        if m2 == 0.0 {
            0.0
        } else {
            nf * (nf - 1.0).sqrt() / (nf - 2.0) * (m3 / m2.powf(1.5))
        }
    });

    let kurtosis = (n >= 4).then(|| {
        if m2 == 0.0 {
            0.0
        } else {
            let adj = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
            let numerator = nf * (nf + 1.0) * (nf - 1.0) * m4;
            let denominator = (nf - 2.0) * (nf - 3.0) * m2 * m2;
            numerator / denominator - adj
        }
    });

    Some(ColumnStats {
        column,
        count: n,
        min,
        max,
        range: max - min,
        mean,
        median,
        std: (m2 / nf).sqrt(),
        skew,
        kurtosis,
    })
}
