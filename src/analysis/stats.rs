//! Descriptive statistics used by the charts and metric cards.
//!
//! Every function skips nulls the way Pandas does by default and returns
//! `None` instead of `NaN` when a statistic is undefined.

use std::collections::HashMap;

use crate::data::model::{CellValue, DataTable};

/// Bandwidth extension (in bandwidths) past the data range for the KDE grid.
pub const KDE_CUT: f64 = 3.0;
/// Number of points evaluated along the KDE grid.
pub const KDE_GRID_SIZE: usize = 200;
const MAX_BINS: usize = 500;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile of already-sorted data with linear interpolation between the
/// two closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation of two equally long float slices.
/// `None` with fewer than two points or when either side has zero variance.
pub fn pearson_f64(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

/// Numeric pairs where both cells are present, in row order.
pub fn complete_pairs(a: &[CellValue], b: &[CellValue]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .unzip()
}

/// Pearson correlation over pairwise-complete observations.
pub fn pearson(a: &[CellValue], b: &[CellValue]) -> Option<f64> {
    let (xs, ys) = complete_pairs(a, b);
    pearson_f64(&xs, &ys)
}

/// Pairwise correlation matrix over a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// Row-major, `values[i][j]` = corr(names[i], names[j]).
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == row)?;
        let j = self.names.iter().position(|n| n == col)?;
        self.values[i][j]
    }
}

/// Correlation matrix for the named columns of `table` (absent names skipped).
pub fn correlation_matrix(table: &DataTable, names: &[String]) -> CorrelationMatrix {
    let cols: Vec<_> = names.iter().filter_map(|n| table.column(n)).collect();
    let n = cols.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&cols[i].values, &cols[j].values);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        names: cols.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Frequency of each non-null label, in order of first appearance.
pub fn value_counts(values: &[CellValue]) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for v in values.iter().filter(|v| !v.is_null()) {
        let label = v.to_string();
        match index.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }
    counts
}

/// Distinct non-null labels in order of first appearance.
pub fn labels_in_order(values: &[CellValue]) -> Vec<String> {
    value_counts(values).into_iter().map(|(l, _)| l).collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Centre of bin `i`.
    pub fn center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Equal-width histogram.  The bin width is the finer of the Sturges and
/// Freedman–Diaconis estimates (NumPy's "auto" rule).
pub fn histogram(values: &[f64]) -> Option<Histogram> {
    if values.is_empty() {
        return None;
    }
    let data = sorted(values);
    let min = data[0];
    let max = data[data.len() - 1];
    let span = max - min;
    if span == 0.0 {
        return Some(Histogram {
            start: min - 0.5,
            bin_width: 1.0,
            counts: vec![data.len()],
        });
    }

    let n = data.len() as f64;
    let sturges = span / (n.log2() + 1.0);
    let iqr = quantile_sorted(&data, 0.75)? - quantile_sorted(&data, 0.25)?;
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let n_bins = ((span / width).ceil() as usize).clamp(1, MAX_BINS);
    let bin_width = span / n_bins as f64;

    let mut counts = vec![0usize; n_bins];
    for v in &data {
        let idx = (((v - min) / bin_width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram {
        start: min,
        bin_width,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE with Scott's bandwidth, evaluated on an even grid that
/// extends `cut` bandwidths beyond the data.  Returns `[x, density]` points,
/// or `None` when fewer than two points or no spread.
pub fn kde(values: &[f64], cut: f64) -> Option<Vec<[f64; 2]>> {
    let sd = std_dev(values)?;
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    let n = values.len() as f64;
    let bw = sd * n.powf(-0.2);
    let data = sorted(values);
    let lo = data[0] - cut * bw;
    let hi = data[data.len() - 1] + cut * bw;
    let step = (hi - lo) / (KDE_GRID_SIZE - 1) as f64;
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());

    Some(
        (0..KDE_GRID_SIZE)
            .map(|i| {
                let x = lo + step * i as f64;
                let density: f64 = data
                    .iter()
                    .map(|xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                    .sum();
                [x, density * norm]
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Box plot statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Tukey box: whiskers reach the furthest data points within 1.5·IQR of the
/// quartiles; anything beyond is an outlier.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let data = sorted(values);
    let q1 = quantile_sorted(&data, 0.25)?;
    let median = quantile_sorted(&data, 0.5)?;
    let q3 = quantile_sorted(&data, 0.75)?;
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = data
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence)
        .collect();
    let lower_whisker = inside.first().copied().unwrap_or(q1);
    let upper_whisker = inside.last().copied().unwrap_or(q3);
    let outliers = data
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), Some(5.0));
        assert!(approx(std_dev(&v).unwrap(), (32.0f64 / 7.0).sqrt()));
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[1.0]), None);
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile_sorted(&v, 0.25).unwrap(), 1.75));
        assert!(approx(quantile_sorted(&v, 0.5).unwrap(), 2.5));
        assert!(approx(quantile_sorted(&v, 0.75).unwrap(), 3.25));
    }

    #[test]
    fn pearson_perfect_and_undefined() {
        assert!(approx(pearson_f64(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap(), 1.0));
        assert!(approx(pearson_f64(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap(), -1.0));
        assert_eq!(pearson_f64(&[1.0, 2.0], &[5.0, 5.0]), None);
        assert_eq!(pearson_f64(&[1.0], &[1.0]), None);
    }

    #[test]
    fn pearson_skips_incomplete_pairs() {
        let a = vec![
            CellValue::Integer(1),
            CellValue::Null,
            CellValue::Integer(3),
            CellValue::Integer(4),
        ];
        let b = vec![
            CellValue::Float(10.0),
            CellValue::Float(99.0),
            CellValue::Float(30.0),
            CellValue::Float(40.0),
        ];
        assert!(approx(pearson(&a, &b).unwrap(), 1.0));
    }

    #[test]
    fn value_counts_in_appearance_order() {
        let v: Vec<CellValue> = ["Diesel", "Petrol", "Diesel", "CNG"]
            .iter()
            .map(|s| CellValue::String(s.to_string()))
            .chain(std::iter::once(CellValue::Null))
            .collect();
        assert_eq!(
            value_counts(&v),
            vec![
                ("Diesel".to_string(), 2),
                ("Petrol".to_string(), 1),
                ("CNG".to_string(), 1)
            ]
        );
    }

    #[test]
    fn histogram_counts_every_value() {
        let v: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let h = histogram(&v).unwrap();
        assert_eq!(h.total(), 100);
        assert_eq!(h.start, 0.0);
        assert!(h.counts.len() > 1);
    }

    #[test]
    fn histogram_of_constant_values() {
        let h = histogram(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(h.counts, vec![3]);
        assert_eq!(h.center(0), 3.0);
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let v = [1.0, 2.0, 2.5, 3.0, 7.0];
        let curve = kde(&v, KDE_CUT).unwrap();
        assert_eq!(curve.len(), KDE_GRID_SIZE);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area = {area}");
        assert_eq!(kde(&[4.0, 4.0], KDE_CUT), None);
    }

    #[test]
    fn box_stats_flags_outliers() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = box_stats(&v).unwrap();
        assert!(approx(b.median, 3.5));
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
    }
}
