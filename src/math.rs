use std::f64::consts::SQRT_2;

use itertools::Itertools;
use statrs::function::erf::erfc;

use crate::error::{Error, Result};

/// Largest sample size for which the exact null distribution is used
pub const EXACT_LIMIT: usize = 50;

pub fn arithmetic_mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// How the p-value of a signed-rank test was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueMethod {
    /// Enumeration of the null distribution of the rank sum
    Exact,
    /// Normal approximation with tie correction
    Normal,
}

/// Outcome of a paired two-sided Wilcoxon signed-rank test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedRank {
    /// `min(R+, R-)`
    pub statistic: f64,
    pub pvalue: f64,
    pub r_plus: f64,
    pub r_minus: f64,
    pub n: usize,
    pub method: PValueMethod,
}

/// Average (fractional) ranks of `values`, 1-based
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let order = (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect::<Vec<_>>();

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // ranks start..end share the mean of (start + 1)..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

/// Paired two-sided Wilcoxon signed-rank test of `x` against `y`
///
/// Zero differences are kept and their ranks split evenly between `R+` and
/// `R-`. No continuity correction is applied. The exact null distribution is
/// used for up to [`EXACT_LIMIT`] pairs when there are neither zero nor tied
/// differences, otherwise the tie-corrected normal approximation.
///
/// # Errors
///
/// * [`Error::LengthMismatch`] if `x` and `y` differ in length
/// * [`Error::EmptySample`] if there are no pairs
/// * [`Error::NonFiniteDifference`] if a difference is infinite or NaN
/// * [`Error::DegenerateTest`] if every difference is zero
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<SignedRank> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(Error::EmptySample);
    }

    let diffs = x.iter().zip(y).map(|(a, b)| a - b).collect::<Vec<_>>();
    if let Some(d) = diffs.iter().find(|d| !d.is_finite()) {
        return Err(Error::NonFiniteDifference(*d));
    }
    if diffs.iter().all(|d| *d == 0.0) {
        return Err(Error::DegenerateTest);
    }

    let abs_diffs = diffs.iter().map(|d| d.abs()).collect::<Vec<_>>();
    let ranks = average_ranks(&abs_diffs);

    let mut r_plus = 0.0;
    let mut r_minus = 0.0;
    let mut has_zero = false;
    for (d, r) in diffs.iter().zip(&ranks) {
        if *d > 0.0 {
            r_plus += r;
        } else if *d < 0.0 {
            r_minus += r;
        } else {
            has_zero = true;
            r_plus += r / 2.0;
            r_minus += r / 2.0;
        }
    }

    let n = diffs.len();
    let statistic = r_plus.min(r_minus);
    let tie_sizes = tie_sizes(&abs_diffs);

    let (pvalue, method) = if n <= EXACT_LIMIT && !has_zero && tie_sizes.is_empty() {
        (exact_pvalue(n, statistic), PValueMethod::Exact)
    } else {
        (normal_pvalue(n, statistic, &tie_sizes), PValueMethod::Normal)
    };

    Ok(SignedRank {
        statistic,
        pvalue,
        r_plus,
        r_minus,
        n,
        method,
    })
}

/// Sizes of every group of equal values larger than one
fn tie_sizes(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .copied()
        .sorted_by(f64::total_cmp)
        .dedup_with_count()
        .map(|(count, _)| count)
        .filter(|&count| count > 1)
        .collect()
}

/// Two-sided p-value from the exact distribution of the rank sum over `n` pairs
fn exact_pvalue(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;

    // counts[s] = number of subsets of {1..n} whose ranks sum to s
    let mut counts = vec![0u64; max_sum + 1];
    counts[0] = 1;
    for rank in 1..=n {
        for s in (rank..=max_sum).rev() {
            counts[s] += counts[s - rank];
        }
    }

    let t = (statistic.round() as usize).min(max_sum);
    let lower_tail = counts[..=t].iter().sum::<u64>() as f64;
    let total = 2f64.powi(n as i32);
    (2.0 * lower_tail / total).min(1.0)
}

/// Two-sided p-value from the tie-corrected normal approximation
fn normal_pvalue(n: usize, statistic: f64, tie_sizes: &[usize]) -> f64 {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let tie_correction = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * (t * t - 1.0)
        })
        .sum::<f64>();
    let variance = (n * (n + 1.0) * (2.0 * n + 1.0) - 0.5 * tie_correction) / 24.0;
    let z = (statistic - mean) / variance.sqrt();
    erfc(z.abs() / SQRT_2).min(1.0)
}
