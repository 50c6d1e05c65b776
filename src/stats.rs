//! Wilcoxon rank-sum test (normal approximation, two-sided).
//!
//! Ranks are midranks over the pooled sample. No tie correction is applied
//! to the variance, which keeps results identical to the rank-sum tables the
//! notebooks have been producing.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSum {
    /// z-score of the rank sum of the first sample.
    pub statistic: f64,
    pub p_value: f64,
}

/// Inputs for which the test is not computable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateSample {
    #[error("sample {0} is empty")]
    Empty(usize),

    #[error("sample contains a non-finite value")]
    NonFinite,

    #[error("every observation in both samples is zero")]
    AllZero,
}

/// Average ranks (1-based) of `values`; tied values share their mean rank.
///
/// # Example
/// ```
/// use corpus_compare::stats::midranks;
/// assert_eq!(midranks(&[0.5, 0.0, 0.5, 1.0]), vec![2.5, 1.0, 2.5, 4.0]);
/// ```
pub fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

/// Two-sided rank-sum test of `x` against `y`.
///
/// A positive statistic means `x` tends to be larger than `y`.
pub fn rank_sum(x: &[f64], y: &[f64]) -> Result<RankSum, DegenerateSample> {
    if x.is_empty() {
        return Err(DegenerateSample::Empty(1));
    }
    if y.is_empty() {
        return Err(DegenerateSample::Empty(2));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(DegenerateSample::NonFinite);
    }
    // The word occurs in neither sample. Equal non-zero values still rank
    // (every observation gets the same midrank, z = 0).
    if x.iter().chain(y).all(|&v| v == 0.0) {
        return Err(DegenerateSample::AllZero);
    }

    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranks = midranks(&pooled);
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let s: f64 = ranks[..x.len()].iter().sum();
    let expected = n1 * (n1 + n2 + 1.0) / 2.0;
    let z = (s - expected) / (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    let p = erfc(z.abs() / std::f64::consts::SQRT_2);
    Ok(RankSum {
        statistic: z,
        p_value: p.min(1.0),
    })
}

/// Complementary error function, Chebyshev fit with fractional error
/// below 1.2e-7 over the whole real line.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * poly.exp();
    if x >= 0.0 { r } else { 2.0 - r }
}
