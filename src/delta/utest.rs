// Mann-Whitney U rank-sum test
//
// Small samples use the exact permutation distribution of the rank sum.
// Ranks are mid-ranks, so ties are handled exactly rather than through a
// variance correction. Larger samples fall back to the normal approximation
// with tie and continuity corrections.

use super::DeltaTestError;

/// Largest combined sample size for which the exact distribution is enumerated
const EXACT_LIMIT: usize = 50;

/// Minimum observations required on each side
const MIN_SAMPLES: usize = 2;

/// Two-sided Mann-Whitney U test of `old` against `new`
///
/// # Example
/// ```
/// use benchdelta::delta::mann_whitney_u_test;
///
/// let old = [100.0, 101.0, 99.0, 100.5, 100.2];
/// let new = [80.0, 81.0, 79.0, 80.5, 80.2];
/// let p = mann_whitney_u_test(&old, &new).unwrap();
/// assert!(p < 0.01);
/// ```
pub fn mann_whitney_u_test(old: &[f64], new: &[f64]) -> Result<f64, DeltaTestError> {
    if old.len() < MIN_SAMPLES || new.len() < MIN_SAMPLES {
        return Err(DeltaTestError::TooFewSamples);
    }

    let ranks = doubled_mid_ranks(old, new);
    let n1 = old.len();
    let n = ranks.len();

    // Rank sums are kept doubled so mid-ranks stay integral
    let observed: i64 = ranks[..n1].iter().sum();
    let center = (n1 * (n + 1)) as i64;

    let p = if n <= EXACT_LIMIT {
        exact_p_value(&ranks, n1, observed, center)
    } else {
        normal_p_value(old, new, observed)
    };
    Ok(p.clamp(0.0, 1.0))
}

/// Twice the mid-rank of every observation, `old` first then `new`
fn doubled_mid_ranks(old: &[f64], new: &[f64]) -> Vec<i64> {
    let mut pooled: Vec<(f64, usize)> = old
        .iter()
        .chain(new.iter())
        .copied()
        .enumerate()
        .map(|(i, v)| (v, i))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranks = vec![0i64; pooled.len()];
    let mut start = 0;
    while start < pooled.len() {
        let mut end = start;
        while end + 1 < pooled.len() && pooled[end + 1].0 == pooled[start].0 {
            end += 1;
        }
        // positions are 0-based; (start+1 + end+1) is twice the mid-rank
        let doubled = (start + end + 2) as i64;
        for &(_, origin) in &pooled[start..=end] {
            ranks[origin] = doubled;
        }
        start = end + 1;
    }
    ranks
}

/// Exact two-sided p-value by counting every size-`n1` subset of ranks
fn exact_p_value(ranks: &[i64], n1: usize, observed: i64, center: i64) -> f64 {
    let max_sum: i64 = ranks.iter().sum();
    let width = max_sum as usize + 1;

    // counts[k][s]: number of k-subsets of the ranks seen so far summing to s
    let mut counts = vec![vec![0f64; width]; n1 + 1];
    counts[0][0] = 1.0;
    for (seen, &rank) in ranks.iter().enumerate() {
        let rank = rank as usize;
        for k in (1..=n1.min(seen + 1)).rev() {
            let (lower, upper) = counts.split_at_mut(k);
            let prev = &lower[k - 1];
            let cur = &mut upper[0];
            for s in (rank..width).rev() {
                cur[s] += prev[s - rank];
            }
        }
    }

    let deviation = (observed - center).abs();
    let (extreme, total) = counts[n1]
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0.0)
        .fold((0.0, 0.0), |(extreme, total), (s, &c)| {
            if (s as i64 - center).abs() >= deviation {
                (extreme + c, total + c)
            } else {
                (extreme, total + c)
            }
        });

    if total == 0.0 {
        1.0
    } else {
        extreme / total
    }
}

/// Normal approximation with tie correction for large samples
fn normal_p_value(old: &[f64], new: &[f64], observed_doubled: i64) -> f64 {
    let n1 = old.len() as f64;
    let n2 = new.len() as f64;
    let n = n1 + n2;

    let rank_sum = observed_doubled as f64 / 2.0;
    let u = rank_sum - n1 * (n1 + 1.0) / 2.0;
    let mu = n1 * n2 / 2.0;

    let mut pooled: Vec<f64> = old.iter().chain(new.iter()).copied().collect();
    pooled.sort_by(f64::total_cmp);
    let tie_term: f64 = pooled
        .chunk_by(|a, b| a == b)
        .map(|run| {
            let t = run.len() as f64;
            t * t * t - t
        })
        .sum();

    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return 1.0;
    }

    let z = ((u - mu).abs() - 0.5).max(0.0) / variance.sqrt();
    2.0 * normal_cdf(-z)
}

/// Standard normal CDF
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function approximation (Abramowitz and Stegun 7.1.26)
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}
