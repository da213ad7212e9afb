use statrs::distribution::{Binomial, Discrete, DiscreteCDF, Hypergeometric};

use crate::testing::inference::RELATIVE_TOLERANCE;
use crate::testing::{Alternative, TestResult};

/// Performs an exact binomial test.
///
/// # Arguments
///
/// * `successes` - Observed number of successes
/// * `trials` - Number of trials
/// * `probability` - Hypothesized probability of success, within `[0, 1]`
/// * `alternative` - Direction of the alternative hypothesis
///
/// # Returns
///
/// `TestResult` with the observed successes as statistic.
pub fn binomial_test(
    successes: u64,
    trials: u64,
    probability: f64,
    alternative: Alternative,
) -> anyhow::Result<TestResult> {
    if successes > trials {
        return Err(anyhow::anyhow!(
            "Successes ({}) cannot exceed trials ({})",
            successes,
            trials
        ));
    }
    if trials == 0 {
        return Ok(TestResult::new(0.0, 1.0));
    }

    let dist = Binomial::new(probability, trials).map_err(|e| {
        anyhow::anyhow!(
            "Invalid binomial parameters (p = {}, n = {}): {}",
            probability,
            trials,
            e
        )
    })?;

    let p_value = match alternative {
        Alternative::Less => dist.cdf(successes),
        Alternative::Greater => upper_tail(&dist, successes),
        Alternative::TwoSided => {
            if successes as f64 == probability * trials as f64 {
                1.0
            } else {
                let observed = dist.pmf(successes) * RELATIVE_TOLERANCE;
                (0..=trials)
                    .map(|k| dist.pmf(k))
                    .filter(|&pmf| pmf <= observed)
                    .sum()
            }
        }
    };

    Ok(TestResult::new(successes as f64, p_value.clamp(0.0, 1.0)))
}

/// Performs Fisher's exact test on a 2x2 contingency table.
///
/// ```text
///                 in object   not in object
/// in term            n11          n12
/// not in term        n21          n22
/// ```
///
/// The p-value is computed from the hypergeometric distribution of `n11` given the margins.
/// `Greater` tests for `n11` being larger than expected (over-representation).
///
/// # Returns
///
/// `TestResult` with the sample odds ratio `n11 * n22 / (n12 * n21)` as statistic.
pub fn fisher_exact_test(
    table: [[u64; 2]; 2],
    alternative: Alternative,
) -> anyhow::Result<TestResult> {
    let [[n11, n12], [n21, n22]] = table;
    let population = n11 + n12 + n21 + n22;
    let row1 = n11 + n12;
    let col1 = n11 + n21;

    let odds_ratio = (n11 as f64 * n22 as f64) / (n12 as f64 * n21 as f64);

    if row1 == 0 || col1 == 0 || row1 == population || col1 == population {
        return Ok(TestResult::new(odds_ratio, 1.0));
    }

    let dist = Hypergeometric::new(population, col1, row1)
        .map_err(|e| anyhow::anyhow!("Invalid contingency table {:?}: {}", table, e))?;

    let p_value = match alternative {
        Alternative::Less => dist.cdf(n11),
        Alternative::Greater => upper_tail(&dist, n11),
        Alternative::TwoSided => {
            let lower = (row1 + col1).saturating_sub(population);
            let upper = row1.min(col1);
            let observed = dist.pmf(n11) * RELATIVE_TOLERANCE;
            (lower..=upper)
                .map(|k| dist.pmf(k))
                .filter(|&pmf| pmf <= observed)
                .sum()
        }
    };

    Ok(TestResult::new(odds_ratio, p_value.clamp(0.0, 1.0)))
}

/// P(X >= k)
fn upper_tail<D>(dist: &D, k: u64) -> f64
where
    D: DiscreteCDF<u64, f64>,
{
    if k == 0 { 1.0 } else { dist.sf(k - 1) }
}
