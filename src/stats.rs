//! Robust aggregation of repeated timing samples.
//!
//! Wall-clock measurements of short sorts pick up scheduler noise; a single
//! preempted run can dominate a plain mean. Samples are therefore screened
//! by their deviation from the median, normalized by the median absolute
//! deviation, before averaging.

/// Default cutoff for the MAD-normalized deviation.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.0;

/// Median of a sample set.
///
/// Fails with "no samples" on empty input.
pub fn median(samples: &[u32]) -> Result<f64, String> {
    if samples.is_empty() {
        return Err("no samples".to_string());
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Ok(sorted[mid] as f64)
    }
}

fn median_f64(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Retain the samples whose deviation from the median, normalized by the
/// median absolute deviation, lies strictly below `threshold`.
///
/// A MAD of zero (all samples identical) falls back to dividing by 1, so
/// every sample passes in that case.
pub fn reject_outliers(samples: &[u32], threshold: f64) -> Result<Vec<u32>, String> {
    let med = median(samples)?;

    let dist: Vec<f64> = samples.iter().map(|&s| (s as f64 - med).abs()).collect();
    let mad = median_f64(&mut dist.clone());
    let norm = if mad != 0.0 { mad } else { 1.0 };

    Ok(samples
        .iter()
        .zip(dist.iter())
        .filter(|(_, d)| *d / norm < threshold)
        .map(|(&s, _)| s)
        .collect())
}

/// Arithmetic mean of the outlier-filtered sample set.
pub fn filtered_mean(samples: &[u32], threshold: f64) -> Result<f64, String> {
    let kept = reject_outliers(samples, threshold)?;
    if kept.is_empty() {
        return Err("no samples within outlier threshold".to_string());
    }

    Ok(kept.iter().map(|&s| s as f64).sum::<f64>() / kept.len() as f64)
}
