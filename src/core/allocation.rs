use crate::utils::error::{IngestError, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// NewsAPI 單次請求的 pageSize 上限
pub const API_LIMIT: usize = 100;

/// 把 `target_total` 篇文章隨機分配到 `num_categories` 個分類。
///
/// 每個分類的數量取自截斷常態分佈（平均 `target / n`，標準差為平均的一半，
/// 範圍 `[0, target]`），四捨五入後再隨機加減 1 直到總和等於 `target_total`。
pub fn allocate_articles<R: Rng + ?Sized>(
    num_categories: usize,
    target_total: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if num_categories == 0 {
        return Err(IngestError::ValidationError {
            message: "Cannot allocate articles across zero categories".to_string(),
        });
    }
    if target_total == 0 {
        return Ok(vec![0; num_categories]);
    }

    let mean = target_total as f64 / num_categories as f64;
    let std_dev = mean / 2.0;
    let upper = target_total as f64;

    let mut counts: Vec<i64> = (0..num_categories)
        .map(|_| sample_truncated_normal(&mut *rng, mean, std_dev, 0.0, upper).round() as i64)
        .map(|c| c.max(0))
        .collect();

    let mut difference = target_total as i64 - counts.iter().sum::<i64>();
    while difference != 0 {
        if difference > 0 {
            let idx = rng.gen_range(0..num_categories);
            counts[idx] += 1;
            difference -= 1;
        } else {
            let eligible: Vec<usize> = counts
                .iter()
                .enumerate()
                .filter(|(_, c)| **c > 0)
                .map(|(i, _)| i)
                .collect();
            let Some(&idx) = eligible.choose(&mut *rng) else {
                return Err(IngestError::ProcessingError {
                    message: format!(
                        "Allocation {:?} exceeds target {} with no category left to reduce",
                        counts, target_total
                    ),
                });
            };
            counts[idx] -= 1;
            difference += 1;
        }
    }

    Ok(counts.into_iter().map(|c| c as usize).collect())
}

fn sample_truncated_normal<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    std_dev: f64,
    lower: f64,
    upper: f64,
) -> f64 {
    // 區間至少涵蓋 [mean - 2σ, mean]，接受率 > 47%
    loop {
        let value = mean + std_dev * standard_normal(&mut *rng);
        if (lower..=upper).contains(&value) {
            return value;
        }
    }
}

// Box-Muller
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
