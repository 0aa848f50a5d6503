// Vector kernels used by scoring and aggregation.
// AVX2/FMA on x86_64 when the dimension is large enough, an unrolled scalar loop otherwise.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 32;

/// Dot product of two equal-length slices.
///
/// Returns 0.0 when the lengths differ; callers validate dimensions beforehand.
#[inline]
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if a.len() >= MIN_DIM_SIZE_AVX
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// Four independent accumulators so the loop pipelines and auto-vectorizes.
#[inline]
fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = [0.0f32; 4];
    let chunks_a = a.chunks_exact(4);
    let chunks_b = b.chunks_exact(4);
    let tail: f32 = chunks_a
        .remainder()
        .iter()
        .zip(chunks_b.remainder())
        .map(|(x, y)| x * y)
        .sum();

    for (ca, cb) in chunks_a.zip(chunks_b) {
        acc[0] += ca[0] * cb[0];
        acc[1] += ca[1] * cb[1];
        acc[2] += ca[2] * cb[2];
        acc[3] += ca[3] * cb[3];
    }

    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut lo = _mm256_setzero_ps();
    let mut hi = _mm256_setzero_ps();

    while i + 16 <= dim {
        let xa = _mm256_loadu_ps(a.as_ptr().add(i));
        let xb = _mm256_loadu_ps(b.as_ptr().add(i));
        let ya = _mm256_loadu_ps(a.as_ptr().add(i + 8));
        let yb = _mm256_loadu_ps(b.as_ptr().add(i + 8));
        lo = _mm256_fmadd_ps(xa, xb, lo);
        hi = _mm256_fmadd_ps(ya, yb, hi);
        i += 16;
    }

    let sum = _mm256_add_ps(lo, hi);
    let mut lanes = [0.0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), sum);
    let mut dot: f32 = lanes.iter().sum();

    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }

    dot
}

/// Squared L2 norm.
#[inline]
pub fn norm_squared_simd(v: &[f32]) -> f32 {
    dot_product_simd(v, v)
}

/// L2 norm.
#[inline]
pub fn norm_simd(v: &[f32]) -> f32 {
    norm_squared_simd(v).sqrt()
}

/// `acc[i] += v[i]` for every component. Lengths must match.
#[inline]
pub fn accumulate(acc: &mut [f32], v: &[f32]) {
    debug_assert_eq!(acc.len(), v.len());
    for (a, x) in acc.iter_mut().zip(v) {
        *a += x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_matches_naive() {
        let a: Vec<f32> = (0..67).map(|i| i as f32 * 0.25).collect();
        let b: Vec<f32> = (0..67).map(|i| 1.0 - i as f32 * 0.01).collect();
        let naive: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let fast = dot_product_simd(&a, &b);
        assert!((naive - fast).abs() < 1e-2, "naive {} vs fast {}", naive, fast);
    }

    #[test]
    fn test_dot_product_length_mismatch() {
        assert_eq!(dot_product_simd(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_norm() {
        assert!((norm_simd(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(norm_simd(&[0.0; 40]), 0.0);
    }

    #[test]
    fn test_accumulate() {
        let mut acc = vec![1.0, 2.0, 3.0];
        accumulate(&mut acc, &[0.5, 0.5, -3.0]);
        assert_eq!(acc, vec![1.5, 2.5, 0.0]);
    }
}
