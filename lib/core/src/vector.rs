use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Norms at or below this are treated as zero: direction is undefined.
pub const ZERO_NORM_EPSILON: f32 = 1e-6;

/// A dense embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        crate::simd::norm_simd(&self.data)
    }

    /// True when the norm is too small for the direction to be meaningful.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.norm() <= ZERO_NORM_EPSILON
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        crate::simd::dot_product_simd(&self.data, &other.data)
    }

    /// Normalize the vector to unit length. Zero vectors are left untouched.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }

    /// Element-wise arithmetic mean.
    ///
    /// The result is not re-normalized: its norm shrinks as the inputs disagree in
    /// direction. Returns `None` for an empty input or mixed dimensions.
    pub fn centroid(vectors: &[Vector]) -> Option<Vector> {
        let first = vectors.first()?;
        let dim = first.dim();
        if vectors.iter().any(|v| v.dim() != dim) {
            return None;
        }

        let mut acc = vec![0.0f32; dim];
        for v in vectors {
            crate::simd::accumulate(&mut acc, &v.data);
        }

        let inv_n = 1.0 / vectors.len() as f32;
        for x in &mut acc {
            *x *= inv_n;
        }
        Some(Vector::new(acc))
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Vector::new(data)
    }
}

impl Mul<f32> for &Vector {
    type Output = Vector;

    fn mul(self, scalar: f32) -> Vector {
        Vector::new(self.data.iter().map(|x| x * scalar).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let v = Vector::new(vec![3.0, 4.0]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-6);

        let mut zero = Vector::zeros(3);
        zero.normalize();
        assert_eq!(zero.as_slice(), &[0.0, 0.0, 0.0]);
        assert!(zero.is_zero());
    }

    #[test]
    fn test_centroid_of_one_is_itself() {
        let v = Vector::new(vec![0.6, 0.8, 0.0]);
        let c = Vector::centroid(std::slice::from_ref(&v)).unwrap();
        assert_eq!(c, v);
    }

    #[test]
    fn test_centroid_is_not_renormalized() {
        let a = Vector::new(vec![1.0, 0.0]);
        let b = Vector::new(vec![0.0, 1.0]);
        let c = Vector::centroid(&[a, b]).unwrap();
        assert_eq!(c.as_slice(), &[0.5, 0.5]);
        assert!((c.norm() - 0.5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_centroid_of_opposites_is_zero() {
        let a = Vector::new(vec![1.0, 0.0]);
        let b = Vector::new(vec![-1.0, 0.0]);
        assert!(Vector::centroid(&[a, b]).unwrap().is_zero());
    }

    #[test]
    fn test_centroid_rejects_empty_and_mixed() {
        assert!(Vector::centroid(&[]).is_none());
        let a = Vector::new(vec![1.0, 0.0]);
        let b = Vector::new(vec![1.0, 0.0, 0.0]);
        assert!(Vector::centroid(&[a, b]).is_none());
    }

    #[test]
    fn test_serde_is_a_plain_array() {
        let v: Vector = serde_json::from_str("[1.0, 2.5]").unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.5]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,2.5]");
    }
}
