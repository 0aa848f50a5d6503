//! Cosine distance
//!
//! `1 - (q·c) / (‖q‖·‖c‖)`, in `[0, 2]`. Zero means same direction, two means
//! opposite. Lower is more similar.

use hearth_core::{Error, Result, Vector, ZERO_NORM_EPSILON};

/// Cosine distance between a query and a candidate.
///
/// # Errors
/// - [`Error::InvalidDimension`] if the vectors differ in length
/// - [`Error::UndefinedSimilarity`] if either vector has (near-)zero norm
pub fn score(query: &Vector, candidate: &Vector) -> Result<f32> {
    let query_norm = checked_norm(query, "query")?;
    distance_with_query_norm(query, query_norm, candidate)
        .ok_or_else(|| Error::UndefinedSimilarity("candidate".to_string()))?
}

/// Norm of `v`, or [`Error::UndefinedSimilarity`] naming `what` when the norm is
/// (near-)zero or not finite.
pub(crate) fn checked_norm(v: &Vector, what: &str) -> Result<f32> {
    let norm = v.norm();
    if norm.is_finite() && norm > ZERO_NORM_EPSILON {
        Ok(norm)
    } else {
        Err(Error::UndefinedSimilarity(what.to_string()))
    }
}

/// Distance against a query whose norm is already known.
///
/// `None` when the candidate's norm is (near-)zero.
pub(crate) fn distance_with_query_norm(
    query: &Vector,
    query_norm: f32,
    candidate: &Vector,
) -> Option<Result<f32>> {
    if query.dim() != candidate.dim() {
        return Some(Err(Error::InvalidDimension {
            expected: query.dim(),
            actual: candidate.dim(),
        }));
    }

    let candidate_norm = candidate.norm();
    if !(candidate_norm.is_finite() && candidate_norm > ZERO_NORM_EPSILON) {
        return None;
    }

    let similarity = query.dot(candidate) / (query_norm * candidate_norm);
    // Rounding can push |similarity| a hair past 1.
    Some(Ok((1.0 - similarity).clamp(0.0, 2.0)))
}
