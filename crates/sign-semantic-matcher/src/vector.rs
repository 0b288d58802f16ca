//! Dense vector helpers for unit-normalized embeddings
//!
//! Cosine similarity between unit vectors reduces to a dot product, which
//! is what the matcher computes for every vocabulary row.

/// L2 norm of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize vector to unit length
pub fn normalize(v: Vec<f32>) -> Vec<f32> {
    let n = l2_norm(&v);
    if n > 0.0 {
        v.into_iter().map(|x| x / n).collect()
    } else {
        v
    }
}

/// Dot product of two equal-length vectors
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dot requires equal dimensions");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
