//! Similarity between embedding vectors

/// Cosine similarity between two embedding vectors
///
/// Returns a value in [-1.0, 1.0]. Degrades to 0.0 instead of failing when
/// either vector is empty, the lengths differ, or either magnitude is zero.
/// Accumulates in f64 so long f32 vectors keep their precision.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Round a score for presentation
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
