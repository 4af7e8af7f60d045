// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Utility functions for the animation pipeline

/// Euclidean distance between two 2D points
#[must_use]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Length of a 2D vector
#[must_use]
pub fn norm(v: [f32; 2]) -> f32 {
    v[0].hypot(v[1])
}

/// Angle between two 2D vectors in degrees
///
/// # Arguments
///
/// * `v1` - First direction vector
/// * `v2` - Second direction vector
///
/// # Returns
///
/// Angle in `[0, 180]`. Callers must reject near-zero vectors first; the result is
/// undefined for them.
#[must_use]
pub fn angle_between_degrees(v1: [f32; 2], v2: [f32; 2]) -> f32 {
    let (n1, n2) = (norm(v1), norm(v2));
    let cos = (v1[0] / n1).mul_add(v2[0] / n2, (v1[1] / n1) * (v2[1] / n2));
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Pluralize a noun for summary output ("1 exercise", "3 exercises")
#[must_use]
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        return word.to_string();
    }
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}
