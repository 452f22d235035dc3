/// Height used for exercises that match no keyword.
pub const DEFAULT_HEIGHT_M: f64 = 0.4;

/// Per-rep lift height in meters, keyed by a lowercase name fragment.
///
/// Order matters: the first keyword contained in a name decides its height,
/// so a name mentioning both "bench" and "squat" resolves as a bench.
pub static EXERCISE_HEIGHTS: &[(&str, f64)] = &[("bench", 0.4), ("squat", 0.6), ("deadlift", 0.5)];

/// Resolve the per-rep lift height for a free-form exercise name.
///
/// Matching is case-insensitive and substring based, so "Barbell Squat
/// (heavy)" resolves like "squat". Unknown names get [`DEFAULT_HEIGHT_M`].
pub fn resolve_height(name: &str) -> f64 {
    let name = name.to_lowercase();
    EXERCISE_HEIGHTS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map_or(DEFAULT_HEIGHT_M, |&(_, height)| height)
}
