/// Categories that historically convert well for streaming coverage.
pub const HIGH_VALUE_CATEGORIES: [&str; 6] =
    ["OCR", "CrossFit", "Fitness", "E-sport", "MMA", "Siatkówka"];

/// Sales-potential score for an event, on a 1-5 scale.
///
/// Starts from a base of 3, adds up to +2 for audience size, +1 for a
/// high-value category, and +/-1 depending on how reachable the organizer is,
/// then clamps. Callers pass booleans for the contact fields rather than the
/// raw strings.
pub fn potential_score(
    estimated_audience: i64,
    category: &str,
    has_email: bool,
    has_phone: bool,
) -> i64 {
    let mut score = 3;
    if estimated_audience > 5000 {
        score += 2;
    } else if estimated_audience > 1000 {
        score += 1;
    }
    if HIGH_VALUE_CATEGORIES.contains(&category) {
        score += 1;
    }
    if has_email && has_phone {
        score += 1;
    } else if !has_email && !has_phone {
        score -= 1;
    }
    score.clamp(1, 5)
}
