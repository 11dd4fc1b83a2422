/// Index of the highest score.
///
/// Ties resolve to the lowest index and NaN never wins. Returns `None` for
/// an empty or all-NaN score vector.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if score <= max => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, _)| i)
}
