use crate::record::SemanticClass;

/// Convert an expected value into an occurrence probability. Count-like stats
/// go through Poisson P(X >= 1); probability-like stats pass through. Every
/// branch ends in the same clamp so the output is always in [0, 1].
pub fn to_probability(expected: f64, class: SemanticClass) -> f64 {
    let p = match class {
        SemanticClass::Count => 1.0 - (-expected.max(0.0)).exp(),
        SemanticClass::Probability => expected,
    };
    p.clamp(0.0, 1.0)
}
