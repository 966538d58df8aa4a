pub mod csv;
pub mod layout;
pub mod selector;

/// Round to two decimal places, half away from zero (`f64::round`
/// semantics). Used for every monetary and hour total so the same value
/// never rounds two different ways in different artifacts.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
