//! Troy-ounce to gram price conversion.

/// Grams in one troy ounce.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Converts a per-troy-ounce price to a per-gram price.
///
/// A zero price is the provider's way of saying "no data" and maps to `None`,
/// as does an absent one.
pub fn to_per_gram(price_per_troy_ounce: Option<f64>) -> Option<f64> {
    match price_per_troy_ounce {
        Some(price) if price != 0.0 => Some(price / GRAMS_PER_TROY_OUNCE),
        _ => None,
    }
}
