//! Mass units and presentation rounding shared by the scale and the ledger.

/// Unit reported with every weight reading.
pub const WEIGHT_UNIT: &str = "kg";

/// Round `value` to `decimals` places, half away from zero.
///
/// Exact `.xx5` ties therefore round up in magnitude, one cent away from
/// what banker's rounding would store.  Values too large to scale are
/// returned unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
