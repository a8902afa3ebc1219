/// Exponent used when an event standard does not carry its own
pub const DEFAULT_K_VALUE: f64 = 1.1;

/// Points a finish time earns against an event's gold time.
///
/// `round(1000 * (gold_time / time) ^ k_value)`. Non-finishers (`time <= 0`)
/// score zero; anything faster than gold scores above 1000 with no cap.
pub fn calculate_points(time: f64, gold_time: f64, k_value: f64) -> u32 {
    if !(time > 0.0) || !(gold_time > 0.0) {
        return 0;
    }
    let raw = 1000.0 * (gold_time / time).powf(k_value);
    if raw.is_finite() {
        raw.round() as u32
    } else {
        u32::MAX
    }
}
