use crate::model::Condition;

/// Decide whether a trigger fires on this tick.
///
/// Level conditions look only at `current`. Crossing conditions also need the
/// previous tick's price; a trigger that has never observed a price is treated
/// as if the previous price were 0.
///
/// Pure: the same inputs always produce the same answer.
pub fn evaluate(previous: Option<f64>, current: f64, condition: Condition, threshold: f64) -> bool {
    let previous = previous.unwrap_or(0.0);
    match condition {
        Condition::Above => current > threshold,
        Condition::Below => current < threshold,
        Condition::CrossesAbove => previous <= threshold && current > threshold,
        Condition::CrossesBelow => previous >= threshold && current < threshold,
    }
}
