//! Linear rescaling of counts onto a small integer intensity scale.

use std::collections::BTreeMap;

/// Rescale every slot into `[low, high]`, rounding up to the next integer.
///
/// When all slots hold the same value the range is treated as 1, so every
/// slot lands on `low`. Slots that already form a normalized scale (integral,
/// inside the bounds and spanning exactly `low..=high`, or all equal to `low`)
/// are left untouched, which makes the operation idempotent.
pub fn normalize_slots<'a, I>(slots: I, low: f64, high: f64)
where
    I: IntoIterator<Item = &'a mut f64>,
{
    let mut slots: Vec<&'a mut f64> = slots.into_iter().collect();
    if slots.is_empty() {
        return;
    }

    let min = slots.iter().map(|v| **v).fold(f64::INFINITY, f64::min);
    let max = slots.iter().map(|v| **v).fold(f64::NEG_INFINITY, f64::max);

    if is_normalized(&slots, min, max, low, high) {
        return;
    }

    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let span = high - low;
    for slot in slots.iter_mut() {
        let unit = (**slot - min) / range;
        **slot = (unit * span + low).ceil();
    }
}

fn is_normalized(slots: &[&mut f64], min: f64, max: f64, low: f64, high: f64) -> bool {
    let integral = slots.iter().all(|v| v.fract() == 0.0);
    let spans_scale = (min == low && max == high) || (min == low && max == low);
    integral && spans_scale
}

/// Normalize the values of a day (or any key) to count mapping in place.
pub fn normalize_map<K: Ord>(map: &mut BTreeMap<K, f64>, low: f64, high: f64) {
    normalize_slots(map.values_mut(), low, high);
}

/// Normalize the counts of a `(label, count)` list in place, keeping order.
pub fn normalize_pairs<L>(pairs: &mut [(L, f64)], low: f64, high: f64) {
    normalize_slots(pairs.iter_mut().map(|(_, v)| v), low, high);
}
