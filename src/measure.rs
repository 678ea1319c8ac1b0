//! Route measure utilities.

/// Clamp a raw projected measure into `[0, route_length]`.
///
/// Projection onto route geometry can land slightly before the route start
/// or beyond its end; those positions snap to the nearest route end.
///
/// # Example
/// ```
/// use routeconflate::clamp_position;
/// assert_eq!(clamp_position(-3.0, 100.0), 0.0);
/// assert_eq!(clamp_position(42.5, 100.0), 42.5);
/// assert_eq!(clamp_position(120.0, 100.0), 100.0);
/// ```
pub fn clamp_position(raw: f64, route_length: f64) -> f64 {
    if raw < 0.0 {
        0.0
    } else if raw > route_length {
        route_length
    } else {
        raw
    }
}

/// Sort ascending by a position key. Ties keep their input order.
pub(crate) fn sort_by_position<T>(items: &mut [T], key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| key(a).total_cmp(&key(b)));
}
