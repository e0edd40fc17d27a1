use crate::core::config::StepLimits;
use crate::core::region::Region;

/// The edge of the fetched region grown by one expansion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `max_y`
    Down,
    /// `min_y`
    Up,
    /// `max_x`
    Right,
    /// `min_x`
    Left,
}

fn increase_from(current: f64, desired: f64, steps: StepLimits) -> f64 {
    desired
        .min(current + steps.max_step)
        .max(current + steps.min_step)
}

fn decrease_from(current: f64, desired: f64, steps: StepLimits) -> f64 {
    desired
        .max(current - steps.max_step)
        .min(current - steps.min_step)
}

/// Grows one edge of `have` towards `desired` and returns the strip added.
///
/// Edges are tried in the order down, up, right, left and only the first
/// one short of `desired` moves. It moves by at least `min_step` (which may
/// overshoot `desired`) and at most `max_step`. Returns `None` once `have`
/// covers `desired`.
pub fn expand_towards(
    have: &mut Region,
    desired: &Region,
    steps: StepLimits,
) -> Option<(Edge, Region)> {
    if desired.max_y > have.max_y {
        let old = have.max_y;
        have.max_y = increase_from(old, desired.max_y, steps);
        Some((
            Edge::Down,
            Region::new(have.min_x, have.max_x, old, have.max_y),
        ))
    } else if desired.min_y < have.min_y {
        let old = have.min_y;
        have.min_y = decrease_from(old, desired.min_y, steps);
        Some((Edge::Up, Region::new(have.min_x, have.max_x, have.min_y, old)))
    } else if desired.max_x > have.max_x {
        let old = have.max_x;
        have.max_x = increase_from(old, desired.max_x, steps);
        Some((
            Edge::Right,
            Region::new(old, have.max_x, have.min_y, have.max_y),
        ))
    } else if desired.min_x < have.min_x {
        let old = have.min_x;
        have.min_x = decrease_from(old, desired.min_x, steps);
        Some((Edge::Left, Region::new(have.min_x, old, have.min_y, have.max_y)))
    } else {
        None
    }
}
