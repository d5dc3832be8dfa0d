use crate::spans::SpanCache;
use crate::{FocusDirection, FocusableDirection, Orientation};

/// What the navigator needs to know about the collection.
pub(crate) struct NavigationContext<'a> {
    pub(crate) orientation: Orientation,
    pub(crate) reverse_layout: bool,
    pub(crate) spans: &'a mut SpanCache,
    pub(crate) is_focusable: &'a dyn Fn(usize) -> bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Movement {
    /// Between rows; `forward` is toward higher positions.
    Main { forward: bool },
    /// Within a row.
    Cross { forward: bool },
}

fn movement(direction: FocusDirection, orientation: Orientation, reverse: bool) -> Movement {
    match (orientation, direction) {
        (Orientation::Vertical, FocusDirection::Down)
        | (Orientation::Horizontal, FocusDirection::Right) => Movement::Main { forward: !reverse },
        (Orientation::Vertical, FocusDirection::Up)
        | (Orientation::Horizontal, FocusDirection::Left) => Movement::Main { forward: reverse },
        (Orientation::Vertical, FocusDirection::Right)
        | (Orientation::Horizontal, FocusDirection::Down) => Movement::Cross { forward: true },
        (Orientation::Vertical, FocusDirection::Left)
        | (Orientation::Horizontal, FocusDirection::Up) => Movement::Cross { forward: false },
    }
}

/// `Some(forward)` when `direction` runs along the scroll axis.
pub(crate) fn main_axis_forward(
    direction: FocusDirection,
    orientation: Orientation,
    reverse: bool,
) -> Option<bool> {
    match movement(direction, orientation, reverse) {
        Movement::Main { forward } => Some(forward),
        Movement::Cross { .. } => None,
    }
}

/// Resolves directional moves to target positions.
///
/// Moving along the scroll axis goes to the adjacent row, at the same span, skipping rows whose
/// item there is not focusable. Moving across it stays in the row and follows
/// [`FocusableDirection`]. When no target exists, the matching `focus_out_*` flag decides
/// between leaving the layout (`None`) and keeping the current item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusNavigator {
    pub focusable_direction: FocusableDirection,
    /// Leave when moving past the first row.
    pub focus_out_front: bool,
    /// Leave when moving past the last row.
    pub focus_out_back: bool,
    /// Leave when moving past a row's first span.
    pub focus_out_side_front: bool,
    /// Leave when moving past a row's last span.
    pub focus_out_side_back: bool,
}

impl FocusNavigator {
    pub(crate) fn next(
        &self,
        current: usize,
        direction: FocusDirection,
        mut ctx: NavigationContext<'_>,
    ) -> Option<usize> {
        if current >= ctx.spans.item_count() {
            return None;
        }
        let movement = movement(direction, ctx.orientation, ctx.reverse_layout);
        let target = match movement {
            Movement::Main { forward } => main_target(current, forward, &mut ctx),
            Movement::Cross { forward } => {
                cross_target(current, forward, self.focusable_direction, &mut ctx)
            }
        };
        if target.is_some() {
            return target;
        }
        let focus_out = match movement {
            Movement::Main { forward: true } => self.focus_out_back,
            Movement::Main { forward: false } => self.focus_out_front,
            Movement::Cross { forward: true } => self.focus_out_side_back,
            Movement::Cross { forward: false } => self.focus_out_side_front,
        };
        ldebug!(current, ?direction, focus_out, "no focus target");
        if focus_out { None } else { Some(current) }
    }
}

fn main_target(current: usize, forward: bool, ctx: &mut NavigationContext<'_>) -> Option<usize> {
    let spans = &mut *ctx.spans;
    let info = spans.info(current);
    let mut row = info.row;
    loop {
        row = if forward { row + 1 } else { row.checked_sub(1)? };
        let candidate = spans.item_at_span(row, info.span_index)?;
        if (ctx.is_focusable)(candidate) {
            return Some(candidate);
        }
    }
}

fn cross_target(
    current: usize,
    forward: bool,
    policy: FocusableDirection,
    ctx: &mut NavigationContext<'_>,
) -> Option<usize> {
    let spans = &mut *ctx.spans;
    let count = spans.item_count();
    let step = |p: usize| -> Option<usize> {
        if forward {
            (p + 1 < count).then_some(p + 1)
        } else {
            p.checked_sub(1)
        }
    };
    match policy {
        FocusableDirection::Standard => {
            let next = step(current)?;
            let same_row = spans.row(next) == spans.row(current);
            (same_row && (ctx.is_focusable)(next)).then_some(next)
        }
        FocusableDirection::Continuous => {
            let mut p = current;
            loop {
                p = step(p)?;
                if (ctx.is_focusable)(p) {
                    return Some(p);
                }
            }
        }
        FocusableDirection::Circular => {
            let first = spans.row_start(current);
            let last = spans.row_end(current);
            let mut p = current;
            loop {
                p = match (forward, p) {
                    (true, p) if p >= last => first,
                    (true, p) => p + 1,
                    (false, p) if p <= first => last,
                    (false, p) => p - 1,
                };
                if p == current {
                    return None;
                }
                if (ctx.is_focusable)(p) {
                    return Some(p);
                }
            }
        }
    }
}
