use crate::Selection;

/// Smooth-scroll bookkeeping: the current target and the per-tick step policy.
///
/// The layout drives it: each tick asks for the next delta given whether the target is
/// materialized and how far it is from its aligned position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollCoordinator {
    target: Option<Selection>,
    ticks: u32,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<Selection> {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Ticks run since the current target was set.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Starts scrolling toward `target`, replacing any scroll in flight. Returns the replaced
    /// target.
    pub fn start(&mut self, target: Selection) -> Option<Selection> {
        self.ticks = 0;
        self.target.replace(target)
    }

    /// Stops scrolling where the content is. Returns whether a scroll was in flight.
    pub fn cancel(&mut self) -> bool {
        self.ticks = 0;
        self.target.take().is_some()
    }

    /// The delta for the next tick.
    ///
    /// With `remaining` known (the target is materialized), the step closes as much of it as
    /// `max_step` allows. Otherwise it moves a full step toward the target; `toward_end` is in
    /// layout terms.
    pub fn next_step(&mut self, remaining: Option<i32>, toward_end: bool, max_step: u32) -> i32 {
        self.ticks = self.ticks.saturating_add(1);
        let max = i32::try_from(max_step).unwrap_or(i32::MAX).max(1);
        match remaining {
            Some(delta) => delta.clamp(-max, max),
            None if toward_end => max,
            None => -max,
        }
    }
}
