/// Step size of a paced smooth scroll, in pixels per tick.
///
/// The step starts at `min_step` and eases up to `max_step` over `ramp_ms`, measured from the
/// first tick of the scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollPacer {
    pub min_step: u32,
    pub max_step: u32,
    pub ramp_ms: u64,
    pub easing: Easing,
    started_ms: Option<u64>,
}

impl Default for ScrollPacer {
    fn default() -> Self {
        Self::new(16, 96, 200, Easing::SmoothStep)
    }
}

impl ScrollPacer {
    pub fn new(min_step: u32, max_step: u32, ramp_ms: u64, easing: Easing) -> Self {
        let min_step = min_step.max(1);
        Self {
            min_step,
            max_step: max_step.max(min_step),
            ramp_ms: ramp_ms.max(1),
            easing,
            started_ms: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_ms.is_some()
    }

    /// The step for a tick at `now_ms`. The first call starts the ramp.
    pub fn step(&mut self, now_ms: u64) -> u32 {
        let started = *self.started_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(started);
        let t = elapsed as f32 / self.ramp_ms as f32;
        let span = (self.max_step - self.min_step) as f32;
        self.min_step + (span * self.easing.sample(t)) as u32
    }

    /// Ends the ramp; the next [`ScrollPacer::step`] starts over at `min_step`.
    pub fn reset(&mut self) {
        self.started_ms = None;
    }
}

/// Shape of the pacer's ramp from `min_step` up to `max_step`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    #[default]
    SmoothStep,
    EaseInOutCubic,
}

impl Easing {
    /// Fraction of the step range reached after `ramp` (elapsed over `ramp_ms`, clamped to
    /// `[0, 1]`).
    pub fn sample(self, ramp: f32) -> f32 {
        let t = ramp.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic if t < 0.5 => 4.0 * t * t * t,
            Self::EaseInOutCubic => {
                let rest = 2.0 - 2.0 * t;
                1.0 - rest * rest * rest / 2.0
            }
        }
    }
}
