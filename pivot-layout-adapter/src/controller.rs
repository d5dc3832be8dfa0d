use pivot_layout::{
    ConfigError, FocusDirection, ItemHandle, ItemProvider, LayoutOptions, PivotLayout,
    PlacementSink, ScrollTick, Viewport,
};

use crate::ScrollPacer;

/// A framework-neutral controller that wraps a [`PivotLayout`] and paces its smooth scrolls
/// against wall-clock time.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport` when the viewport changes
/// - `move_focus` / `scroll_to_position` on input
/// - `tick(now_ms, ..)` each frame; it lays out when needed and advances smooth scrolls
#[derive(Debug)]
pub struct Controller<H> {
    layout: PivotLayout<H>,
    pacer: ScrollPacer,
}

impl<H: ItemHandle> Controller<H> {
    pub fn new(options: LayoutOptions) -> Result<Self, ConfigError> {
        Ok(Self::from_layout(PivotLayout::new(options)?))
    }

    pub fn from_layout(layout: PivotLayout<H>) -> Self {
        Self {
            layout,
            pacer: ScrollPacer::default(),
        }
    }

    pub fn with_pacer(mut self, pacer: ScrollPacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn layout(&self) -> &PivotLayout<H> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut PivotLayout<H> {
        &mut self.layout
    }

    pub fn into_layout(self) -> PivotLayout<H> {
        self.layout
    }

    pub fn pacer(&self) -> &ScrollPacer {
        &self.pacer
    }

    pub fn is_animating(&self) -> bool {
        self.layout.is_scrolling()
    }

    pub fn cancel_animation(&mut self) {
        if self.layout.cancel_scroll() {
            adebug!("smooth scroll cancelled by the host");
        }
        self.pacer.reset();
    }

    pub fn on_viewport(&mut self, viewport: Viewport) {
        self.layout.set_viewport(viewport);
    }

    /// Moves the selection. A smooth move restarts the pacer ramp.
    pub fn move_focus<P, S>(
        &mut self,
        direction: FocusDirection,
        provider: &mut P,
        sink: &mut S,
    ) -> Option<usize>
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        let was_animating = self.layout.is_scrolling();
        let target = self.layout.move_focus(direction, provider, sink);
        if !was_animating {
            self.pacer.reset();
        }
        target
    }

    pub fn scroll_to_position<P, S>(
        &mut self,
        position: usize,
        smooth: bool,
        provider: &mut P,
        sink: &mut S,
    ) where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        self.pacer.reset();
        self.layout
            .scroll_to_position(position, 0, smooth, provider, sink);
    }

    /// Advances the controller.
    ///
    /// Runs a pending layout pass first, then one paced smooth-scroll step if a scroll is in
    /// flight.
    pub fn tick<P, S>(&mut self, now_ms: u64, provider: &mut P, sink: &mut S) -> ScrollTick
    where
        P: ItemProvider<Handle = H>,
        S: PlacementSink<H>,
    {
        if self.layout.needs_layout() {
            adebug!(now_ms, "running pending layout");
            self.layout.layout(provider, sink);
        }
        if !self.layout.is_scrolling() {
            self.pacer.reset();
            return ScrollTick::Idle;
        }

        let step = self.pacer.step(now_ms);
        let tick = self.layout.tick_by(step, provider, sink);
        atrace!(now_ms, step, ?tick, "paced scroll tick");
        if !matches!(tick, ScrollTick::Scrolling { .. }) {
            self.pacer.reset();
        }
        tick
    }
}
