use crate::{Bounds, Insets, Orientation, Size};

/// Viewport facts supplied by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub padding: Insets,
    /// The viewport has no size bound on the main axis ("wrap content"): every item is laid out.
    pub wrap_content: bool,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            padding: Insets::ZERO,
            wrap_content: false,
        }
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_wrap_content(mut self, wrap_content: bool) -> Self {
        self.wrap_content = wrap_content;
        self
    }
}

/// Orientation-aware measurements over the viewport and placed children.
///
/// "Main" is the scroll axis, "cross" the other one. Coordinates are physical: a reversed layout
/// changes which collection end sits at the start, not which side is the start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutGeometry {
    orientation: Orientation,
    viewport: Viewport,
}

impl LayoutGeometry {
    pub fn new(orientation: Orientation, viewport: Viewport) -> Self {
        Self {
            orientation,
            viewport,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_infinite(&self) -> bool {
        self.viewport.wrap_content
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    pub fn main_size(&self) -> i32 {
        if self.is_vertical() {
            self.viewport.height
        } else {
            self.viewport.width
        }
    }

    pub fn cross_size(&self) -> i32 {
        if self.is_vertical() {
            self.viewport.width
        } else {
            self.viewport.height
        }
    }

    pub fn start_padding(&self) -> i32 {
        let p = self.viewport.padding;
        if self.is_vertical() { p.top } else { p.left }
    }

    pub fn end_padding(&self) -> i32 {
        let p = self.viewport.padding;
        if self.is_vertical() { p.bottom } else { p.right }
    }

    pub fn start_after_padding(&self) -> i32 {
        self.start_padding()
    }

    pub fn end_after_padding(&self) -> i32 {
        self.main_size() - self.end_padding()
    }

    pub fn total_space(&self) -> i32 {
        (self.end_after_padding() - self.start_after_padding()).max(0)
    }

    pub fn cross_start_after_padding(&self) -> i32 {
        let p = self.viewport.padding;
        if self.is_vertical() { p.left } else { p.top }
    }

    pub fn cross_space(&self) -> i32 {
        let p = self.viewport.padding;
        let padding = if self.is_vertical() {
            p.left + p.right
        } else {
            p.top + p.bottom
        };
        (self.cross_size() - padding).max(0)
    }

    pub fn main_of(&self, size: Size) -> i32 {
        if self.is_vertical() {
            size.height
        } else {
            size.width
        }
    }

    pub fn cross_of(&self, size: Size) -> i32 {
        if self.is_vertical() {
            size.width
        } else {
            size.height
        }
    }

    /// Decoration amounts before/after an item on the main axis.
    pub fn main_decoration(&self, decor: Insets) -> (i32, i32) {
        if self.is_vertical() {
            (decor.top, decor.bottom)
        } else {
            (decor.left, decor.right)
        }
    }

    /// Decoration amounts before/after an item on the cross axis.
    pub fn cross_decoration(&self, decor: Insets) -> (i32, i32) {
        if self.is_vertical() {
            (decor.left, decor.right)
        } else {
            (decor.top, decor.bottom)
        }
    }

    /// Builds placed bounds from main/cross ranges of the undecorated item.
    pub fn bounds(
        &self,
        main_start: i32,
        main_end: i32,
        cross_start: i32,
        cross_end: i32,
    ) -> Bounds {
        if self.is_vertical() {
            Bounds {
                left: cross_start,
                top: main_start,
                right: cross_end,
                bottom: main_end,
            }
        } else {
            Bounds {
                left: main_start,
                top: cross_start,
                right: main_end,
                bottom: cross_end,
            }
        }
    }

    pub fn start(&self, bounds: Bounds) -> i32 {
        if self.is_vertical() {
            bounds.top
        } else {
            bounds.left
        }
    }

    pub fn end(&self, bounds: Bounds) -> i32 {
        if self.is_vertical() {
            bounds.bottom
        } else {
            bounds.right
        }
    }

    pub fn measurement(&self, bounds: Bounds) -> i32 {
        self.end(bounds) - self.start(bounds)
    }

    pub fn decorated_start(&self, bounds: Bounds, decor: Insets) -> i32 {
        self.start(bounds) - self.main_decoration(decor).0
    }

    pub fn decorated_end(&self, bounds: Bounds, decor: Insets) -> i32 {
        self.end(bounds) + self.main_decoration(decor).1
    }

    pub fn decorated_measurement(&self, bounds: Bounds, decor: Insets) -> i32 {
        self.decorated_end(bounds, decor) - self.decorated_start(bounds, decor)
    }

    /// Moves bounds along the main axis.
    pub fn offset(&self, bounds: Bounds, delta: i32) -> Bounds {
        if self.is_vertical() {
            Bounds {
                top: bounds.top + delta,
                bottom: bounds.bottom + delta,
                ..bounds
            }
        } else {
            Bounds {
                left: bounds.left + delta,
                right: bounds.right + delta,
                ..bounds
            }
        }
    }
}
