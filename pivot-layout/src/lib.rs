//! A headless pivot layout engine for grids and lists driven by directional input.
//!
//! For host-side helpers (view pools, a pooled provider, smooth-scroll pacing), see the
//! `pivot-layout-adapter` crate.
//!
//! The engine decides which items of a large collection are materialized, where each one is
//! placed, and keeps one selected item (the pivot) aligned to a configurable keyline while
//! directional moves walk the selection across rows and spans.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - the viewport (size, padding, orientation)
//! - views and their measured sizes, through an [`ItemProvider`]
//! - somewhere to put the computed bounds, through a [`PlacementSink`]
//! - structural change notifications and directional input
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod alignment;
mod error;
mod fill;
mod focus;
mod geometry;
mod grid_row;
mod host;
mod layout;
mod options;
mod pivot;
mod scrap;
mod scroll;
mod spans;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use alignment::{AlignmentCalculator, ChildAlignment, ChildExtent, Edge, ParentAlignment};
pub use error::ConfigError;
pub use fill::FillRequest;
pub use focus::FocusNavigator;
pub use geometry::{LayoutGeometry, Viewport};
pub use grid_row::GridRow;
pub use host::{AnchorRegion, ItemHandle, ItemProvider, PlacementSink};
pub use layout::{LayoutRequester, PivotLayout};
pub use options::{
    ExtraLayoutSpace, ExtraSpace, ExtraSpaceRequest, ExtraSpaceStrategy, LayoutCompletedCallback,
    LayoutOptions, SelectionCallback,
};
pub use pivot::{PivotState, SelectionChange};
pub use scroll::ScrollCoordinator;
pub use spans::{SpanInfo, SpanSizeLookup};
pub use state::SavedState;
pub use types::{
    Bounds, ChildInfo, FillDirection, FocusDirection, FocusableDirection, Insets, ItemDirection,
    ItemKey, LayoutPass, LayoutWindow, MeasureSpec, Orientation, ScrollTick, Selection, Size,
};
