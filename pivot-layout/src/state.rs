/// Persistable layout state.
///
/// Only the selected position survives a teardown; alignment is recomputed by the first layout
/// pass after [`crate::PivotLayout::restore_state`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedState {
    pub position: Option<usize>,
}
