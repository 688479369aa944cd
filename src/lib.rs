//! Waveform display model builder for seismic/hydroacoustic/infrasound
//! analyst review.
//!
//! Turns raw domain entities (stations, channels, signal detections, events,
//! feature predictions, QC segments, processing masks, filters) plus UI
//! state (visibility, sort, mode, alignment) into a renderable
//! station/channel tree. The rendering surface itself is an external
//! consumer; it receives the tree by reference and treats unchanged `Arc`
//! allocations as "no redraw needed".

pub mod display;
pub mod error;
pub mod theme;
pub mod types;

pub use display::alignment::{offsets_for_mode, OffsetMap};
pub use display::builder::build_display_tree;
pub use display::params::{AlignmentMode, DisplayConfig, DisplayInputs, SortOrder, WaveformMode};
pub use display::split::{clear_split_channels, needs_split, split_station_channels};
pub use display::tree::{DisplayChannel, DisplayStation, DisplayTree};
pub use error::DisplayError;
pub use theme::{DisplayTheme, ThemeVariant};
