//! The waveform display model: everything between the raw domain entities
//! and the rendering surface.

pub mod alignment;
pub mod builder;
pub mod diff;
pub mod geo;
pub mod interval;
pub mod masks;
pub mod params;
pub mod selection;
pub mod split;
pub mod tree;
