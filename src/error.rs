//! Error taxonomy for the display model builder.
//!
//! Missing data (no current hypothesis, no arrival, empty lists) is never an
//! error here; those cases are absorbed as `None`/empty results. The variants
//! below are contract violations raised at the point of detection.

use thiserror::Error;

use crate::display::tree::ChannelKind;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("malformed channel name {0:?}: expected STATION.GROUP.CODE")]
    MalformedChannelName(String),

    #[error("channels belong to different stations: {first:?} vs {second:?}")]
    MixedStations { first: String, second: String },

    #[error("operation requires a {expected} channel, but {id:?} is a {actual} channel")]
    WrongChannelKind {
        expected: ChannelKind,
        actual: ChannelKind,
        id: String,
    },

    #[error("no station {0:?} in the display tree")]
    UnknownStation(String),
}
