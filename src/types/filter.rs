//! Filter selection: the key into per-channel waveform-segment maps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An explicit filter definition carried by the filter list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub name: String,
    pub description: Option<String>,
}

/// The analyst's filter choice for a station or channel. The resolved name
/// keys the per-filter waveform-segment maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Unfiltered,
    Named(String),
    Defined(FilterDefinition),
}

impl Filter {
    /// Resolved display/lookup name; `"Unfiltered"` when no filter applies.
    pub fn name(&self) -> &str {
        match self {
            Filter::Unfiltered => "Unfiltered",
            Filter::Named(name) => name,
            Filter::Defined(def) => &def.name,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_name_resolution() {
        assert_eq!(Filter::Unfiltered.name(), "Unfiltered");
        assert_eq!(Filter::Named("HAM FIR BP 0.70-2.00 Hz".to_string()).name(),
            "HAM FIR BP 0.70-2.00 Hz");
        assert_eq!(
            Filter::Defined(FilterDefinition {
                name: "BW IIR LP 4.2".to_string(),
                description: None,
            })
            .name(),
            "BW IIR LP 4.2"
        );
    }

    #[test]
    fn test_default_is_unfiltered() {
        assert_eq!(Filter::default(), Filter::Unfiltered);
    }
}
