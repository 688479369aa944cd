//! Stations and raw channels, plus channel-name parsing.
//!
//! Channel names follow the `STATION.GROUP.CODE` convention, with an
//! optional `/derivation-tag` suffix on derived channels
//! (e.g. `ASAR.AS01.SHZ` or `ASAR.beam.SHZ/beam,fk`).

use serde::{Deserialize, Serialize};

use crate::error::DisplayError;

/// Geographic location of a station or channel sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub depth_km: f64,
    pub elevation_km: f64,
}

/// A raw channel as delivered by the station directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique key, `STATION.GROUP.CODE` with optional `/derivation` suffix.
    pub name: String,
    pub location: Option<Location>,
    pub sample_rate_hz: f64,
}

/// A station grouping one or more raw channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique key.
    pub name: String,
    pub channels: Vec<Channel>,
    pub location: Option<Location>,
}

/// Borrowed parse of a channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelName<'a> {
    pub station: &'a str,
    pub group: &'a str,
    pub code: &'a str,
    pub derivation: Option<&'a str>,
}

impl ChannelName<'_> {
    /// Display label without the redundant station prefix, e.g. `AS01.SHZ`.
    pub fn short_label(&self) -> String {
        format!("{}.{}", self.group, self.code)
    }

    /// Key for ordering a station's channels by group then orientation code.
    pub fn sort_key(&self) -> (String, String) {
        (self.group.to_string(), self.code.to_string())
    }
}

/// Parse a channel name into its three parts. A name that does not match
/// the convention is a data contract violation, not a recoverable state.
pub fn parse_channel_name(name: &str) -> Result<ChannelName<'_>, DisplayError> {
    let (base, derivation) = match name.split_once('/') {
        Some((base, tag)) => (base, Some(tag)),
        None => (name, None),
    };
    let mut parts = base.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(station), Some(group), Some(code), None)
            if !station.is_empty() && !group.is_empty() && !code.is_empty() =>
        {
            Ok(ChannelName {
                station,
                group,
                code,
                derivation,
            })
        }
        _ => Err(DisplayError::MalformedChannelName(name.to_string())),
    }
}

/// The station every one of `names` belongs to. Mixed ownership means the
/// caller handed us channels from different stations.
pub fn common_station<'a, I>(names: I) -> Result<Option<&'a str>, DisplayError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found: Option<&str> = None;
    for name in names {
        let parsed = parse_channel_name(name)?;
        match found {
            None => found = Some(parsed.station),
            Some(first) if first != parsed.station => {
                return Err(DisplayError::MixedStations {
                    first: first.to_string(),
                    second: parsed.station.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_channel_name() {
        let parsed = parse_channel_name("ASAR.AS01.SHZ").unwrap();
        assert_eq!(parsed.station, "ASAR");
        assert_eq!(parsed.group, "AS01");
        assert_eq!(parsed.code, "SHZ");
        assert_eq!(parsed.derivation, None);
        assert_eq!(parsed.short_label(), "AS01.SHZ");
    }

    #[test]
    fn test_parse_derived_channel_name() {
        let parsed = parse_channel_name("ASAR.beam.SHZ/beam,fk").unwrap();
        assert_eq!(parsed.group, "beam");
        assert_eq!(parsed.derivation, Some("beam,fk"));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_channel_name("ASAR.SHZ").is_err());
        assert!(parse_channel_name("ASAR.AS01.SHZ.EXTRA").is_err());
        assert!(parse_channel_name("ASAR..SHZ").is_err());
        assert!(parse_channel_name("").is_err());
    }

    #[test]
    fn test_common_station_detects_mixed_ownership() {
        let ok = common_station(["ASAR.AS01.SHZ", "ASAR.AS02.SHZ"]).unwrap();
        assert_eq!(ok, Some("ASAR"));

        let err = common_station(["ASAR.AS01.SHZ", "WRA.W01.BHZ"]);
        assert!(matches!(err, Err(DisplayError::MixedStations { .. })));

        assert_eq!(common_station([]).unwrap(), None);
    }

    #[test]
    fn test_sort_key_orders_group_then_code() {
        let a = parse_channel_name("ASAR.AS01.SHZ").unwrap().sort_key();
        let b = parse_channel_name("ASAR.AS02.SHE").unwrap().sort_key();
        let c = parse_channel_name("ASAR.AS02.SHZ").unwrap().sort_key();
        assert!(a < b);
        assert!(b < c);
    }
}
