//! SSH event records and the immutable dataset that holds them.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Column holding the originating address.
pub const SOURCE_IP: &str = "SourceIP";
/// Column holding the event type code.
pub const EVENT_ID: &str = "EventId";
pub const USER: &str = "User";
pub const TIMESTAMP: &str = "Timestamp";
pub const LATITUDE: &str = "lat";
pub const LONGITUDE: &str = "lon";
/// Derived column added on export.
pub const CRITIQUE: &str = "Critique";

/// A latitude/longitude pair. Only built when both cells of a row parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One logged SSH authentication event.
#[derive(Debug, Clone, PartialEq)]
pub struct SshEvent {
    pub source_ip: String,
    pub event_id: String,
    pub user: Option<String>,
    /// `None` when the column is absent or the cell could not be parsed.
    pub timestamp: Option<NaiveDateTime>,
    pub location: Option<GeoPoint>,
    /// Raw cells in header order, kept so exports reproduce the input schema.
    pub(crate) fields: Vec<String>,
}

impl SshEvent {
    /// Raw cells of the source row, in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// An immutable, loaded set of events plus the header they came with.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    events: Vec<SshEvent>,
}

impl Dataset {
    pub(crate) fn new(columns: Vec<String>, events: Vec<SshEvent>) -> Self {
        Dataset { columns, events }
    }

    /// Column names (trimmed) in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn events(&self) -> &[SshEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Position of a column by exact (trimmed) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_user_column(&self) -> bool {
        self.column_index(USER).is_some()
    }

    pub fn has_timestamp_column(&self) -> bool {
        self.column_index(TIMESTAMP).is_some()
    }

    /// Whether both `lat` and `lon` columns are present.
    pub fn has_coordinates(&self) -> bool {
        self.column_index(LATITUDE).is_some() && self.column_index(LONGITUDE).is_some()
    }

    /// Distinct event IDs, sorted. Choices for the event-type selector.
    pub fn event_ids(&self) -> Vec<String> {
        sorted_unique(self.events.iter().map(|e| e.event_id.as_str()))
    }

    /// Distinct source addresses, sorted.
    pub fn source_ips(&self) -> Vec<String> {
        sorted_unique(self.events.iter().map(|e| e.source_ip.as_str()))
    }

    /// Distinct non-empty user names, sorted. Empty without a User column.
    pub fn users(&self) -> Vec<String> {
        sorted_unique(self.events.iter().filter_map(|e| e.user.as_deref()))
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ip: &str, id: &str, user: Option<&str>) -> SshEvent {
        SshEvent {
            source_ip: ip.to_string(),
            event_id: id.to_string(),
            user: user.map(String::from),
            timestamp: None,
            location: None,
            fields: vec![ip.to_string(), id.to_string()],
        }
    }

    #[test]
    fn test_options_sorted_and_unique() {
        let ds = Dataset::new(
            vec!["SourceIP".into(), "EventId".into(), "User".into()],
            vec![
                event("2.2.2.2", "4625", Some("root")),
                event("1.1.1.1", "4624", None),
                event("2.2.2.2", "4625", Some("admin")),
            ],
        );
        assert_eq!(ds.event_ids(), vec!["4624", "4625"]);
        assert_eq!(ds.source_ips(), vec!["1.1.1.1", "2.2.2.2"]);
        assert_eq!(ds.users(), vec!["admin", "root"]);
        assert!(ds.has_user_column());
        assert!(!ds.has_timestamp_column());
    }

    #[test]
    fn test_coordinates_need_both_columns() {
        let only_lat = Dataset::new(vec!["SourceIP".into(), "EventId".into(), "lat".into()], vec![]);
        assert!(!only_lat.has_coordinates());

        let both = Dataset::new(
            vec!["SourceIP".into(), "EventId".into(), "lat".into(), "lon".into()],
            vec![],
        );
        assert!(both.has_coordinates());
        assert!(both.is_empty());
    }
}
