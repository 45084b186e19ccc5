//! CSV loading into a typed [`Dataset`].
//!
//! The header must name `SourceIP` and `EventId`; every row must carry a
//! value for both. `User`, `Timestamp`, `lat` and `lon` are optional.
//! A timestamp that cannot be parsed becomes `None` instead of failing the
//! load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::error::{Result, SshMonError};
use crate::event::{
    Dataset, EVENT_ID, GeoPoint, LATITUDE, LONGITUDE, SOURCE_IP, SshEvent, TIMESTAMP, USER,
};

/// Naive layouts tried in order after RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Offset-carrying layouts that RFC 3339 parsing does not cover.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Column positions resolved once from the header.
struct Layout {
    source_ip: usize,
    event_id: usize,
    user: Option<usize>,
    timestamp: Option<usize>,
    coordinates: Option<(usize, usize)>,
}

impl Layout {
    fn resolve(columns: &[String]) -> Result<Self> {
        let find = |name: &str| columns.iter().position(|c| c == name);
        let required =
            |name: &str| find(name).ok_or_else(|| SshMonError::MissingColumn(name.to_string()));

        Ok(Layout {
            source_ip: required(SOURCE_IP)?,
            event_id: required(EVENT_ID)?,
            user: find(USER),
            timestamp: find(TIMESTAMP),
            coordinates: find(LATITUDE).zip(find(LONGITUDE)),
        })
    }
}

/// Load a dataset from any reader producing CSV text.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let layout = Layout::resolve(&columns)?;

    let mut events = Vec::new();
    let mut coerced = 0usize;

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let source_ip = required_cell(&record, layout.source_ip, SOURCE_IP, line)?;
        let event_id = required_cell(&record, layout.event_id, EVENT_ID, line)?;

        let user = layout
            .user
            .and_then(|i| non_empty(&record, i))
            .map(String::from);

        let timestamp = match layout.timestamp.and_then(|i| non_empty(&record, i)) {
            Some(raw) => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    coerced += 1;
                }
                parsed
            }
            None => None,
        };

        let location = layout
            .coordinates
            .and_then(|(lat, lon)| parse_point(&record, lat, lon));

        events.push(SshEvent {
            source_ip,
            event_id,
            user,
            timestamp,
            location,
            fields: record.iter().map(String::from).collect(),
        });
    }

    if coerced > 0 {
        log::warn!("{coerced} timestamp value(s) could not be parsed and were left empty");
    }
    log::debug!(
        "loaded {} events with {} columns",
        events.len(),
        columns.len()
    );

    Ok(Dataset::new(columns, events))
}

/// Load a dataset from CSV text.
pub fn load_str(csv_text: &str) -> Result<Dataset> {
    load_reader(csv_text.as_bytes())
}

/// Load a dataset from a CSV file.
pub fn load_path(path: &Path) -> Result<Dataset> {
    let file = File::open(path)?;
    load_reader(file)
}

/// Best-effort timestamp parsing. Values with an offset are normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    // Date only: midnight
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn non_empty(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).map(str::trim).filter(|s| !s.is_empty())
}

fn required_cell(record: &StringRecord, index: usize, column: &str, line: u64) -> Result<String> {
    non_empty(record, index)
        .map(String::from)
        .ok_or_else(|| SshMonError::MissingValue {
            line,
            column: column.to_string(),
        })
}

fn parse_point(record: &StringRecord, lat: usize, lon: usize) -> Option<GeoPoint> {
    let parse = |i: usize| {
        non_empty(record, i)?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    };
    Some(GeoPoint {
        lat: parse(lat)?,
        lon: parse(lon)?,
    })
}
