//! CSV export of a filtered view.
//!
//! The output keeps the input columns in order and adds a `Critique`
//! column (`True`/`False`). Timestamps are rewritten in a normalized
//! layout; unparseable ones are written empty.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::aggregate::CriticalSet;
use crate::error::Result;
use crate::event::{CRITIQUE, TIMESTAMP};
use crate::filter::Filtered;

/// Layout written for timestamps. Fractional seconds appear only when set.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Write the filtered events as CSV. Returns the number of rows written.
pub fn write_csv<W: Write>(
    view: &Filtered<'_>,
    critical: &CriticalSet,
    writer: W,
) -> Result<usize> {
    let dataset = view.dataset();
    let timestamp_col = dataset.column_index(TIMESTAMP);
    let critique_col = dataset.column_index(CRITIQUE);

    let mut header: Vec<&str> = dataset.columns().iter().map(String::as_str).collect();
    if critique_col.is_none() {
        header.push(CRITIQUE);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&header)?;

    for event in view.events() {
        let mut row = event.fields().to_vec();
        if let Some(i) = timestamp_col {
            row[i] = event
                .timestamp
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default();
        }
        let flag = if critical.is_critical(event) { "True" } else { "False" };
        match critique_col {
            Some(i) => row[i] = flag.to_string(),
            None => row.push(flag.to_string()),
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(view.len())
}

/// Write the filtered events to a CSV file, replacing it if present.
pub fn export_path(view: &Filtered<'_>, critical: &CriticalSet, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let rows = write_csv(view, critical, file)?;
    log::debug!("exported {rows} rows to {}", path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Selection, apply};
    use crate::loader::load_str;

    fn export_to_string(view: &Filtered<'_>) -> String {
        let mut buf = Vec::new();
        write_csv(view, &CriticalSet::new(["4625"]), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_adds_critique_column() {
        let ds = load_str("SourceIP,EventId\n1.1.1.1,4625\n2.2.2.2,4624\n").unwrap();
        let out = export_to_string(&apply(&ds, &Selection::all()));
        assert_eq!(
            out,
            "SourceIP,EventId,Critique\n1.1.1.1,4625,True\n2.2.2.2,4624,False\n"
        );
    }

    #[test]
    fn test_only_filtered_rows() {
        let ds = load_str("SourceIP,EventId\n1.1.1.1,4625\n2.2.2.2,4624\n").unwrap();
        let out = export_to_string(&apply(&ds, &Selection::all().with_source_ips(["2.2.2.2"])));
        assert_eq!(out, "SourceIP,EventId,Critique\n2.2.2.2,4624,False\n");
    }

    #[test]
    fn test_timestamps_normalized() {
        let csv = "SourceIP,EventId,Timestamp\n\
                   1.1.1.1,4625,2024-03-01T10:15:00Z\n\
                   1.1.1.1,4625,2024-03-01T10:15:00.5\n\
                   1.1.1.1,4625,bogus\n";
        let ds = load_str(csv).unwrap();
        let out = export_to_string(&apply(&ds, &Selection::all()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "1.1.1.1,4625,2024-03-01 10:15:00,True");
        assert_eq!(lines[2], "1.1.1.1,4625,2024-03-01 10:15:00.500,True");
        assert_eq!(lines[3], "1.1.1.1,4625,,True");
    }

    #[test]
    fn test_existing_critique_column_overwritten() {
        let csv = "SourceIP,EventId,Critique\n1.1.1.1,4624,True\n";
        let ds = load_str(csv).unwrap();
        let out = export_to_string(&apply(&ds, &Selection::all()));
        assert_eq!(out, "SourceIP,EventId,Critique\n1.1.1.1,4624,False\n");
    }

    #[test]
    fn test_round_trip_reload() {
        let csv = "SourceIP,EventId,User,Timestamp\n\
                   1.1.1.1,4625,root,2024-03-01 10:15:00\n\
                   2.2.2.2,4624,,2024-03-02 11:00:00\n";
        let ds = load_str(csv).unwrap();
        let view = apply(&ds, &Selection::all());
        let reloaded = load_str(&export_to_string(&view)).unwrap();

        assert_eq!(reloaded.len(), ds.len());
        for (a, b) in ds.events().iter().zip(reloaded.events()) {
            assert_eq!(a.source_ip, b.source_ip);
            assert_eq!(a.event_id, b.event_id);
            assert_eq!(a.timestamp, b.timestamp);
        }
    }
}
