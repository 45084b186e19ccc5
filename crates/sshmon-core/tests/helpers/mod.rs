#![allow(dead_code)]

use sshmon_core::{Dataset, DashboardConfig, Report, Selection, apply, load_str};

/// Header plus rows joined into CSV text.
pub fn csv(header: &str, rows: &[&str]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

pub fn dataset(header: &str, rows: &[&str]) -> Dataset {
    load_str(&csv(header, rows)).unwrap()
}

pub fn report(dataset: &Dataset, selection: &Selection) -> Option<Report> {
    let view = apply(dataset, selection);
    Report::build(&view, &DashboardConfig::default())
}

/// A small mixed dataset with every optional column populated.
pub fn sample() -> Dataset {
    dataset(
        "SourceIP,EventId,User,Timestamp,lat,lon",
        &[
            "10.0.0.1,4625,root,2024-06-01 08:00:00,48.85,2.35",
            "10.0.0.1,4625,root,2024-06-01 09:30:00,48.85,2.35",
            "10.0.0.2,4624,alice,2024-06-01 10:00:00,,",
            "10.0.0.3,4625,admin,2024-06-02 03:15:00,52.52,13.40",
            "10.0.0.1,4624,root,2024-06-02 04:00:00,48.85,2.35",
            "10.0.0.4,4625,,not-a-date,40.71,-74.00",
            "10.0.0.3,4625,admin,2024-06-03 22:00:00,52.52,13.40",
            "10.0.0.5,4634,bob,2024-06-03 23:59:59,,",
        ],
    )
}
