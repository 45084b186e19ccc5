//! # sshmon-core
//!
//! Load SSH authentication events from CSV, narrow them with filter
//! selections, and compute the views a monitoring dashboard shows:
//! top offending addresses, event-type distribution, per-day attack counts,
//! critical-event status, and a filtered CSV export.
//!
//! ## Architecture
//!
//! - **Loader**: parses CSV into an immutable [`Dataset`]. `SourceIP` and
//!   `EventId` are required; timestamps are parsed best-effort.
//! - **Filter**: a [`Selection`] of event type, source addresses and users,
//!   applied as AND across categories and set membership within each.
//! - **Aggregate**: pure group-by counts, top-k ranking, calendar-day
//!   series and critical-event classification over the filtered events.
//! - **Session**: memoizes the loaded dataset by input content and
//!   recomputes every view per selection.
//!
//! ## Quick Start
//!
//! ```rust
//! use sshmon_core::{DashboardConfig, Report, Selection, apply, load_str};
//!
//! let csv = "SourceIP,EventId\n1.1.1.1,4625\n1.1.1.1,4624\n2.2.2.2,4625\n";
//! let dataset = load_str(csv).unwrap();
//!
//! let view = apply(&dataset, &Selection::all());
//! let report = Report::build(&view, &DashboardConfig::default()).unwrap();
//!
//! assert_eq!(report.summary.critical_events, 2);
//! assert_eq!(report.top_ips[0].key, "1.1.1.1");
//! assert_eq!(report.top_ips[0].count, 2);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod filter;
pub mod loader;
pub mod report;
pub mod session;

// Re-export the most commonly used types and functions at crate root
pub use aggregate::{
    CriticalSet, DayCount, HistogramBin, KeyCount, MapPoint, Status, attempts_histogram,
    count_by_event_id, count_by_source_ip, daily_counts, histogram, map_points, top_k,
};
pub use config::{
    DEFAULT_CRITICAL_EVENT_ID, DEFAULT_EXPORT_FILE_NAME, DashboardConfig, StatusThresholds,
};
pub use error::{Result, SshMonError};
pub use event::{Dataset, GeoPoint, SshEvent};
pub use export::{export_path, write_csv};
pub use filter::{EventChoice, Filtered, Selection, apply};
pub use loader::{load_path, load_reader, load_str, parse_timestamp};
pub use report::{DailySeries, Report, Summary};
pub use session::Session;
