//! The full set of views computed for one filter selection.

use serde::Serialize;

use crate::aggregate::{
    self, DayCount, HistogramBin, KeyCount, MapPoint, Status, unique_source_ips, unique_users,
};
use crate::config::DashboardConfig;
use crate::filter::Filtered;

/// Headline metrics over the filtered events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_events: usize,
    pub unique_ips: usize,
    /// Zero when the dataset has no User column.
    pub unique_users: usize,
    pub critical_events: usize,
}

/// Per-day counts for all events and for critical events only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub all: Vec<DayCount>,
    pub critical: Vec<DayCount>,
}

/// Everything derived from a non-empty filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub status: Status,
    /// Most active source addresses, descending.
    pub top_ips: Vec<KeyCount>,
    /// Events per event ID, in first-seen order.
    pub event_types: Vec<KeyCount>,
    pub attempts_histogram: Vec<HistogramBin>,
    /// Present only when the dataset has a Timestamp column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<DailySeries>,
    /// Present only when the dataset has both lat and lon columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_points: Option<Vec<MapPoint>>,
}

impl Report {
    /// Compute every view for `view`.
    ///
    /// Returns `None` when nothing passed the filters. Callers report that
    /// as a warning rather than an error.
    pub fn build(view: &Filtered<'_>, config: &DashboardConfig) -> Option<Report> {
        if view.is_empty() {
            return None;
        }

        let events = view.events();
        let dataset = view.dataset();
        let critical = config.critical_set();
        let critical_events = critical.count(events);

        let summary = Summary {
            total_events: events.len(),
            unique_ips: unique_source_ips(events),
            unique_users: if dataset.has_user_column() {
                unique_users(events)
            } else {
                0
            },
            critical_events,
        };

        let daily = dataset.has_timestamp_column().then(|| {
            let (hot, _) = critical.partition(events);
            DailySeries {
                all: aggregate::daily_counts(events),
                critical: aggregate::daily_counts(&hot),
            }
        });

        Some(Report {
            status: Status::classify(critical_events, &config.status),
            summary,
            top_ips: aggregate::top_k(aggregate::count_by_source_ip(events), config.top_k),
            event_types: aggregate::count_by_event_id(events),
            attempts_histogram: aggregate::attempts_histogram(events, config.histogram_bins),
            daily,
            map_points: dataset
                .has_coordinates()
                .then(|| aggregate::map_points(events)),
        })
    }
}
