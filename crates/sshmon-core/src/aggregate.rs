//! Group-by counts, rankings and classifications over filtered events.
//!
//! Every function here is pure and takes the events of a filtered view;
//! none of them look at the unfiltered dataset.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::StatusThresholds;
use crate::event::{GeoPoint, SshEvent};

// =============================================================================
// Grouped counts
// =============================================================================

/// A grouping key with its number of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCount {
    pub key: String,
    pub count: usize,
}

/// Count events per key, keeping keys in the order they were first seen.
fn count_by<'a, F>(events: &[&'a SshEvent], key: F) -> Vec<KeyCount>
where
    F: Fn(&'a SshEvent) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<KeyCount> = Vec::new();

    for &event in events {
        let k = key(event);
        match index.get(k) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(k, counts.len());
                counts.push(KeyCount {
                    key: k.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts
}

/// Events per source address, in first-seen order.
pub fn count_by_source_ip(events: &[&SshEvent]) -> Vec<KeyCount> {
    count_by(events, |e| e.source_ip.as_str())
}

/// Events per event ID, in first-seen order.
pub fn count_by_event_id(events: &[&SshEvent]) -> Vec<KeyCount> {
    count_by(events, |e| e.event_id.as_str())
}

/// The `k` largest counts, descending. Ties keep their input order.
pub fn top_k(mut counts: Vec<KeyCount>, k: usize) -> Vec<KeyCount> {
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(k);
    counts
}

pub fn unique_source_ips(events: &[&SshEvent]) -> usize {
    events
        .iter()
        .map(|e| e.source_ip.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct non-empty users.
pub fn unique_users(events: &[&SshEvent]) -> usize {
    events
        .iter()
        .filter_map(|e| e.user.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

// =============================================================================
// Critical events
// =============================================================================

/// The watch-list of event IDs treated as likely attacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriticalSet {
    ids: HashSet<String>,
}

impl CriticalSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CriticalSet {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.ids.contains(event_id)
    }

    pub fn is_critical(&self, event: &SshEvent) -> bool {
        self.contains(&event.event_id)
    }

    pub fn count(&self, events: &[&SshEvent]) -> usize {
        events.iter().filter(|e| self.is_critical(e)).count()
    }

    /// Split events into `(critical, non_critical)`, each in input order.
    pub fn partition<'a>(
        &self,
        events: &[&'a SshEvent],
    ) -> (Vec<&'a SshEvent>, Vec<&'a SshEvent>) {
        events.iter().copied().partition(|e| self.is_critical(e))
    }
}

/// Alert level derived from the number of critical events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Elevated,
    Critical,
}

impl Status {
    pub fn classify(critical_events: usize, thresholds: &StatusThresholds) -> Self {
        if critical_events == 0 {
            Status::Normal
        } else if critical_events < thresholds.critical_at {
            Status::Elevated
        } else {
            Status::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Elevated => "elevated",
            Status::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Time series
// =============================================================================

/// Events on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: usize,
}

/// Events per calendar day, oldest first. Events without a timestamp are
/// skipped.
pub fn daily_counts(events: &[&SshEvent]) -> Vec<DayCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ts in events.iter().filter_map(|e| e.timestamp) {
        *days.entry(ts.date()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(day, count)| DayCount { day, count })
        .collect()
}

// =============================================================================
// Histogram
// =============================================================================

/// One equal-width bin. `end` is exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin a set of values into `bins` equal-width bins spanning their range.
///
/// A range of width zero is widened to `[v - 0.5, v + 0.5]`. Returns no
/// bins for no values or `bins == 0`.
pub fn histogram(values: &[usize], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v as f64 - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Histogram of how many attempts each source address made.
pub fn attempts_histogram(events: &[&SshEvent], bins: usize) -> Vec<HistogramBin> {
    let per_ip: Vec<usize> = count_by_source_ip(events)
        .into_iter()
        .map(|kc| kc.count)
        .collect();
    histogram(&per_ip, bins)
}

// =============================================================================
// Map points
// =============================================================================

/// A source address with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub source_ip: String,
    #[serde(flatten)]
    pub location: GeoPoint,
}

/// One point per source address that has coordinates; the first located
/// row of each address wins.
pub fn map_points(events: &[&SshEvent]) -> Vec<MapPoint> {
    let mut seen: HashSet<&str> = HashSet::new();
    events
        .iter()
        .filter_map(|e| e.location.map(|loc| (e.source_ip.as_str(), loc)))
        .filter(|(ip, _)| seen.insert(*ip))
        .map(|(ip, location)| MapPoint {
            source_ip: ip.to_string(),
            location,
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
