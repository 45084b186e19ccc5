//! Selection predicates over a loaded dataset.
//!
//! Categories combine with AND; values within a category combine with OR
//! (set membership). The result borrows events from the dataset, so a
//! filtered view can never hold a record that was not loaded.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::event::{Dataset, SshEvent};

/// Event-type predicate. `All` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum EventChoice {
    #[default]
    All,
    Only(String),
}

/// The active filter selection.
///
/// `None` for a set means the category is unconstrained. An empty IP set
/// matches nothing; an empty user set leaves users unconstrained, and the
/// user predicate is skipped entirely for datasets without a User column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub event: EventChoice,
    pub source_ips: Option<BTreeSet<String>>,
    pub users: Option<BTreeSet<String>>,
}

impl Selection {
    /// The identity selection: every event passes.
    pub fn all() -> Self {
        Selection::default()
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event = EventChoice::Only(event_id.into());
        self
    }

    pub fn with_source_ips<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_ips = Some(ips.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = Some(users.into_iter().map(Into::into).collect());
        self
    }

    /// Check a single event against the selection.
    ///
    /// `user_column` says whether the dataset carries users at all.
    pub fn matches(&self, event: &SshEvent, user_column: bool) -> bool {
        if let EventChoice::Only(ref id) = self.event
            && event.event_id != *id
        {
            return false;
        }

        if let Some(ref ips) = self.source_ips
            && !ips.contains(&event.source_ip)
        {
            return false;
        }

        if user_column
            && let Some(ref users) = self.users
            && !users.is_empty()
        {
            return event
                .user
                .as_ref()
                .is_some_and(|u| users.contains(u));
        }

        true
    }
}

/// Events of a dataset that passed a selection, in load order.
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    dataset: &'a Dataset,
    events: Vec<&'a SshEvent>,
}

impl<'a> Filtered<'a> {
    /// The dataset this view was taken from.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn events(&self) -> &[&'a SshEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Apply a selection to a dataset.
pub fn apply<'a>(dataset: &'a Dataset, selection: &Selection) -> Filtered<'a> {
    let user_column = dataset.has_user_column();
    let events = dataset
        .events()
        .iter()
        .filter(|e| selection.matches(e, user_column))
        .collect();
    Filtered { dataset, events }
}
