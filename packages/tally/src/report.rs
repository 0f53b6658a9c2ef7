//! Read-side aggregation of the analytics store.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use derive_more::Display;
use itertools::Itertools;

use crate::naming;
use crate::store::Store;

/// Orderings for the usage report.
#[derive(ValueEnum, Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum SortKey {
    /// Most recently used rules first.
    #[default]
    #[display("last")]
    Last,

    /// Earliest first use first.
    #[display("first")]
    First,

    /// Alias for `last`.
    #[display("recent")]
    Recent,

    /// Filename, ascending.
    #[display("name")]
    Name,
}

/// One row of the usage report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSummary {
    pub filename: String,
    /// Sum of every agent's usage count for this rule.
    pub total_usage: u64,
    /// The agent with the most recent use, and when that was.
    pub last_agent: String,
    pub last_used: DateTime<Utc>,
    /// Earliest first use across the rule's agents.
    pub first_used: DateTime<Utc>,
    pub previous_names: Vec<String>,
}

/// Aggregate the store into report rows, filtered and sorted.
///
/// The filter is normalized the same way as agent names and keeps rules
/// with at least one agent key containing it as a substring. Rules with
/// no usage records are omitted. Pure read path: the store is untouched.
pub fn summarize(store: &Store, sort: SortKey, filter: Option<&str>) -> Vec<RuleSummary> {
    let filter = filter.map(naming::normalize);

    let rows = store
        .rules
        .iter()
        .filter(|(_, entry)| match &filter {
            Some(needle) => entry
                .usage
                .keys()
                .any(|agent| agent.contains(needle.as_str())),
            None => true,
        })
        .filter_map(|(filename, entry)| {
            let (last_agent, last_record) = entry
                .usage
                .iter()
                .max_by_key(|(_, record)| record.last_used)?;
            let first_used = entry.usage.values().map(|record| record.first_used).min()?;

            Some(RuleSummary {
                filename: filename.clone(),
                total_usage: entry.usage.values().map(|record| record.usage_count).sum(),
                last_agent: last_agent.clone(),
                last_used: last_record.last_used,
                first_used,
                previous_names: entry.previous_names.clone(),
            })
        });

    match sort {
        SortKey::Name => rows.sorted_by(|a, b| a.filename.cmp(&b.filename)).collect(),
        SortKey::First => rows.sorted_by_key(|row| row.first_used).collect(),
        SortKey::Last | SortKey::Recent => {
            rows.sorted_by_key(|row| Reverse(row.last_used)).collect()
        }
    }
}
