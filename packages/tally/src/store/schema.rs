//! Store data model and the operations that mutate it.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::naming;

/// Errors surfaced by store operations.
///
/// A corrupt store file is deliberately absent here: corruption is
/// recovered during [`load`](super::load) by starting from an empty
/// store, never surfaced to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The source rule of a rename does not exist.
    #[error("rule {0:?} not found")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Usage counters and timestamps for one agent's invocations of one rule.
///
/// `first_used` is set when the record is created and never changes;
/// `last_used` moves forward on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub usage_count: u64,
    #[serde(with = "timestamp")]
    pub first_used: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub last_used: DateTime<Utc>,
}

impl UsageRecord {
    /// Fold another record for the same agent into this one.
    ///
    /// Commutative: counts sum, `first_used` takes the minimum,
    /// `last_used` the maximum.
    fn absorb(&mut self, other: &UsageRecord) {
        self.usage_count += other.usage_count;
        self.first_used = self.first_used.min(other.first_used);
        self.last_used = self.last_used.max(other.last_used);
    }
}

/// Usage history for a single rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEntry {
    /// Normalized agent key -> usage record.
    pub usage: BTreeMap<String, UsageRecord>,

    /// Filenames this rule was previously known under, oldest rename
    /// first.
    #[serde(default)]
    pub previous_names: Vec<String>,
}

/// The persisted analytics document: rule filename -> usage history.
///
/// Rule filenames are case-sensitive and stored verbatim; only agent
/// names are normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleEntry>,
}

impl Store {
    /// Record one invocation of `filename` by `agent_raw` at `now`.
    ///
    /// Creates the rule entry and the agent's record lazily on first
    /// use; afterwards increments the count and advances `last_used`.
    pub fn record(&mut self, filename: &str, agent_raw: &str, now: DateTime<Utc>) {
        let agent_key = naming::normalize(agent_raw);
        let entry = self.rules.entry(filename.to_string()).or_default();
        entry
            .usage
            .entry(agent_key)
            .and_modify(|record| {
                record.usage_count += 1;
                record.last_used = now;
            })
            .or_insert_with(|| UsageRecord {
                usage_count: 1,
                first_used: now,
                last_used: now,
            });
    }

    /// Move the history of `old` under `new`.
    ///
    /// When `new` does not exist yet the entry moves wholesale, with
    /// `old` appended to its previous names. When it does exist the two
    /// histories merge: per-agent counts sum, `first_used` takes the
    /// earlier and `last_used` the later stamp, and `old` plus its own
    /// previous names chain onto the target's. Either way the `old` key
    /// is gone afterwards.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        if old == new {
            return if self.rules.contains_key(old) {
                Ok(())
            } else {
                Err(StoreError::NotFound(old.to_string()))
            };
        }

        let Some(moved) = self.rules.remove(old) else {
            return Err(StoreError::NotFound(old.to_string()));
        };

        match self.rules.get_mut(new) {
            None => {
                let mut entry = moved;
                push_unique(&mut entry.previous_names, old);
                self.rules.insert(new.to_string(), entry);
            }
            Some(target) => {
                for (agent, record) in moved.usage {
                    match target.usage.entry(agent) {
                        Entry::Occupied(mut existing) => existing.get_mut().absorb(&record),
                        Entry::Vacant(slot) => {
                            slot.insert(record);
                        }
                    }
                }
                push_unique(&mut target.previous_names, old);
                for name in &moved.previous_names {
                    push_unique(&mut target.previous_names, name);
                }
            }
        }

        Ok(())
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

/// Timestamps on the wire are RFC 3339 with an explicit `+00:00` offset
/// and whole-second precision, e.g. `2025-04-04T14:43:24+00:00`.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(stamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&stamp.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|stamp| stamp.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
