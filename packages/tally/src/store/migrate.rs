//! Rebuilding the store from legacy document layouts.
//!
//! Earlier versions of the analytics file stored `rules` as an array of
//! objects that carried their own `filename`, and `usage` as an array of
//! objects that carried their own `agent`. Both layouts are rebuilt here
//! into the dictionary-keyed shape, entirely in memory; the legacy shape
//! is never written back. Agent names from legacy documents predate
//! normalization, so they are kebab-cased on the way in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::schema::{RuleEntry, Store, UsageRecord};
use crate::naming;

/// Rebuild a store from a parsed JSON document in any historical layout.
///
/// Tolerant by construction: entries without a filename, records without
/// an agent, and records with missing or unparsable timestamps are
/// dropped with a warning rather than failing the load.
pub fn flat_layout(value: &Value) -> Store {
    let mut store = Store::default();

    match value.get("rules") {
        Some(Value::Object(entries)) => {
            for (filename, entry) in entries {
                store.rules.insert(filename.clone(), rule_entry(entry));
            }
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                let Some(filename) = entry.get("filename").and_then(Value::as_str) else {
                    tracing::warn!("dropping legacy rule entry without a filename");
                    continue;
                };
                store.rules.insert(filename.to_string(), rule_entry(entry));
            }
        }
        _ => {}
    }

    store
}

fn rule_entry(entry: &Value) -> RuleEntry {
    let mut usage = BTreeMap::new();

    match entry.get("usage") {
        Some(Value::Object(records)) => {
            for (agent, record) in records {
                insert_record(&mut usage, agent, record);
            }
        }
        Some(Value::Array(records)) => {
            for record in records {
                let Some(agent) = record.get("agent").and_then(Value::as_str) else {
                    tracing::warn!("dropping legacy usage record without an agent");
                    continue;
                };
                insert_record(&mut usage, agent, record);
            }
        }
        _ => {}
    }

    let previous_names = entry
        .get("previousNames")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    RuleEntry {
        usage,
        previous_names,
    }
}

fn insert_record(usage: &mut BTreeMap<String, UsageRecord>, agent: &str, record: &Value) {
    let agent_key = naming::normalize(agent);

    let first_used = record.get("firstUsed").and_then(parse_timestamp);
    let last_used = record.get("lastUsed").and_then(parse_timestamp);
    let (Some(first_used), Some(last_used)) = (first_used, last_used) else {
        tracing::warn!(
            agent = %agent_key,
            "dropping usage record with missing or invalid timestamps"
        );
        return;
    };

    let usage_count = record
        .get("usageCount")
        .and_then(Value::as_u64)
        .unwrap_or_default();

    usage.insert(
        agent_key,
        UsageRecord {
            usage_count,
            first_used,
            last_used,
        },
    );
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|stamp| stamp.with_timezone(&Utc))
}
