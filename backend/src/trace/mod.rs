//! Trace artifact
//!
//! Serialized form of a run's event log, as read by the hall visualiser and
//! the statistics report:
//!
//! ```json
//! {
//!   "sellerLines": 2,
//!   "events": [
//!     {"event": "CUSTOMER_ARRIVAL", "time": 0.0, "customerId": 1},
//!     {"event": "WALK_TO_DESK", "time": 0.0, "customerId": 1, "deskId": 1}
//!   ],
//!   "desks": [{"num": 0, "x": 0, "y": 200}, {"num": 1, "x": 100, "y": 200}]
//! }
//! ```
//!
//! # Critical Invariants
//!
//! - **Ordering**: `time` is non-decreasing across `events`
//! - **Lifecycle**: per customer, ARRIVAL, optional WAITING, WALK_TO_DESK,
//!   BUY_TICKETS, CUSTOMER_LEAVES, each exactly once and in that order
//! - **Occupancy**: no desk is held by two customers at once
//!
//! `validate_trace` checks all three.

use crate::models::event::{Event, EventLog};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Horizontal spacing between desks in the visualiser layout
pub const DESK_SPACING_X: u32 = 100;

/// Row on which desks are drawn
pub const DESK_ROW_Y: u32 = 200;

/// Errors reading, writing or checking a trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trace JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent trace at event {index}: {reason}")]
    Inconsistent { index: usize, reason: String },
}

/// One serialized event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub event: String,

    /// Seconds, rounded to two decimals
    pub time: f64,

    pub customer_id: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desk_id: Option<u32>,
}

impl From<&Event> for TraceRecord {
    fn from(event: &Event) -> Self {
        TraceRecord {
            event: event.event_type().to_string(),
            time: event.time().as_rounded_seconds(),
            customer_id: event.customer_id(),
            desk_id: event.desk_id(),
        }
    }
}

/// Desk position for the visualiser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskLayout {
    /// 0-based desk index (desk id minus one)
    pub num: u32,
    pub x: u32,
    pub y: u32,
}

impl DeskLayout {
    /// Layout entry for the desk at 0-based `index`
    pub fn for_index(index: u32) -> Self {
        Self {
            num: index,
            x: index * DESK_SPACING_X,
            y: DESK_ROW_Y,
        }
    }
}

/// Complete trace document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDocument {
    /// Number of desks
    pub seller_lines: usize,
    pub events: Vec<TraceRecord>,
    pub desks: Vec<DeskLayout>,
}

impl TraceDocument {
    /// Build the document for a run with `num_desks` desks
    pub fn from_log(num_desks: usize, log: &EventLog) -> Self {
        Self {
            seller_lines: num_desks,
            events: log.events().iter().map(TraceRecord::from).collect(),
            desks: (0..num_desks as u32).map(DeskLayout::for_index).collect(),
        }
    }

    pub fn to_json_string(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document as JSON, creating parent directories as needed
    pub fn write_json(&self, path: &Path) -> Result<(), TraceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self, TraceError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Hex SHA-256 of the compact JSON event list
    ///
    /// Two runs with the same configuration and seed have the same digest.
    pub fn digest(&self) -> Result<String, TraceError> {
        let json = serde_json::to_string(&self.events)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Check the ordering, lifecycle and occupancy guarantees
    pub fn validate(&self) -> Result<(), TraceError> {
        validate_trace(&self.events)
    }
}

/// Position in the per-customer lifecycle, as observed in a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seen {
    Arrived,
    Waiting,
    Walking,
    Bought,
    Left,
}

fn inconsistent(index: usize, reason: String) -> TraceError {
    TraceError::Inconsistent { index, reason }
}

/// Validate a serialized event sequence
///
/// Occupancy is reconstructed from the events: a customer holds its desk from
/// WALK_TO_DESK until CUSTOMER_LEAVES.
pub fn validate_trace(records: &[TraceRecord]) -> Result<(), TraceError> {
    let mut progress: HashMap<u32, (Seen, Option<u32>)> = HashMap::new();
    let mut occupants: HashMap<u32, u32> = HashMap::new();
    let mut last_time = f64::NEG_INFINITY;

    for (index, record) in records.iter().enumerate() {
        if record.time < last_time {
            return Err(inconsistent(
                index,
                format!("time {} goes backwards from {}", record.time, last_time),
            ));
        }
        last_time = record.time;

        let customer = record.customer_id;
        let previous = progress.get(&customer).copied();

        let next = match (record.event.as_str(), previous) {
            (Event::ARRIVAL, None) => Seen::Arrived,
            (Event::WAITING, Some((Seen::Arrived, _))) => Seen::Waiting,
            (Event::WALK_TO_DESK, Some((Seen::Arrived | Seen::Waiting, _))) => Seen::Walking,
            (Event::BUY_TICKETS, Some((Seen::Walking, _))) => Seen::Bought,
            (Event::LEAVES, Some((Seen::Bought, _))) => Seen::Left,
            (kind, prev) => {
                return Err(inconsistent(
                    index,
                    format!("customer {}: {} after {:?}", customer, kind, prev.map(|p| p.0)),
                ));
            }
        };

        let desk = match (next, record.desk_id) {
            (Seen::Arrived, None) => None,
            (Seen::Arrived, Some(_)) => {
                return Err(inconsistent(
                    index,
                    format!("customer {}: arrival names a desk", customer),
                ));
            }
            (_, None) => {
                return Err(inconsistent(
                    index,
                    format!("customer {}: {} has no deskId", customer, record.event),
                ));
            }
            (_, Some(desk)) => {
                if let Some((_, Some(bound))) = previous {
                    if bound != desk {
                        return Err(inconsistent(
                            index,
                            format!(
                                "customer {} switched from desk {} to {}",
                                customer, bound, desk
                            ),
                        ));
                    }
                }
                Some(desk)
            }
        };

        match (next, desk) {
            (Seen::Walking, Some(desk)) => {
                if let Some(holder) = occupants.insert(desk, customer) {
                    return Err(inconsistent(
                        index,
                        format!("desk {} granted to {} while held by {}", desk, customer, holder),
                    ));
                }
            }
            (Seen::Left, Some(desk)) => {
                if occupants.remove(&desk) != Some(customer) {
                    return Err(inconsistent(
                        index,
                        format!("customer {} left desk {} it did not hold", customer, desk),
                    ));
                }
            }
            _ => {}
        }

        progress.insert(customer, (next, desk));
    }

    if let Some((customer, _)) = progress.iter().find(|(_, (seen, _))| *seen != Seen::Left) {
        return Err(inconsistent(
            records.len(),
            format!("customer {} never left", customer),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::SimTime;

    fn record(event: &str, time: f64, customer_id: u32, desk_id: Option<u32>) -> TraceRecord {
        TraceRecord {
            event: event.to_string(),
            time,
            customer_id,
            desk_id,
        }
    }

    fn complete_visit(customer: u32, desk: u32, start: f64) -> Vec<TraceRecord> {
        vec![
            record(Event::ARRIVAL, start, customer, None),
            record(Event::WALK_TO_DESK, start, customer, Some(desk)),
            record(Event::BUY_TICKETS, start + 5.0, customer, Some(desk)),
            record(Event::LEAVES, start + 5.0, customer, Some(desk)),
        ]
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_string(&record(Event::WAITING, 1.5, 2, Some(1))).unwrap();
        assert_eq!(
            json,
            r#"{"event":"CUSTOMER_WAITING","time":1.5,"customerId":2,"deskId":1}"#
        );
    }

    #[test]
    fn test_arrival_omits_desk_id() {
        let json = serde_json::to_string(&record(Event::ARRIVAL, 0.0, 1, None)).unwrap();
        assert!(!json.contains("deskId"));
    }

    #[test]
    fn test_document_field_order_and_layout() {
        let mut log = EventLog::new();
        log.record(Event::CustomerArrival {
            time: SimTime::from_millis(1_234),
            customer_id: 1,
        });
        let doc = TraceDocument::from_log(2, &log);

        assert_eq!(
            doc.to_json_string().unwrap(),
            concat!(
                r#"{"sellerLines":2,"#,
                r#""events":[{"event":"CUSTOMER_ARRIVAL","time":1.23,"customerId":1}],"#,
                r#""desks":[{"num":0,"x":0,"y":200},{"num":1,"x":100,"y":200}]}"#
            )
        );
    }

    #[test]
    fn test_validate_accepts_complete_visits() {
        let mut records = complete_visit(1, 1, 0.0);
        records.extend(complete_visit(2, 1, 5.0));
        assert!(validate_trace(&records).is_ok());
    }

    #[test]
    fn test_validate_rejects_time_regression() {
        let mut records = complete_visit(1, 1, 0.0);
        records[2].time = -1.0;
        assert!(matches!(
            validate_trace(&records),
            Err(TraceError::Inconsistent { index: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_walk() {
        let mut records = complete_visit(1, 1, 0.0);
        records.insert(2, record(Event::WALK_TO_DESK, 0.0, 1, Some(1)));
        assert!(validate_trace(&records).is_err());
    }

    #[test]
    fn test_validate_rejects_double_occupancy() {
        let records = vec![
            record(Event::ARRIVAL, 0.0, 1, None),
            record(Event::ARRIVAL, 0.0, 2, None),
            record(Event::WALK_TO_DESK, 0.0, 1, Some(1)),
            record(Event::WALK_TO_DESK, 0.0, 2, Some(1)),
        ];
        let err = validate_trace(&records).unwrap_err();
        assert!(err.to_string().contains("while held by 1"), "{}", err);
    }

    #[test]
    fn test_validate_rejects_unfinished_customer() {
        let mut records = complete_visit(1, 1, 0.0);
        records.pop();
        assert!(validate_trace(&records).is_err());
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let doc = TraceDocument::from_log(1, &EventLog::new());
        let digest = doc.digest().unwrap();
        assert_eq!(digest.len(), 64);
        // SHA-256 of "[]"
        assert_eq!(
            digest,
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }
}
