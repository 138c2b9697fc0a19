//! Per-desk statistics computed from a trace
//!
//! For each desk: how many customers bought tickets there and the average
//! time from a customer's arrival to their purchase. When that average is
//! positive it is projected to customers per hour, per working day and per
//! working month.

use crate::models::event::Event;
use crate::trace::{TraceDocument, TraceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const WORKING_HOURS_PER_DAY: f64 = 8.0;
pub const WORKING_DAYS_PER_MONTH: f64 = 20.0;

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("Event {index} names desk {desk_id}, but the trace has {seller_lines} desks")]
    UnknownDesk {
        index: usize,
        desk_id: u32,
        seller_lines: usize,
    },

    #[error("Customer {customer_id} bought tickets at event {index} without arriving first")]
    MissingArrival { index: usize, customer_id: u32 },

    #[error("Event {index} ({event}) has no deskId")]
    MissingDesk { index: usize, event: String },
}

/// Projected throughput of one desk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub per_hour: f64,
    pub per_day: f64,
    pub per_month: f64,
}

impl Throughput {
    /// Project from an average cycle time in seconds
    ///
    /// Returns `None` unless the average is positive.
    pub fn from_average(average_seconds: f64) -> Option<Self> {
        if !(average_seconds > 0.0) {
            return None;
        }
        let per_hour = SECONDS_PER_HOUR / average_seconds;
        let per_day = per_hour * WORKING_HOURS_PER_DAY;
        let per_month = per_day * WORKING_DAYS_PER_MONTH;
        Some(Self {
            per_hour: round2(per_hour),
            per_day: round2(per_day),
            per_month: round2(per_month),
        })
    }
}

/// Statistics for one desk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskStats {
    /// 1-based desk id
    pub desk_id: u32,
    pub customers_served: usize,

    /// Mean seconds from arrival to purchase; 0.0 when nobody was served
    pub average_cycle_time: f64,

    pub throughput: Option<Throughput>,
}

/// Report over all desks of one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskReport {
    pub desks: Vec<DeskStats>,
}

impl DeskReport {
    /// Aggregate a trace
    ///
    /// Every desk in `sellerLines` gets an entry, including idle ones.
    pub fn from_trace(trace: &TraceDocument) -> Result<Self, ReportError> {
        let mut arrivals: HashMap<u32, f64> = HashMap::new();
        let mut cycles: Vec<Vec<f64>> = vec![Vec::new(); trace.seller_lines];

        for (index, record) in trace.events.iter().enumerate() {
            match record.event.as_str() {
                Event::ARRIVAL => {
                    arrivals.insert(record.customer_id, record.time);
                }
                Event::BUY_TICKETS => {
                    let slot = desk_slot(index, record, trace.seller_lines)?;
                    let arrived = arrivals.remove(&record.customer_id).ok_or(
                        ReportError::MissingArrival {
                            index,
                            customer_id: record.customer_id,
                        },
                    )?;
                    cycles[slot].push(record.time - arrived);
                }
                _ => {}
            }
        }

        let desks = cycles
            .iter()
            .enumerate()
            .map(|(slot, times)| {
                let average_cycle_time = if times.is_empty() {
                    0.0
                } else {
                    times.iter().sum::<f64>() / times.len() as f64
                };
                DeskStats {
                    desk_id: slot as u32 + 1,
                    customers_served: times.len(),
                    average_cycle_time,
                    throughput: Throughput::from_average(average_cycle_time),
                }
            })
            .collect();

        Ok(Self { desks })
    }

    pub fn total_served(&self) -> usize {
        self.desks.iter().map(|d| d.customers_served).sum()
    }

    /// Markdown rendering, one section per desk
    pub fn render_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Ticket desk report")?;
        for desk in &self.desks {
            writeln!(f, "\n## Desk {}\n", desk.desk_id)?;
            writeln!(f, "- Number of Customers: {}", desk.customers_served)?;
            writeln!(f, "- Average Service Time: {:.2}", desk.average_cycle_time)?;
            if let Some(throughput) = desk.throughput {
                writeln!(f, "- Customers Per Hour: {:.2}", throughput.per_hour)?;
                writeln!(f, "- Customers Per Day: {:.2}", throughput.per_day)?;
                writeln!(f, "- Customers Per Month: {:.2}", throughput.per_month)?;
            }
        }
        Ok(())
    }
}

fn desk_slot(
    index: usize,
    record: &TraceRecord,
    seller_lines: usize,
) -> Result<usize, ReportError> {
    let desk_id = record.desk_id.ok_or_else(|| ReportError::MissingDesk {
        index,
        event: record.event.clone(),
    })?;
    if desk_id == 0 || desk_id as usize > seller_lines {
        return Err(ReportError::UnknownDesk {
            index,
            desk_id,
            seller_lines,
        });
    }
    Ok(desk_id as usize - 1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
