//! Contractor inference and per-contractor overlap tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::TaskIdx;

/// Trade responsible for a task, inferred from its category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractorType {
    Electrician,
    Plumber,
    #[serde(rename = "HVAC Technician")]
    HvacTechnician,
    Roofer,
    #[serde(rename = "Flooring Specialist")]
    FlooringSpecialist,
    Painter,
    #[serde(rename = "General Contractor")]
    GeneralContractor,
}

/// Category keyword -> contractor, checked in order; first match wins.
const CONTRACTOR_RULES: &[(&str, ContractorType)] = &[
    ("electrical", ContractorType::Electrician),
    ("plumbing", ContractorType::Plumber),
    ("hvac", ContractorType::HvacTechnician),
    ("roofing", ContractorType::Roofer),
    ("flooring", ContractorType::FlooringSpecialist),
    ("paint", ContractorType::Painter),
    ("kitchen", ContractorType::GeneralContractor),
    ("bath", ContractorType::GeneralContractor),
];

impl ContractorType {
    /// Infer the contractor from a free-text category (case-insensitive).
    pub fn from_category(category: &str) -> Self {
        let category = category.to_lowercase();
        CONTRACTOR_RULES
            .iter()
            .find(|(keyword, _)| category.contains(keyword))
            .map_or(ContractorType::GeneralContractor, |&(_, contractor)| {
                contractor
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContractorType::Electrician => "Electrician",
            ContractorType::Plumber => "Plumber",
            ContractorType::HvacTechnician => "HVAC Technician",
            ContractorType::Roofer => "Roofer",
            ContractorType::FlooringSpecialist => "Flooring Specialist",
            ContractorType::Painter => "Painter",
            ContractorType::GeneralContractor => "General Contractor",
        }
    }
}

impl fmt::Display for ContractorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two tasks booked to the same contractor on overlapping days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlap {
    pub first: TaskIdx,
    pub second: TaskIdx,
    /// First shared day.
    pub start: i64,
    /// Last shared day.
    pub end: i64,
}

/// Day ranges booked for one contractor.
#[derive(Clone, Debug)]
pub struct ContractorSchedule {
    pub contractor: ContractorType,
    /// Inclusive (start, end, task) bookings in insertion order.
    bookings: Vec<(i64, i64, TaskIdx)>,
}

impl ContractorSchedule {
    pub fn new(contractor: ContractorType) -> Self {
        Self {
            contractor,
            bookings: Vec::new(),
        }
    }

    pub fn book(&mut self, start: i64, end: i64, task: TaskIdx) {
        self.bookings.push((start, end, task));
    }

    /// All pairs of bookings whose inclusive day ranges intersect.
    ///
    /// `[a, b]` and `[c, d]` overlap iff `a <= d && c <= b`. Bookings are
    /// swept in start order, so once a later booking starts after the
    /// current one ends no further booking can overlap it.
    pub fn overlaps(&self) -> Vec<Overlap> {
        let mut sorted = self.bookings.clone();
        sorted.sort_by_key(|&(start, _, task)| (start, task));

        let mut overlaps = Vec::new();
        for (i, &(start_a, end_a, task_a)) in sorted.iter().enumerate() {
            for &(start_b, end_b, task_b) in &sorted[i + 1..] {
                if start_b > end_a {
                    break;
                }
                overlaps.push(Overlap {
                    first: task_a,
                    second: task_b,
                    start: start_b,
                    end: end_a.min(end_b),
                });
            }
        }
        overlaps
    }
}
