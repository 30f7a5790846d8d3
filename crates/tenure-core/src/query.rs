//! Status classification, listing, search and statistics.
//!
//! Every listing view goes through [`current_contracts`]: superseded versions
//! are dropped first, then only the latest contract per person is kept.

use std::collections::HashMap;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{contract::ContractRecord, lineage::latest_per_person};

/// Window, in days, inside which an active contract counts as expiring soon.
pub const EXPIRING_SOON_DAYS: u64 = 30;

/// Number of contracts reported in [`ContractStats::ending_next`].
pub const ENDING_NEXT_LIMIT: usize = 5;

/// Today's date on the local clock.
pub fn today() -> NaiveDate { Local::now().date_naive() }

// ─── Classification ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
  Active,
  Expired,
}

/// Active iff the contract ends strictly after `as_of`.
pub fn classify(record: &ContractRecord, as_of: NaiveDate) -> ContractStatus {
  if record.contract_end > as_of {
    ContractStatus::Active
  } else {
    ContractStatus::Expired
  }
}

/// Active and ending within [`EXPIRING_SOON_DAYS`] of `as_of`.
pub fn is_expiring_soon(record: &ContractRecord, as_of: NaiveDate) -> bool {
  let horizon = as_of
    .checked_add_days(Days::new(EXPIRING_SOON_DAYS))
    .unwrap_or(NaiveDate::MAX);
  classify(record, as_of) == ContractStatus::Active && record.contract_end <= horizon
}

/// A record bundled with its status as of a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedContract {
  pub contract:      ContractRecord,
  pub status:        ContractStatus,
  pub expiring_soon: bool,
}

impl ClassifiedContract {
  pub fn new(record: &ContractRecord, as_of: NaiveDate) -> Self {
    Self {
      contract:      record.clone(),
      status:        classify(record, as_of),
      expiring_soon: is_expiring_soon(record, as_of),
    }
  }
}

/// Listing filter accepted by [`filter_by_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
  Active,
  Expired,
  ExpiringSoon,
}

impl StatusFilter {
  pub fn matches(self, record: &ContractRecord, as_of: NaiveDate) -> bool {
    match self {
      Self::Active => classify(record, as_of) == ContractStatus::Active,
      Self::Expired => classify(record, as_of) == ContractStatus::Expired,
      Self::ExpiringSoon => is_expiring_soon(record, as_of),
    }
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Drop superseded versions; they are history, not live listings.
pub fn list_visible(records: &[ContractRecord]) -> Vec<&ContractRecord> {
  records.iter().filter(|c| !c.is_superseded).collect()
}

/// The single listing policy: visible records, deduplicated to the latest
/// contract per person.
pub fn current_contracts(records: &[ContractRecord]) -> Vec<&ContractRecord> {
  latest_per_person(list_visible(records))
}

/// Current contracts matching `filter` as of `as_of`.
pub fn filter_by_status(
  records: &[ContractRecord],
  filter: StatusFilter,
  as_of: NaiveDate,
) -> Vec<&ContractRecord> {
  current_contracts(records)
    .into_iter()
    .filter(|c| filter.matches(c, as_of))
    .collect()
}

pub fn expired(records: &[ContractRecord], as_of: NaiveDate) -> Vec<&ContractRecord> {
  filter_by_status(records, StatusFilter::Expired, as_of)
}

pub fn expiring_soon(records: &[ContractRecord], as_of: NaiveDate) -> Vec<&ContractRecord> {
  filter_by_status(records, StatusFilter::ExpiringSoon, as_of)
}

/// Case-insensitive substring search over name, position and card number.
/// The term is matched as given, whitespace included; an empty term matches
/// every current contract.
pub fn search<'a>(records: &'a [ContractRecord], term: &str) -> Vec<&'a ContractRecord> {
  let term = term.to_lowercase();
  current_contracts(records)
    .into_iter()
    .filter(|c| {
      c.full_name.to_lowercase().contains(&term)
        || c.position.to_lowercase().contains(&term)
        || c.national_card_number.to_lowercase().contains(&term)
    })
    .collect()
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCount {
  pub position: String,
  pub count:    usize,
}

/// Dashboard figures over the current contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractStats {
  pub as_of:         NaiveDate,
  pub total:         usize,
  pub active:        usize,
  pub expired:       usize,
  pub expiring_soon: usize,
  /// Most common position first; ties in name order.
  pub by_position:   Vec<PositionCount>,
  /// Active contracts ending soonest.
  pub ending_next:   Vec<ContractRecord>,
}

pub fn stats(records: &[ContractRecord], as_of: NaiveDate) -> ContractStats {
  let current = current_contracts(records);

  let mut active: Vec<&ContractRecord> = current
    .iter()
    .copied()
    .filter(|c| classify(c, as_of) == ContractStatus::Active)
    .collect();
  let expiring_soon = active.iter().filter(|c| is_expiring_soon(c, as_of)).count();

  let mut counts: HashMap<&str, usize> = HashMap::new();
  for c in &current {
    *counts.entry(c.position.as_str()).or_default() += 1;
  }
  let mut by_position: Vec<PositionCount> = counts
    .into_iter()
    .map(|(position, count)| PositionCount { position: position.to_owned(), count })
    .collect();
  by_position.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.position.cmp(&b.position)));

  let active_count = active.len();
  active.sort_by_key(|c| (c.contract_end, c.id));

  ContractStats {
    as_of,
    total: current.len(),
    active: active_count,
    expired: current.len() - active_count,
    expiring_soon,
    by_position,
    ending_next: active
      .into_iter()
      .take(ENDING_NEXT_LIMIT)
      .cloned()
      .collect(),
  }
}
