//! Lineage views derived from the full contract collection.
//!
//! Nothing here is stored; both views are recomputed from a snapshot on every
//! read.

use std::collections::HashMap;

use crate::contract::ContractRecord;

/// The current contract of every person: for each `national_card_number`, the
/// record with the latest `contract_end`, ties going to the highest id.
///
/// The result is ordered by id. Applying it to its own output is a no-op.
pub fn latest_per_person<'a, I>(records: I) -> Vec<&'a ContractRecord>
where
  I: IntoIterator<Item = &'a ContractRecord>,
{
  let mut latest: HashMap<&'a str, &'a ContractRecord> = HashMap::new();

  for record in records {
    latest
      .entry(record.national_card_number.as_str())
      .and_modify(|current| {
        if (record.contract_end, record.id) > (current.contract_end, current.id) {
          *current = record;
        }
      })
      .or_insert(record);
  }

  let mut out: Vec<_> = latest.into_values().collect();
  out.sort_by_key(|c| c.id);
  out
}

/// Every version of `record`'s lineage, oldest `contract_start` first.
///
/// The lineage root is `original_contract_id`, or the record's own id when it
/// is the original. Members are found through the root, so history survives
/// the deletion of any single version, including the original.
pub fn history_of<'a>(
  record: &ContractRecord,
  all: &'a [ContractRecord],
) -> Vec<&'a ContractRecord> {
  let root = record.lineage_root();
  let mut history: Vec<_> = all.iter().filter(|c| c.in_lineage(root)).collect();
  history.sort_by_key(|c| (c.contract_start, c.id));
  history
}
