//! Contract records: one version of one employment contract.
//!
//! A lineage is the chain of records descended from one original contract.
//! Renewal never edits the dates of an existing version; it appends a new
//! record and flags its predecessor as superseded.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Identifier of a single contract version.
///
/// Allocated from a monotonic counter stored alongside the records, so a
/// higher id always means a more recently created record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContractId(pub u64);

impl fmt::Display for ContractId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One version of an employment contract.
///
/// The aliases accept the field names of the unversioned array layout, in
/// which optional text fields were stored as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
  pub id:                      ContractId,
  /// The person's natural key; shared by every contract they ever held.
  #[serde(alias = "carte_nationale")]
  pub national_card_number:    String,
  #[serde(alias = "nom_prenom")]
  pub full_name:               String,
  #[serde(alias = "date_naissance")]
  pub birth_date:              NaiveDate,
  #[serde(default, alias = "lieu_naissance", deserialize_with = "blank_as_none")]
  pub birth_place:             Option<String>,
  #[serde(default, alias = "adresse", deserialize_with = "blank_as_none")]
  pub address:                 Option<String>,
  #[serde(alias = "fonction")]
  pub position:                String,
  #[serde(default, alias = "date_recrutement", deserialize_with = "blank_as_none")]
  pub hire_date:               Option<NaiveDate>,
  #[serde(alias = "debut_contrat")]
  pub contract_start:          NaiveDate,
  #[serde(alias = "fin_contrat")]
  pub contract_end:            NaiveDate,
  #[serde(default, alias = "salaire_base")]
  pub base_salary:             Option<f64>,
  #[serde(default, alias = "num_assurance_sociale", deserialize_with = "blank_as_none")]
  pub social_insurance_number: Option<String>,
  /// Number of renewals the lineage had undergone when this version was made.
  #[serde(default)]
  pub renewal_count:           u32,
  /// First version of the lineage. `None` on the original itself.
  #[serde(default)]
  pub original_contract_id:    Option<ContractId>,
  #[serde(default)]
  pub is_renewal:              bool,
  /// Set once a renewal exists; the record is read-only history afterwards.
  #[serde(default, alias = "is_replaced")]
  pub is_superseded:           bool,
}

impl ContractRecord {
  /// The id shared by every version of this record's lineage.
  pub fn lineage_root(&self) -> ContractId {
    self.original_contract_id.unwrap_or(self.id)
  }

  /// Whether `self` belongs to the lineage rooted at `root`.
  pub fn in_lineage(&self, root: ContractId) -> bool {
    self.id == root || self.original_contract_id == Some(root)
  }
}

/// Reject ranges where the end does not come strictly after the start.
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
  if end <= start {
    return Err(Error::InvalidDateRange { start, end });
  }
  Ok(())
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::lifecycle::ContractLifecycle::create`].
///
/// Lineage markers are not accepted from callers; the lifecycle sets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContract {
  pub national_card_number:    String,
  pub full_name:               String,
  pub birth_date:              NaiveDate,
  #[serde(default)]
  pub birth_place:             Option<String>,
  #[serde(default)]
  pub address:                 Option<String>,
  pub position:                String,
  #[serde(default)]
  pub hire_date:               Option<NaiveDate>,
  pub contract_start:          NaiveDate,
  pub contract_end:            NaiveDate,
  #[serde(default)]
  pub base_salary:             Option<f64>,
  #[serde(default)]
  pub social_insurance_number: Option<String>,
}

impl NewContract {
  /// Check that the required text fields are present and the salary is
  /// usable.
  ///
  /// The lifecycle only enforces the date range; required-field checks belong
  /// to whichever front end collects the input.
  pub fn validate(&self) -> Result<()> {
    check_required(&[
      ("national_card_number", Some(&self.national_card_number)),
      ("full_name", Some(&self.full_name)),
      ("position", Some(&self.position)),
    ])?;
    check_salary(self.base_salary)
  }

  pub(crate) fn into_record(self, id: ContractId) -> ContractRecord {
    ContractRecord {
      id,
      national_card_number: self.national_card_number,
      full_name: self.full_name,
      birth_date: self.birth_date,
      birth_place: non_blank(self.birth_place),
      address: non_blank(self.address),
      position: self.position,
      hire_date: self.hire_date,
      contract_start: self.contract_start,
      contract_end: self.contract_end,
      base_salary: self.base_salary,
      social_insurance_number: non_blank(self.social_insurance_number),
      renewal_count: 0,
      original_contract_id: None,
      is_renewal: false,
      is_superseded: false,
    }
  }
}

/// Partial update for [`crate::lifecycle::ContractLifecycle::update`].
///
/// `None` leaves a field untouched. Nullable fields use a nested `Option` so
/// that an explicit JSON `null` clears them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContractPatch {
  pub national_card_number:    Option<String>,
  pub full_name:               Option<String>,
  pub birth_date:              Option<NaiveDate>,
  #[serde(default, deserialize_with = "nullable")]
  pub birth_place:             Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub address:                 Option<Option<String>>,
  pub position:                Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub hire_date:               Option<Option<NaiveDate>>,
  pub contract_start:          Option<NaiveDate>,
  pub contract_end:            Option<NaiveDate>,
  #[serde(default, deserialize_with = "nullable")]
  pub base_salary:             Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable")]
  pub social_insurance_number: Option<Option<String>>,
}

impl ContractPatch {
  /// Reject patches that would blank a required field or store an unusable
  /// salary. Absent fields are not checked.
  pub fn validate(&self) -> Result<()> {
    check_required(&[
      ("national_card_number", self.national_card_number.as_ref()),
      ("full_name", self.full_name.as_ref()),
      ("position", self.position.as_ref()),
    ])?;
    check_salary(self.base_salary.flatten())
  }

  /// Merge the patch into `record`. Id and lineage markers are never touched.
  pub fn apply_to(self, record: &mut ContractRecord) {
    if let Some(v) = self.national_card_number {
      record.national_card_number = v;
    }
    if let Some(v) = self.full_name {
      record.full_name = v;
    }
    if let Some(v) = self.birth_date {
      record.birth_date = v;
    }
    if let Some(v) = self.birth_place {
      record.birth_place = non_blank(v);
    }
    if let Some(v) = self.address {
      record.address = non_blank(v);
    }
    if let Some(v) = self.position {
      record.position = v;
    }
    if let Some(v) = self.hire_date {
      record.hire_date = v;
    }
    if let Some(v) = self.contract_start {
      record.contract_start = v;
    }
    if let Some(v) = self.contract_end {
      record.contract_end = v;
    }
    if let Some(v) = self.base_salary {
      record.base_salary = v;
    }
    if let Some(v) = self.social_insurance_number {
      record.social_insurance_number = non_blank(v);
    }
  }
}

/// Input to [`crate::lifecycle::ContractLifecycle::renew`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalTerms {
  /// Salary of the new version; `None` leaves it unset.
  #[serde(default)]
  pub base_salary:    Option<f64>,
  pub contract_start: NaiveDate,
  pub contract_end:   NaiveDate,
}

impl RenewalTerms {
  pub fn validate(&self) -> Result<()> { check_salary(self.base_salary) }
}

// ─── Checks ──────────────────────────────────────────────────────────────────

/// Fail with every supplied field that is blank. `None` means "not supplied".
fn check_required(fields: &[(&str, Option<&String>)]) -> Result<()> {
  let missing: Vec<&str> = fields
    .iter()
    .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
    .map(|(name, _)| *name)
    .collect();

  if !missing.is_empty() {
    return Err(Error::Validation(format!(
      "missing required fields: {}",
      missing.join(", ")
    )));
  }
  Ok(())
}

/// Empty optional text is stored as absent, so it reads back the same way.
fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

fn check_salary(salary: Option<f64>) -> Result<()> {
  if let Some(salary) = salary
    && (!salary.is_finite() || salary < 0.0)
  {
    return Err(Error::Validation(format!("invalid base salary: {salary}")));
  }
  Ok(())
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// Read an optional value stored as a string, treating `""` like `null`.
fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr,
  T::Err: fmt::Display,
{
  match Option::<String>::deserialize(deserializer)? {
    Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some).map_err(D::Error::custom),
    _ => Ok(None),
  }
}

/// Distinguish an absent field (outer `None`) from an explicit `null`.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}
