//! Plain-text rendering of a single contract version.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contract::ContractRecord;

/// The employing organisation printed in the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
  pub name:    String,
  pub address: String,
}

const TERMS: &[&str] = &[
  "The employee agrees to observe the working hours set by the company.",
  "The employee must follow the health and safety rules in force.",
  "Any change to this contract requires a written amendment.",
  "This contract may be terminated under the provisions of the labour code.",
  "The employee is entitled to paid leave under the applicable legislation.",
];

fn fmt_date(date: NaiveDate) -> String { date.format("%d/%m/%Y").to_string() }

/// Group the integer part in thousands: `1234567.5` → `1 234 567.50`.
fn fmt_amount(amount: f64) -> String {
  let fixed = format!("{amount:.2}");
  let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
  let (sign, digits) = match int_part.strip_prefix('-') {
    Some(rest) => ("-", rest),
    None => ("", int_part),
  };

  let mut grouped = String::new();
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(' ');
    }
    grouped.push(ch);
  }
  format!("{sign}{grouped}.{frac}")
}

/// Render `record` as a printable contract issued on `issued_on`.
pub fn render_document(
  record: &ContractRecord,
  employer: &Employer,
  issued_on: NaiveDate,
) -> String {
  let mut out = String::new();
  // Writing into a String cannot fail.
  let mut line = |text: String| {
    let _ = writeln!(out, "{text}");
  };

  line(employer.name.clone());
  if !employer.address.is_empty() {
    line(employer.address.clone());
  }
  line(String::new());
  line("EMPLOYMENT CONTRACT".into());
  line(String::new());
  line(format!("Contract no.: {}", record.id));
  line(format!("Date: {}", fmt_date(issued_on)));
  line(String::new());

  line("EMPLOYEE".into());
  line(format!("Full name: {}", record.full_name));
  line(format!("National card number: {}", record.national_card_number));
  line(format!("Date of birth: {}", fmt_date(record.birth_date)));
  if let Some(place) = &record.birth_place {
    line(format!("Place of birth: {place}"));
  }
  if let Some(address) = &record.address {
    line(format!("Address: {address}"));
  }
  line(String::new());

  line("CONTRACT".into());
  line(format!("Position: {}", record.position));
  if let Some(hired) = record.hire_date {
    line(format!("Hire date: {}", fmt_date(hired)));
  }
  line(format!("Start: {}", fmt_date(record.contract_start)));
  line(format!("End: {}", fmt_date(record.contract_end)));
  if let Some(salary) = record.base_salary {
    line(format!("Base salary: {}", fmt_amount(salary)));
  }
  if let Some(ssn) = &record.social_insurance_number {
    line(format!("Social insurance number: {ssn}"));
  }

  if record.renewal_count > 0 || record.is_renewal {
    line(String::new());
    if record.renewal_count > 0 {
      line(format!("Number of renewals: {}", record.renewal_count));
    }
    if record.is_renewal {
      line("This contract is a renewal.".into());
    }
  }

  line(String::new());
  line("TERMS".into());
  for (i, term) in TERMS.iter().enumerate() {
    line(format!("{}. {term}", i + 1));
  }

  line(String::new());
  line("SIGNATURES".into());
  line(format!("Employer: ____________________  ({})", employer.name));
  line(format!("Employee: ____________________  ({})", record.full_name));

  out
}

/// File name for an exported document: `contract_<Full_Name>_<yyyy-mm-dd>.txt`.
pub fn document_filename(record: &ContractRecord, issued_on: NaiveDate) -> String {
  let name = record
    .full_name
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("_");
  format!("contract_{name}_{}.txt", issued_on.format("%Y-%m-%d"))
}
