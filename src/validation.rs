//! Field-level validation rules for the entity forms.
//!
//! Every rule except [`Rule::Required`] passes on blank input, so optional
//! fields only need their format rule. Lengths count characters, not bytes.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
  Required(&'static str),
  MinLen(usize, &'static str),
  MaxLen(usize, &'static str),
  /// Digits only, with a length between `min` and `max`
  Digits {
    min: usize,
    max: usize,
    message: &'static str,
  },
  /// Numeric value of at least the bound
  MinNumber(f64, &'static str),
  /// `YYYY-MM-DD`
  Date(&'static str),
  /// Account password strength
  Password(&'static str),
}

pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

impl Rule {
  /// The rule's message when `value` fails it.
  pub fn check(&self, value: &str) -> Option<&'static str> {
    let value = value.trim();
    if let Rule::Required(message) = self {
      return value.is_empty().then_some(*message);
    }
    if value.is_empty() {
      return None;
    }

    let len = value.chars().count();
    let ok = match self {
      Rule::Required(_) => true,
      Rule::MinLen(min, _) => len >= *min,
      Rule::MaxLen(max, _) => len <= *max,
      Rule::Digits { min, max, .. } => {
        value.chars().all(|c| c.is_ascii_digit()) && (*min..=*max).contains(&len)
      }
      Rule::MinNumber(bound, _) => value
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n >= *bound),
      Rule::Date(_) => parse_date(value).is_some(),
      Rule::Password(_) => is_strong_password(value),
    };
    (!ok).then_some(self.message())
  }

  fn message(&self) -> &'static str {
    match self {
      Rule::Required(m)
      | Rule::MinLen(_, m)
      | Rule::MaxLen(_, m)
      | Rule::Digits { message: m, .. }
      | Rule::MinNumber(_, m)
      | Rule::Date(m)
      | Rule::Password(m) => *m,
    }
  }
}

/// First failing rule's message.
pub fn validate(value: &str, rules: &[Rule]) -> Option<&'static str> {
  rules.iter().find_map(|rule| rule.check(value))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
  let value = value.trim();
  if value.len() != 10 {
    return None;
  }
  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// At least 8 characters with a lowercase letter, an uppercase letter, a
/// digit and one of [`PASSWORD_SYMBOLS`]; nothing outside those classes.
pub fn is_strong_password(value: &str) -> bool {
  let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c);
  value.chars().count() >= 8
    && value.chars().all(allowed)
    && value.chars().any(|c| c.is_ascii_lowercase())
    && value.chars().any(|c| c.is_ascii_uppercase())
    && value.chars().any(|c| c.is_ascii_digit())
    && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
  use super::*;

  const NATIONAL_ID: &[Rule] = &[
    Rule::Required("TC Kimlik No is required"),
    Rule::Digits {
      min: 11,
      max: 11,
      message: "TC Kimlik No must be 11 digits",
    },
  ];

  #[test]
  fn test_required() {
    assert_eq!(validate("  ", NATIONAL_ID), Some("TC Kimlik No is required"));
  }

  #[test]
  fn test_exact_digits() {
    assert_eq!(validate("12345678901", NATIONAL_ID), None);
    assert_eq!(
      validate("1234567890", NATIONAL_ID),
      Some("TC Kimlik No must be 11 digits")
    );
    assert_eq!(
      validate("1234567890a", NATIONAL_ID),
      Some("TC Kimlik No must be 11 digits")
    );
  }

  #[test]
  fn test_optional_rules_pass_on_blank() {
    let phone = [Rule::Digits {
      min: 10,
      max: 11,
      message: "Phone must be 10-11 digits",
    }];
    assert_eq!(validate("", &phone), None);
    assert_eq!(validate("555123456", &phone), Some("Phone must be 10-11 digits"));
    assert_eq!(validate("05551234567", &phone), None);
  }

  #[test]
  fn test_lengths_count_characters() {
    let rules = [Rule::MinLen(2, "too short"), Rule::MaxLen(3, "too long")];
    assert_eq!(validate("Ş", &rules), Some("too short"));
    assert_eq!(validate("Işı", &rules), None);
    assert_eq!(validate("Işık", &rules), Some("too long"));
  }

  #[test]
  fn test_min_number() {
    let price = [Rule::MinNumber(0.01, "Minimum price is 0.01")];
    assert_eq!(validate("0.01", &price), None);
    assert_eq!(validate("0", &price), Some("Minimum price is 0.01"));
    assert_eq!(validate("abc", &price), Some("Minimum price is 0.01"));
  }

  #[test]
  fn test_min_number_rejects_non_finite() {
    let price = [Rule::MinNumber(0.01, "Minimum price is 0.01")];
    for value in ["inf", "infinity", "1e400", "NaN"] {
      assert_eq!(validate(value, &price), Some("Minimum price is 0.01"), "{}", value);
    }
  }

  #[test]
  fn test_date() {
    let date = [Rule::Date("Use YYYY-MM-DD")];
    assert_eq!(validate("2024-02-29", &date), None);
    assert_eq!(validate("2023-02-29", &date), Some("Use YYYY-MM-DD"));
    assert_eq!(validate("01.02.2024", &date), Some("Use YYYY-MM-DD"));
  }

  #[test]
  fn test_password_strength() {
    assert!(is_strong_password("Secret1!"));
    assert!(!is_strong_password("secret1!"));
    assert!(!is_strong_password("SECRET1!"));
    assert!(!is_strong_password("Secret!!"));
    assert!(!is_strong_password("Secret12"));
    assert!(!is_strong_password("Sec1!"));
    assert!(!is_strong_password("Secret1!#"));
  }
}
