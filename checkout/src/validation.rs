//! Validation gate for wizard steps.
//!
//! Stateless predicates, one per field, composed per step. Each gate
//! reports every failing field for its step (not just the first) so the UI
//! can show all errors inline. A step may only advance when its gate
//! returns an empty map.

use crate::types::{ContactInfo, TicketSelection};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A form field checked by the gate, used as the error-map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Selected event date.
    EventDate,

    /// Number of tickets.
    Quantity,

    /// Ticket tier.
    Tier,

    /// Full name.
    FullName,

    /// Email address.
    Email,

    /// Phone number.
    Phone,
}

impl Field {
    /// Stable lowercase name, useful for logging and form bindings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventDate => "event_date",
            Self::Quantity => "quantity",
            Self::Tier => "tier",
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field-keyed validation messages for the current step.
///
/// A `BTreeMap` keeps iteration order deterministic for rendering and tests.
pub type FieldErrors = BTreeMap<Field, String>;

/// Gate for the selection step (step 1).
///
/// Checks the event date is present and a real calendar date, the quantity
/// is at least one, and the tier is sold for the chosen duration (so the
/// pricing engine never sees an undefined pair). No upper bound is placed
/// on quantity.
#[must_use]
pub fn validate_selection(selection: &TicketSelection) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if selection.event_date.trim().is_empty() {
        errors.insert(Field::EventDate, "Please select an event date".to_string());
    } else if NaiveDate::parse_from_str(selection.event_date.trim(), "%Y-%m-%d").is_err() {
        errors.insert(
            Field::EventDate,
            "Event date must be a valid date (YYYY-MM-DD)".to_string(),
        );
    }

    if selection.quantity < 1 {
        errors.insert(Field::Quantity, "Please select at least one ticket".to_string());
    }

    if !selection.duration.allows(selection.tier) {
        errors.insert(
            Field::Tier,
            format!(
                "{} tickets are not offered as a {}",
                selection.tier, selection.duration
            ),
        );
    }

    errors
}

/// Gate for the contact step (step 2).
///
/// The email check is two-staged with distinct messages: address shape
/// first, then the single approved mail domain. The phone number is reduced
/// to digits before the length check, so stray separators never fail a
/// well-formed number.
#[must_use]
pub fn validate_contact(contact: &ContactInfo, approved_domain: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if contact.full_name.trim().is_empty() {
        errors.insert(Field::FullName, "Please enter your full name".to_string());
    }

    if !has_address_shape(&contact.email) {
        errors.insert(
            Field::Email,
            "Please enter a valid email address".to_string(),
        );
    } else if !contact
        .email
        .to_ascii_lowercase()
        .ends_with(&format!("@{}", approved_domain.to_ascii_lowercase()))
    {
        errors.insert(
            Field::Email,
            format!("Only @{approved_domain} email addresses are allowed"),
        );
    }

    if sanitize_phone(&contact.phone).len() != 10 {
        errors.insert(
            Field::Phone,
            "Phone number must be exactly 10 digits".to_string(),
        );
    }

    errors
}

/// Strip everything but decimal digits from a raw phone entry.
#[must_use]
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Minimal `local@domain.tld` shape check.
///
/// Mirrors the classic "no whitespace, one `@`, dotted domain" form check;
/// real deliverability is the backend's problem.
fn has_address_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DurationClass, TierCode};

    fn valid_selection() -> TicketSelection {
        TicketSelection {
            event_date: "2025-09-24".to_string(),
            duration: DurationClass::SingleDay,
            tier: TierCode::Female,
            quantity: 2,
        }
    }

    fn valid_contact() -> ContactInfo {
        ContactInfo {
            full_name: "Asha".to_string(),
            email: "asha@gmail.com".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    #[test]
    fn complete_selection_passes() {
        assert!(validate_selection(&valid_selection()).is_empty());
    }

    #[test]
    fn missing_date_is_reported() {
        let selection = TicketSelection {
            event_date: String::new(),
            ..valid_selection()
        };
        let errors = validate_selection(&selection);
        assert!(errors.contains_key(&Field::EventDate));
    }

    #[test]
    fn unparseable_date_is_reported() {
        let selection = TicketSelection {
            event_date: "24th September".to_string(),
            ..valid_selection()
        };
        let errors = validate_selection(&selection);
        assert!(errors[&Field::EventDate].contains("valid date"));
    }

    #[test]
    fn zero_quantity_is_reported() {
        let selection = TicketSelection {
            quantity: 0,
            ..valid_selection()
        };
        let errors = validate_selection(&selection);
        assert!(errors.contains_key(&Field::Quantity));
    }

    #[test]
    fn tier_not_sold_for_duration_is_reported() {
        let selection = TicketSelection {
            duration: DurationClass::SeasonPass,
            tier: TierCode::Kids,
            ..valid_selection()
        };
        let errors = validate_selection(&selection);
        assert!(errors.contains_key(&Field::Tier));
    }

    #[test]
    fn all_selection_failures_are_reported_together() {
        let selection = TicketSelection {
            event_date: String::new(),
            duration: DurationClass::SeasonPass,
            tier: TierCode::Male,
            quantity: 0,
        };
        let errors = validate_selection(&selection);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn complete_contact_passes() {
        assert!(validate_contact(&valid_contact(), "gmail.com").is_empty());
    }

    #[test]
    fn approved_domain_passes_and_other_domain_gets_domain_message() {
        let approved = validate_contact(
            &ContactInfo {
                email: "a@gmail.com".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert!(!approved.contains_key(&Field::Email));

        let rejected = validate_contact(
            &ContactInfo {
                email: "a@yahoo.com".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert_eq!(
            rejected[&Field::Email],
            "Only @gmail.com email addresses are allowed"
        );
    }

    #[test]
    fn malformed_email_gets_the_syntax_message() {
        let errors = validate_contact(
            &ContactInfo {
                email: "not-an-email".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert_eq!(errors[&Field::Email], "Please enter a valid email address");
    }

    #[test]
    fn ten_digit_phone_passes() {
        let errors = validate_contact(&valid_contact(), "gmail.com");
        assert!(!errors.contains_key(&Field::Phone));
    }

    #[test]
    fn short_phone_fails() {
        let errors = validate_contact(
            &ContactInfo {
                phone: "98765".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert_eq!(errors[&Field::Phone], "Phone number must be exactly 10 digits");
    }

    #[test]
    fn phone_is_sanitized_before_the_length_check() {
        // Non-digits are stripped first: "98765abcde" -> "98765" -> too short
        let errors = validate_contact(
            &ContactInfo {
                phone: "98765abcde".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert!(errors.contains_key(&Field::Phone));

        // Separators alone do not fail a complete number
        let errors = validate_contact(
            &ContactInfo {
                phone: "98765-43210".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert!(!errors.contains_key(&Field::Phone));
    }

    #[test]
    fn empty_name_is_reported() {
        let errors = validate_contact(
            &ContactInfo {
                full_name: "   ".to_string(),
                ..valid_contact()
            },
            "gmail.com",
        );
        assert!(errors.contains_key(&Field::FullName));
    }

    #[test]
    fn sanitize_strips_everything_but_digits() {
        assert_eq!(sanitize_phone("+91 98765-43210"), "919876543210");
        assert_eq!(sanitize_phone("98765abcde"), "98765");
        assert_eq!(sanitize_phone(""), "");
    }
}
