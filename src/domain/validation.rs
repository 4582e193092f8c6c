//! Contact input validation and normalization.
//!
//! Collects every problem instead of stopping at the first one.

use super::entities::{Address, NewContact};
use super::errors::DomainError;
use super::phone::normalize_phone;
use serde::Deserialize;
use std::collections::HashSet;

const PHONE_MIN_LEN: usize = 8;
const PHONE_MAX_LEN: usize = 20;

/// Raw contact payload as received from a client. Every field is optional so
/// that missing fields are reported as validation details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    pub name: Option<String>,
    pub address: Option<AddressInput>,
    pub email: Option<String>,
    pub phones: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Validates `input` and returns the normalized contact.
///
/// # Errors
/// * `DomainError::Validation` with one message per invalid field
/// * `DomainError::PhoneDuplicate` if two phones normalize to the same digits
pub fn validate_contact(input: &ContactInput) -> Result<NewContact, DomainError> {
    let mut details = Vec::new();

    let name = match input.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        Some(_) => {
            details.push("\"name\" must not be empty".to_string());
            String::new()
        }
        None => {
            details.push("\"name\" is required".to_string());
            String::new()
        }
    };

    let address = match &input.address {
        Some(a) => validate_address(a, &mut details),
        None => {
            details.push("\"address\" is required".to_string());
            Address::default()
        }
    };

    let email = match input.email.as_deref().map(str::trim) {
        Some(e) if is_valid_email(e) => e.to_lowercase(),
        Some(_) => {
            details.push("\"email\" must be a valid email".to_string());
            String::new()
        }
        None => {
            details.push("\"email\" is required".to_string());
            String::new()
        }
    };

    let phones = match &input.phones {
        Some(list) if list.is_empty() => {
            details.push("\"phones\" must contain at least 1 item".to_string());
            Vec::new()
        }
        Some(list) => {
            for (i, p) in list.iter().enumerate() {
                if let Some(problem) = phone_problem(p) {
                    details.push(format!("\"phones[{}]\" {}", i, problem));
                }
            }
            list.iter().map(|p| normalize_phone(p)).collect()
        }
        None => {
            details.push("\"phones\" is required".to_string());
            Vec::new()
        }
    };

    if !details.is_empty() {
        return Err(DomainError::Validation(details));
    }

    let mut seen = HashSet::with_capacity(phones.len());
    if !phones.iter().all(|p| seen.insert(p.as_str())) {
        return Err(DomainError::PhoneDuplicate);
    }

    Ok(NewContact {
        name,
        address,
        email,
        phones,
    })
}

fn validate_address(input: &AddressInput, details: &mut Vec<String>) -> Address {
    let city = match input.city.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        Some(_) => {
            details.push("\"address.city\" must not be empty".to_string());
            String::new()
        }
        None => {
            details.push("\"address.city\" is required".to_string());
            String::new()
        }
    };

    let state = input
        .state
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_uppercase();
    if !state.is_empty() && state.chars().count() != 2 {
        details.push("\"address.state\" must be 2 characters long".to_string());
    }

    Address {
        street: input.street.as_deref().map(str::trim).unwrap_or_default().to_string(),
        city,
        state,
    }
}

fn phone_problem(raw: &str) -> Option<&'static str> {
    let len = raw.chars().count();
    if len < PHONE_MIN_LEN {
        return Some("must be at least 8 characters long");
    }
    if len > PHONE_MAX_LEN {
        return Some("must be at most 20 characters long");
    }
    let allowed = |c: char| c.is_ascii_digit() || c.is_whitespace() || "()+-.".contains(c);
    if !raw.chars().all(allowed) || !raw.chars().any(|c| c.is_ascii_digit()) {
        return Some("may only contain digits, spaces and ( ) + - .");
    }
    None
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2 && !host.starts_with('.'),
        None => false,
    }
}
