//! Input validation
//!
//! Format checks applied at the API boundary before any lookup or
//! mutation. Messages are user-facing.

use super::card::CardExpiry;
use super::error::WalletError;

fn invalid(message: &str) -> WalletError {
    WalletError::InvalidInput(message.to_string())
}

/// Phone numbers are exactly 10 digits.
pub fn phone(value: i64) -> Result<(), WalletError> {
    if (1_000_000_000..=9_999_999_999).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            "Phone Number Should Have 10 Digits & Only Numbers Are Allowed.",
        ))
    }
}

/// Display names: 3-30 characters, at most 3 alphabetic words.
pub fn user_name(value: &str) -> Result<(), WalletError> {
    if value.is_empty() {
        return Err(invalid("User Name Cannot Be Empty."));
    }
    if value.len() < 3 || value.len() > 30 {
        return Err(invalid("User Name Should Be Between 3 & 30 Characters."));
    }
    if !alphabetic_words(value, 3) {
        return Err(invalid(
            "User Name Can Have Only Alphabets & Maximum Of 3 Words.",
        ));
    }
    Ok(())
}

/// Minimal well-formedness check: one '@', a dot in the domain part, no
/// whitespace.
pub fn email(value: &str) -> Result<(), WalletError> {
    if value.is_empty() {
        return Err(invalid("Email Address Cannot Be Empty."));
    }
    let well_formed = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty())
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if well_formed {
        Ok(())
    } else {
        Err(invalid("Enter A Valid Email."))
    }
}

/// Passwords: at least 8 characters with a letter, a digit and a special
/// character.
pub fn password(value: &str) -> Result<(), WalletError> {
    if value.is_empty() {
        return Err(invalid("Password Cannot Be Empty."));
    }
    let long_enough = value.len() >= 8;
    let has_alpha = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| !c.is_alphanumeric());
    if long_enough && has_alpha && has_digit && has_special {
        Ok(())
    } else {
        Err(invalid(
            "Length Of Password Should Be Atleast 8 & Contain 1 Digit, 1 Alphabet & 1 Special Character.",
        ))
    }
}

/// Card numbers are exactly 16 digits.
pub fn card_number(value: i64) -> Result<(), WalletError> {
    if (1_000_000_000_000_000..=9_999_999_999_999_999).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            "Card Number Should Have 16 Digits & Only Numbers Are Allowed.",
        ))
    }
}

/// Card names: 3-15 characters, at most 2 alphabetic words.
pub fn card_name(value: &str) -> Result<(), WalletError> {
    if value.is_empty() {
        return Err(invalid("Card Name Cannot Be Empty."));
    }
    if value.len() < 3 || value.len() > 15 {
        return Err(invalid("Card Name Should Be Between 3 & 15 Characters."));
    }
    if !alphabetic_words(value, 2) {
        return Err(invalid("Only Alphabets & Spaces Allowed In Card Name."));
    }
    Ok(())
}

/// CVVs are exactly 3 digits.
pub fn cvv(value: &str) -> Result<(), WalletError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("CVV Should Have 3 Digits & Only Numbers Are Allowed."))
    }
}

/// Expiry month and 2-digit year, both zero-padded.
pub fn expiry(month: &str, year: &str) -> Result<CardExpiry, WalletError> {
    if month.len() != 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("Expiry Month Should Be Between 01-12."));
    }
    if year.len() != 2 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "Expiry Year Should Have 2 Digits & Only Numbers Are Allowed.",
        ));
    }
    let month: u32 = month
        .parse()
        .map_err(|_| invalid("Expiry Month Should Be Between 01-12."))?;
    let year: u32 = year
        .parse()
        .map_err(|_| invalid("Expiry Year Should Have 2 Digits & Only Numbers Are Allowed."))?;
    CardExpiry::new(month, year)
}

fn alphabetic_words(value: &str, max_words: usize) -> bool {
    let words: Vec<&str> = value.split(' ').collect();
    words.len() <= max_words
        && words
            .iter()
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
}
