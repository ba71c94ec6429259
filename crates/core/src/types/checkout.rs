//! Billing and payment form captured at checkout.
//!
//! The form is saved as the user types and cleared after an order is
//! placed. Nothing here is ever sent to a payment processor.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Billing and payment details. Every field is required to place an order.
///
/// Implements `Debug` manually to redact card details.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl CheckoutForm {
    /// Read one field.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::Name => &self.name,
            CheckoutField::Email => &self.email,
            CheckoutField::Address => &self.address,
            CheckoutField::City => &self.city,
            CheckoutField::Zip => &self.zip,
            CheckoutField::CardNumber => &self.card_number,
            CheckoutField::CardName => &self.card_name,
            CheckoutField::Expiry => &self.expiry,
            CheckoutField::Cvv => &self.cvv,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: CheckoutField, value: impl Into<String>) {
        let slot = match field {
            CheckoutField::Name => &mut self.name,
            CheckoutField::Email => &mut self.email,
            CheckoutField::Address => &mut self.address,
            CheckoutField::City => &mut self.city,
            CheckoutField::Zip => &mut self.zip,
            CheckoutField::CardNumber => &mut self.card_number,
            CheckoutField::CardName => &mut self.card_name,
            CheckoutField::Expiry => &mut self.expiry,
            CheckoutField::Cvv => &mut self.cvv,
        };
        *slot = value.into();
    }

    /// The first required field (in form order) that is blank.
    #[must_use]
    pub fn first_blank(&self) -> Option<CheckoutField> {
        CheckoutField::ALL
            .into_iter()
            .find(|field| self.get(*field).trim().is_empty())
    }

    /// Whether no field has been filled in yet.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("zip", &self.zip)
            .field("card_number", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// A field of the [`CheckoutForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    Name,
    Email,
    Address,
    City,
    Zip,
    CardNumber,
    CardName,
    Expiry,
    Cvv,
}

impl CheckoutField {
    /// Every field, in the order the form presents them.
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Email,
        Self::Address,
        Self::City,
        Self::Zip,
        Self::CardNumber,
        Self::CardName,
        Self::Expiry,
        Self::Cvv,
    ];

    /// Key used in the persisted form.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::Zip => "zip",
            Self::CardNumber => "cardNumber",
            Self::CardName => "cardName",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Address => "Address",
            Self::City => "City",
            Self::Zip => "ZIP Code",
            Self::CardNumber => "Card Number",
            Self::CardName => "Name on Card",
            Self::Expiry => "Expiry Date",
            Self::Cvv => "CVV",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CheckoutField {
    type Err = String;

    /// Accepts the persisted key (`cardNumber`) or snake case (`card_number`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['_', '-'], "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown checkout field: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        let mut form = CheckoutForm::default();
        for field in CheckoutField::ALL {
            form.set(field, "x");
        }
        form.set(CheckoutField::Email, "buyer@example.com");
        form.set(CheckoutField::CardNumber, "4242424242424242");
        form.set(CheckoutField::Cvv, "123");
        form
    }

    #[test]
    fn test_first_blank_follows_form_order() {
        let mut form = filled();
        assert_eq!(form.first_blank(), None);
        form.set(CheckoutField::Expiry, "  ");
        form.set(CheckoutField::City, "");
        assert_eq!(form.first_blank(), Some(CheckoutField::City));
    }

    #[test]
    fn test_debug_redacts_card() {
        let debug = format!("{:?}", filled());
        assert!(!debug.contains("4242"));
        assert!(!debug.contains("123"));
        assert!(debug.contains("buyer@example.com"));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("cardNumber".parse::<CheckoutField>().unwrap(), CheckoutField::CardNumber);
        assert_eq!("card_number".parse::<CheckoutField>().unwrap(), CheckoutField::CardNumber);
        assert_eq!("CVV".parse::<CheckoutField>().unwrap(), CheckoutField::Cvv);
        assert!("phone".parse::<CheckoutField>().is_err());
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(filled()).unwrap();
        assert_eq!(json["cardNumber"], "4242424242424242");
        assert_eq!(json["cardName"], "x");
    }

    #[test]
    fn test_missing_keys_default_to_blank() {
        let form: CheckoutForm = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(form.name, "Ada");
        assert_eq!(form.first_blank(), Some(CheckoutField::Email));
        assert!(!form.is_untouched());
    }
}
