//! Payment method selection and validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Payment method recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Card,
    Cod,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Cod => "cod",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cod => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What the customer entered for their chosen method.
///
/// Card fields are checked locally and then dropped.
#[derive(Clone, PartialEq, Eq)]
pub enum PaymentDetails {
    Upi {
        upi_id: String,
    },
    Card {
        number: String,
        holder: String,
        expiry: String,
        cvv: String,
    },
    CashOnDelivery {
        address: String,
        phone: String,
    },
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentDetails::Upi { upi_id } => f.debug_struct("Upi").field("upi_id", upi_id).finish(),
            PaymentDetails::Card { holder, .. } => f
                .debug_struct("Card")
                .field("holder", holder)
                .finish_non_exhaustive(),
            PaymentDetails::CashOnDelivery { address, phone } => f
                .debug_struct("CashOnDelivery")
                .field("address", address)
                .field("phone", phone)
                .finish(),
        }
    }
}

impl PaymentDetails {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentDetails::Upi { .. } => PaymentMethod::Upi,
            PaymentDetails::Card { .. } => PaymentMethod::Card,
            PaymentDetails::CashOnDelivery { .. } => PaymentMethod::Cod,
        }
    }

    /// Check every required field for the chosen method.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        match self {
            PaymentDetails::Upi { upi_id } => err.require("upi_id", upi_id),
            PaymentDetails::Card {
                number,
                holder,
                expiry,
                cvv,
            } => {
                let number = strip_spaces(number);
                if number.is_empty() {
                    err.missing("card_number");
                } else if !is_digits(&number) || number.len() > 16 {
                    err.invalid("card_number", "must be up to 16 digits");
                }

                err.require("card_name", holder);

                if expiry.trim().is_empty() {
                    err.missing("expiry");
                } else if !is_valid_expiry(expiry.trim()) {
                    err.invalid("expiry", "must be MM/YY");
                }

                if cvv.trim().is_empty() {
                    err.missing("cvv");
                } else if !is_digits(cvv.trim()) || cvv.trim().len() > 3 {
                    err.invalid("cvv", "must be up to 3 digits");
                }
            }
            PaymentDetails::CashOnDelivery { address, phone } => {
                err.require("address", address);
                err.require("phone", phone);
            }
        }
        err.into_result()
    }

    /// Delivery address and phone sent with the order (cash on delivery only).
    pub fn delivery_contact(&self) -> (Option<String>, Option<String>) {
        match self {
            PaymentDetails::CashOnDelivery { address, phone } => (
                Some(address.trim().to_string()),
                Some(phone.trim().to_string()),
            ),
            _ => (None, None),
        }
    }
}

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_expiry(s: &str) -> bool {
    let Some((mm, yy)) = s.split_once('/') else {
        return false;
    };
    if mm.len() != 2 || yy.len() != 2 || !is_digits(mm) || !is_digits(yy) {
        return false;
    }
    matches!(mm.parse::<u8>(), Ok(1..=12))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str, expiry: &str, cvv: &str) -> PaymentDetails {
        PaymentDetails::Card {
            number: number.to_string(),
            holder: "Asha Rao".to_string(),
            expiry: expiry.to_string(),
            cvv: cvv.to_string(),
        }
    }

    #[test]
    fn test_valid_card() {
        assert!(card("4111 1111 1111 1111", "09/27", "123").validate().is_ok());
    }

    #[test]
    fn test_card_field_rules() {
        let err = card("4111-1111", "9/27", "1234").validate().unwrap_err();
        assert!(err.has("card_number"));
        assert!(err.has("expiry"));
        assert!(err.has("cvv"));
        assert!(card("4111111111111111", "13/27", "123").validate().is_err());
        assert!(card("41111111111111112", "12/27", "123").validate().is_err());
    }

    #[test]
    fn test_upi_requires_id() {
        let err = PaymentDetails::Upi {
            upi_id: " ".to_string(),
        }
        .validate()
        .unwrap_err();
        assert!(err.has("upi_id"));
    }

    #[test]
    fn test_cod_sends_contact_only() {
        let cod = PaymentDetails::CashOnDelivery {
            address: " 12 MG Road ".to_string(),
            phone: "9876543210".to_string(),
        };
        assert!(cod.validate().is_ok());
        assert_eq!(cod.method(), PaymentMethod::Cod);
        assert_eq!(
            cod.delivery_contact(),
            (Some("12 MG Road".to_string()), Some("9876543210".to_string()))
        );
        assert_eq!(card("1", "01/30", "1").delivery_contact(), (None, None));
    }

    #[test]
    fn test_debug_hides_card_number() {
        let rendered = format!("{:?}", card("4111111111111111", "01/30", "999"));
        assert!(!rendered.contains("4111"));
        assert!(!rendered.contains("999"));
    }

    #[test]
    fn test_method_wire_name() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cod).unwrap(), r#""cod""#);
    }
}
