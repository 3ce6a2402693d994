//! Customer contact and delivery data.

use crate::ids::BranchId;
use serde::{Deserialize, Serialize};

/// Customer contact fields collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerContact {
    /// Check all fields are present and well-formed.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && is_valid_email(self.email.trim())
            && normalize_phone(&self.phone).is_some()
    }
}

/// How the finished order reaches the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Pickup at a branch.
    Pickup { branch: BranchId },
    /// Home delivery to a free-text address.
    Domicilio { address: String },
}

impl DeliveryMethod {
    /// Wire token for the collaborator.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Pickup { .. } => "sucursal",
            DeliveryMethod::Domicilio { .. } => "domicilio",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeliveryMethod::Pickup { .. } => "Recoger en sucursal",
            DeliveryMethod::Domicilio { .. } => "Entrega a domicilio",
        }
    }

    /// Check the method-dependent required field is present.
    pub fn is_complete(&self) -> bool {
        match self {
            DeliveryMethod::Pickup { branch } => !branch.as_str().trim().is_empty(),
            DeliveryMethod::Domicilio { address } => !address.trim().is_empty(),
        }
    }
}

/// A pickup branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
}

/// Validate an email address: one `@`, non-empty local part, and a domain
/// with a dot separating non-empty labels. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
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
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Normalize a phone number by stripping non-digit characters.
///
/// Returns the bare digits only when exactly 10 remain.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        Some(digits)
    } else {
        None
    }
}
