//! Customers receiving delivery notes.

use crate::ids::CustomerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub is_active: bool,
    /// Vendor-managed-inventory flag. Reconciliation logic built on top of
    /// this flag is out of scope; the boolean itself is not.
    pub is_vmi_customer: bool,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CustomerId::new(),
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            contact_person: None,
            is_active: true,
            is_vmi_customer: false,
        }
    }
}
