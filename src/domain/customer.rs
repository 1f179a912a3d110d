use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Lookup key when an order arrives. Not enforced unique.
    pub phone: String,
    pub address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

/// Contact fields supplied by a caller when a customer is created.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl Customer {
    pub fn new(id: String, details: CustomerDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: details.name,
            phone: details.phone,
            address: details.address,
            city: details.city,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
    }
}
