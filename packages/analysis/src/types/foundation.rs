//! Core domain types for an analyzed Form 990 filing.
//!
//! Serialized in camelCase because the JSON shape doubles as the HTTP wire
//! format consumed by existing clients.

use serde::{Deserialize, Serialize};

/// The filing organization described by one Form 990 document.
///
/// Created once per analyzed document and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Foundation {
    pub name: String,

    /// Employer Identification Number, e.g. "12-3456789".
    pub ein: String,

    pub total_assets: f64,
    pub total_giving: f64,

    /// Arithmetic mean of the valid grant amounts; 0 when none exist.
    pub average_grant_amount: f64,

    /// `sorted[n / 2]` of the sorted amounts; 0 when none exist.
    pub median_grant_amount: f64,

    pub contact_info: ContactInfo,

    /// Officers, directors and trustees, in document order.
    pub key_personnel: Vec<KeyPerson>,

    /// Disclosed grant recipients, in document order.
    pub grantees: Vec<Grantee>,
}

/// Contact details for the foundation. Every field is optional because
/// filings frequently omit them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

/// One person listed in the filing. No identity beyond their position in
/// the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPerson {
    pub name: String,
    pub role: String,
}

/// One grant recipient disclosed in a Form 990.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grantee {
    pub name: String,

    /// Four-digit calendar year of the grant.
    pub year: i32,

    pub location: Location,

    /// Grant amount in dollars. Never negative.
    pub amount: f64,

    pub purpose: String,

    /// Name of the foundation that made the grant. Populated when grantee
    /// lists from several documents are merged into one view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation: Option<String>,
}

/// City and state of a grantee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: String,
    pub state: String,
}

impl Grantee {
    /// Build a grantee without a foundation annotation.
    pub fn new(
        name: impl Into<String>,
        year: i32,
        city: impl Into<String>,
        state: impl Into<String>,
        amount: f64,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            year,
            location: Location {
                city: city.into(),
                state: state.into(),
            },
            amount,
            purpose: purpose.into(),
            foundation: None,
        }
    }

    /// Annotate with the owning foundation's name.
    pub fn tagged(mut self, foundation: impl Into<String>) -> Self {
        self.foundation = Some(foundation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foundation_serializes_camel_case() {
        let foundation = Foundation {
            name: "Example Foundation".to_string(),
            ein: "12-3456789".to_string(),
            total_assets: 1_000_000.0,
            total_giving: 250_000.0,
            average_grant_amount: 50_000.0,
            median_grant_amount: 40_000.0,
            contact_info: ContactInfo::default(),
            key_personnel: vec![KeyPerson {
                name: "Jane Smith".to_string(),
                role: "Executive Director".to_string(),
            }],
            grantees: vec![Grantee::new("Org", 2023, "Madison", "WI", 40_000.0, "Education")],
        };

        let json = serde_json::to_value(&foundation).unwrap();
        assert_eq!(json["totalAssets"], 1_000_000.0);
        assert_eq!(json["keyPersonnel"][0]["name"], "Jane Smith");
        assert_eq!(json["grantees"][0]["location"]["state"], "WI");
        // Untagged grantees must not leak a foundation field on the wire.
        assert!(json["grantees"][0].get("foundation").is_none());
    }

    #[test]
    fn tagged_grantee_carries_foundation_name() {
        let grantee = Grantee::new("Org", 2023, "Madison", "WI", 10.0, "Health")
            .tagged("Example Foundation");
        let json = serde_json::to_value(&grantee).unwrap();
        assert_eq!(json["foundation"], "Example Foundation");
    }
}
