//! Parsing and derivation for LLM analysis replies.
//!
//! The model is asked for a fixed JSON shape but fields it could not find
//! come back as `null`; deserialization tolerates those, while anything that
//! is not valid JSON at all is a hard failure with no partial recovery.

use serde::Deserialize;

use crate::error::Result;
use crate::types::{ContactInfo, Foundation, Grantee, KeyPerson, Location};

/// Raw reply shape, with every field nullable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFoundation {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    ein: Option<String>,
    #[serde(default)]
    total_assets: Option<f64>,
    #[serde(default)]
    total_giving: Option<f64>,
    #[serde(default)]
    contact_info: Option<RawContactInfo>,
    #[serde(default)]
    key_personnel: Option<Vec<RawKeyPerson>>,
    #[serde(default)]
    grantees: Option<Vec<RawGrantee>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContactInfo {
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKeyPerson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGrantee {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    location: Option<RawLocation>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    purpose: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// Parse a raw model reply into a [`Foundation`], deriving average and
/// median grant amounts.
pub fn parse_foundation(raw: &str) -> Result<Foundation> {
    let parsed: RawFoundation = serde_json::from_str(strip_code_fence(raw))?;

    let raw_grantees = parsed.grantees.unwrap_or_default();

    // Stats come from the raw amounts: null or non-finite entries are
    // excluded entirely rather than counted as zero.
    let amounts: Vec<f64> = raw_grantees
        .iter()
        .filter_map(|g| g.amount)
        .filter(|a| a.is_finite())
        .collect();
    let (average, median) = grant_stats(&amounts);

    let grantees: Vec<Grantee> = raw_grantees
        .into_iter()
        .map(|g| {
            let location = g.location.unwrap_or_default();
            Grantee {
                name: g.name.unwrap_or_default(),
                year: g.year.unwrap_or_default(),
                location: Location {
                    city: location.city.unwrap_or_default(),
                    state: location.state.unwrap_or_default(),
                },
                amount: g.amount.unwrap_or_default(),
                purpose: g.purpose.unwrap_or_default(),
                foundation: None,
            }
        })
        .collect();

    let contact = parsed.contact_info.unwrap_or_default();

    Ok(Foundation {
        name: parsed.name.unwrap_or_default(),
        ein: parsed.ein.unwrap_or_default(),
        total_assets: parsed.total_assets.unwrap_or_default(),
        total_giving: parsed.total_giving.unwrap_or_default(),
        average_grant_amount: average,
        median_grant_amount: median,
        contact_info: ContactInfo {
            phone: contact.phone,
            address: contact.address,
            website: contact.website,
        },
        key_personnel: parsed
            .key_personnel
            .unwrap_or_default()
            .into_iter()
            .map(|p| KeyPerson {
                name: p.name.unwrap_or_default(),
                role: p.role.unwrap_or_default(),
            })
            .collect(),
        grantees,
    })
}

/// Average and median of a slice of grant amounts.
///
/// The median is `sorted[n / 2]` of the ascending sort, which for even
/// counts is the upper of the middle pair, not interpolated. Both default
/// to 0 when no amounts exist.
pub fn grant_stats(amounts: &[f64]) -> (f64, f64) {
    if amounts.is_empty() {
        return (0.0, 0.0);
    }

    let sum: f64 = amounts.iter().sum();
    let average = sum / amounts.len() as f64;

    let mut sorted = amounts.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = sorted[sorted.len() / 2];

    (average, median)
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn strip_code_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn average_and_median_odd_count() {
        let (average, median) = grant_stats(&[10.0, 20.0, 30.0]);
        assert_eq!(average, 20.0);
        assert_eq!(median, 20.0);
    }

    #[test]
    fn median_even_count_takes_upper_of_middle_pair() {
        let (_, median) = grant_stats(&[10.0, 20.0, 30.0, 40.0]);
        // sorted[floor(4 / 2)] = sorted[2] = 30, no interpolation.
        assert_eq!(median, 30.0);
    }

    #[test]
    fn stats_default_to_zero_when_empty() {
        assert_eq!(grant_stats(&[]), (0.0, 0.0));
    }

    #[test]
    fn stats_sort_before_taking_median() {
        let (_, median) = grant_stats(&[40.0, 10.0, 30.0, 20.0]);
        assert_eq!(median, 30.0);
    }

    #[test]
    fn parses_complete_reply() {
        let raw = r#"{
            "name": "Example Foundation",
            "ein": "12-3456789",
            "totalAssets": 1000000,
            "totalGiving": 90000,
            "contactInfo": {"phone": null, "address": "1 Main St", "website": null},
            "keyPersonnel": [{"name": "Jane", "role": "Director"}],
            "grantees": [
                {"name": "A", "year": 2023, "location": {"city": "Madison", "state": "WI"}, "amount": 10000, "purpose": "Education"},
                {"name": "B", "year": 2023, "location": {"city": "Chicago", "state": "IL"}, "amount": 30000, "purpose": "Health"},
                {"name": "C", "year": 2022, "location": {"city": "Austin", "state": "TX"}, "amount": 20000, "purpose": "Arts"}
            ]
        }"#;

        let foundation = parse_foundation(raw).unwrap();
        assert_eq!(foundation.name, "Example Foundation");
        assert_eq!(foundation.grantees.len(), 3);
        assert_eq!(foundation.average_grant_amount, 20000.0);
        assert_eq!(foundation.median_grant_amount, 20000.0);
        assert_eq!(foundation.contact_info.address.as_deref(), Some("1 Main St"));
        assert_eq!(foundation.contact_info.phone, None);
    }

    #[test]
    fn null_amounts_are_excluded_from_stats() {
        let raw = r#"{
            "name": "F",
            "grantees": [
                {"name": "A", "year": 2023, "amount": null, "purpose": "X"},
                {"name": "B", "year": 2023, "amount": 10, "purpose": "Y"},
                {"name": "C", "year": 2023, "amount": 20, "purpose": "Z"}
            ]
        }"#;

        let foundation = parse_foundation(raw).unwrap();
        assert_eq!(foundation.grantees.len(), 3);
        assert_eq!(foundation.average_grant_amount, 15.0);
        assert_eq!(foundation.median_grant_amount, 20.0);
        // Null amount is carried as 0 in the list itself.
        assert_eq!(foundation.grantees[0].amount, 0.0);
    }

    #[test]
    fn no_grantees_defaults_everything_to_zero() {
        let foundation = parse_foundation(r#"{"name": "F", "grantees": null}"#).unwrap();
        assert!(foundation.grantees.is_empty());
        assert_eq!(foundation.average_grant_amount, 0.0);
        assert_eq!(foundation.median_grant_amount, 0.0);
    }

    #[test]
    fn malformed_json_is_a_hard_failure() {
        let result = parse_foundation("The filing shows assets of $5M.");
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn code_fenced_reply_still_parses() {
        let raw = "```json\n{\"name\": \"Fenced\", \"grantees\": []}\n```";
        let foundation = parse_foundation(raw).unwrap();
        assert_eq!(foundation.name, "Fenced");
    }
}
