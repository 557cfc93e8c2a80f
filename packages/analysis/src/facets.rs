//! Grantee merging, filter facets, and the filter predicate.
//!
//! After a batch completes, every foundation's grantee list is merged into
//! one combined sequence (each grantee tagged with its source foundation)
//! and facet sets are derived from it to drive filtering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Foundation, Grantee};

/// Active filter selections. An empty set means "no constraint" for that
/// dimension; all four dimensions are ANDed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub states: Vec<String>,
    /// Inclusive `[min, max]` bounds on the grant amount.
    pub amount_range: [f64; 2],
    pub purposes: Vec<String>,
}

impl FilterOptions {
    /// A filter that admits every grantee within the given amount range.
    pub fn unconstrained(amount_range: [f64; 2]) -> Self {
        Self {
            years: Vec::new(),
            states: Vec::new(),
            amount_range,
            purposes: Vec::new(),
        }
    }

    /// Whether `grantee` passes every selected dimension.
    pub fn matches(&self, grantee: &Grantee) -> bool {
        if !self.years.is_empty() && !self.years.contains(&grantee.year) {
            return false;
        }
        if !self.states.is_empty() && !self.states.contains(&grantee.location.state) {
            return false;
        }
        if grantee.amount < self.amount_range[0] || grantee.amount > self.amount_range[1] {
            return false;
        }
        if !self.purposes.is_empty() && !self.purposes.contains(&grantee.purpose) {
            return false;
        }
        true
    }
}

/// Facet sets derived from a combined grantee list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    /// Distinct years, descending.
    pub years: Vec<i32>,
    /// Distinct states, ascending.
    pub states: Vec<String>,
    /// Distinct purposes, ascending.
    pub purposes: Vec<String>,
    /// Inclusive min/max grant amount; `[0, 0]` when no grantees exist.
    pub amount_range: [f64; 2],
}

/// Merge every foundation's grantees into one sequence, tagging each with
/// its source foundation's name.
pub fn merge_grantees<'a>(foundations: impl IntoIterator<Item = &'a Foundation>) -> Vec<Grantee> {
    foundations
        .into_iter()
        .flat_map(|foundation| {
            foundation
                .grantees
                .iter()
                .map(|grantee| grantee.clone().tagged(foundation.name.clone()))
        })
        .collect()
}

/// Derive facet sets from a combined grantee list.
///
/// Deterministic regardless of input order, so re-deriving over the same
/// list always yields identical sets.
pub fn derive_facets(grantees: &[Grantee]) -> Facets {
    let mut years: Vec<i32> = grantees
        .iter()
        .map(|g| g.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    years.reverse();

    let states: Vec<String> = grantees
        .iter()
        .map(|g| g.location.state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let purposes: Vec<String> = grantees
        .iter()
        .map(|g| g.purpose.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Facets {
        years,
        states,
        purposes,
        amount_range: amount_range(grantees),
    }
}

/// Inclusive min/max of grant amounts; `[0, 0]` when the list is empty.
pub fn amount_range(grantees: &[Grantee]) -> [f64; 2] {
    let mut amounts = grantees.iter().map(|g| g.amount);
    let Some(first) = amounts.next() else {
        return [0.0, 0.0];
    };
    amounts.fold([first, first], |[min, max], amount| {
        [min.min(amount), max.max(amount)]
    })
}

/// Apply a filter to a grantee list.
pub fn filter_grantees<'a>(grantees: &'a [Grantee], filters: &FilterOptions) -> Vec<&'a Grantee> {
    grantees.iter().filter(|g| filters.matches(g)).collect()
}

/// Render grantees as CSV for export, foundation tag included.
pub fn grantees_to_csv(grantees: &[Grantee]) -> String {
    let mut out = String::from("foundation,grantee,year,city,state,amount,purpose\n");
    for grantee in grantees {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(grantee.foundation.as_deref().unwrap_or("")),
            csv_field(&grantee.name),
            grantee.year,
            csv_field(&grantee.location.city),
            csv_field(&grantee.location.state),
            grantee.amount,
            csv_field(&grantee.purpose),
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
