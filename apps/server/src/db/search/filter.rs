//! Filter compiler.
//!
//! Turns the loosely-typed filter options of a request into a [`FilterSet`]:
//! an ordered list of predicate fragments plus the values they bind. The set is
//! rendered to SQL only at the end, with a caller-chosen first placeholder, so
//! the nearby query can reserve `$1`/`$2` for its reference coordinate.
//!
//! Options are permissive: absent, blank or unrecognized values are ignored and
//! never produce an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::escape::contains_pattern;
use super::query_builder::{bind::push_text, BindValue};
use crate::models::Facility;

/// Recognized filter options, as supplied by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commune: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Only the exact literal `"true"` (untrimmed) activates the accessibility predicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessible: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterOptions {
    /// Pick the recognized options out of a raw query-string map.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let get = |key: &str| query.get(key).cloned();
        Self {
            commune: get("commune"),
            type_name: get("type"),
            accessible: get("accessible"),
            sport: get("sport"),
            search: get("search"),
        }
    }

    /// Only a sport filter (the nearby path accepts nothing else).
    pub fn sport(sport: Option<String>) -> Self {
        Self {
            sport,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Commune,
    TypeName,
    Accessible,
    Sport,
    Search,
}

#[derive(Debug, Clone)]
struct Fragment {
    kind: PredicateKind,
    /// 1-based slot into `FilterSet::values`.
    slot: Option<usize>,
    /// Lowercased user text, for in-process evaluation.
    needle: Option<String>,
}

/// Compiled filter: AND-ed fragments plus their bound values, in slot order.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    fragments: Vec<Fragment>,
    values: Vec<BindValue>,
}

impl FilterSet {
    /// Compile `options` from scratch.
    pub fn compile(options: &FilterOptions) -> Self {
        let mut set = FilterSet::default();

        if let Some(v) = present(&options.commune) {
            set.push_text(PredicateKind::Commune, v);
        }
        if let Some(v) = present(&options.type_name) {
            set.push_text(PredicateKind::TypeName, v);
        }
        if options.accessible.as_deref() == Some("true") {
            set.fragments.push(Fragment {
                kind: PredicateKind::Accessible,
                slot: None,
                needle: None,
            });
        }
        if let Some(v) = present(&options.sport) {
            set.push_text(PredicateKind::Sport, v);
        }
        if let Some(v) = present(&options.search) {
            set.push_text(PredicateKind::Search, v);
        }

        set
    }

    fn push_text(&mut self, kind: PredicateKind, value: &str) {
        let slot = push_text(&mut self.values, contains_pattern(value));
        self.fragments.push(Fragment {
            kind,
            slot: Some(slot),
            needle: Some(value.to_lowercase()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = PredicateKind> + '_ {
        self.fragments.iter().map(|f| f.kind)
    }

    /// Bound values, in placeholder order.
    pub fn values(&self) -> &[BindValue] {
        &self.values
    }

    /// AND-joined predicate text with placeholders numbered from `first`
    /// (`$first` is the first filter value). `None` when there is nothing to filter.
    pub fn render(&self, first: usize) -> Option<String> {
        if self.fragments.is_empty() {
            return None;
        }

        let clauses: Vec<String> = self
            .fragments
            .iter()
            .map(|fragment| {
                let p = fragment
                    .slot
                    .map(|slot| format!("${}", first + slot - 1))
                    .unwrap_or_default();
                match fragment.kind {
                    PredicateKind::Commune => format!("f.commune_nom ILIKE {p}"),
                    PredicateKind::TypeName => format!("f.equip_type_name ILIKE {p}"),
                    PredicateKind::Accessible => "f.equip_pmr_acc = true".to_string(),
                    PredicateKind::Sport => format!(
                        "EXISTS (SELECT 1 FROM jsonb_array_elements_text(\
                         CASE WHEN jsonb_typeof(f.aps_name) = 'array' THEN f.aps_name ELSE '[]'::jsonb END\
                         ) AS aps(name) WHERE aps.name ILIKE {p})"
                    ),
                    PredicateKind::Search => {
                        format!("(f.equip_nom ILIKE {p} OR f.inst_nom ILIKE {p})")
                    }
                }
            })
            .collect();

        Some(clauses.join(" AND "))
    }

    /// Evaluate the same predicates against an in-memory record.
    pub fn matches(&self, facility: &Facility) -> bool {
        self.fragments.iter().all(|fragment| {
            let needle = fragment.needle.as_deref().unwrap_or_default();
            match fragment.kind {
                PredicateKind::Commune => contains(facility.commune.as_deref(), needle),
                PredicateKind::TypeName => contains(facility.type_name.as_deref(), needle),
                PredicateKind::Accessible => facility.equipment_accessible == Some(true),
                PredicateKind::Sport => facility
                    .activities
                    .iter()
                    .any(|a| contains(Some(a.as_str()), needle)),
                PredicateKind::Search => {
                    contains(facility.name.as_deref(), needle)
                        || contains(facility.installation_name.as_deref(), needle)
                }
            }
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}
