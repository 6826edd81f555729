//! In-memory medicine table and the finder's query semantics.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rows served when no catalog is supplied.
const SAMPLE_CATALOG: &str = include_str!("../data/medicines.json");

/// Cap on type/dosage-only searches.
pub const MAX_SEARCH_RESULTS: usize = 15;
pub const MAX_SUGGESTIONS: usize = 10;
pub const VALID_FIELDS: [&str; 4] = ["Name", "Formulation", "Type", "Dosage"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Dosage")]
    pub dosage: String,
    #[serde(rename = "Formulation")]
    pub formulation: String,
    #[serde(rename = "Cost of branded")]
    pub cost_of_branded: f64,
    #[serde(rename = "Cost of generic")]
    pub cost_of_generic: f64,
    #[serde(rename = "Cost difference", default)]
    pub cost_difference: Option<f64>,
    #[serde(rename = "Savings", default)]
    pub savings: Option<f64>,
    #[serde(rename = "Type")]
    pub medicine_type: String,
    #[serde(rename = "Uses")]
    pub uses: String,
    #[serde(rename = "Side Effects")]
    pub side_effects: String,
}

impl Medicine {
    /// Fill in the difference and savings columns when the row lacks them.
    fn with_derived_costs(mut self) -> Self {
        if self.cost_difference.is_none() {
            self.cost_difference = Some(self.cost_of_branded - self.cost_of_generic);
        }
        if self.savings.is_none() && self.cost_of_branded > 0.0 {
            let pct = (self.cost_of_branded - self.cost_of_generic) / self.cost_of_branded * 100.0;
            self.savings = Some((pct * 10.0).round() / 10.0);
        }
        self
    }

    /// Row-level price checks. Rows failing them are never served as-is.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.cost_of_branded < 0.0 || self.cost_of_generic < 0.0 {
            return Err("Price cannot be negative");
        }
        if self.cost_of_generic > self.cost_of_branded {
            return Err("Generic price cannot be higher than branded price");
        }
        Ok(())
    }

    fn column(&self, field: &str) -> Option<&str> {
        match field {
            "Name" => Some(&self.name),
            "Formulation" => Some(&self.formulation),
            "Type" => Some(&self.medicine_type),
            "Dosage" => Some(&self.dosage),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    None,
    LowToHigh,
    HighToLow,
}

/// Body of `POST /finder/search`. Accepts both lower-case and column-style keys.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "Formulation")]
    pub formulation: Option<String>,
    #[serde(rename = "type", alias = "Type")]
    pub medicine_type: Option<String>,
    #[serde(alias = "Dosage")]
    pub dosage: Option<String>,
}

impl SearchRequest {
    /// Blank strings count as absent.
    fn normalized(self) -> Self {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Self {
            name: present(self.name),
            formulation: present(self.formulation),
            medicine_type: present(self.medicine_type),
            dosage: present(self.dosage),
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.formulation.is_none()
            && self.medicine_type.is_none()
            && self.dosage.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub exact_match: Option<Medicine>,
    pub similar_formulations: Vec<Medicine>,
    #[serde(rename = "Uses")]
    pub uses: Option<String>,
    #[serde(rename = "Side Effects")]
    pub side_effects: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchError {
    NoCriteria,
    /// A matching row failed [`Medicine::validate`].
    InvalidRow { name: String, reason: &'static str },
}

fn validate_all<'a>(rows: impl IntoIterator<Item = &'a Medicine>) -> Result<(), SearchError> {
    rows.into_iter().try_for_each(|row| {
        row.validate().map_err(|reason| SearchError::InvalidRow {
            name: row.name.clone(),
            reason,
        })
    })
}

/// Trim and drop stray spaces around hyphens.
fn clean_search_value(value: &str) -> String {
    value
        .trim()
        .split('-')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("-")
}

/// Collapse runs of whitespace.
fn clean_type_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive substring match, the `ILIKE '%needle%'` of the real table.
fn ilike(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn sort_by_branded(rows: &mut [Medicine], order: SortOrder) {
    let by_cost = |a: &Medicine, b: &Medicine| a.cost_of_branded.total_cmp(&b.cost_of_branded);
    match order {
        SortOrder::None => {}
        SortOrder::LowToHigh => rows.sort_by(by_cost),
        SortOrder::HighToLow => rows.sort_by(|a, b| by_cost(b, a)),
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    rows: Vec<Medicine>,
}

impl Catalog {
    pub fn new(rows: Vec<Medicine>) -> Self {
        Self {
            rows: rows.into_iter().map(Medicine::with_derived_costs).collect(),
        }
    }

    /// The bundled sample table.
    pub fn sample() -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(SAMPLE_CATALOG)?))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct values of `field` containing `query`, sorted, at most ten.
    /// Returns `None` for an unknown field.
    pub fn suggestions(&self, field: &str, query: Option<&str>) -> Option<Vec<String>> {
        if !VALID_FIELDS.contains(&field) {
            return None;
        }
        let needle = query.map(clean_search_value).unwrap_or_default();
        let mut values: Vec<String> = self
            .rows
            .iter()
            .filter_map(|row| row.column(field))
            .filter(|value| !value.is_empty() && ilike(value, &needle))
            .map(str::to_string)
            .collect();
        values.sort();
        values.dedup();
        values.truncate(MAX_SUGGESTIONS);
        Some(values)
    }

    pub fn search(
        &self,
        request: SearchRequest,
        sort_order: SortOrder,
    ) -> Result<SearchResponse, SearchError> {
        let request = request.normalized();
        if request.is_empty() {
            return Err(SearchError::NoCriteria);
        }

        let type_needle = request.medicine_type.as_deref().map(clean_type_value);
        let name_needle = request.name.as_deref().map(clean_search_value);
        let formulation_needle = request.formulation.as_deref().map(clean_search_value);
        let dosage_needle = request.dosage.as_deref().map(clean_search_value);

        let matches = |value: &str, needle: &Option<String>| {
            needle.as_deref().map_or(true, |n| ilike(value, n))
        };
        let mut rows: Vec<Medicine> = self
            .rows
            .iter()
            .filter(|row| {
                matches(&row.medicine_type, &type_needle)
                    && matches(&row.formulation, &formulation_needle)
                    && matches(&row.name, &name_needle)
                    && matches(&row.dosage, &dosage_needle)
            })
            .cloned()
            .collect();
        sort_by_branded(&mut rows, sort_order);

        let type_or_dosage_only = request.name.is_none() && request.formulation.is_none();
        if type_or_dosage_only {
            rows.truncate(MAX_SEARCH_RESULTS);
            validate_all(&rows)?;
            return Ok(SearchResponse {
                similar_formulations: rows,
                ..SearchResponse::default()
            });
        }

        let exact_index = match (&request.name, &request.formulation) {
            (Some(name), _) => rows
                .iter()
                .position(|row| row.name.to_lowercase() == name.to_lowercase()),
            (None, Some(formulation)) => rows
                .iter()
                .position(|row| row.formulation.to_lowercase() == formulation.to_lowercase()),
            (None, None) => None,
        };
        validate_all(&rows)?;
        let exact_match = exact_index.map(|i| rows.remove(i));
        Ok(SearchResponse {
            uses: exact_match.as_ref().map(|m| m.uses.clone()),
            side_effects: exact_match.as_ref().map(|m| m.side_effects.clone()),
            exact_match,
            similar_formulations: rows,
        })
    }

    pub fn by_name(&self, name: &str) -> Option<Medicine> {
        self.rows.iter().find(|row| row.name == name).cloned()
    }

    /// Rows of a type, sorted and limited. Rows failing validation are
    /// skipped after the limit is applied.
    pub fn by_type(&self, medicine_type: &str, limit: usize, sort_order: SortOrder) -> Vec<Medicine> {
        let needle = clean_type_value(medicine_type);
        let mut rows: Vec<Medicine> = self
            .rows
            .iter()
            .filter(|row| ilike(&row.medicine_type, &needle))
            .cloned()
            .collect();
        sort_by_branded(&mut rows, sort_order);
        rows.truncate(limit);
        rows.retain(|row| match row.validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!(name = %row.name, reason, "skipping invalid row");
                false
            }
        });
        rows
    }
}
