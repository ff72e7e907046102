use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;

/// One editable filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    StartDate,
    EndDate,
    MinPrice,
    Email,
    Phone,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::StartDate,
        FilterField::EndDate,
        FilterField::MinPrice,
        FilterField::Email,
        FilterField::Phone,
    ];

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::StartDate => "Start Date",
            FilterField::EndDate => "End Date",
            FilterField::MinPrice => "Min Price",
            FilterField::Email => "Email",
            FilterField::Phone => "Phone",
        }
    }
}

impl std::str::FromStr for FilterField {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "startdate" | "start" | "from" => Ok(FilterField::StartDate),
            "enddate" | "end" | "to" => Ok(FilterField::EndDate),
            "minprice" | "pricemin" | "min" | "price" => Ok(FilterField::MinPrice),
            "email" => Ok(FilterField::Email),
            "phone" => Ok(FilterField::Phone),
            other => Err(DashboardError::Validation(format!(
                "Unknown filter field '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User-entered filters. Every field is free text; empty means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub start_date: String,
    pub end_date: String,
    pub min_price: String,
    pub email: String,
    pub phone: String,
}

impl FilterCriteria {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
            FilterField::MinPrice => &self.min_price,
            FilterField::Email => &self.email,
            FilterField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::StartDate => self.start_date = value,
            FilterField::EndDate => self.end_date = value,
            FilterField::MinPrice => self.min_price = value,
            FilterField::Email => self.email = value,
            FilterField::Phone => self.phone = value,
        }
    }

    /// True when no filter has a value.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).trim().is_empty())
    }

    /// Copy with surrounding whitespace stripped from every value.
    pub fn trimmed(&self) -> Self {
        let mut out = Self::default();
        for field in FilterField::ALL {
            out.set(field, self.get(field).trim());
        }
        out
    }
}

/// Which side of a page boundary a cursor points to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorType {
    #[default]
    None,
    After,
    Before,
}

impl CursorType {
    /// Query parameter name the API expects for this cursor, if any.
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            CursorType::None => None,
            CursorType::After => Some("after"),
            CursorType::Before => Some("before"),
        }
    }
}

/// The complete identity of one page request: applied filters plus cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(flatten)]
    pub filters: FilterCriteria,
    pub cursor_type: CursorType,
    pub cursor_token: Option<String>,
}

impl QueryParams {
    /// First page for the given filters. Values are trimmed so that inputs
    /// differing only in whitespace map to the same request and cache entry.
    pub fn first_page(filters: FilterCriteria) -> Self {
        Self {
            filters: filters.trimmed(),
            cursor_type: CursorType::None,
            cursor_token: None,
        }
    }

    /// Same filters, positioned after `cursor`.
    pub fn after(&self, cursor: impl Into<String>) -> Self {
        Self {
            filters: self.filters.clone(),
            cursor_type: CursorType::After,
            cursor_token: Some(cursor.into()),
        }
    }

    /// Canonical serialization used as the cache key.
    pub fn cache_key(&self) -> String {
        // Field order is fixed by the struct definition, so equal params
        // always serialize to the same string.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    /// Query string pairs for the sales endpoint. Empty filters are omitted,
    /// and the cursor is sent under `after`/`before` depending on its type.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let f = &self.filters;
        let mut pairs: Vec<(&'static str, String)> = [
            ("startDate", &f.start_date),
            ("endDate", &f.end_date),
            ("priceMin", &f.min_price),
            ("email", &f.email),
            ("phone", &f.phone),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k, v.trim().to_string()))
        .collect();

        if let (Some(name), Some(token)) = (self.cursor_type.param_name(), &self.cursor_token) {
            pairs.push((name, token.clone()));
        }
        pairs
    }
}
