use serde::{Deserialize, Serialize};

/// Table columns that can be sorted client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Price,
}

impl SortKey {
    /// Parse a column name. Unknown names yield `None`, which sorts as a pass-through.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(SortKey::Date),
            "price" | "total" | "totalprice" => Some(SortKey::Price),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Date => write!(f, "date"),
            SortKey::Price => write!(f, "price"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active sort column and direction. `key: None` leaves rows in API order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Header click: the same column flips direction, a new column starts ascending.
    pub fn toggled(self, key: Option<SortKey>) -> Self {
        let direction = if key.is_some() && self.key == key {
            self.direction.flipped()
        } else {
            SortDirection::Asc
        };
        Self { key, direction }
    }

    /// Header indicator: "▲"/"▼" on the active column, "⇅" elsewhere.
    pub fn indicator(&self, column: SortKey) -> &'static str {
        match (self.key, self.direction) {
            (Some(k), SortDirection::Asc) if k == column => "▲",
            (Some(k), SortDirection::Desc) if k == column => "▼",
            _ => "⇅",
        }
    }
}
