//! Catalog filter query builder.
//!
//! Turns the `manufacturer_id` / `query` pair from the catalog page into a
//! WHERE clause with numbered placeholders and the values bound to them.
//! User input never ends up in the SQL text.

use tokio_postgres::types::ToSql;

const CATALOG_SELECT: &str = "SELECT p.product_id, p.product_title, p.product_description, \
     p.contraindications, p.application, p.volume, p.photo, p.manufacturer_id, \
     m.manufacturer_title, m.country, m.address, m.contact_list \
     FROM products p \
     JOIN manufacturer m ON p.manufacturer_id = m.manufacturer_id";

const CATALOG_ORDER: &str = " ORDER BY p.product_id ASC";

/// Request-scoped catalog filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Active when greater than zero
    pub manufacturer_id: i32,
    /// Active when non-empty; stored trimmed
    pub search: String,
}

/// A value bound to one placeholder of a [`FilterQuery`]
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    ManufacturerId(i32),
    TitlePattern(String),
}

impl FilterParam {
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        match self {
            FilterParam::ManufacturerId(id) => id,
            FilterParam::TitlePattern(pattern) => pattern,
        }
    }
}

/// Predicate and bound arguments produced by [`CatalogFilter::build`]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    /// `None` means no WHERE clause (full listing)
    pub predicate: Option<String>,
    pub params: Vec<FilterParam>,
}

impl FilterQuery {
    /// Full statement text, always ordered by product id
    pub fn sql(&self) -> String {
        match &self.predicate {
            Some(predicate) => format!("{CATALOG_SELECT} WHERE {predicate}{CATALOG_ORDER}"),
            None => format!("{CATALOG_SELECT}{CATALOG_ORDER}"),
        }
    }

    pub fn sql_params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(FilterParam::as_sql).collect()
    }
}

/// Escapes `LIKE` metacharacters so the search text matches literally.
/// Backslash is PostgreSQL's default `LIKE` escape character.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl CatalogFilter {
    pub fn new(manufacturer_id: i32, search: &str) -> Self {
        Self {
            manufacturer_id,
            search: search.trim().to_string(),
        }
    }

    /// Builds the filter from raw query-string values. An unparsable
    /// manufacturer id means "no manufacturer filter".
    pub fn from_params(manufacturer_id: Option<&str>, search: Option<&str>) -> Self {
        let manufacturer_id = manufacturer_id
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .unwrap_or(0);
        Self::new(manufacturer_id, search.unwrap_or_default())
    }

    pub fn build(&self) -> FilterQuery {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if self.manufacturer_id > 0 {
            params.push(FilterParam::ManufacturerId(self.manufacturer_id));
            clauses.push(format!("p.manufacturer_id = ${}", params.len()));
        }
        if !self.search.is_empty() {
            params.push(FilterParam::TitlePattern(format!("%{}%", escape_like(&self.search))));
            clauses.push(format!("p.product_title LIKE ${}", params.len()));
        }

        FilterQuery {
            predicate: (!clauses.is_empty()).then(|| clauses.join(" AND ")),
            params,
        }
    }
}
