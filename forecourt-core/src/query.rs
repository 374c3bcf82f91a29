//! Pure catalog query builder.
//!
//! Turns an arbitrary combination of optional filters plus a page number
//! into a bounded query pair (count + page fetch) over the `listings`
//! relation. Every literal travels as a bound parameter; filter values are
//! never interpolated into the SQL text. This module performs no I/O.

use forecourt_model::SearchFilters;

/// Listings per catalog page.
pub const PAGE_SIZE: u32 = 9;

/// A value bound to one `?` placeholder, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

/// A built predicate plus pagination window.
///
/// `count_sql` and `page_sql` share the same clause list and parameters, so
/// the total-count and page-fetch queries always agree.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    clauses: Vec<String>,
    params: Vec<BindValue>,
    /// Requested page clamped to >= 1, echoed back for pagination UI.
    pub page: u32,
    pub limit: i64,
    pub offset: i64,
}

impl CatalogQuery {
    pub fn build(filters: &SearchFilters, page: u32) -> Self {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(text) = filters.text.as_deref() {
            let pattern = format!("%{}%", escape_like_literal(text));
            clauses.push(
                "(title LIKE ? ESCAPE '\\' OR make LIKE ? ESCAPE '\\' \
                 OR model LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            for _ in 0..3 {
                params.push(BindValue::Text(pattern.clone()));
            }
        }

        if let Some(band) = filters.price {
            push_band_clause("price", band.bounds(), &mut clauses, &mut params);
        }

        if let Some(band) = filters.year {
            push_band_clause("year", band.bounds(), &mut clauses, &mut params);
        }

        if let Some(sold) = filters.sold {
            clauses.push("sold = ?".to_string());
            params.push(BindValue::Int(i64::from(sold)));
        }

        let page = page.max(1);
        Self {
            clauses,
            params,
            page,
            limit: i64::from(PAGE_SIZE),
            offset: i64::from(page - 1) * i64::from(PAGE_SIZE),
        }
    }

    /// `WHERE ...` text, or empty when no filter contributed a clause.
    pub fn predicate(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Total-count variant: same clauses, no pagination window.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM listings {}", self.predicate())
            .trim_end()
            .to_string()
    }

    /// Page-fetch variant. Bind [`CatalogQuery::params`] first, then
    /// `limit` and `offset`.
    pub fn page_sql(&self) -> String {
        let predicate = self.predicate();
        if predicate.is_empty() {
            "SELECT * FROM listings ORDER BY id DESC LIMIT ? OFFSET ?".to_string()
        } else {
            format!(
                "SELECT * FROM listings {predicate} ORDER BY id DESC LIMIT ? OFFSET ?"
            )
        }
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }
}

fn push_band_clause(
    column: &str,
    bounds: (Option<i64>, Option<i64>),
    clauses: &mut Vec<String>,
    params: &mut Vec<BindValue>,
) {
    // `column` is a fixed name supplied by this module, never user input.
    match bounds {
        (Some(lo), Some(hi)) => {
            clauses.push(format!("{column} BETWEEN ? AND ?"));
            params.push(BindValue::Int(lo));
            params.push(BindValue::Int(hi));
        }
        (None, Some(hi)) => {
            clauses.push(format!("{column} <= ?"));
            params.push(BindValue::Int(hi));
        }
        (Some(lo), None) => {
            clauses.push(format!("{column} >= ?"));
            params.push(BindValue::Int(lo));
        }
        (None, None) => {}
    }
}

fn escape_like_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
    }
    out
}
