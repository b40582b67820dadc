//! Page fetching
//!
//! Combines a compiled filter predicate, a sort specification, and an
//! optional continuation cursor into one bounded query, then derives
//! the page metadata from an over-fetch of exactly one row.
//!
//! The sort is always `(primary field, id)` with both keys in the
//! active direction, so the ordering is total even when many rows share
//! the primary value (bulk-seeded data routinely does). The cursor
//! boundary is derived from that same direction.
//!
//! ## Consistency
//!
//! There is no cross-call transaction. Each fetch is one self-consistent
//! read; rows inserted or deleted between two fetches by the same client
//! appear in a later page only if their sort key falls past the supplied
//! cursor. The auxiliary total is counted against the filter alone
//! (boundary excluded) and can drift from the page read, so it is an
//! estimate, not a transactional guarantee - callers wanting cheap
//! pagination can skip it.

use rusqlite::{params_from_iter, Connection};
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::query::cursor::{self, SortField, SortKey, SortSpec, SortValue};
use crate::query::filter::{self, Predicate};
use crate::store::{hydrate_post, PostRow, POST_COLUMNS};

/// Default page size when the caller does not specify one
pub const DEFAULT_LIMIT: u32 = 10;

/// Options controlling one listing call
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Sort field and direction
    pub sort: SortSpec,
    /// Opaque continuation token from a previous page
    pub cursor: Option<String>,
    /// Maximum number of items to return (must be at least 1)
    pub limit: u32,
    /// Whether to also count all rows matching the filter
    pub include_total: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: SortSpec::default(),
            cursor: None,
            limit: DEFAULT_LIMIT,
            include_total: true,
        }
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items in sort order
    pub items: Vec<T>,
    /// Count of all rows matching the filter (cursor boundary excluded),
    /// present only when requested
    pub total: Option<i64>,
    /// Whether further pages exist
    pub has_more: bool,
    /// Token to fetch the next page; present iff `has_more`
    pub next_cursor: Option<String>,
}

/// Fetch one page of posts
pub(crate) fn fetch_page(
    conn: &Connection,
    filter_predicate: Option<Predicate>,
    options: &ListOptions,
) -> StoreResult<Page<crate::models::Post>> {
    if options.limit == 0 {
        return Err(StoreError::InvalidLimit);
    }

    let boundary = match options.cursor.as_deref() {
        Some(token) => {
            let key = cursor::decode(token)?;
            if key.field != options.sort.field {
                return Err(StoreError::InvalidCursor(
                    cursor::CursorError::FieldMismatch {
                        cursor: key.field.as_str(),
                        active: options.sort.field.as_str(),
                    },
                ));
            }
            Some(filter::boundary(options.sort, &key))
        }
        None => None,
    };

    let combined = match (filter_predicate.clone(), boundary) {
        (Some(filter), Some(boundary)) => Some(Predicate::All(vec![filter, boundary])),
        (Some(filter), None) => Some(filter),
        (None, Some(boundary)) => Some(boundary),
        (None, None) => None,
    };

    let mut params = Vec::new();
    let mut sql = format!("SELECT {} FROM posts", POST_COLUMNS);
    if let Some(pred) = &combined {
        sql.push_str(" WHERE ");
        sql.push_str(&pred.sql(&mut params));
    }
    let direction = options.sort.direction.keyword();
    sql.push_str(&format!(
        " ORDER BY {} {}, id {} LIMIT ?",
        options.sort.field.column(),
        direction,
        direction
    ));
    // Over-fetch by one to detect whether further pages exist
    params.push(rusqlite::types::Value::Integer(i64::from(options.limit) + 1));

    debug!(sql = %sql, limit = options.limit, "fetching page");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows: Vec<PostRow> = stmt
        .query_map(params_from_iter(params), PostRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let has_more = rows.len() > options.limit as usize;
    if has_more {
        rows.truncate(options.limit as usize);
    }

    let next_cursor = match rows.last() {
        Some(last) if has_more => Some(cursor::encode(&SortKey {
            field: options.sort.field,
            value: sort_value_of(options.sort.field, last),
            id: crate::store::parse_row_uuid("posts", &last.id)?,
        })),
        _ => None,
    };

    let total = if options.include_total {
        Some(count_matching(conn, filter_predicate.as_ref())?)
    } else {
        None
    };

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(hydrate_post(conn, row)?);
    }

    Ok(Page {
        items,
        total,
        has_more,
        next_cursor,
    })
}

/// Count all rows matching the filter predicate alone.
///
/// The cursor boundary is deliberately excluded: the total describes
/// the whole filtered collection, not the remainder past the cursor.
fn count_matching(conn: &Connection, filter_predicate: Option<&Predicate>) -> StoreResult<i64> {
    let mut params = Vec::new();
    let mut sql = "SELECT COUNT(*) FROM posts".to_string();
    if let Some(pred) = filter_predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&pred.sql(&mut params));
    }
    let count = conn.query_row(&sql, params_from_iter(params), |row| row.get(0))?;
    Ok(count)
}

/// Extract the active sort field's value from a stored row
fn sort_value_of(field: SortField, row: &PostRow) -> SortValue {
    match field {
        SortField::CreatedAt => SortValue::Timestamp(row.created_at),
        SortField::UpdatedAt => SortValue::Timestamp(row.updated_at),
        SortField::Title => SortValue::Text(row.title.clone()),
    }
}
