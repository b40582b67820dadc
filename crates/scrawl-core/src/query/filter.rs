//! Filter compilation
//!
//! Turns a declarative [`PostFilter`] into an explicit predicate tree
//! that renders to parameterized SQL. Groups always render inside
//! parentheses, so conjoining two disjunctive groups (the free-text
//! match and the cursor boundary) can never flatten into a single OR -
//! the combination is structurally safe by construction.

use rusqlite::types::Value;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::query::cursor::{SortDirection, SortField, SortKey, SortSpec, SortValue};

/// Declarative filter criteria for listing posts
///
/// Constructed fresh per request; no persistent identity.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Free-text term, matched case-insensitively against title or content
    pub term: Option<String>,
    /// Only posts in this category
    pub category_id: Option<Uuid>,
    /// Only posts by this author
    pub author_id: Option<Uuid>,
    /// Only the caller's own posts (takes precedence over `author_id`)
    pub mine: bool,
    /// Posts carrying at least one of these tags (match-any)
    pub tags: Vec<String>,
}

/// Parse an id-shaped filter value, reporting a client input error
/// before any store access.
pub fn parse_id(field: &'static str, value: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| StoreError::InvalidFilter {
        field,
        value: value.to_string(),
    })
}

/// Parse a sort field name, reporting a client input error for
/// unrecognized names.
pub fn parse_sort_field(name: &str) -> StoreResult<SortField> {
    SortField::parse(name).ok_or_else(|| StoreError::UnsupportedSortField(name.to_string()))
}

/// A node in the predicate tree
///
/// Leaves compare one column against one bound value; `All`/`Any`
/// compose sub-predicates with AND/OR. Rendering always parenthesizes
/// groups.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Conjunction of sub-predicates
    All(Vec<Predicate>),
    /// Disjunction of sub-predicates
    Any(Vec<Predicate>),
    /// Column equals value
    Eq(&'static str, Value),
    /// Column strictly less than value
    Lt(&'static str, Value),
    /// Column strictly greater than value
    Gt(&'static str, Value),
    /// Case-insensitive substring match against a text column
    Contains(&'static str, String),
    /// Post carries at least one of the given tags
    HasAnyTag(Vec<String>),
}

impl Predicate {
    /// Render to a SQL fragment, appending bound values to `params` in
    /// placeholder order.
    pub fn sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::All(preds) if preds.is_empty() => "1=1".to_string(),
            Predicate::All(preds) => {
                let parts: Vec<String> = preds.iter().map(|p| p.sql(params)).collect();
                format!("({})", parts.join(" AND "))
            }
            Predicate::Any(preds) if preds.is_empty() => "1=0".to_string(),
            Predicate::Any(preds) => {
                let parts: Vec<String> = preds.iter().map(|p| p.sql(params)).collect();
                format!("({})", parts.join(" OR "))
            }
            Predicate::Eq(column, value) => {
                params.push(value.clone());
                format!("{} = ?", column)
            }
            Predicate::Lt(column, value) => {
                params.push(value.clone());
                format!("{} < ?", column)
            }
            Predicate::Gt(column, value) => {
                params.push(value.clone());
                format!("{} > ?", column)
            }
            Predicate::Contains(column, term) => {
                // instr keeps % and _ in user input literal; no LIKE escaping
                params.push(Value::Text(term.clone()));
                format!("instr(lower({}), lower(?)) > 0", column)
            }
            Predicate::HasAnyTag(tags) => {
                let placeholders: Vec<&str> = tags.iter().map(|_| "?").collect();
                for tag in tags {
                    params.push(Value::Text(tag.clone()));
                }
                format!(
                    "id IN (SELECT pt.post_id FROM post_tags pt \
                     JOIN tags t ON pt.tag_id = t.id WHERE t.name IN ({}))",
                    placeholders.join(", ")
                )
            }
        }
    }
}

/// Compile a filter into a predicate, or `None` when it matches everything.
///
/// `caller` is the resolved identity of the requesting user; it is only
/// consulted when `mine` is set, and its absence in that case is a
/// client input error.
pub fn compile(filter: &PostFilter, caller: Option<Uuid>) -> StoreResult<Option<Predicate>> {
    let mut clauses = Vec::new();

    if let Some(category_id) = filter.category_id {
        clauses.push(Predicate::Eq(
            "category_id",
            Value::Text(category_id.to_string()),
        ));
    }

    // `mine` wins over an explicit author filter, matching the original
    // precedence of the listing API.
    if filter.mine {
        let caller = caller.ok_or(StoreError::NoActiveUser)?;
        clauses.push(Predicate::Eq("author_id", Value::Text(caller.to_string())));
    } else if let Some(author_id) = filter.author_id {
        clauses.push(Predicate::Eq(
            "author_id",
            Value::Text(author_id.to_string()),
        ));
    }

    if let Some(term) = filter.term.as_deref() {
        let term = term.trim();
        if !term.is_empty() {
            clauses.push(Predicate::Any(vec![
                Predicate::Contains("title", term.to_string()),
                Predicate::Contains("content", term.to_string()),
            ]));
        }
    }

    let tags: Vec<String> = filter
        .tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if !tags.is_empty() {
        clauses.push(Predicate::HasAnyTag(tags));
    }

    if clauses.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Predicate::All(clauses)))
    }
}

/// Build the keyset boundary for resuming after `key` under `sort`.
///
/// Descending: `value < k.value OR (value = k.value AND id < k.id)`;
/// ascending mirrors the inequalities. The direction always comes from
/// the active sort, never a hardcoded default.
pub fn boundary(sort: SortSpec, key: &SortKey) -> Predicate {
    let column = sort.field.column();
    let value = match &key.value {
        SortValue::Timestamp(millis) => Value::Integer(*millis),
        SortValue::Text(text) => Value::Text(text.clone()),
    };
    let id = Value::Text(key.id.to_string());

    match sort.direction {
        SortDirection::Desc => Predicate::Any(vec![
            Predicate::Lt(column, value.clone()),
            Predicate::All(vec![Predicate::Eq(column, value), Predicate::Lt("id", id)]),
        ]),
        SortDirection::Asc => Predicate::Any(vec![
            Predicate::Gt(column, value.clone()),
            Predicate::All(vec![Predicate::Eq(column, value), Predicate::Gt("id", id)]),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pred: &Predicate) -> (String, usize) {
        let mut params = Vec::new();
        let sql = pred.sql(&mut params);
        (sql, params.len())
    }

    #[test]
    fn test_empty_filter_compiles_to_none() {
        let filter = PostFilter::default();
        assert!(compile(&filter, None).unwrap().is_none());
    }

    #[test]
    fn test_term_compiles_to_parenthesized_or_group() {
        let filter = PostFilter {
            term: Some("foo".to_string()),
            ..Default::default()
        };
        let pred = compile(&filter, None).unwrap().unwrap();
        let (sql, count) = render(&pred);

        assert_eq!(
            sql,
            "((instr(lower(title), lower(?)) > 0 OR instr(lower(content), lower(?)) > 0))"
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn test_equality_filters() {
        let category_id = Uuid::from_u128(1);
        let author_id = Uuid::from_u128(2);
        let filter = PostFilter {
            category_id: Some(category_id),
            author_id: Some(author_id),
            ..Default::default()
        };
        let pred = compile(&filter, None).unwrap().unwrap();
        let (sql, count) = render(&pred);

        assert_eq!(sql, "(category_id = ? AND author_id = ?)");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_mine_overrides_author_and_requires_caller() {
        let caller = Uuid::from_u128(9);
        let filter = PostFilter {
            author_id: Some(Uuid::from_u128(2)),
            mine: true,
            ..Default::default()
        };

        // Without a caller identity, `mine` is a client error
        let err = compile(&filter, None).unwrap_err();
        assert!(matches!(err, StoreError::NoActiveUser));
        assert!(err.is_client_error());

        // With a caller, the caller id is the only author clause
        let pred = compile(&filter, Some(caller)).unwrap().unwrap();
        let mut params = Vec::new();
        let sql = pred.sql(&mut params);
        assert_eq!(sql, "(author_id = ?)");
        assert_eq!(params, vec![Value::Text(caller.to_string())]);
    }

    #[test]
    fn test_tags_match_any() {
        let filter = PostFilter {
            tags: vec!["tech".to_string(), " life ".to_string(), "".to_string()],
            ..Default::default()
        };
        let pred = compile(&filter, None).unwrap().unwrap();
        let (sql, count) = render(&pred);

        assert!(sql.contains("t.name IN (?, ?)"));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_blank_term_is_ignored() {
        let filter = PostFilter {
            term: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(compile(&filter, None).unwrap().is_none());
    }

    #[test]
    fn test_boundary_descending() {
        let key = SortKey {
            field: SortField::CreatedAt,
            value: SortValue::Timestamp(1000),
            id: Uuid::from_u128(5),
        };
        let sort = SortSpec {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        };
        let (sql, count) = render(&boundary(sort, &key));

        assert_eq!(
            sql,
            "(created_at < ? OR (created_at = ? AND id < ?))"
        );
        assert_eq!(count, 3);
    }

    #[test]
    fn test_boundary_ascending_mirrors_inequalities() {
        let key = SortKey {
            field: SortField::Title,
            value: SortValue::Text("Mango".to_string()),
            id: Uuid::from_u128(5),
        };
        let sort = SortSpec {
            field: SortField::Title,
            direction: SortDirection::Asc,
        };
        let (sql, _) = render(&boundary(sort, &key));

        assert_eq!(sql, "(title > ? OR (title = ? AND id > ?))");
    }

    // Conjoining the free-text OR-group with the boundary OR-group must
    // keep both groups parenthesized under a single AND. A flat OR here
    // would silently defeat the boundary and resurface rows before the
    // cursor.
    #[test]
    fn test_term_and_boundary_stay_separate_or_groups() {
        let filter = PostFilter {
            term: Some("foo".to_string()),
            ..Default::default()
        };
        let term_pred = compile(&filter, None).unwrap().unwrap();

        let key = SortKey {
            field: SortField::CreatedAt,
            value: SortValue::Timestamp(1000),
            id: Uuid::from_u128(5),
        };
        let bound = boundary(SortSpec::default(), &key);

        let combined = Predicate::All(vec![term_pred, bound]);
        let (sql, count) = render(&combined);

        assert_eq!(
            sql,
            "(((instr(lower(title), lower(?)) > 0 OR instr(lower(content), lower(?)) > 0)) \
             AND (created_at < ? OR (created_at = ? AND id < ?)))"
        );
        assert_eq!(count, 5);
    }

    #[test]
    fn test_parse_id_reports_client_error() {
        let err = parse_id("category_id", "not-a-uuid").unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidFilter {
                field: "category_id",
                ..
            }
        ));
        assert!(err.is_client_error());

        let id = Uuid::from_u128(7);
        assert_eq!(parse_id("author_id", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_sort_field() {
        assert_eq!(parse_sort_field("updated_at").unwrap(), SortField::UpdatedAt);

        let err = parse_sort_field("rank").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedSortField(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_empty_groups_render_constants() {
        let (sql, count) = render(&Predicate::All(vec![]));
        assert_eq!(sql, "1=1");
        assert_eq!(count, 0);

        let (sql, _) = render(&Predicate::Any(vec![]));
        assert_eq!(sql, "1=0");
    }
}
