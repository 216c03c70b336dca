//! Read and write paths for the `rows` table.
//!
//! Every function takes the namespace explicitly; rows belonging to another
//! namespace are never returned or modified.

use anyhow::{Context, Result};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::BTreeMap;

use super::row::Row;

const ROW_COLUMNS: &str = "id, namespace, kind, summary, content, ref, number, float, bool, \
                           time, tags, fields, date_created";

/// Text columns a [`RowQuery`] can search in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Summary,
    Content,
}

impl Field {
    fn column(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Content => "content",
        }
    }
}

/// Filters for [`query`]. All filters are combined with `AND`.
#[derive(Debug, Clone, Default)]
pub struct RowQuery {
    kind: Option<String>,
    summary: Option<String>,
    matches: Vec<(Field, String)>,
    created_prefix: Option<String>,
    tag: Option<String>,
    limit: Option<usize>,
}

impl RowQuery {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new() -> Self {
        Self::default()
    }

    /// Only rows of this kind.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Only rows whose summary equals `summary` exactly.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Only rows where `field` contains `pattern` (case-insensitive).
    pub fn matching(mut self, field: Field, pattern: impl Into<String>) -> Self {
        self.matches.push((field, pattern.into()));
        self
    }

    /// Only rows created on a date starting with `prefix` (`2024`, `2024-08`, `2024-08-15`).
    pub fn created_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.created_prefix = Some(prefix.into());
        self
    }

    /// Only rows carrying `tag`; a missing leading `#` is added.
    pub fn tag(mut self, tag: &str) -> Self {
        let tag = if tag.starts_with('#') {
            tag.to_string()
        } else {
            format!("#{tag}")
        };
        self.tag = Some(tag);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the WHERE clause and its parameters. `?1` is always the namespace.
    fn to_sql(&self, namespace: &str) -> (String, Vec<Value>) {
        let mut clauses = vec!["namespace = ?1".to_string()];
        let mut values = vec![Value::Text(namespace.to_string())];

        let mut push = |clause: String, value: Value, values: &mut Vec<Value>| {
            values.push(value);
            clauses.push(clause.replace("?N", &format!("?{}", values.len())));
        };

        if let Some(kind) = &self.kind {
            push("kind = ?N".into(), Value::Text(kind.clone()), &mut values);
        }
        if let Some(summary) = &self.summary {
            push("summary = ?N".into(), Value::Text(summary.clone()), &mut values);
        }
        for (field, pattern) in &self.matches {
            push(
                format!("{} LIKE ?N ESCAPE '\\'", field.column()),
                Value::Text(format!("%{}%", escape_like(pattern))),
                &mut values,
            );
        }
        if let Some(prefix) = &self.created_prefix {
            push(
                "date_created LIKE ?N ESCAPE '\\'".into(),
                Value::Text(format!("{}%", escape_like(prefix))),
                &mut values,
            );
        }
        if let Some(tag) = &self.tag {
            push(
                "EXISTS (SELECT 1 FROM json_each(rows.tags) WHERE json_each.value = ?N)".into(),
                Value::Text(tag.clone()),
                &mut values,
            );
        }

        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        let sql = format!(
            "SELECT {ROW_COLUMNS} FROM rows WHERE {} ORDER BY date_created DESC, id DESC LIMIT {limit}",
            clauses.join(" AND ")
        );
        (sql, values)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
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

/// Decode a JSON text column, reporting bad JSON as a conversion failure of `column`.
fn from_json<T: serde::de::DeserializeOwned>(column: usize, text: &str) -> rusqlite::Result<T> {
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Map a `rows` result row (selected with [`ROW_COLUMNS`]) into a [`Row`].
fn row_from_sql(r: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let tags: String = r.get(10)?;
    let fields: String = r.get(11)?;
    Ok(Row {
        id: r.get(0)?,
        namespace: r.get(1)?,
        kind: r.get(2)?,
        summary: r.get(3)?,
        content: r.get(4)?,
        reference: r.get(5)?,
        number: r.get(6)?,
        float: r.get(7)?,
        bool: r.get(8)?,
        time: r.get(9)?,
        tags: from_json(10, &tags)?,
        fields: from_json::<BTreeMap<String, String>>(11, &fields)?,
        date_created: r.get(12)?,
    })
}

/// Store `row` under `namespace`. Returns the row with `id` and `namespace` set.
pub fn insert(conn: &Connection, namespace: &str, mut row: Row) -> Result<Row> {
    let tags = serde_json::to_string(&row.tags)?;
    let fields = serde_json::to_string(&row.fields)?;

    conn.execute(
        "INSERT INTO rows (namespace, kind, summary, content, ref, number, float, bool, time, tags, fields, date_created) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            namespace,
            row.kind,
            row.summary,
            row.content,
            row.reference,
            row.number,
            row.float,
            row.bool,
            row.time,
            tags,
            fields,
            row.date_created,
        ],
    )
    .with_context(|| format!("failed to insert {} row", row.kind))?;

    row.id = conn.last_insert_rowid();
    row.namespace = namespace.to_string();

    tracing::debug!(id = row.id, kind = %row.kind, namespace, "row inserted");
    Ok(row)
}

/// Rows of `namespace` matching `filter`, newest first.
pub fn query(conn: &Connection, namespace: &str, filter: &RowQuery) -> Result<Vec<Row>> {
    let (sql, values) = filter.to_sql(namespace);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values), row_from_sql)?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to read rows")?;
    Ok(rows)
}

/// A single row by kind and id.
pub fn get(conn: &Connection, namespace: &str, kind: &str, id: i64) -> Result<Option<Row>> {
    let row = conn
        .query_row(
            &format!("SELECT {ROW_COLUMNS} FROM rows WHERE namespace = ?1 AND kind = ?2 AND id = ?3"),
            params![namespace, kind, id],
            row_from_sql,
        )
        .optional()?;
    Ok(row)
}

/// Set the checkbox field of a row. This is the only update rows ever receive.
///
/// Returns the updated row, or `None` when it does not exist in `namespace`.
pub fn set_bool(
    conn: &Connection,
    namespace: &str,
    kind: &str,
    id: i64,
    value: bool,
) -> Result<Option<Row>> {
    let changed = conn.execute(
        "UPDATE rows SET bool = ?1 WHERE namespace = ?2 AND kind = ?3 AND id = ?4",
        params![value, namespace, kind, id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    tracing::debug!(id, kind, namespace, value, "row bool updated");
    get(conn, namespace, kind, id)
}

/// Number of rows per kind in `namespace` (or all namespaces when `None`).
pub fn count_by_kind(conn: &Connection, namespace: Option<&str>) -> Result<BTreeMap<String, usize>> {
    let mut stmt = conn.prepare(
        "SELECT kind, COUNT(*) FROM rows WHERE ?1 IS NULL OR namespace = ?1 GROUP BY kind",
    )?;
    let counts = stmt
        .query_map(params![namespace], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as usize))
        })?
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Ok(counts)
}

/// Every row in the database, oldest first. Used by `things export`.
pub fn all_rows(conn: &Connection, namespace: Option<&str>) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ROW_COLUMNS} FROM rows WHERE ?1 IS NULL OR namespace = ?1 ORDER BY date_created, id"
    ))?;
    let rows = stmt
        .query_map(params![namespace], row_from_sql)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
