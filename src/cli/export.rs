use anyhow::Result;
use serde::Serialize;

use crate::config::ThingsConfig;
use crate::storage::{query, Row};

/// Export format.
#[derive(Debug, Serialize)]
struct ExportData {
    namespace: Option<String>,
    rows: Vec<Row>,
}

/// Export rows (optionally of one namespace) as JSON to stdout.
pub fn export(config: &ThingsConfig, namespace: Option<&str>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let data = ExportData {
        namespace: namespace.map(str::to_string),
        rows: query::all_rows(&conn, namespace)?,
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} rows.", data.rows.len());

    Ok(())
}
