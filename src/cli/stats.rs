use anyhow::Result;

use crate::config::ThingsConfig;
use crate::storage::query;

/// Display row counts per kind in the terminal.
pub fn stats(config: &ThingsConfig, namespace: Option<&str>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let counts = query::count_by_kind(&conn, namespace)?;
    let total: usize = counts.values().sum();

    println!("Thing Statistics");
    println!("{}", "=".repeat(40));
    if let Some(ns) = namespace {
        println!("  Namespace:           {ns}");
    }
    println!("  Total rows:          {total}");
    println!();

    println!("By Kind:");
    for (kind, count) in &counts {
        println!("  {:<12} {}", kind, count);
    }
    println!();

    let size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
    println!("Database size:         {size} bytes");

    Ok(())
}
