//! Inspect a single CSV file

use crate::commands::upload_file;
use crate::console::{CliConsole, render_grid};
use colored::*;
use std::path::Path;
use tabletalk_core::{Registry, TabletalkError, TabletalkResult};

/// Print a parsed table: schema then up to `limit` rows, or JSON
pub async fn show(file: &Path, limit: usize, json: bool, verbose: bool) -> TabletalkResult<()> {
    let console = CliConsole::new(verbose);
    let mut registry = Registry::new();
    let table_id = upload_file(&mut registry, file).await?;
    let table = registry
        .table(&table_id)
        .ok_or_else(|| TabletalkError::table_not_found(table_id.clone()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }

    console.print_header(&table.name);
    console.info(&format!("Table id: {}", table.id));
    eprintln!(
        "{} rows, {} columns",
        table.row_count.to_string().bold(),
        table.columns.len().to_string().bold()
    );
    for column in &table.columns {
        eprintln!("  {} {}", column.header.cyan(), format!("({})", column.column_type).dimmed());
    }
    eprintln!();

    let shown = limit.min(table.rows.len());
    println!("{}", render_grid(&table.columns, &table.rows[..shown]));
    if shown < table.rows.len() {
        eprintln!("{}", format!("... {} more rows", table.rows.len() - shown).dimmed());
    }
    Ok(())
}
