//! Append command implementation.

use super::parse_content;
use agentdb_core::{CoreResult, Record, Session};
use std::path::Path;
use tracing::info;

/// Runs the append command.
pub fn run(path: &Path, role: &str, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Appending {} record to {:?}", role, path);

    let session = Session::open(path);
    let count = session.transaction(|conn| -> CoreResult<usize> {
        conn.add(Record::new(role, parse_content(content)))?;
        conn.commit()?;
        Ok(conn.records()?.len())
    })?;

    println!("Appended record #{count} to {}", path.display());
    Ok(())
}
