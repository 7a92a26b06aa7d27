//! Inspect command implementation.

use agentdb_core::{Document, Scalar, Session};
use serde::Serialize;
use std::path::Path;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Schema version.
    pub version: u32,
    /// Database id.
    pub id: Scalar,
    /// Number of records.
    pub record_count: usize,
    /// Role of each record, in order.
    pub roles: Vec<String>,
}

impl InspectResult {
    fn new(path: &Path, file_size: u64, document: &Document) -> Self {
        Self {
            path: path.display().to_string(),
            file_size,
            version: document.version(),
            id: document.id().clone(),
            record_count: document.records().len(),
            roles: document.records().iter().map(|r| r.role.clone()).collect(),
        }
    }
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let document = Session::open(path).read()?;
    let file_size = std::fs::metadata(path)?.len();
    let result = InspectResult::new(path, file_size, &document);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("AgentDB Database Inspection");
    println!("===========================");
    println!();
    println!("Path:    {}", result.path);
    println!("Size:    {} bytes", result.file_size);
    println!("Version: {}", result.version);
    println!("Id:      {}", result.id);
    println!();
    println!("Records: {}", result.record_count);
    for (index, role) in result.roles.iter().enumerate() {
        println!("  {index:>4}  {role}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdb_core::{Record, LATEST_VERSION};

    #[test]
    fn result_lists_roles() {
        let document = Document::from_parts(
            LATEST_VERSION,
            Scalar::from("db"),
            Scalar::from(0i64),
            vec![Record::new("system", 0), Record::new("user", "hi")],
        )
        .unwrap();

        let result = InspectResult::new(Path::new("db.json"), 10, &document);
        assert_eq!(result.record_count, 2);
        assert_eq!(result.roles, vec!["system", "user"]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "db");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("missing.json"), "text").is_err());
    }
}
