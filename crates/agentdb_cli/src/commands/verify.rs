//! Verify command implementation.

use agentdb_core::{CoreError, Session};
use std::path::Path;

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying database at {:?}", path);
    println!();

    match Session::open(path).read() {
        Ok(document) => {
            println!("  Version: {}", document.version());
            println!("  Records: {}", document.records().len());
            println!();
            println!("✓ Database verification passed");
            Ok(())
        }
        Err(CoreError::Schema(err)) => {
            println!("  Error: {err}");
            println!();
            println!("✗ Database verification failed");
            Err("Verification failed".into())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdb_core::Metadata;

    #[test]
    fn valid_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        Session::open(&path)
            .setup(&Metadata::latest(1i64, 2i64))
            .unwrap();

        assert!(run(&path).is_ok());
    }

    #[test]
    fn invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, br#"{"version": 1, "id": [], "api_key": 2, "records": []}"#).unwrap();

        assert!(run(&path).is_err());
    }
}
