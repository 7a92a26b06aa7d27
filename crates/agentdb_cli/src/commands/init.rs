//! Init command implementation.

use super::parse_scalar;
use agentdb_core::{Metadata, Session};
use std::path::Path;
use tracing::info;

/// Runs the init command.
pub fn run(path: &Path, id: &str, api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Initializing database at {:?}", path);

    let session = Session::open(path);
    let document = session.setup(&Metadata::latest(parse_scalar(id), parse_scalar(api_key)))?;

    println!(
        "Created {} (version {}, id {})",
        path.display(),
        document.version(),
        document.id()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdb_core::CoreError;

    #[test]
    fn init_creates_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        run(&path, "0.42", "secret").unwrap();
        let document = Session::open(&path).read().unwrap();
        assert_eq!(document.api_key().as_str(), Some("secret"));
        assert_eq!(document.id().as_f64(), Some(0.42));

        let err = run(&path, "1", "2").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::AlreadySetup { .. })
        ));
    }
}
