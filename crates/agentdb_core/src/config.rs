//! Session configuration.

/// Configuration for a [`crate::Session`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create missing parent directories when writing.
    pub create_parent_dirs: bool,

    /// Whether every atomic write is fsynced (file and directory).
    pub sync_on_write: bool,

    /// Whether documents are written as indented JSON.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
            sync_on_write: true,
            pretty: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create missing parent directories.
    #[must_use]
    pub const fn create_parent_dirs(mut self, value: bool) -> Self {
        self.create_parent_dirs = value;
        self
    }

    /// Sets whether to fsync on every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets whether to pretty-print documents.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.create_parent_dirs);
        assert!(config.sync_on_write);
        assert!(config.pretty);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().sync_on_write(false).pretty(false);

        assert!(config.create_parent_dirs);
        assert!(!config.sync_on_write);
        assert!(!config.pretty);
    }
}
