//! Default on-disk locations for desktop hosts

use std::path::PathBuf;

const APP_DIR: &str = "book-catalog";
const DATABASE_FILE: &str = "books.db";

/// Per-user data directory for the catalog, if the platform defines one
pub fn data_directory() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

/// Default location of the catalog database file
///
/// Falls back to `books.db` in the working directory when the platform has no
/// per-user data directory.
pub fn default_database_path() -> PathBuf {
    data_directory()
        .map(|dir| dir.join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_ends_with_file_name() {
        let path = default_database_path();
        assert!(path.ends_with(DATABASE_FILE));
    }
}
