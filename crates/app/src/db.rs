//! SQLite URL handling for the progress database.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

pub const DB_FILE_NAME: &str = "progress.sqlite3";

/// URL for the default database inside `data_dir`.
#[must_use]
pub fn default_db_url(data_dir: &Path) -> String {
    normalize_sqlite_url(&data_dir.join(DB_FILE_NAME).display().to_string())
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory so the pool can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("/tmp/a.db"), "sqlite:///tmp/a.db");

        let relative = normalize_sqlite_url("data/a.db");
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("data/a.db"));
    }

    #[test]
    fn prepare_creates_parent_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = default_db_url(&dir.path().join("nested"));
        prepare_sqlite_file(&url).unwrap();
        assert!(dir.path().join("nested").join(DB_FILE_NAME).exists());
    }

    #[test]
    fn non_sqlite_urls_are_rejected() {
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }
}
