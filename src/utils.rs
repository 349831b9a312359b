use anyhow::{Context, Result};
use std::path::Path;

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("data").join("db");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Existing directories are left alone
        ensure_dir(&nested).unwrap();
    }
}
