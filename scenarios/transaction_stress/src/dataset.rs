use std::path::Path;

use anyhow::Context;

/// The account identifiers that synthesized transactions draw from.
///
/// Loaded once before any virtual user starts and never mutated afterwards, so it can be shared
/// across all VUs behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct Dataset {
    account_ids: Vec<String>,
}

impl Dataset {
    /// Load account identifiers from a newline-separated file. Lines are trimmed and blank lines
    /// discarded; no other validation is applied.
    ///
    /// An unreadable file or a dataset that is empty after filtering is an error, which must
    /// abort the run before any request is synthesized.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read account dataset from {}", path.display()))?;

        let account_ids = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        if account_ids.is_empty() {
            anyhow::bail!(
                "Account dataset {} contains no identifiers after discarding blank lines",
                path.display()
            );
        }

        Ok(Self { account_ids })
    }

    pub fn len(&self) -> usize {
        self.account_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.account_ids.is_empty()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.account_ids[index]
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.account_ids.iter().any(|id| id == account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_dataset(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_identifiers_and_discards_blank_lines() {
        let file = write_dataset("acct-1\n\n  \nacct-2\n acct-3 \n\n");

        let dataset = Dataset::load(file.path()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.get(0), "acct-1");
        assert_eq!(dataset.get(2), "acct-3");
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let file = write_dataset("\n  \n\n");

        let result = Dataset::load(file.path());

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("no identifiers after discarding blank lines"));
    }

    #[test]
    fn missing_file_is_rejected() {
        let result = Dataset::load(Path::new("/nonexistent/account_ids.csv"));

        assert!(result.is_err());
    }

    #[test]
    fn bundled_dataset_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/account_ids.csv");

        let dataset = Dataset::load(&path).unwrap();

        assert!(!dataset.is_empty());
    }
}
