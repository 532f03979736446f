use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use shapelock::error::StoreError;
use shapelock::storage::Storage;

/// A [`Storage`] kept as one JSON object in a file, keys mapping to string values.
///
/// A missing file reads as empty and is created on first write.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt(err.to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StoreError::Backend(format!("{}: {err}", self.path.display()))),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // an unreadable file is left alone rather than overwritten
        let mut entries = self.read()?;
        entries.insert(key.to_owned(), value.to_owned());

        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)
            .map_err(|err| StoreError::Backend(format!("{}: {err}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use shapelock::error::StoreError;
    use shapelock::storage::Storage;

    use super::FileStorage;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("checker-{}-{name}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_reads_empty() {
        let storage = FileStorage::new(scratch("missing"));
        assert_eq!(storage.get("problems").unwrap(), None);
    }

    #[test]
    fn writes_are_read_back() {
        let path = scratch("round-trip");
        let mut storage = FileStorage::new(&path);
        storage.set("problems", "[]").unwrap();
        storage.set("other", "x").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("problems").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_is_not_overwritten() {
        let path = scratch("corrupt");
        fs::write(&path, "{oops").unwrap();
        let mut storage = FileStorage::new(&path);

        assert!(matches!(storage.get("problems"), Err(StoreError::Corrupt(_))));
        assert!(storage.set("problems", "[]").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{oops");
        let _ = fs::remove_file(path);
    }
}
