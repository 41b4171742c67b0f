//! Keeper: the per-account private data store handle.
//!
//! Opened at login under `<account>/keeper`, closed during session
//! teardown. Values are bincode-serialized like the rest of the DB layer.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SextantError;

#[derive(Clone)]
pub struct Keeper {
    db: sled::Db,
    validate_on_write: bool,
}

impl Keeper {
    pub fn open(path: &Path, validate_on_write: bool) -> Result<Self, SextantError> {
        let db = sled::open(path).map_err(|e| SextantError::Keeper(e.to_string()))?;
        Ok(Keeper {
            db,
            validate_on_write,
        })
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SextantError> {
        let serialized =
            bincode::serialize(value).map_err(|e| SextantError::Serialization(e.to_string()))?;
        self.db
            .insert(key.as_bytes(), serialized.clone())
            .map_err(|e| SextantError::Keeper(e.to_string()))?;

        if self.validate_on_write {
            let stored = self
                .db
                .get(key.as_bytes())
                .map_err(|e| SextantError::Keeper(e.to_string()))?;
            if stored.as_deref() != Some(serialized.as_slice()) {
                return Err(SextantError::Keeper(format!(
                    "write validation failed for key '{}'",
                    key
                )));
            }
        }
        Ok(())
    }

    pub fn get<T: for<'a> Deserialize<'a>>(&self, key: &str) -> Result<Option<T>, SextantError> {
        match self.db.get(key.as_bytes()) {
            Ok(Some(data)) => {
                let deserialized = bincode::deserialize(&data)
                    .map_err(|e| SextantError::Serialization(e.to_string()))?;
                Ok(Some(deserialized))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(SextantError::Keeper(e.to_string())),
        }
    }

    /// Flush outstanding writes. Part of session teardown ordering: the
    /// node stops its background work before the keeper closes.
    pub fn close(&self) -> Result<(), SextantError> {
        self.db
            .flush()
            .map(|_| ())
            .map_err(|e| SextantError::Keeper(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_get_round_trip() {
        let tmp = TempDir::new().unwrap();
        let keeper = Keeper::open(&tmp.path().join("keeper"), true).unwrap();

        keeper.put("sync/confirmed_height", &42u64).unwrap();
        let height: Option<u64> = keeper.get("sync/confirmed_height").unwrap();
        assert_eq!(height, Some(42));

        let missing: Option<u64> = keeper.get("absent").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_close_flushes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("keeper");
        {
            let keeper = Keeper::open(&path, false).unwrap();
            keeper.put("k", &"v".to_string()).unwrap();
            keeper.close().unwrap();
        }
        let keeper = Keeper::open(&path, false).unwrap();
        let value: Option<String> = keeper.get("k").unwrap();
        assert_eq!(value, Some("v".to_string()));
    }
}
