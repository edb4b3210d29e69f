//! Holder for the currently loaded schema.

use std::path::Path;
use std::sync::{Arc, RwLock};

use super::registry::Schema;
use super::validate::validate_schema;
use crate::error::Result;
use crate::fgd::{self, ParserConfig};

/// Shared slot for the active [`Schema`].
///
/// Loading builds a complete schema first and then swaps it in with a single
/// write, so readers see either the old or the new schema, never a mix. A
/// failed load leaves the previous schema in place.
#[derive(Debug, Default)]
pub struct SchemaStore {
    current: RwLock<Option<Arc<Schema>>>,
}

impl SchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded schema, if any.
    pub fn current(&self) -> Option<Arc<Schema>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether a schema is loaded.
    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    /// Install `schema`, returning the one it replaced.
    pub fn replace(&self, schema: Schema) -> Option<Arc<Schema>> {
        self.swap(Arc::new(schema))
    }

    /// Remove the loaded schema.
    pub fn clear(&self) -> Option<Arc<Schema>> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.take()
    }

    /// Read, parse and install an FGD file.
    pub fn load_file(&self, path: &Path, config: &ParserConfig) -> Result<Arc<Schema>> {
        let document = fgd::parse_file(path, config)?;
        if !document.diagnostics.is_empty() {
            log::info!(
                "{}: {} recoverable problems while parsing",
                path.display(),
                document.diagnostics.len()
            );
        }

        let schema = Schema::from_entities(document.entities, Some(path.to_path_buf()))?;
        validate_schema(&schema)?;
        let schema = Arc::new(schema);
        self.swap(Arc::clone(&schema));

        log::info!("loaded FGD schema from {}", path.display());
        Ok(schema)
    }

    fn swap(&self, schema: Arc<Schema>) -> Option<Arc<Schema>> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.replace(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FgdError;

    fn temp_fgd(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("fgd_store_{}_{}.fgd", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_and_replace() {
        let store = SchemaStore::new();
        assert!(!store.is_loaded());

        let first = temp_fgd("first", "@PointClass = a []");
        let second = temp_fgd("second", "@PointClass = b []");

        store.load_file(&first, &ParserConfig::default()).unwrap();
        let held = store.current().unwrap();
        store.load_file(&second, &ParserConfig::default()).unwrap();

        assert!(held.contains("a"));
        assert!(store.current().unwrap().contains("b"));
        assert!(!store.current().unwrap().contains("a"));

        std::fs::remove_file(first).ok();
        std::fs::remove_file(second).ok();
    }

    #[test]
    fn test_failed_load_keeps_previous() {
        let store = SchemaStore::new();
        let good = temp_fgd("good", "@PointClass = worldspawn []");
        let empty = temp_fgd("empty", "// nothing here\n");

        store.load_file(&good, &ParserConfig::default()).unwrap();

        let err = store.load_file(&empty, &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, FgdError::NoEntities { .. }));

        let err = store
            .load_file(Path::new("/nonexistent/x.fgd"), &ParserConfig::default())
            .unwrap_err();
        assert!(matches!(err, FgdError::FileReadError { .. }));

        assert!(store.current().unwrap().contains("worldspawn"));
        assert!(store.clear().is_some());
        assert!(!store.is_loaded());

        std::fs::remove_file(good).ok();
        std::fs::remove_file(empty).ok();
    }

    #[test]
    fn test_concurrent_readers_see_whole_schemas() {
        let store = Arc::new(SchemaStore::new());
        let entities = fgd::parse("@PointClass = a [] @PointClass = b []").entities;
        store.replace(Schema::from_entities(entities.clone(), None).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let entities = entities.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.replace(Schema::from_entities(entities.clone(), None).unwrap());
                        assert_eq!(store.current().unwrap().classes().len(), 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
