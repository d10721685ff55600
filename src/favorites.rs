//! Favorites list with injected persistence
//!
//! The list is an ordered, duplicate-free sequence of city names held in
//! memory, loaded once at construction, and written through to a persistence
//! port on every mutation. The production port keeps a single key in a fjall
//! keyspace holding the JSON-serialized array; an in-memory port backs tests.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use fjall::Keyspace;
use tracing::{debug, info, warn};

/// Store slot holding the serialized favorites array
const FAVORITES_KEY: &str = "favorites";

/// Persistence port for the favorites list
pub trait FavoritesBackend: Send + Sync {
    /// Load the persisted list; malformed or missing data yields an empty list
    fn load(&self) -> Vec<String>;
    /// Persist the full list
    fn save(&self, names: &[String]) -> Result<()>;
}

/// fjall-backed favorites slot
pub struct FjallBackend {
    store: Keyspace,
}

impl FjallBackend {
    /// Open (or create) the store under the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path)
            .open()
            .with_context(|| "Failed to open favorites database")?;
        let store = db
            .keyspace(FAVORITES_KEY, fjall::KeyspaceCreateOptions::default)
            .with_context(|| "Failed to open favorites keyspace")?;
        Ok(Self { store })
    }
}

impl FavoritesBackend for FjallBackend {
    fn load(&self) -> Vec<String> {
        let bytes = match self.store.get(FAVORITES_KEY) {
            Ok(Some(bytes)) => bytes.to_vec(),
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites, starting empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(names) => names,
            Err(e) => {
                warn!("Malformed favorites data, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, names: &[String]) -> Result<()> {
        let bytes = serde_json::to_vec(names).with_context(|| "Failed to serialize favorites")?;
        self.store
            .insert(FAVORITES_KEY, bytes)
            .with_context(|| "Failed to write favorites")?;
        Ok(())
    }
}

/// In-memory favorites slot for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with raw serialized content
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Mutex::new(Some(raw.to_string())),
        }
    }

    /// Raw serialized content currently held
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().expect("favorites slot poisoned").clone()
    }
}

impl FavoritesBackend for MemoryBackend {
    fn load(&self) -> Vec<String> {
        let slot = self.slot.lock().expect("favorites slot poisoned");
        slot.as_ref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    fn save(&self, names: &[String]) -> Result<()> {
        let raw = serde_json::to_string(names)?;
        *self.slot.lock().expect("favorites slot poisoned") = Some(raw);
        Ok(())
    }
}

/// Ordered, duplicate-free favorites list written through to a backend
pub struct FavoritesStore {
    backend: Box<dyn FavoritesBackend>,
    names: Vec<String>,
}

impl FavoritesStore {
    /// Load the list once from the backend
    pub fn new(backend: Box<dyn FavoritesBackend>) -> Self {
        let names = backend.load();
        debug!("Loaded {} favorites", names.len());
        Self { backend, names }
    }

    /// Whether the name is currently a favorite
    #[must_use]
    pub fn is_favorite(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Append the name; no-op when already present
    pub fn add(&mut self, name: &str) -> Result<()> {
        if self.is_favorite(name) {
            return Ok(());
        }
        self.names.push(name.to_string());
        self.backend.save(&self.names)?;
        info!("Saved favorite: {}", name);
        Ok(())
    }

    /// Remove the name; no-op when absent
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        if self.names.len() == before {
            return Ok(());
        }
        self.backend.save(&self.names)?;
        info!("Removed favorite: {}", name);
        Ok(())
    }

    /// Remove if present, else append; returns the new membership
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        if self.is_favorite(name) {
            self.remove(name)?;
            Ok(false)
        } else {
            self.add(name)?;
            Ok(true)
        }
    }

    /// Current list, in insertion order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toggle_round_trip_restores_list() {
        let mut store = FavoritesStore::new(Box::new(MemoryBackend::with_raw(
            r#"["Tehran","Berlin"]"#,
        )));
        let original: Vec<String> = store.names().to_vec();

        assert!(store.toggle("Oslo").unwrap());
        assert!(store.is_favorite("Oslo"));
        assert!(!store.toggle("Oslo").unwrap());
        assert_eq!(store.names(), original.as_slice());
    }

    #[test]
    fn test_add_is_noop_when_present() {
        let mut store = FavoritesStore::new(Box::new(MemoryBackend::new()));
        store.add("Tehran").unwrap();
        store.add("Tehran").unwrap();
        assert_eq!(store.names(), ["Tehran".to_string()].as_slice());
    }

    #[test]
    fn test_order_preserved() {
        let mut store = FavoritesStore::new(Box::new(MemoryBackend::new()));
        store.add("Tehran").unwrap();
        store.add("Berlin").unwrap();
        store.add("Oslo").unwrap();
        store.remove("Berlin").unwrap();
        assert_eq!(
            store.names(),
            ["Tehran".to_string(), "Oslo".to_string()].as_slice()
        );
    }

    #[test]
    fn test_malformed_data_yields_empty_list() {
        let store = FavoritesStore::new(Box::new(MemoryBackend::with_raw("not json at all")));
        assert!(store.names().is_empty());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut store = FavoritesStore::new(Box::new(MemoryBackend::new()));
        store.add("Tehran").unwrap();
        assert!(store.backend.load().contains(&"Tehran".to_string()));

        store.remove("Tehran").unwrap();
        assert!(store.backend.load().is_empty());
    }

    #[test]
    fn test_fjall_backend_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = FjallBackend::open(dir.path()).unwrap();
        assert!(backend.load().is_empty());

        backend
            .save(&["Tehran".to_string(), "Berlin".to_string()])
            .unwrap();
        assert_eq!(
            backend.load(),
            vec!["Tehran".to_string(), "Berlin".to_string()]
        );
    }
}
