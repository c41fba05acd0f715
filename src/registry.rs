//! Controller factory registry for configuration-driven assembly.
//!
//! The registry allows controller kinds to be registered by name,
//! enabling configuration files to declare instances without the
//! assembly code naming concrete types.
//!
//! # Example
//!
//! ```
//! use opal::registry::ControllerRegistry;
//! use opal::controller::{Controller, VersionRegistry};
//! use opal::controllers::L1Controller;
//! use std::collections::HashMap;
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register("L1", |versions, line_size, _attrs| {
//!     Ok(Box::new(L1Controller::new(versions, line_size)?))
//! });
//!
//! let mut versions = VersionRegistry::new();
//! let controller = registry
//!     .create("L1", &mut versions, 64, &HashMap::new())
//!     .unwrap();
//! assert_eq!(controller.version(), 0);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::controller::{Controller, TopologyError, TopologyResult, VersionRegistry};
use crate::controllers::{DirectoryController, L1Controller};
use crate::types::LineSize;

/// Type alias for controller factory functions.
///
/// Factories are fallible: construction validates the cache line size
/// and may reject attributes.
pub type ControllerFactory = Arc<
    dyn Fn(&mut VersionRegistry, LineSize, &HashMap<String, String>) -> TopologyResult<Box<dyn Controller>>
        + Send
        + Sync,
>;

/// A registry of controller factories keyed by kind name.
#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller factory under the given kind name.
    ///
    /// # Arguments
    /// * `kind` - The kind name to register
    /// * `factory` - A function that creates controller instances
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&mut VersionRegistry, LineSize, &HashMap<String, String>) -> TopologyResult<Box<dyn Controller>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    /// Creates a controller instance by kind name.
    ///
    /// # Arguments
    /// * `kind` - The registered kind name
    /// * `versions` - The assembly context's version registry
    /// * `line_size` - Cache line size in bytes
    /// * `attrs` - Attributes to pass to the factory
    ///
    /// # Returns
    /// The constructed controller, or
    /// [`TopologyError::UnknownControllerKind`] if no factory is
    /// registered under `kind`.
    pub fn create(
        &self,
        kind: &str,
        versions: &mut VersionRegistry,
        line_size: LineSize,
        attrs: &HashMap<String, String>,
    ) -> TopologyResult<Box<dyn Controller>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| TopologyError::UnknownControllerKind {
                kind: kind.to_string(),
            })?;
        factory(versions, line_size, attrs)
    }

    /// Returns true if a kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns an iterator over registered kind names.
    pub fn kind_names(&self) -> impl Iterator<Item = &String> {
        self.factories.keys()
    }

    /// Unregisters a controller kind.
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.factories.remove(kind).is_some()
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("registered_kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Creates a registry with the built-in controller kinds.
///
/// Includes:
/// - `L1` - [`L1Controller`]
/// - `Directory` - [`DirectoryController`]
pub fn default_registry() -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();

    registry.register("L1", |versions, line_size, _attrs| {
        Ok(Box::new(L1Controller::new(versions, line_size)?))
    });

    registry.register("Directory", |versions, line_size, _attrs| {
        Ok(Box::new(DirectoryController::new(versions, line_size)?))
    });

    registry
}
