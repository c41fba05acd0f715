//! Topology assembly.
//!
//! The [`TopologyBuilder`] is the assembly context: it owns the version
//! registry and the network handle, creates controller instances in
//! declaration order through a factory registry, and wires each one
//! into the network before moving on to the next. Construction order
//! therefore matches declaration order, which keeps version numbering
//! dense per kind and queue registration order deterministic.
//!
//! Assembly is single-threaded and fail-fast: the first invalid value
//! aborts with an error, before any simulation can start.

use std::collections::HashMap;

use crate::config::{ConfigResult, TopologyConfig};
use crate::controller::{Controller, TopologyResult, VersionRegistry};
use crate::network::Network;
use crate::registry::{default_registry, ControllerRegistry};
use crate::types::{LineSize, Version};

/// An assembled multi-controller topology.
///
/// Configuration objects are write-once: the topology is never
/// reconfigured during a simulation run.
pub struct Topology {
    controllers: Vec<Box<dyn Controller>>,
    network: Network,
}

impl Topology {
    /// Returns all controllers in construction order.
    pub fn controllers(&self) -> &[Box<dyn Controller>] {
        &self.controllers
    }

    /// Returns the network with every queue endpoint attached.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the number of assembled controllers.
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Returns the versions assigned to one kind, in construction order.
    pub fn versions_of(&self, kind: &str) -> Vec<Version> {
        self.controllers
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.version())
            .collect()
    }
}

impl std::fmt::Debug for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topology")
            .field("controllers", &self.controllers.len())
            .field("endpoints", &self.network.len())
            .finish()
    }
}

/// The assembly context for building a [`Topology`].
///
/// # Example
///
/// ```
/// use opal::builder::TopologyBuilder;
/// use opal::config::TopologyConfigBuilder;
///
/// let config = TopologyConfigBuilder::new()
///     .cache_line_size(64)
///     .add_controllers("L1", 4)
///     .add_controller("Directory")
///     .build()
///     .unwrap();
///
/// let topology = TopologyBuilder::from_config(&config).unwrap();
/// assert_eq!(topology.versions_of("L1"), vec![0, 1, 2, 3]);
/// assert_eq!(topology.versions_of("Directory"), vec![0]);
/// ```
pub struct TopologyBuilder {
    registry: ControllerRegistry,
    versions: VersionRegistry,
    network: Network,
    controllers: Vec<Box<dyn Controller>>,
}

impl TopologyBuilder {
    /// Creates a builder using the built-in controller registry.
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    /// Creates a builder using a custom controller registry.
    pub fn with_registry(registry: ControllerRegistry) -> Self {
        Self {
            registry,
            versions: VersionRegistry::new(),
            network: Network::new(),
            controllers: Vec::new(),
        }
    }

    /// Assembles a topology from a configuration.
    ///
    /// Re-validates the configuration, then instantiates every declared
    /// controller group in order.
    pub fn from_config(config: &TopologyConfig) -> ConfigResult<Topology> {
        Self::from_config_with_registry(config, default_registry())
    }

    /// Assembles a topology from a configuration and a custom registry.
    pub fn from_config_with_registry(
        config: &TopologyConfig,
        registry: ControllerRegistry,
    ) -> ConfigResult<Topology> {
        config.validate()?;

        let mut builder = Self::with_registry(registry);
        let line_size = config.system.cache_line_size;

        for group in &config.controllers {
            builder.add_group(&group.kind, group.count, line_size, &group.attrs)?;
        }

        Ok(builder.build())
    }

    /// Creates and wires `count` instances of `kind`.
    ///
    /// Each instance is constructed (allocating its version) and then
    /// immediately attached to the network, so interleaving groups of
    /// different kinds preserves the declared wiring order.
    pub fn add_group(
        &mut self,
        kind: &str,
        count: u32,
        line_size: LineSize,
        attrs: &HashMap<String, String>,
    ) -> TopologyResult<()> {
        for _ in 0..count {
            let mut controller = self
                .registry
                .create(kind, &mut self.versions, line_size, attrs)?;
            controller.connect_queues(&mut self.network)?;

            tracing::debug!(
                kind = controller.kind(),
                version = controller.version(),
                "controller attached"
            );
            self.controllers.push(controller);
        }

        tracing::info!(kind, count, "controller group assembled");
        Ok(())
    }

    /// Finalizes the topology.
    pub fn build(self) -> Topology {
        tracing::info!(
            controllers = self.controllers.len(),
            endpoints = self.network.len(),
            "topology assembled"
        );

        Topology {
            controllers: self.controllers,
            network: self.network,
        }
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, TopologyConfigBuilder};
    use crate::controller::TopologyError;

    #[test]
    fn test_versions_follow_declaration_order() {
        let mut builder = TopologyBuilder::new();
        let attrs = HashMap::new();

        builder.add_group("L1", 4, 64, &attrs).unwrap();
        builder.add_group("Directory", 2, 64, &attrs).unwrap();
        let topology = builder.build();

        assert_eq!(topology.controller_count(), 6);
        assert_eq!(topology.versions_of("L1"), vec![0, 1, 2, 3]);
        assert_eq!(topology.versions_of("Directory"), vec![0, 1]);
    }

    #[test]
    fn test_from_config() {
        let config = TopologyConfigBuilder::new()
            .add_controllers("L1", 2)
            .add_controller("Directory")
            .build()
            .unwrap();

        let topology = TopologyBuilder::from_config(&config).unwrap();
        assert_eq!(topology.controller_count(), 3);
        // 4 endpoints per built-in controller
        assert_eq!(topology.network().len(), 12);
    }

    #[test]
    fn test_unknown_kind_aborts_assembly() {
        let config = TopologyConfigBuilder::new()
            .add_controller("L1")
            .add_controller("Hypercache")
            .build()
            .unwrap();

        let result = TopologyBuilder::from_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::Topology(TopologyError::UnknownControllerKind { .. }))
        ));
    }

    #[test]
    fn test_wiring_order_matches_construction_order() {
        let mut builder = TopologyBuilder::new();
        let attrs = HashMap::new();

        builder.add_group("L1", 2, 64, &attrs).unwrap();
        let topology = builder.build();

        // First L1's endpoints precede the second's
        let endpoints = topology.network().endpoints();
        assert!(endpoints[..4].iter().all(|e| e.version == 0));
        assert!(endpoints[4..8].iter().all(|e| e.version == 1));
    }
}
