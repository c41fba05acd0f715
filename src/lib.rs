//! # Opal Configuration Core
//!
//! The configuration-time core of a multi-core cache-coherence
//! simulator. Opal does two jobs, both before any hardware model is
//! built:
//!
//! - **Constrained parameters**: numeric configuration values (vector
//!   register/element lengths, cache line size) are validated against
//!   hardware-meaningful domain constraints at construction time.
//!   Invalid input is a hard failure, never silently corrected.
//! - **Component identity & topology assembly**: each cache controller
//!   instance receives a stable, zero-based identity within its kind,
//!   derives its block offset width from the cache line size, and wires
//!   its message queues into a shared interconnect handle in
//!   declaration order.
//!
//! Instruction execution, the coherence protocol state machine, and the
//! interconnect fabric are external collaborators; this crate owns only
//! "can this configuration value exist" and "how are component
//! identities and derived constants computed at build time".
//!
//! ## Quick Start
//!
//! ```rust
//! use opal::{TopologyBuilder, TopologyConfig};
//!
//! let config = TopologyConfig::from_yaml(r#"
//! system:
//!   cache_line_size: 64
//! controllers:
//!   - kind: L1
//!     count: 4
//!   - kind: Directory
//! "#).unwrap();
//!
//! let topology = TopologyBuilder::from_config(&config).unwrap();
//!
//! // Per-core controllers are numbered densely in declaration order
//! assert_eq!(topology.versions_of("L1"), vec![0, 1, 2, 3]);
//! assert_eq!(topology.versions_of("Directory"), vec![0]);
//! ```
//!
//! ## Configuration-Driven Setup
//!
//! ```rust,ignore
//! use opal::TopologyConfig;
//!
//! let config = TopologyConfig::from_file("topology.yaml")?;
//! // ... assemble the topology from config
//! ```

pub mod builder;
pub mod config;
pub mod controller;
pub mod controllers;
pub mod isa;
pub mod network;
pub mod param;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use builder::{Topology, TopologyBuilder};
pub use config::{ConfigError, ConfigResult, TopologyConfig, TopologyConfigBuilder};
pub use controller::{Controller, ControllerBase, TopologyError, TopologyResult, VersionRegistry};
pub use controllers::{DirectoryController, L1Controller};
pub use isa::{BaseIsa, IsaParams};
pub use network::{Network, QueueDirection, QueueEndpoint, QueueRole};
pub use param::{Constraint, ValidationError, VectorElementLength, VectorRegisterLength};
pub use registry::{default_registry, ControllerRegistry};
pub use types::{LineSize, Version};

/// Initialize the tracing subscriber for logging.
///
/// Call this at the start of your program to enable logging.
///
/// # Example
///
/// ```rust,ignore
/// opal::init_logging("info");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
