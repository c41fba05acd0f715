//! Interconnect attachment surface.
//!
//! Controllers wire their message queues into a shared [`Network`]
//! during topology assembly. The fabric itself (routing, buffering,
//! flow control) lives outside this crate: the core only records which
//! endpoints exist and in what order they were attached.
//!
//! Attachment order is preserved. Controllers are wired in declaration
//! order, and downstream addressing logic may depend on the resulting
//! registration order.
//!
//! # Example
//!
//! ```
//! use opal::network::{Network, QueueDirection, QueueEndpoint, QueueRole};
//!
//! let mut network = Network::new();
//! network.attach(
//!     QueueEndpoint::new("L1", 0, QueueRole::Request, QueueDirection::ToNetwork).ordered(),
//! );
//!
//! assert_eq!(network.len(), 1);
//! assert_eq!(network.endpoints()[0].role, QueueRole::Request);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Version;

/// The protocol role of a message queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueRole {
    /// Coherence requests.
    Request,
    /// Coherence responses (data and acknowledgements).
    Response,
    /// Forwarded/intervention requests.
    Forward,
}

/// Direction of a queue relative to the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueDirection {
    /// Messages flow from the controller into the network.
    ToNetwork,
    /// Messages flow from the network into the controller.
    FromNetwork,
}

/// One registered message-queue endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEndpoint {
    /// Kind name of the owning controller.
    pub controller: String,
    /// Instance identity of the owning controller within its kind.
    pub version: Version,
    /// Protocol role of the queue.
    pub role: QueueRole,
    /// Direction relative to the network.
    pub direction: QueueDirection,
    /// Whether the queue preserves point-to-point ordering.
    #[serde(default)]
    pub ordered: bool,
}

impl QueueEndpoint {
    /// Creates a new unordered endpoint.
    pub fn new(
        controller: impl Into<String>,
        version: Version,
        role: QueueRole,
        direction: QueueDirection,
    ) -> Self {
        Self {
            controller: controller.into(),
            version,
            role,
            direction,
            ordered: false,
        }
    }

    /// Marks the endpoint as point-to-point ordered.
    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }
}

/// The shared interconnect handle controllers attach to.
///
/// Owned by the assembly context and mutated by every controller during
/// construction. Configuration assembly is single-threaded, so no
/// locking discipline is needed; registration order is the declaration
/// order of the controllers.
#[derive(Clone, Debug, Default)]
pub struct Network {
    endpoints: Vec<QueueEndpoint>,
    /// Map from (controller kind, version) to endpoint indices.
    lookup: HashMap<(String, Version), Vec<usize>>,
}

impl Network {
    /// Creates a new empty network handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a queue endpoint.
    pub fn attach(&mut self, endpoint: QueueEndpoint) {
        let key = (endpoint.controller.clone(), endpoint.version);
        let index = self.endpoints.len();
        self.endpoints.push(endpoint);
        self.lookup.entry(key).or_default().push(index);
    }

    /// Returns all endpoints in registration order.
    pub fn endpoints(&self) -> &[QueueEndpoint] {
        &self.endpoints
    }

    /// Returns the endpoints attached by one controller instance, in
    /// the order it attached them.
    pub fn endpoints_for(&self, controller: &str, version: Version) -> Vec<&QueueEndpoint> {
        self.lookup
            .get(&(controller.to_string(), version))
            .map(|indices| indices.iter().map(|&i| &self.endpoints[i]).collect())
            .unwrap_or_default()
    }

    /// Returns the number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns true if no endpoints are registered.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Returns the number of distinct controller instances attached.
    pub fn controller_count(&self) -> usize {
        self.lookup.len()
    }
}
