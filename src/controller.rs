//! Controller identity and the topology-builder base.
//!
//! Every cache controller instance receives a stable, ordered identity
//! (its *version*) from a [`VersionRegistry`], and derives its block
//! offset width from the cache line size. Concrete controller kinds
//! embed [`ControllerBase`] for the shared state and implement the
//! [`Controller`] trait to wire their message queues into the network.
//!
//! Separating "allocate an identity" from "wire into topology" lets
//! heterogeneous controller kinds (varying in protocol, queue count,
//! and queue types) share identity numbering and structural validation
//! while keeping protocol-specific wiring fully delegated.

use std::collections::HashMap;
use thiserror::Error;

use crate::network::Network;
use crate::types::{LineSize, Version};

/// Errors raised while assembling the hardware topology.
///
/// Always fatal: a misconfigured topology must never silently proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A controller was constructed with a cache line size that is not
    /// a power of two.
    #[error("{kind}: cache line size not a power of 2: {size}")]
    LineSizeNotPowerOfTwo { kind: String, size: LineSize },

    /// A configuration referenced a controller kind with no registered
    /// factory.
    #[error("unknown controller kind: {kind}")]
    UnknownControllerKind { kind: String },

    /// A controller attribute could not be interpreted.
    #[error("{kind}: invalid attribute {attr:?}: {reason}")]
    InvalidAttribute {
        kind: String,
        attr: String,
        reason: String,
    },
}

/// Result type for topology assembly operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Per-kind version counters.
///
/// Maps each controller kind to a counter cell, yielding the dense
/// zero-based numbering downstream addressing relies on. Counters of
/// distinct kinds are fully independent. The registry is owned by the
/// assembly context and passed into controller constructors, so
/// assembly is reentrant and testable in isolation.
///
/// Configuration assembly is single-threaded; there is no concurrent
/// access to protect against.
#[derive(Clone, Debug, Default)]
pub struct VersionRegistry {
    counters: HashMap<String, Version>,
}

impl VersionRegistry {
    /// Creates a new registry with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next version for `kind`.
    ///
    /// Returns 0, 1, 2, ... per kind, in allocation order. Pure counter
    /// increment; no failure mode.
    pub fn allocate(&mut self, kind: &str) -> Version {
        let counter = self.counters.entry(kind.to_string()).or_insert(0);
        let version = *counter;
        *counter += 1;
        version
    }

    /// Returns the number of versions allocated so far for `kind`.
    pub fn count(&self, kind: &str) -> Version {
        self.counters.get(kind).copied().unwrap_or(0)
    }
}

/// Shared state embedded by every concrete controller.
///
/// Holds the allocated identity and the cache line size, and derives
/// the block offset width from the latter.
#[derive(Clone, Debug)]
pub struct ControllerBase {
    version: Version,
    cache_line_size: LineSize,
}

impl ControllerBase {
    /// Validates the line size, then allocates the next version for
    /// `kind`.
    ///
    /// The line size is checked *before* the version is allocated, so a
    /// failed construction leaves no gap in the version sequence. The
    /// check runs regardless of whether the surrounding configuration
    /// layer already validated the line size.
    ///
    /// # Arguments
    /// * `versions` - The assembly context's version registry
    /// * `kind` - The concrete controller kind name
    /// * `cache_line_size` - Line size in bytes; must be a power of two
    pub fn new(
        versions: &mut VersionRegistry,
        kind: &str,
        cache_line_size: LineSize,
    ) -> TopologyResult<Self> {
        if !cache_line_size.is_power_of_two() {
            return Err(TopologyError::LineSizeNotPowerOfTwo {
                kind: kind.to_string(),
                size: cache_line_size,
            });
        }

        Ok(Self {
            version: versions.allocate(kind),
            cache_line_size,
        })
    }

    /// Returns this instance's identity within its kind.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the cache line size in bytes.
    pub fn cache_line_size(&self) -> LineSize {
        self.cache_line_size
    }

    /// Number of low-order address bits consumed by the line offset.
    ///
    /// Recomputed on demand rather than cached; `cache_line_size` is a
    /// power of two by construction, so `trailing_zeros` is its exact
    /// base-2 logarithm.
    pub fn block_offset_bits(&self) -> u32 {
        self.cache_line_size.trailing_zeros()
    }
}

/// The capability every concrete controller kind must provide.
///
/// Replaces an abstract base class: the topology builder operates
/// generically over this trait, and a kind that does not implement
/// `connect_queues` simply does not compile.
pub trait Controller: Send {
    /// The kind name this controller's version was allocated under.
    fn kind(&self) -> &'static str;

    /// This instance's identity within its kind.
    fn version(&self) -> Version;

    /// Attaches this controller's message-queue endpoints to `network`.
    ///
    /// Called exactly once per instance during assembly, in declaration
    /// order.
    fn connect_queues(&mut self, network: &mut Network) -> TopologyResult<()>;
}
