//! Per-core L1 cache controller.

use crate::controller::{Controller, ControllerBase, TopologyResult, VersionRegistry};
use crate::network::{Network, QueueDirection, QueueEndpoint, QueueRole};
use crate::types::{LineSize, Version};

/// A per-core L1 cache controller.
///
/// One instance is declared per core; versions number the instances
/// 0..N-1 in declaration order. The configuration core assigns the
/// identity and wires the queue endpoints; protocol state lives
/// elsewhere.
#[derive(Clone, Debug)]
pub struct L1Controller {
    base: ControllerBase,
}

impl L1Controller {
    /// Kind name used for version allocation and endpoint lookup.
    pub const KIND: &'static str = "L1";

    /// Creates a new L1 controller, allocating the next version.
    pub fn new(versions: &mut VersionRegistry, cache_line_size: LineSize) -> TopologyResult<Self> {
        Ok(Self {
            base: ControllerBase::new(versions, Self::KIND, cache_line_size)?,
        })
    }

    /// Number of low-order address bits consumed by the line offset.
    pub fn block_offset_bits(&self) -> u32 {
        self.base.block_offset_bits()
    }

    /// Returns the cache line size in bytes.
    pub fn cache_line_size(&self) -> LineSize {
        self.base.cache_line_size()
    }
}

impl Controller for L1Controller {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn version(&self) -> Version {
        self.base.version()
    }

    fn connect_queues(&mut self, network: &mut Network) -> TopologyResult<()> {
        let v = self.base.version();

        // Outbound coherence traffic
        network.attach(
            QueueEndpoint::new(Self::KIND, v, QueueRole::Request, QueueDirection::ToNetwork)
                .ordered(),
        );
        network.attach(QueueEndpoint::new(
            Self::KIND,
            v,
            QueueRole::Response,
            QueueDirection::ToNetwork,
        ));

        // Inbound: forwarded requests and data/ack responses
        network.attach(
            QueueEndpoint::new(Self::KIND, v, QueueRole::Forward, QueueDirection::FromNetwork)
                .ordered(),
        );
        network.attach(QueueEndpoint::new(
            Self::KIND,
            v,
            QueueRole::Response,
            QueueDirection::FromNetwork,
        ));

        Ok(())
    }
}
