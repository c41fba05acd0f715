//! Per-memory-slice directory controller.

use crate::controller::{Controller, ControllerBase, TopologyResult, VersionRegistry};
use crate::network::{Network, QueueDirection, QueueEndpoint, QueueRole};
use crate::types::{LineSize, Version};

/// A directory controller for one slice of the memory space.
///
/// Tracks ownership on behalf of memory; its version counter is
/// independent of the L1 counter, so a topology with four L1s and two
/// directories numbers them 0..=3 and 0..=1 respectively.
#[derive(Clone, Debug)]
pub struct DirectoryController {
    base: ControllerBase,
}

impl DirectoryController {
    /// Kind name used for version allocation and endpoint lookup.
    pub const KIND: &'static str = "Directory";

    /// Creates a new directory controller, allocating the next version.
    pub fn new(versions: &mut VersionRegistry, cache_line_size: LineSize) -> TopologyResult<Self> {
        Ok(Self {
            base: ControllerBase::new(versions, Self::KIND, cache_line_size)?,
        })
    }

    /// Number of low-order address bits consumed by the line offset.
    pub fn block_offset_bits(&self) -> u32 {
        self.base.block_offset_bits()
    }
}

impl Controller for DirectoryController {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn version(&self) -> Version {
        self.base.version()
    }

    fn connect_queues(&mut self, network: &mut Network) -> TopologyResult<()> {
        let v = self.base.version();

        // Inbound coherence traffic from the caches
        network.attach(
            QueueEndpoint::new(Self::KIND, v, QueueRole::Request, QueueDirection::FromNetwork)
                .ordered(),
        );
        network.attach(QueueEndpoint::new(
            Self::KIND,
            v,
            QueueRole::Response,
            QueueDirection::FromNetwork,
        ));

        // Outbound: data responses and forwarded interventions
        network.attach(QueueEndpoint::new(
            Self::KIND,
            v,
            QueueRole::Response,
            QueueDirection::ToNetwork,
        ));
        network.attach(QueueEndpoint::new(
            Self::KIND,
            v,
            QueueRole::Forward,
            QueueDirection::ToNetwork,
        ));

        Ok(())
    }
}
