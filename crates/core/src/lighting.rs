use serde::{Deserialize, Serialize};

use crate::cache::{BandOperatorCache, CacheStats};
use crate::error::PrtError;
use crate::packing::{pack_channels, pack_entry, PackedChannelMatrices, PackingLayout};
use crate::rotation::{BandOperators, SpatialRotation};
use crate::transfer::{rotate_channels, PrecomputedTransfer};

/// Which transfer entry to shade with and how to lay it out for the shading stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub environment: usize,
    pub layout: PackingLayout,
}

/// Rotation-aware lighting state for one render configuration.
#[derive(Debug)]
pub struct PrtLighting {
    transfer: PrecomputedTransfer,
    cache: BandOperatorCache,
}

impl PrtLighting {
    pub fn new(transfer: PrecomputedTransfer) -> Self {
        Self {
            transfer,
            cache: BandOperatorCache::new(),
        }
    }

    pub fn transfer(&self) -> &PrecomputedTransfer {
        &self.transfer
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats
    }

    pub fn band_operators(&mut self, rotation: &SpatialRotation) -> Result<BandOperators, PrtError> {
        self.cache.get_or_build(rotation)
    }

    /// Packs the selected entry without any rotation.
    pub fn packed(&self, config: &LightingConfig) -> Result<PackedChannelMatrices, PrtError> {
        pack_channels(&self.transfer, config.environment, config.layout)
    }

    /// Rotates only the selected entry and packs it.
    pub fn update(
        &mut self,
        rotation: &SpatialRotation,
        config: &LightingConfig,
    ) -> Result<PackedChannelMatrices, PrtError> {
        let channels = *self.transfer.get(config.environment)?;
        let ops = self.cache.get_or_build(rotation)?;
        let rotated = rotate_channels(&ops, &channels);
        Ok(pack_entry(&rotated, config.layout))
    }

    pub fn rotated(&mut self, rotation: &SpatialRotation) -> Result<PrecomputedTransfer, PrtError> {
        let ops = self.cache.get_or_build(rotation)?;
        Ok(self.transfer.rotated(&ops))
    }
}
