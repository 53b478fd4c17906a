use glam::Mat3;

use crate::error::PrtError;
use crate::rotation::{build_band_operators, BandOperators, SpatialRotation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Holds the band operators of the most recent rotation.
#[derive(Debug, Default)]
pub struct BandOperatorCache {
    current: Option<(Mat3, BandOperators)>,
    pub stats: CacheStats,
}

impl BandOperatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, rotation: &SpatialRotation) -> Result<BandOperators, PrtError> {
        let key = rotation.matrix();
        if let Some((cached_key, ops)) = &self.current {
            if *cached_key == key {
                self.stats.hits += 1;
                tracing::trace!("band operator cache hit");
                return Ok(*ops);
            }
        }

        self.current = None;
        self.stats.misses += 1;
        let ops = build_band_operators(rotation)?;
        self.current = Some((key, ops));
        Ok(ops)
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn repeated_rotation_hits() {
        let mut cache = BandOperatorCache::new();
        let rot = SpatialRotation::from_axis_angle(Vec3::Y, 0.7).unwrap();
        let first = cache.get_or_build(&rot).unwrap();
        let second = cache.get_or_build(&rot).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.stats, CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn changed_rotation_rebuilds() {
        let mut cache = BandOperatorCache::new();
        let a = SpatialRotation::from_axis_angle(Vec3::Y, 0.7).unwrap();
        let b = SpatialRotation::from_axis_angle(Vec3::X, 0.7).unwrap();
        let ops_a = cache.get_or_build(&a).unwrap();
        let ops_b = cache.get_or_build(&b).unwrap();
        assert_ne!(ops_a, ops_b);
        assert_eq!(ops_b, build_band_operators(&b).unwrap());
        assert_eq!(cache.stats.misses, 2);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = BandOperatorCache::new();
        cache.get_or_build(&SpatialRotation::IDENTITY).unwrap();
        assert!(!cache.is_empty());
        cache.invalidate();
        assert!(cache.is_empty());
        cache.get_or_build(&SpatialRotation::IDENTITY).unwrap();
        assert_eq!(cache.stats, CacheStats { hits: 0, misses: 2 });
    }
}
