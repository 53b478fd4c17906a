mod cache;
mod error;
mod lighting;
mod linalg;
mod packing;
mod parallel;
mod radiance;
mod rotation;
mod sh;
mod transfer;

pub use cache::{BandOperatorCache, CacheStats};
pub use error::PrtError;
pub use lighting::{LightingConfig, PrtLighting};
pub use linalg::SquareMatrix;
pub use packing::{pack_channels, pack_entry, PackedChannelMatrices, PackingLayout};
pub use radiance::{interpolate, shade_coefficients, shade_packed};
pub use rotation::{
    band1_probes, band2_probes, build_band_operators, probe_matrix, Band1Operator,
    Band2Operator, BandOperators, SpatialRotation,
};
pub use sh::{band_range, eval_band, eval_basis, ShVector, SH_COEFF_COUNT};
pub use transfer::{
    rotate_channels, rotate_coefficients, sh_vector_from_slice, ChannelCoefficients,
    PrecomputedTransfer, CHANNEL_COUNT,
};
