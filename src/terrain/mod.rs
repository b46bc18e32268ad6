pub mod elevation;
pub mod noise;

pub use elevation::{elevation, ElevationSampler};
pub use noise::{NoiseConfig, NoiseSource, TerrainNoise};
