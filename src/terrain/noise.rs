use std::cell::RefCell;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// 噪声求值接口：`(x, y, seed) -> value`
///
/// 对固定输入必须是确定性的。输出大致归一化到 [-1, 1]，但不保证严格有界，
/// 下游需要自行夹取。
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64, seed: i32) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, i32) -> f64,
{
    fn sample(&self, x: f64, y: f64, seed: i32) -> f64 {
        self(x, y, seed)
    }
}

/// Configuration for the built-in fractal noise
///
/// The seed is not part of the configuration: every generation draws a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Number of noise layers to combine (more = more detail)
    /// Typical range: 1 - 8
    pub octaves: usize,

    /// How much each octave contributes (amplitude decay)
    /// Typical range: 0.3 - 0.7
    pub persistence: f64,

    /// Frequency multiplier between octaves
    /// Typical range: 1.5 - 3.0
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseConfig {
    pub fn new(octaves: usize, persistence: f64, lacunarity: f64) -> Self {
        Self {
            octaves,
            persistence,
            lacunarity,
        }
    }

    /// Smooth, large-scale continents
    pub fn smooth() -> Self {
        Self::new(3, 0.6, 2.0)
    }

    /// Rough, detailed coastlines
    pub fn rough() -> Self {
        Self::new(8, 0.4, 2.5)
    }
}

/// Fractional Brownian Motion over Perlin noise
///
/// Building the octave stack is not free, so the generator for the most
/// recently used seed is cached. One generation uses a single seed for all
/// cells, which makes the cache hit for every cell after the first.
pub struct TerrainNoise {
    config: NoiseConfig,
    cache: RefCell<Option<(i32, Fbm<Perlin>)>>,
}

impl TerrainNoise {
    pub fn new(config: NoiseConfig) -> Self {
        Self {
            config,
            cache: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    fn build(&self, seed: i32) -> Fbm<Perlin> {
        Fbm::<Perlin>::new(seed as u32)
            .set_octaves(self.config.octaves.max(1))
            .set_persistence(self.config.persistence)
            .set_lacunarity(self.config.lacunarity)
    }
}

impl Default for TerrainNoise {
    fn default() -> Self {
        Self::new(NoiseConfig::default())
    }
}

impl NoiseSource for TerrainNoise {
    fn sample(&self, x: f64, y: f64, seed: i32) -> f64 {
        let mut cache = self.cache.borrow_mut();
        if cache.as_ref().is_some_and(|(cached, _)| *cached != seed) {
            *cache = None;
        }
        let (_, fbm) = cache.get_or_insert_with(|| (seed, self.build(seed)));
        fbm.get([x, y])
    }
}
