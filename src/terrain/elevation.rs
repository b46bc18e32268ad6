//! 单元格高程采样
//!
//! 在单元格质心处对噪声求值，再通过可配置的线性区间归一化到 [0, 1]。
//! 采样窗口以画布中心为原点：`((x - 中心x) * freq, (y - 中心y) * freq)`。

use crate::error::{MapError, Result};
use crate::geometry::{Bounds, Point};
use crate::terrain::noise::NoiseSource;

/// 高程采样器
///
/// 构造时校验噪声区间，之后的采样不会失败。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationSampler {
    origin: Point,
    frequency: f64,
    noise_min: f64,
    noise_max: f64,
}

impl ElevationSampler {
    /// # 错误
    /// - `noise_min >= noise_max`（区间退化会导致除零）
    /// - 任意参数不是有限值
    pub fn new(bounds: &Bounds, frequency: f64, noise_min: f64, noise_max: f64) -> Result<Self> {
        if !frequency.is_finite() {
            return Err(MapError::InvalidArgument(format!(
                "frequency must be finite, got {frequency}"
            )));
        }
        if !noise_min.is_finite() || !noise_max.is_finite() {
            return Err(MapError::InvalidArgument(format!(
                "noise range [{noise_min}, {noise_max}] must be finite"
            )));
        }
        if noise_min >= noise_max {
            return Err(MapError::InvalidArgument(format!(
                "noise min ({noise_min}) must be less than noise max ({noise_max})"
            )));
        }

        Ok(Self {
            origin: bounds.center(),
            frequency,
            noise_min,
            noise_max,
        })
    }

    /// 未归一化的噪声值
    pub fn raw<N: NoiseSource + ?Sized>(&self, point: Point, seed: i32, noise: &N) -> f64 {
        noise.sample(
            (point.x - self.origin.x) * self.frequency,
            (point.y - self.origin.y) * self.frequency,
            seed,
        )
    }

    /// 归一化后的高程，范围 [0, 1]
    pub fn elevation<N: NoiseSource + ?Sized>(&self, point: Point, seed: i32, noise: &N) -> f64 {
        self.normalize(self.raw(point, seed, noise))
    }

    /// 反向线性插值并夹取：`clamp((raw - min) / (max - min), 0, 1)`
    ///
    /// NaN 视为最低高程。
    pub fn normalize(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return 0.0;
        }
        let v = raw.clamp(self.noise_min, self.noise_max);
        (v - self.noise_min) / (self.noise_max - self.noise_min)
    }
}

/// 一次性计算某点的高程
pub fn elevation<N: NoiseSource + ?Sized>(
    point: Point,
    bounds: &Bounds,
    frequency: f64,
    seed: i32,
    noise: &N,
    noise_min: f64,
    noise_max: f64,
) -> Result<f64> {
    Ok(ElevationSampler::new(bounds, frequency, noise_min, noise_max)?.elevation(point, seed, noise))
}
