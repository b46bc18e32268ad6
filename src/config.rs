use serde::{Deserialize, Serialize};

use crate::delaunay::voronoi::DEFAULT_TOLERANCE;
use crate::error::{MapError, Result};
use crate::geometry::Bounds;

pub const DEFAULT_CANVAS_SIZE: usize = 2048;

/// 一次生成请求的用户参数
///
/// 在一次生成过程中保持不变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// 噪声采样频率（乘在以画布中心为原点的坐标上）
    pub frequency: f64,
    /// 随机站点数量
    pub point_count: i32,
    /// Lloyd 松弛轮数
    pub iteration_count: i32,
    /// 噪声值映射到高程 0 的位置
    pub noise_min: f64,
    /// 噪声值映射到高程 1 的位置
    pub noise_max: f64,
    /// 高程不超过该值的单元格为水域
    pub sea_level: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            frequency: 0.002,
            point_count: 2000,
            iteration_count: 3,
            noise_min: -1.0,
            noise_max: 1.0,
            sea_level: 0.5,
        }
    }
}

impl GenerationParameters {
    /// 检查所有字段，返回第一个不合法的字段
    pub fn validate(&self) -> Result<()> {
        if self.point_count < 0 {
            return Err(MapError::InvalidArgument(format!(
                "point count must be non-negative, got {}",
                self.point_count
            )));
        }
        if self.iteration_count < 0 {
            return Err(MapError::InvalidArgument(format!(
                "iteration count must be non-negative, got {}",
                self.iteration_count
            )));
        }
        for (name, value) in [
            ("frequency", self.frequency),
            ("noise min", self.noise_min),
            ("noise max", self.noise_max),
            ("sea level", self.sea_level),
        ] {
            if !value.is_finite() {
                return Err(MapError::InvalidArgument(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.noise_min >= self.noise_max {
            return Err(MapError::InvalidArgument(format!(
                "noise min ({}) must be less than noise max ({})",
                self.noise_min, self.noise_max
            )));
        }
        Ok(())
    }
}

/// 画布与绘制设置，整个会话内固定
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    /// Voronoi 顶点合并精度
    pub tolerance: f64,
    /// 质心标记半径（像素，与画布尺寸无关）
    pub marker_radius: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            tolerance: DEFAULT_TOLERANCE,
            marker_radius: 2.0,
        }
    }
}

impl CanvasConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn bounds(&self) -> Result<Bounds> {
        Bounds::from_size(self.width as f64, self.height as f64)
    }
}
