use egui::Color32;

/// 水域颜色的提亮偏移
pub const WATER_BRIGHTEN: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Water,
    Land,
}

impl Terrain {
    /// 高程不超过海平面即为水域
    pub fn classify(elevation: f64, sea_level: f64) -> Self {
        if elevation <= sea_level {
            Terrain::Water
        } else {
            Terrain::Land
        }
    }
}

/// 地图绘制用色
#[derive(Clone, Debug, PartialEq)]
pub struct MapPalette {
    pub background: Color32,
    pub outline: Color32,
    pub marker: Color32,
}

impl Default for MapPalette {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(0, 0, 0),
            outline: Color32::from_rgb(0, 255, 0),
            marker: Color32::from_rgb(255, 0, 0),
        }
    }
}

impl MapPalette {
    /// 单元格填充色
    ///
    /// - 水域: 高程加上 [`WATER_BRIGHTEN`] 后按 `(150, 150, 255)` 缩放
    /// - 陆地: 灰度 `(255, 255, 255)` 缩放
    pub fn terrain_color(&self, terrain: Terrain, elevation: f64) -> Color32 {
        match terrain {
            Terrain::Water => {
                let v = elevation + WATER_BRIGHTEN;
                Color32::from_rgb(channel(150.0 * v), channel(150.0 * v), channel(255.0 * v))
            }
            Terrain::Land => {
                let v = channel(255.0 * elevation);
                Color32::from_rgb(v, v, v)
            }
        }
    }
}

/// 截断到字节范围
fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
