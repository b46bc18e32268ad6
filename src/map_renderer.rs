//! 地图生成流程编排
//!
//! ```text
//! sample_points ──▶ relax ──▶ tessellate ──▶ 逐单元格采样高程 ──▶ 光栅化
//! ```
//!
//! 状态机只有 `Idle → Generating → Idle`，一次生成在调用线程上同步完成。
//! 任何一步失败都会中止本次生成并把错误交给调用方，渲染器随后回到
//! `Idle`，可以立即接受下一次请求。

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{CanvasConfig, GenerationParameters};
use crate::delaunay::voronoi::{tessellate_or_trivial, Cell};
use crate::error::{MapError, Result};
use crate::raster::{PixelCanvas, Surface};
use crate::relaxation::relax;
use crate::rendering::{MapPalette, Terrain};
use crate::sampling::sample_points;
use crate::terrain::elevation::ElevationSampler;
use crate::terrain::noise::NoiseSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Idle,
    Generating,
}

/// 着色后的单元格
#[derive(Debug, Clone, PartialEq)]
pub struct MapCell {
    pub cell: Cell,
    /// 归一化高程 [0, 1]
    pub elevation: f64,
    pub terrain: Terrain,
}

/// 一次生成的结果
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub image: PixelCanvas,
    pub cells: Vec<MapCell>,
    /// 整个生成过程的耗时
    pub elapsed: Duration,
    /// 本次生成所有单元格共用的噪声种子
    pub noise_seed: i32,
}

impl GeneratedMap {
    pub fn land_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.terrain == Terrain::Land)
            .count()
    }

    pub fn water_cells(&self) -> usize {
        self.cells.len() - self.land_cells()
    }

    /// 水域单元格占比；没有单元格时为 0
    pub fn water_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.water_cells() as f64 / self.cells.len() as f64
    }
}

/// 由墙上时钟派生的种子
pub fn clock_seed() -> i32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i32)
        .unwrap_or_default()
}

/// 地图渲染器
///
/// 持有随机数生成器，站点采样都从这里取随机数。同一时间只能进行一次生成
/// （`&mut self` 保证）。
pub struct MapRenderer {
    canvas: CanvasConfig,
    palette: MapPalette,
    rng: StdRng,
    state: RendererState,
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl MapRenderer {
    /// 用当前时间为随机数生成器播种
    pub fn new(canvas: CanvasConfig) -> Self {
        Self::with_seed(canvas, clock_seed() as u64)
    }

    /// 固定种子，便于复现
    pub fn with_seed(canvas: CanvasConfig, seed: u64) -> Self {
        Self {
            canvas,
            palette: MapPalette::default(),
            rng: StdRng::seed_from_u64(seed),
            state: RendererState::Idle,
        }
    }

    pub fn with_palette(mut self, palette: MapPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    /// 生成一张新地图
    ///
    /// 噪声种子取自当前时间，每次生成只取一次。
    pub fn regenerate<N: NoiseSource + ?Sized>(
        &mut self,
        params: &GenerationParameters,
        noise: &N,
    ) -> Result<GeneratedMap> {
        let start = Instant::now();
        let noise_seed = clock_seed();

        let mut image = PixelCanvas::new(self.canvas.width, self.canvas.height)?;
        let cells = self.render(params, noise, noise_seed, &mut image)?;

        let elapsed = start.elapsed();
        log::info!(
            "Generated {} cells ({} points, {} iterations) in {:.2?}",
            cells.len(),
            params.point_count,
            params.iteration_count,
            elapsed
        );

        Ok(GeneratedMap {
            image,
            cells,
            elapsed,
            noise_seed,
        })
    }

    /// 在给定表面上执行完整流程
    pub fn render<S, N>(
        &mut self,
        params: &GenerationParameters,
        noise: &N,
        noise_seed: i32,
        surface: &mut S,
    ) -> Result<Vec<MapCell>>
    where
        S: Surface + ?Sized,
        N: NoiseSource + ?Sized,
    {
        self.state = RendererState::Generating;
        let result = self.run(params, noise, noise_seed, surface);
        self.state = RendererState::Idle;

        if let Err(err) = &result {
            log::warn!("Generation aborted: {err}");
        }
        result
    }

    fn run<S, N>(
        &mut self,
        params: &GenerationParameters,
        noise: &N,
        noise_seed: i32,
        surface: &mut S,
    ) -> Result<Vec<MapCell>>
    where
        S: Surface + ?Sized,
        N: NoiseSource + ?Sized,
    {
        params.validate()?;
        let expected = [self.canvas.width, self.canvas.height];
        if surface.size() != expected {
            return Err(MapError::InvalidArgument(format!(
                "surface is {:?} but the canvas is configured as {:?}",
                surface.size(),
                expected
            )));
        }
        let bounds = self.canvas.bounds()?;
        let tolerance = self.canvas.tolerance;
        let sampler =
            ElevationSampler::new(&bounds, params.frequency, params.noise_min, params.noise_max)?;

        surface.clear(self.palette.background);

        let stage = Instant::now();
        let sites = sample_points(&bounds, params.point_count, &mut self.rng)?;
        let sites = relax(sites, &bounds, params.iteration_count, tolerance)?;
        let cells = tessellate_or_trivial(&sites, &bounds, tolerance)?;
        log::debug!(
            "站点采样与松弛完成: {} 个单元格, 耗时 {:.2?}",
            cells.len(),
            stage.elapsed()
        );

        let stage = Instant::now();
        let map_cells: Vec<MapCell> = cells
            .into_iter()
            .map(|cell| {
                let elevation = sampler.elevation(cell.centroid, noise_seed, noise);
                let terrain = Terrain::classify(elevation, params.sea_level);
                MapCell {
                    cell,
                    elevation,
                    terrain,
                }
            })
            .collect();

        // 分层绘制：填充、线框、质心标记，后画的层不会被前一层覆盖
        for map_cell in &map_cells {
            let color = self
                .palette
                .terrain_color(map_cell.terrain, map_cell.elevation);
            surface.fill_polygon(&map_cell.cell.boundary, color);
        }
        for map_cell in &map_cells {
            surface.stroke_polyline(&map_cell.cell.boundary, true, self.palette.outline);
        }
        for map_cell in &map_cells {
            surface.fill_circle(
                map_cell.cell.centroid,
                self.canvas.marker_radius,
                self.palette.marker,
            );
        }
        log::debug!("光栅化完成, 耗时 {:.2?}", stage.elapsed());

        Ok(map_cells)
    }
}
