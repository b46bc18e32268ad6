//! Voronoi 图生成模块
//!
//! 基于 Delaunay 三角剖分生成裁剪后的 Voronoi 单元格。
//! 每个站点的 Voronoi 区域等于它与所有 Delaunay 邻居的垂直平分线
//! 所围成的半平面交集；从裁剪矩形出发逐个半平面裁剪即可得到
//! 已经裁剪到边界内的凸多边形，无需单独处理无穷远的边界单元格。
//!
//! # 主要类型
//! - [`Cell`]: 一个站点对应的裁剪后多边形及其质心
//!
//! # 使用示例
//! ```ignore
//! use procedural::delaunay::voronoi::{tessellate, DEFAULT_TOLERANCE};
//! use procedural::geometry::Bounds;
//!
//! let bounds = Bounds::from_size(2048.0, 2048.0)?;
//! let cells = tessellate(&sites, &bounds, DEFAULT_TOLERANCE)?;
//! ```

use std::collections::HashMap;
use std::time::Instant;

use crate::delaunay::half_edge::DelaunayMesh;
use crate::error::{MapError, Result};
use crate::geometry::{
    clip_half_plane, merge_close_vertices, polygon_area, polygon_centroid, Bounds, Point,
};

/// 默认顶点合并精度（2048 画布上的 0.01 像素）
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Voronoi 单元格
///
/// 边界为闭合多边形，最后一个顶点隐式连回第一个顶点。
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 生成该单元格的站点在输入序列中的索引
    ///
    /// 重合的站点只保留第一次出现的那个。
    pub site_index: usize,
    /// 生成该单元格的站点
    pub site: Point,
    /// 裁剪后多边形的几何质心（不一定等于站点）
    pub centroid: Point,
    /// 多边形顶点，至少3个，全部位于裁剪矩形内
    pub boundary: Vec<Point>,
}

impl Cell {
    fn from_boundary(site_index: usize, site: Point, boundary: Vec<Point>) -> Self {
        let centroid = polygon_centroid(&boundary);
        Self {
            site_index,
            site,
            centroid,
            boundary,
        }
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.boundary)
    }

    pub fn vertex_count(&self) -> usize {
        self.boundary.len()
    }
}

// ============================================================================
// 公开 API
// ============================================================================

/// 计算裁剪到 `bounds` 内的 Voronoi 图
///
/// # 参数
/// - `sites`: 站点坐标
/// - `bounds`: 裁剪矩形
/// - `tolerance`: 站点去重与顶点合并的精度
///
/// # 返回值
/// 每个不同站点一个单元格，顺序与站点首次出现的顺序一致。
///
/// # 错误
/// - `DegenerateInput`: 站点为空，或去重后不同站点少于2个
/// - `InvalidArgument`: 精度或坐标不是有限值，或站点落在 `bounds` 之外超过 `tolerance`
///   （这样的站点裁剪后为空，无法得到单元格）
pub fn tessellate(sites: &[Point], bounds: &Bounds, tolerance: f64) -> Result<Vec<Cell>> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MapError::InvalidArgument(format!(
            "tolerance must be a non-negative finite number, got {tolerance}"
        )));
    }
    if sites.is_empty() {
        return Err(MapError::DegenerateInput(
            "cannot tessellate an empty site set".to_string(),
        ));
    }
    check_sites(sites, bounds, tolerance)?;

    let start_time = Instant::now();

    let distinct = distinct_site_indices(sites, tolerance);
    if distinct.len() < 2 {
        return Err(MapError::DegenerateInput(format!(
            "need at least 2 distinct sites, got {}",
            distinct.len()
        )));
    }

    let points: Vec<Point> = distinct.iter().map(|&i| sites[i]).collect();
    let mesh = DelaunayMesh::build(&points);

    // 全部共线时没有三角形，退回到与所有站点两两比较
    let neighbors: Vec<Vec<u32>> = if mesh.is_degenerate() {
        log::debug!("共线站点集合，使用全量邻居裁剪 ({} 个站点)", points.len());
        (0..points.len() as u32)
            .map(|i| (0..points.len() as u32).filter(|&j| j != i).collect())
            .collect()
    } else {
        mesh.neighbor_lists()
    };

    let mut cells = Vec::with_capacity(points.len());
    for (k, &site) in points.iter().enumerate() {
        let boundary = clip_cell(site, &neighbors[k], &points, bounds, tolerance);
        if boundary.len() < 3 {
            log::warn!(
                "站点 ({:.3}, {:.3}) 的单元格退化为 {} 个顶点，已丢弃",
                site.x,
                site.y,
                boundary.len()
            );
            continue;
        }
        cells.push(Cell::from_boundary(distinct[k], site, boundary));
    }

    log::debug!(
        "Voronoi 图生成完成: {} 站点 ({} 个不同), {} 三角形, {} 单元格, 耗时 {:.2?}",
        sites.len(),
        points.len(),
        mesh.triangle_count(),
        cells.len(),
        start_time.elapsed()
    );

    Ok(cells)
}

/// 与 [`tessellate`] 相同，但接受平凡输入
///
/// - 空站点集合返回空列表
/// - 所有站点重合时返回一个覆盖整个 `bounds` 的单元格
pub fn tessellate_or_trivial(
    sites: &[Point],
    bounds: &Bounds,
    tolerance: f64,
) -> Result<Vec<Cell>> {
    if sites.is_empty() {
        return Ok(Vec::new());
    }
    check_sites(sites, bounds, tolerance)?;
    if distinct_site_indices(sites, tolerance).len() == 1 {
        return Ok(vec![Cell::from_boundary(0, sites[0], bounds.corners())]);
    }
    tessellate(sites, bounds, tolerance)
}

// ============================================================================
// 内部实现
// ============================================================================

/// 站点必须是有限值，且不能落在 `bounds` 外超过 `tolerance`
fn check_sites(sites: &[Point], bounds: &Bounds, tolerance: f64) -> Result<()> {
    if let Some(bad) = sites.iter().find(|p| !p.is_finite()) {
        return Err(MapError::InvalidArgument(format!(
            "site ({}, {}) is not finite",
            bad.x, bad.y
        )));
    }
    let slack = if tolerance.is_finite() { tolerance.max(0.0) } else { 0.0 };
    if let Some(bad) = sites.iter().find(|p| {
        p.x < bounds.min_x - slack
            || p.x > bounds.max_x + slack
            || p.y < bounds.min_y - slack
            || p.y > bounds.max_y + slack
    }) {
        return Err(MapError::InvalidArgument(format!(
            "site ({}, {}) lies outside bounds [{}, {}] x [{}, {}]",
            bad.x, bad.y, bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
        )));
    }
    Ok(())
}

/// 去重用的站点键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SiteKey {
    /// 量化到精度网格
    Grid(i64, i64),
    /// 精度太小，网格坐标超出 i64 能精确表示的范围时按位比较
    Exact(u64, u64),
}

/// 2^53，f64 能精确表示的最大连续整数
const MAX_EXACT_GRID: f64 = 9_007_199_254_740_992.0;

fn site_key(p: Point, tolerance: f64) -> SiteKey {
    if tolerance > 0.0 {
        let gx = (p.x / tolerance).round();
        let gy = (p.y / tolerance).round();
        if gx.abs() < MAX_EXACT_GRID && gy.abs() < MAX_EXACT_GRID {
            return SiteKey::Grid(gx as i64, gy as i64);
        }
    }
    // 加 0.0 把 -0.0 归一成 0.0
    SiteKey::Exact((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// 按精度量化去重，返回每个不同站点首次出现的索引
fn distinct_site_indices(sites: &[Point], tolerance: f64) -> Vec<usize> {
    let mut seen: HashMap<SiteKey, usize> = HashMap::with_capacity(sites.len());
    let mut distinct = Vec::with_capacity(sites.len());

    for (i, &p) in sites.iter().enumerate() {
        if seen.insert(site_key(p, tolerance), i).is_none() {
            distinct.push(i);
        }
    }

    distinct
}

/// 从裁剪矩形出发，用与每个邻居的垂直平分线依次裁剪
fn clip_cell(
    site: Point,
    neighbors: &[u32],
    points: &[Point],
    bounds: &Bounds,
    tolerance: f64,
) -> Vec<Point> {
    let mut polygon = bounds.corners();
    for &n in neighbors {
        let other = points[n as usize];
        polygon = clip_half_plane(&polygon, site.midpoint(other), other - site);
        if polygon.is_empty() {
            break;
        }
    }

    let polygon = polygon.into_iter().map(|p| bounds.clamp(p)).collect();
    merge_close_vertices(polygon, tolerance)
}
