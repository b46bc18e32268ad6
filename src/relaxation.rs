//! Lloyd 松弛
//!
//! 每一轮都把站点替换为其 Voronoi 单元格的质心，使点分布趋于均匀。
//! 每一轮都是一次完整的重新剖分，循环固定执行 `iterations` 次，不做收敛判断。

use std::time::Instant;

use crate::delaunay::voronoi::tessellate_or_trivial;
use crate::error::{MapError, Result};
use crate::geometry::{Bounds, Point};

/// 对站点执行 `iterations` 轮 Lloyd 松弛
///
/// `iterations == 0` 原样返回输入。
///
/// # 错误
/// `iterations < 0` 时返回 `InvalidArgument`；剖分失败时原样传递其错误。
pub fn relax(
    sites: Vec<Point>,
    bounds: &Bounds,
    iterations: i32,
    tolerance: f64,
) -> Result<Vec<Point>> {
    let iterations = usize::try_from(iterations).map_err(|_| {
        MapError::InvalidArgument(format!(
            "iteration count must be non-negative, got {iterations}"
        ))
    })?;

    let mut sites = sites;
    for iteration in 0..iterations {
        let iter_start = Instant::now();
        sites = tessellate_or_trivial(&sites, bounds, tolerance)?
            .into_iter()
            .map(|cell| bounds.clamp(cell.centroid))
            .collect();
        log::debug!(
            "Lloyd 第 {} 轮: {} 个站点, 耗时 {:.2?}",
            iteration + 1,
            sites.len(),
            iter_start.elapsed()
        );
    }

    Ok(sites)
}
