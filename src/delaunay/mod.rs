//! Delaunay 三角剖分与 Voronoi 图模块
//!
//! 本模块提供地图几何基础的核心算法：
//! - **Delaunay 三角剖分**: 由 `delaunator` 完成，封装为半边网格
//! - **Voronoi 图**: Delaunay 的对偶图，裁剪到画布矩形内
//!
//! # 架构概览
//!
//! ```text
//! 站点 (Vec<Point>)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │ DelaunayMesh::build  │  ── Delaunay 三角剖分 + 邻接关系
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │     tessellate()     │  ── 半平面裁剪得到每个单元格
//! └──────────┬───────────┘
//!            │
//!            ▼
//!       Vec<Cell>
//! ```
//!
//! # 模块结构
//!
//! - `half_edge`: 半边网格与邻居查询
//! - `voronoi`: 裁剪 Voronoi 图生成

pub mod half_edge;
pub mod voronoi;


pub use half_edge::DelaunayMesh;
pub use voronoi::{tessellate, tessellate_or_trivial, Cell, DEFAULT_TOLERANCE};
