//! 半边数据结构 (Half-Edge / DCEL)
//!
//! 对 `delaunator` 三角剖分结果的薄封装，为 Voronoi 裁剪提供邻接查询。
//!
//! ```text
//!        传统边                    半边表示
//!
//!     A ←──────→ B           A ─────→ B   (半边 e1)
//!                            A ←───── B   (半边 e2，e1 的 twin)
//! ```
//!
//! # 与 delaunator 的关系
//! - `triangles[i]` = 半边 i 的起点
//! - `halfedges[i]` = 半边 i 的对偶半边（twin）
//! - 三角形 t 的三条半边索引为 `3*t`, `3*t+1`, `3*t+2`

use crate::geometry::Point;

/// 无效索引标记（对应 delaunator::EMPTY）
pub const EMPTY: u32 = u32::MAX;

/// Delaunay 网格（半边表示）
#[derive(Debug, Clone, Default)]
pub struct DelaunayMesh {
    /// 顶点数量（与输入点一一对应）
    point_count: usize,

    /// 半边数组：halfedges[i] 存储半边 i 的对偶半边索引
    /// 如果 halfedges[i] == EMPTY，则半边 i 在凸包边界上
    pub halfedges: Vec<u32>,

    /// 三角形顶点索引：triangles[i] 是半边 i 的起点
    pub triangles: Vec<u32>,

    /// 凸包顶点索引
    pub hull: Vec<u32>,
}

impl DelaunayMesh {
    /// 对点集做 Delaunay 三角剖分并构建半边网格
    ///
    /// 点集全部共线时 delaunator 不产生三角形，此时网格为空，
    /// 由调用方决定退化处理方式（见 [`DelaunayMesh::is_degenerate`]）。
    pub fn build(points: &[Point]) -> Self {
        let delaunay_points: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();
        let triangulation = delaunator::triangulate(&delaunay_points);
        Self::from_delaunator(points.len(), &triangulation)
    }

    /// 从 delaunator 结果构建半边网格
    pub fn from_delaunator(point_count: usize, triangulation: &delaunator::Triangulation) -> Self {
        let triangles: Vec<u32> = triangulation.triangles.iter().map(|&i| i as u32).collect();

        let halfedges: Vec<u32> = triangulation
            .halfedges
            .iter()
            .map(|&i| {
                if i == delaunator::EMPTY {
                    EMPTY
                } else {
                    i as u32
                }
            })
            .collect();

        let hull: Vec<u32> = triangulation.hull.iter().map(|&i| i as u32).collect();

        Self {
            point_count,
            halfedges,
            triangles,
            hull,
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[inline]
    pub fn halfedge_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// 没有任何三角形（少于三个点或全部共线）
    pub fn is_degenerate(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn halfedge_start(&self, he: u32) -> u32 {
        self.triangles[he as usize]
    }

    #[inline]
    pub fn halfedge_end(&self, he: u32) -> u32 {
        self.triangles[Self::next_halfedge(he) as usize]
    }

    #[inline]
    pub fn twin(&self, he: u32) -> u32 {
        self.halfedges[he as usize]
    }

    /// 同一三角形内的下一条半边
    #[inline]
    pub fn next_halfedge(he: u32) -> u32 {
        if he % 3 == 2 {
            he - 2
        } else {
            he + 1
        }
    }

    #[inline]
    pub fn is_boundary(&self, he: u32) -> bool {
        self.halfedges[he as usize] == EMPTY
    }

    /// 每个顶点的 Delaunay 邻居列表
    ///
    /// 邻居即 Voronoi 单元格共享一条边的站点。内部边会被两条半边各访问一次，
    /// 边界边只有一条半边，所以两个方向都要登记。
    pub fn neighbor_lists(&self) -> Vec<Vec<u32>> {
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); self.point_count];

        for he in 0..self.halfedge_count() as u32 {
            let twin = self.twin(he);
            if twin != EMPTY && twin < he {
                continue;
            }
            let a = self.halfedge_start(he);
            let b = self.halfedge_end(he);
            neighbors[a as usize].push(b);
            neighbors[b as usize].push(a);
        }

        for list in neighbors.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mesh() -> DelaunayMesh {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        DelaunayMesh::build(&points)
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = square_mesh();

        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.triangle_count(), 2); // 正方形分成2个三角形
        assert_eq!(mesh.halfedge_count(), 6);
        assert_eq!(mesh.hull.len(), 4);
        assert!(!mesh.is_degenerate());
    }

    #[test]
    fn test_halfedge_navigation() {
        assert_eq!(DelaunayMesh::next_halfedge(0), 1);
        assert_eq!(DelaunayMesh::next_halfedge(1), 2);
        assert_eq!(DelaunayMesh::next_halfedge(2), 0);
        assert_eq!(DelaunayMesh::next_halfedge(3), 4);
    }

    #[test]
    fn test_square_boundary_edges() {
        let mesh = square_mesh();
        let boundary = (0..mesh.halfedge_count() as u32)
            .filter(|&he| mesh.is_boundary(he))
            .count();
        // 四条外边 + 一条对角线（两条半边）
        assert_eq!(boundary, 4);
    }

    #[test]
    fn test_square_neighbors() {
        let mesh = square_mesh();
        let neighbors = mesh.neighbor_lists();

        // 对角线连接的两个顶点各有3个邻居，另外两个各有2个
        let mut degrees: Vec<usize> = neighbors.iter().map(|n| n.len()).collect();
        degrees.sort_unstable();
        assert_eq!(degrees, vec![2, 2, 3, 3]);

        // 邻接关系对称
        for (v, list) in neighbors.iter().enumerate() {
            for &u in list {
                assert!(neighbors[u as usize].contains(&(v as u32)));
            }
        }
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        let mesh = DelaunayMesh::build(&points);
        assert!(mesh.is_degenerate());
        assert!(mesh.neighbor_lists().iter().all(|n| n.is_empty()));
    }

    #[test]
    fn test_grid_neighbors() {
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                points.push(Point::new(i as f64 * 10.0, j as f64 * 10.0));
            }
        }
        let mesh = DelaunayMesh::build(&points);
        let neighbors = mesh.neighbor_lists();

        assert_eq!(neighbors.len(), 25);
        for (v, list) in neighbors.iter().enumerate() {
            assert!(list.len() >= 2, "顶点 {} 应该至少有两个邻居", v);
        }
    }
}
