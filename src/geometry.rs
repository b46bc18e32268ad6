//! 平面几何基础类型
//!
//! - [`Point`]: 双精度二维点
//! - [`Bounds`]: 轴对齐矩形，整个生成过程的裁剪范围
//! - 凸多边形工具：面积、质心、半平面裁剪、近邻顶点合并

use std::ops::{Add, Mul, Sub};

use crate::error::{MapError, Result};

/// 二维点（值类型，仅由坐标决定）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn distance_sq(self, other: Point) -> f64 {
        let d = self - other;
        d.dot(d)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// 轴对齐矩形 `(min_x, min_y, max_x, max_y)`
///
/// 一次生成过程中固定不变（即画布尺寸）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// 创建矩形，要求四个值有限且宽高为正
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || max_x <= min_x || max_y <= min_y {
            return Err(MapError::InvalidArgument(format!(
                "bounds ({min_x}, {min_y}, {max_x}, {max_y}) must be finite with positive extent"
            )));
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// 以原点为左上角的画布矩形
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() * 0.5,
            self.min_y + self.height() * 0.5,
        )
    }

    /// 闭区间包含判断
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// 将点夹到矩形内，用于消除裁剪交点的浮点误差
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        )
    }

    /// 矩形四个角，顺序与坐标轴方向一致地绕行一周
    pub fn corners(&self) -> Vec<Point> {
        vec![
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

// ============================================================================
// 多边形工具
// ============================================================================

/// 有向面积（鞋带公式），绕行方向决定符号
pub fn signed_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.cross(b);
    }
    sum * 0.5
}

pub fn polygon_area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// 多边形面积加权质心
///
/// 面积为零的退化多边形返回顶点均值。
pub fn polygon_centroid(polygon: &[Point]) -> Point {
    if polygon.is_empty() {
        return Point::default();
    }

    // 以第一个顶点为局部原点，减小大坐标下的抵消误差
    let origin = polygon[0];
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i] - origin;
        let b = polygon[(i + 1) % polygon.len()] - origin;
        let cross = a.cross(b);
        area2 += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if area2.abs() < f64::EPSILON {
        let n = polygon.len() as f64;
        let sum = polygon.iter().fold(Point::default(), |acc, &p| acc + p);
        return Point::new(sum.x / n, sum.y / n);
    }

    Point::new(origin.x + cx / (3.0 * area2), origin.y + cy / (3.0 * area2))
}

/// 用半平面 `{p | (p - origin)·normal <= 0}` 裁剪凸多边形（Sutherland–Hodgman）
pub fn clip_half_plane(polygon: &[Point], origin: Point, normal: Point) -> Vec<Point> {
    if polygon.is_empty() {
        return Vec::new();
    }

    let side = |p: Point| (p - origin).dot(normal);
    let mut output = Vec::with_capacity(polygon.len() + 1);

    let mut prev = polygon[polygon.len() - 1];
    let mut prev_side = side(prev);
    for &current in polygon {
        let current_side = side(current);
        if current_side <= 0.0 {
            if prev_side > 0.0 {
                output.push(intersect(prev, current, prev_side, current_side));
            }
            output.push(current);
        } else if prev_side <= 0.0 {
            output.push(intersect(prev, current, prev_side, current_side));
        }
        prev = current;
        prev_side = current_side;
    }

    output
}

fn intersect(a: Point, b: Point, side_a: f64, side_b: f64) -> Point {
    let t = side_a / (side_a - side_b);
    a + (b - a) * t
}

/// 合并距离小于 `tolerance` 的相邻顶点（含首尾相接的一对）
pub fn merge_close_vertices(polygon: Vec<Point>, tolerance: f64) -> Vec<Point> {
    let tol_sq = tolerance * tolerance;
    let mut merged: Vec<Point> = Vec::with_capacity(polygon.len());
    for p in polygon {
        match merged.last() {
            Some(&last) if last.distance_sq(p) <= tol_sq => {}
            _ => merged.push(p),
        }
    }
    while merged.len() > 1 && merged[0].distance_sq(merged[merged.len() - 1]) <= tol_sq {
        merged.pop();
    }
    merged
}
