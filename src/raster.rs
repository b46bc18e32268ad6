//! 光栅画布
//!
//! [`Surface`] 是地图渲染唯一依赖的绘图接口；[`PixelCanvas`] 是它基于
//! `image::RgbaImage` 的内存实现，绘图交给 `imageproc`，结果可直接上传为
//! egui 纹理。
//!
//! 像素 `(px, py)` 覆盖区域 `[px, px+1) × [py, py+1)`，坐标先向下取整到所在像素
//! 再交给 `imageproc`。多边形填充包含边界像素，超出画布的部分被裁掉。

use egui::{Color32, ColorImage};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};

use crate::error::{MapError, Result};
use crate::geometry::Point;

/// 二维绘图表面
pub trait Surface {
    /// `[width, height]`，单位像素
    fn size(&self) -> [usize; 2];

    /// 整个表面填充为同一颜色
    fn clear(&mut self, color: Color32);

    /// 填充多边形内部及其边界
    fn fill_polygon(&mut self, polygon: &[Point], color: Color32);

    /// 沿折线描边；`closed` 时最后一个点连回第一个点
    fn stroke_polyline(&mut self, points: &[Point], closed: bool, color: Color32);

    /// 填充圆形
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color32);
}

/// RGBA8888 像素画布
#[derive(Clone, PartialEq)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCanvas")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish_non_exhaustive()
    }
}

fn rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_array())
}

/// 连续坐标所在的像素
fn pixel_point(p: Point) -> imageproc::point::Point<i32> {
    imageproc::point::Point::new(p.x.floor() as i32, p.y.floor() as i32)
}

fn pixel_coords(p: Point) -> (f32, f32) {
    (p.x.floor() as f32, p.y.floor() as f32)
}

impl PixelCanvas {
    /// 创建全透明画布
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let dimensions = u32::try_from(width).ok().zip(u32::try_from(height).ok());
        match dimensions {
            Some((w, h)) if w > 0 && h > 0 => Ok(Self {
                image: RgbaImage::new(w, h),
            }),
            _ => Err(MapError::InvalidArgument(format!(
                "canvas must have positive dimensions, got {width}x{height}"
            ))),
        }
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color32> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.image
            .get_pixel_checked(x, y)
            .map(|&Rgba([r, g, b, a])| Color32::from_rgba_premultiplied(r, g, b, a))
    }

    /// 按行优先顺序遍历所有像素
    pub fn pixels(&self) -> impl Iterator<Item = Color32> + '_ {
        let texels: &[[u8; 4]] = bytemuck::cast_slice(self.image.as_raw());
        texels
            .iter()
            .map(|&[r, g, b, a]| Color32::from_rgba_premultiplied(r, g, b, a))
    }

    /// 行优先的原始 RGBA 字节
    pub fn as_rgba_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// 转换为 egui 图像以便上传纹理
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied([self.width(), self.height()], self.as_rgba_bytes())
    }

    fn put(&mut self, p: Point, color: Color32) {
        let (x, y) = (p.x.floor(), p.y.floor());
        if x < 0.0 || y < 0.0 {
            return;
        }
        if let Some(pixel) = self.image.get_pixel_mut_checked(x as u32, y as u32) {
            *pixel = rgba(color);
        }
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> [usize; 2] {
        [self.width(), self.height()]
    }

    fn clear(&mut self, color: Color32) {
        let color = rgba(color);
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    fn fill_polygon(&mut self, polygon: &[Point], color: Color32) {
        if !polygon.iter().all(|p| p.is_finite()) {
            return;
        }

        // imageproc 要求相邻顶点不重复且首尾不相同
        let mut vertices: Vec<imageproc::point::Point<i32>> = Vec::with_capacity(polygon.len());
        for &p in polygon {
            let v = pixel_point(p);
            if vertices.last() != Some(&v) {
                vertices.push(v);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        match vertices.len() {
            0 => {}
            1 => self.put(polygon[0], color),
            _ => draw_polygon_mut(&mut self.image, &vertices, rgba(color)),
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, color: Color32) {
        if !points.iter().all(|p| p.is_finite()) {
            return;
        }
        if let [only] = points {
            self.put(*only, color);
            return;
        }
        let color = rgba(color);
        for pair in points.windows(2) {
            draw_line_segment_mut(
                &mut self.image,
                pixel_coords(pair[0]),
                pixel_coords(pair[1]),
                color,
            );
        }
        if closed && points.len() > 2 {
            draw_line_segment_mut(
                &mut self.image,
                pixel_coords(points[points.len() - 1]),
                pixel_coords(points[0]),
                color,
            );
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color32) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let c = pixel_point(center);
        draw_filled_circle_mut(&mut self.image, (c.x, c.y), radius.round() as i32, rgba(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(canvas: &PixelCanvas, color: Color32) -> usize {
        canvas.pixels().filter(|&c| c == color).count()
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(PixelCanvas::new(0, 10).is_err());
        assert!(PixelCanvas::new(10, 0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut canvas = PixelCanvas::new(8, 4).unwrap();
        canvas.clear(Color32::from_rgb(1, 2, 3));
        assert_eq!(count(&canvas, Color32::from_rgb(1, 2, 3)), 32);
        assert_eq!(&canvas.as_rgba_bytes()[..4], &[1, 2, 3, 255]);
        assert_eq!(canvas.as_rgba_bytes().len(), 8 * 4 * 4);
        assert_eq!(canvas.size(), [8, 4]);
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn test_fill_rectangle_includes_edges() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.clear(Color32::BLACK);
        let rect = vec![
            Point::new(2.0, 3.0),
            Point::new(6.0, 3.0),
            Point::new(6.0, 8.0),
            Point::new(2.0, 8.0),
        ];
        canvas.fill_polygon(&rect, Color32::WHITE);

        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..=6).contains(&x) && (3..=8).contains(&y);
                let expected = if inside { Color32::WHITE } else { Color32::BLACK };
                assert_eq!(canvas.pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_fill_triangle_leaves_far_pixels_untouched() {
        let mut canvas = PixelCanvas::new(20, 20).unwrap();
        canvas.clear(Color32::BLACK);
        let triangle = vec![
            Point::new(0.0, 0.0),
            Point::new(19.0, 0.0),
            Point::new(0.0, 15.0),
        ];
        canvas.fill_polygon(&triangle, Color32::WHITE);

        // 到斜边 15x + 19y = 285 的距离超过 1.5 像素的点必须确定
        let norm = (15.0f64 * 15.0 + 19.0 * 19.0).sqrt();
        for y in 0..20 {
            for x in 0..20 {
                let d = (285.0 - 15.0 * x as f64 - 19.0 * y as f64) / norm;
                if d > 1.5 {
                    assert_eq!(canvas.pixel(x, y), Some(Color32::WHITE), "pixel ({x}, {y})");
                } else if d < -1.5 {
                    assert_eq!(canvas.pixel(x, y), Some(Color32::BLACK), "pixel ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_adjacent_polygons_leave_no_gaps() {
        let mut canvas = PixelCanvas::new(16, 16).unwrap();
        canvas.clear(Color32::BLACK);
        let left = vec![
            Point::new(0.0, 0.0),
            Point::new(7.3, 0.0),
            Point::new(9.1, 15.9),
            Point::new(0.0, 15.9),
        ];
        let right = vec![
            Point::new(7.3, 0.0),
            Point::new(15.9, 0.0),
            Point::new(15.9, 15.9),
            Point::new(9.1, 15.9),
        ];
        canvas.fill_polygon(&left, Color32::RED);
        canvas.fill_polygon(&right, Color32::BLUE);

        assert_eq!(count(&canvas, Color32::BLACK), 0);
        assert_eq!(canvas.pixel(0, 8), Some(Color32::RED));
        assert_eq!(canvas.pixel(15, 8), Some(Color32::BLUE));
    }

    #[test]
    fn test_polygon_clipped_to_canvas() {
        let mut canvas = PixelCanvas::new(4, 4).unwrap();
        let huge = vec![
            Point::new(-100.0, -100.0),
            Point::new(100.0, -100.0),
            Point::new(100.0, 100.0),
            Point::new(-100.0, 100.0),
        ];
        canvas.fill_polygon(&huge, Color32::WHITE);
        assert_eq!(count(&canvas, Color32::WHITE), 16);
    }

    #[test]
    fn test_degenerate_polygons_do_not_panic() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.clear(Color32::BLACK);

        // 显式闭合的多边形
        let closed = vec![
            Point::new(1.0, 1.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 5.0),
            Point::new(1.0, 1.0),
        ];
        canvas.fill_polygon(&closed, Color32::WHITE);
        assert_eq!(canvas.pixel(4, 2), Some(Color32::WHITE));

        // 整个多边形落在同一像素内
        let speck = vec![
            Point::new(7.1, 7.1),
            Point::new(7.4, 7.2),
            Point::new(7.2, 7.6),
        ];
        canvas.fill_polygon(&speck, Color32::RED);
        assert_eq!(canvas.pixel(7, 7), Some(Color32::RED));
        assert_eq!(count(&canvas, Color32::RED), 1);

        canvas.fill_polygon(&[], Color32::RED);
        assert_eq!(count(&canvas, Color32::RED), 1);
    }

    #[test]
    fn test_stroke_closed_polyline() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.clear(Color32::BLACK);
        let square = vec![
            Point::new(1.5, 1.5),
            Point::new(7.5, 1.5),
            Point::new(7.5, 7.5),
            Point::new(1.5, 7.5),
        ];
        canvas.stroke_polyline(&square, true, Color32::GREEN);

        // 7x7 像素方框的边
        assert_eq!(count(&canvas, Color32::GREEN), 24);
        assert_eq!(canvas.pixel(1, 4), Some(Color32::GREEN));
        assert_eq!(canvas.pixel(4, 4), Some(Color32::BLACK));
    }

    #[test]
    fn test_open_polyline_does_not_close() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.clear(Color32::BLACK);
        let path = vec![Point::new(0.5, 0.5), Point::new(5.5, 0.5), Point::new(5.5, 5.5)];
        canvas.stroke_polyline(&path, false, Color32::GREEN);
        assert_eq!(canvas.pixel(2, 2), Some(Color32::BLACK));
        assert_eq!(count(&canvas, Color32::GREEN), 11);
    }

    #[test]
    fn test_stroke_clipped_to_canvas() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.clear(Color32::BLACK);
        let path = vec![Point::new(-10.0, -10.0), Point::new(20.0, 20.0)];
        canvas.stroke_polyline(&path, false, Color32::GREEN);
        assert_eq!(canvas.pixel(0, 0), Some(Color32::GREEN));
        assert_eq!(canvas.pixel(9, 9), Some(Color32::GREEN));
        assert_eq!(count(&canvas, Color32::GREEN), 10);
    }

    #[test]
    fn test_fill_circle() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.clear(Color32::BLACK);
        canvas.fill_circle(Point::new(5.4, 5.6), 2.0, Color32::RED);

        for (x, y) in [(5, 5), (3, 5), (7, 5), (5, 3), (5, 7), (4, 4), (6, 6)] {
            assert_eq!(canvas.pixel(x, y), Some(Color32::RED), "pixel ({x}, {y})");
        }
        assert_eq!(canvas.pixel(2, 2), Some(Color32::BLACK));
        assert_eq!(canvas.pixel(8, 8), Some(Color32::BLACK));
        let red = count(&canvas, Color32::RED);
        assert!((9..=25).contains(&red), "{red} pixels");
    }

    #[test]
    fn test_color_image_matches_canvas() {
        let mut canvas = PixelCanvas::new(3, 2).unwrap();
        canvas.clear(Color32::from_rgb(10, 20, 30));
        let image = canvas.to_color_image();
        assert_eq!(image.size, [3, 2]);
        assert!(image.pixels.iter().all(|&c| c == Color32::from_rgb(10, 20, 30)));
    }
}
