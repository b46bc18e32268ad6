//! 随机站点采样

use rand::Rng;

use crate::error::{MapError, Result};
use crate::geometry::{Bounds, Point};

/// 在 `bounds` 内均匀采样 `count` 个点
///
/// 每个坐标独立均匀分布于 `[min, max)`。除推进 `rng` 外没有副作用。
///
/// # 错误
/// `count < 0` 时返回 `InvalidArgument`
pub fn sample_points<R: Rng>(
    bounds: &Bounds,
    count: i32,
    rng: &mut R,
) -> Result<Vec<Point>> {
    let count = usize::try_from(count).map_err(|_| {
        MapError::InvalidArgument(format!("point count must be non-negative, got {count}"))
    })?;

    let points = (0..count)
        .map(|_| {
            Point::new(
                rng.random_range(bounds.min_x..bounds.max_x),
                rng.random_range(bounds.min_y..bounds.max_y),
            )
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_count_and_bounds() {
        let bounds = Bounds::new(-10.0, 5.0, 30.0, 25.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for count in [0, 1, 17, 1000] {
            let points = sample_points(&bounds, count, &mut rng).unwrap();
            assert_eq!(points.len(), count as usize);
            for p in &points {
                assert!(p.x >= bounds.min_x && p.x < bounds.max_x);
                assert!(p.y >= bounds.min_y && p.y < bounds.max_y);
            }
        }
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let bounds = Bounds::from_size(10.0, 10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_points(&bounds, -1, &mut rng),
            Err(MapError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_seed_determinism() {
        let bounds = Bounds::from_size(2048.0, 2048.0).unwrap();
        let a = sample_points(&bounds, 50, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = sample_points(&bounds, 50, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_points_cover_bounds() {
        // 大量采样时四个象限都应该有点
        let bounds = Bounds::from_size(100.0, 100.0).unwrap();
        let points = sample_points(&bounds, 400, &mut StdRng::seed_from_u64(3)).unwrap();
        let center = bounds.center();
        let mut quadrants = [0usize; 4];
        for p in points {
            let q = (p.x >= center.x) as usize + 2 * (p.y >= center.y) as usize;
            quadrants[q] += 1;
        }
        assert!(quadrants.iter().all(|&n| n > 50), "{:?}", quadrants);
    }
}
