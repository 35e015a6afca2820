use crate::Point2D;

pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x2 - x1).powf(2.0) + (y2 - y1).powf(2.0)).sqrt()
}

pub fn distance_points(a: &Point2D, b: &Point2D) -> f32 {
    let (x1, y1) = *a;
    let (x2, y2) = *b;

    f32::sqrt(f32::powi(x1 - x2, 2) + f32::powi(y1 - y2, 2))
}

pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
    let count = points.len();
    points
        .iter()
        .cloned()
        .reduce(|acc, el| (acc.0 + el.0, acc.1 + el.1))
        .map(|(x, y)| (x / count as f32, y / count as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_axis_aligned() {
        assert_eq!(distance(0., 0., 3., 0.), 3.);
        assert_eq!(distance(0., 0., 0., -4.), 4.);
        assert_eq!(distance(1., 1., 4., 5.), 5.);
        assert_eq!(distance_points(&(1., 1.), &(4., 5.)), 5.);
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(&[]), None);
        assert_eq!(centroid(&[(2., -2.)]), Some((2., -2.)));
        assert_eq!(centroid(&[(-1., 0.), (1., 4.)]), Some((0., 2.)));
    }
}
