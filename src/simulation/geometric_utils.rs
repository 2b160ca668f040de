//! Geometric helpers for sensor rays and wall collisions.

use geo::algorithm::Distance;
use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Euclidean, Line, Point};
use ndarray::Array1;

/// Converts a 2-D position vector into a point.
pub fn to_point(v: &Array1<f32>) -> Point<f32> {
    Point::new(v[0], v[1])
}

/// Distance from `origin` to the first point where a ray hits `wall`.
///
/// # Arguments
///
/// * `origin` - Start of the ray
/// * `direction` - Unit direction of the ray
/// * `range` - Maximum ray length
/// * `wall` - Wall segment to test against
///
/// # Returns
///
/// `None` if the wall is not hit within `range`.
pub fn ray_wall_distance(
    origin: Point<f32>,
    direction: (f32, f32),
    range: f32,
    wall: &Line<f32>,
) -> Option<f32> {
    let end = Point::new(
        origin.x() + direction.0 * range,
        origin.y() + direction.1 * range,
    );
    let ray = Line::new(origin, end);

    match line_intersection(ray, *wall)? {
        LineIntersection::SinglePoint { intersection, .. } => {
            Some(coord_distance(origin, intersection))
        }
        LineIntersection::Collinear { intersection } => {
            let near = coord_distance(origin, intersection.start);
            Some(near.min(coord_distance(origin, intersection.end)))
        }
    }
}

/// Nearest wall hit along a ray, or `range` when nothing is hit.
pub fn cast_ray(
    origin: Point<f32>,
    direction: (f32, f32),
    range: f32,
    walls: &[Line<f32>],
) -> f32 {
    walls
        .iter()
        .filter_map(|wall| ray_wall_distance(origin, direction, range, wall))
        .fold(range, f32::min)
}

/// Minimum distance between a point and a wall segment.
pub fn point_wall_distance(point: Point<f32>, wall: &Line<f32>) -> f32 {
    Euclidean.distance(&point, wall)
}

/// True if the segment from `from` to `to` touches any wall.
pub fn path_crosses_walls(from: Point<f32>, to: Point<f32>, walls: &[Line<f32>]) -> bool {
    let path = Line::new(from, to);
    walls
        .iter()
        .any(|wall| line_intersection(path, *wall).is_some())
}

fn coord_distance(origin: Point<f32>, target: Coord<f32>) -> f32 {
    (target.x - origin.x()).hypot(target.y - origin.y())
}
