//! Headless circuit the vehicle is evaluated on.
//!
//! A track is a set of wall segments plus a start pose. The built-in oval is
//! two concentric ellipses approximated by polylines.

use std::f32::consts::{FRAC_PI_2, TAU};

use geo::{Line, Point};
use ndarray::{Array1, array};

use super::error::{Error, Result};

/// Wall segments and the pose every run starts from.
#[derive(Debug, Clone)]
pub struct Track {
    walls: Vec<Line<f32>>,
    start: Array1<f32>,
    start_heading: f32,
}

impl Track {
    /// Builds a track from explicit walls.
    pub fn from_walls(walls: Vec<Line<f32>>, start: Array1<f32>, start_heading: f32) -> Self {
        Self {
            walls,
            start,
            start_heading,
        }
    }

    /// Builds an oval circuit between an inner and an outer ellipse.
    ///
    /// The car starts on the +x axis midway between the walls, heading
    /// counter-clockwise along the lane.
    pub fn oval(
        center: (f32, f32),
        inner_radii: (f32, f32),
        outer_radii: (f32, f32),
        segments: usize,
    ) -> Result<Self> {
        if segments < 3 {
            return Err(Error::InvalidConfiguration(format!(
                "an oval needs at least 3 segments, got {segments}"
            )));
        }
        let radii_ok = inner_radii.0 > 0.0
            && inner_radii.1 > 0.0
            && inner_radii.0 < outer_radii.0
            && inner_radii.1 < outer_radii.1;
        if !radii_ok {
            return Err(Error::InvalidConfiguration(format!(
                "inner radii {inner_radii:?} must be positive and inside outer radii {outer_radii:?}"
            )));
        }

        let mut walls = ellipse(center, inner_radii, segments);
        walls.extend(ellipse(center, outer_radii, segments));

        let start = array![center.0 + (inner_radii.0 + outer_radii.0) / 2.0, center.1];

        Ok(Self::from_walls(walls, start, FRAC_PI_2))
    }

    /// All wall segments.
    pub fn walls(&self) -> &[Line<f32>] {
        &self.walls
    }

    /// Where every run starts.
    pub fn start_position(&self) -> &Array1<f32> {
        &self.start
    }

    /// Heading (radians, counter-clockwise from +x) every run starts with.
    pub fn start_heading(&self) -> f32 {
        self.start_heading
    }
}

impl Default for Track {
    fn default() -> Self {
        let walls = ellipse((0.0, 0.0), (30.0, 20.0), 64)
            .into_iter()
            .chain(ellipse((0.0, 0.0), (50.0, 40.0), 64))
            .collect();
        Self::from_walls(walls, array![40.0, 0.0], FRAC_PI_2)
    }
}

/// Closed polyline approximating an ellipse.
fn ellipse(center: (f32, f32), radii: (f32, f32), segments: usize) -> Vec<Line<f32>> {
    let vertex = |k: usize| {
        let theta = TAU * k as f32 / segments as f32;
        Point::new(
            center.0 + radii.0 * theta.cos(),
            center.1 + radii.1 * theta.sin(),
        )
    };

    (0..segments)
        .map(|k| Line::new(vertex(k), vertex((k + 1) % segments)))
        .collect()
}
