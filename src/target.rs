//! Guess targets: polygons in natural image pixels, and the mapping between
//! those pixels and the viewport the image is letterboxed into.

use serde::{Deserialize, Serialize};

use crate::model::Point;
use crate::util::contained_size;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("coordinate {index} is not an integer: {value:?}")]
    BadCoordinate { index: usize, value: String },
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// Parse an image-map style `"x1,y1,x2,y2,..."` list. A trailing unpaired
    /// value is ignored.
    pub fn parse(coords: &str) -> Result<Self, TargetError> {
        let values = coords
            .split(',')
            .enumerate()
            .map(|(index, raw)| {
                raw.trim()
                    .parse::<i64>()
                    .map(|v| v as f64)
                    .map_err(|_| TargetError::BadCoordinate {
                        index,
                        value: raw.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let vertices: Vec<Point> = values
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        if vertices.len() < 3 {
            return Err(TargetError::TooFewVertices(vertices.len()));
        }
        Ok(Self { vertices })
    }

    /// Even-odd ray casting.
    pub fn contains(&self, p: Point) -> bool {
        let v = &self.vertices;
        let mut inside = false;
        let mut j = v.len().wrapping_sub(1);
        for i in 0..v.len() {
            let (a, b) = (v[i], v[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Mean of the vertices.
    pub fn center(&self) -> Point {
        let n = self.vertices.len().max(1) as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

/// Placement of a contained image inside the viewport:
/// `viewport = natural * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageLayout {
    pub offset: Point,
    pub scale: f64,
}

impl ImageLayout {
    pub fn contain(natural: (f64, f64), viewport: (f64, f64)) -> Self {
        let (rw, rh) = contained_size(natural, viewport);
        let scale = if natural.0 > 0.0 { rw / natural.0 } else { 0.0 };
        Self {
            offset: Point::new((viewport.0 - rw) / 2.0, (viewport.1 - rh) / 2.0),
            scale,
        }
    }

    pub fn to_natural(&self, p: Point) -> Option<Point> {
        if self.scale <= 0.0 {
            return None;
        }
        Some(Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        ))
    }

    pub fn to_viewport(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Natural size of the picture the polygon refers to.
    pub natural_width: f64,
    pub natural_height: f64,
    pub polygon: Polygon,
}

impl Target {
    pub fn layout(&self, viewport: (f64, f64)) -> ImageLayout {
        ImageLayout::contain((self.natural_width, self.natural_height), viewport)
    }

    /// Does a guess at `p` (unscaled viewport pixels) land on the target?
    pub fn guess(&self, p: Point, viewport: (f64, f64)) -> bool {
        self.layout(viewport)
            .to_natural(p)
            .is_some_and(|n| self.polygon.contains(n))
    }

    /// Where to aim a zoom so the target ends up centred.
    pub fn focus_point(&self, viewport: (f64, f64)) -> Point {
        self.layout(viewport).to_viewport(self.polygon.center())
    }
}
