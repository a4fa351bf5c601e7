//! Linear referencing over street polylines.
//!
//! Fractions are measured in coordinate space, matching
//! [`geo::LineLocatePoint`]; lengths reported to the cost model are
//! haversine metres.

use geo::{
    Coord, Haversine, Length, Line, LineInterpolatePoint, LineLocatePoint, LineString, Point,
};
use itertools::Itertools;

use crate::Error;

/// Haversine length of a polyline in metres.
pub fn polyline_length(geometry: &LineString<f64>) -> f64 {
    Haversine.length(geometry)
}

/// Rejects polylines that cannot be split: fewer than two points, or all
/// points coincident.
pub fn validate(geometry: &LineString<f64>) -> Result<(), Error> {
    if geometry.0.len() < 2 {
        return Err(Error::DegenerateGeometry);
    }
    if geometry.0.iter().tuple_windows().all(|(a, b)| a == b) {
        return Err(Error::DegenerateGeometry);
    }
    Ok(())
}

/// Fraction (0..=1) along `geometry` closest to `point`.
pub fn locate_fraction(geometry: &LineString<f64>, point: Point<f64>) -> Result<f64, Error> {
    validate(geometry)?;
    geometry
        .line_locate_point(&point)
        .ok_or(Error::DegenerateGeometry)
}

/// Coordinate at a fractional location along `geometry`.
pub fn interpolate(geometry: &LineString<f64>, fraction: f64) -> Result<Point<f64>, Error> {
    validate(geometry)?;
    geometry
        .line_interpolate_point(fraction.clamp(0.0, 1.0))
        .ok_or(Error::DegenerateGeometry)
}

/// Sub-polyline between two fractional locations, `start <= end`.
pub fn slice(geometry: &LineString<f64>, start: f64, end: f64) -> Result<LineString<f64>, Error> {
    validate(geometry)?;
    let start = start.clamp(0.0, 1.0);
    let end = end.clamp(start, 1.0);

    let total: f64 = geometry.lines().map(|seg| segment_length(&seg)).sum();
    let from = start * total;
    let to = end * total;

    let mut coords: Vec<Coord<f64>> = Vec::new();
    let mut walked = 0.0;
    for segment in geometry.lines() {
        let len = segment_length(&segment);
        if len == 0.0 {
            continue;
        }
        let lo = walked;
        let hi = walked + len;
        walked = hi;
        if hi < from {
            continue;
        }
        if lo > to {
            break;
        }
        let t0 = ((from - lo) / len).clamp(0.0, 1.0);
        let t1 = ((to - lo) / len).clamp(0.0, 1.0);
        if coords.is_empty() {
            coords.push(along(&segment, t0));
        }
        let tail = along(&segment, t1);
        if coords.last() != Some(&tail) {
            coords.push(tail);
        }
    }

    // A zero-extent slice still needs a two-point polyline at the location.
    if coords.len() < 2 {
        let point: Coord<f64> = interpolate(geometry, start)?.into();
        coords = vec![point, point];
    }
    Ok(LineString::from(coords))
}

fn segment_length(line: &Line<f64>) -> f64 {
    line.dx().hypot(line.dy())
}

fn along(line: &Line<f64>, t: f64) -> Coord<f64> {
    Coord {
        x: line.start.x + t * line.dx(),
        y: line.start.y + t * line.dy(),
    }
}
