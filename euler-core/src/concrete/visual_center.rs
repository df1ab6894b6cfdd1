//! Polylabel-style search for a point well inside a zone.
//!
//! Each pass lays a grid of square cells over the shape's bounding box and tries the cell centers
//! nearest the box center first. A candidate wins when a circle of half the cell size around it
//! lies inside the shape; otherwise the cells are halved and the scan repeats. Slivers thinner than
//! the finest cell fall back to [`Area::interior_point`].

use ordered_float::OrderedFloat;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geometry::{area::Area, r2::R2, rect::Rect};

pub const MAX_PASSES: usize = 8;
/// Refinement stops early once a pass would try more cells than this.
pub const MAX_CANDIDATES: usize = 1 << 14;

/// A point inside `shape`, or `None` if the shape is empty. Deterministic: the parallel scan returns
/// the same candidate as the sequential one.
pub fn visual_center(shape: &Area, parallel: bool) -> Option<R2<f64>> {
    if shape.is_empty() {
        return None;
    }
    let bounds = shape.bounds()?;
    let mut cell = bounds.w.min(bounds.h) / 2.;
    if cell.is_nan() || cell <= 0. {
        return shape.interior_point();
    }
    let mut fallback: Option<R2<f64>> = None;
    for pass in 0..MAX_PASSES {
        let candidates = candidates(&bounds, cell);
        if pass > 0 && candidates.len() > MAX_CANDIDATES {
            break;
        }
        let clearance = cell / 2.;
        let fits = |p: &R2<f64>| shape.contains(p) && shape.boundary_distance(p) >= clearance;
        if let Some(center) = find_first(&candidates, parallel, fits) {
            return Some(center);
        }
        if fallback.is_none() {
            fallback = candidates.into_iter().find(|p| shape.contains(p));
        }
        cell /= 2.;
    }
    fallback.or_else(|| shape.interior_point())
}

/// Cell centers covering `bounds`, nearest to its center first (ties broken by grid order).
fn candidates(bounds: &Rect, cell: f64) -> Vec<R2<f64>> {
    let ni = (bounds.w / cell).ceil().max(1.) as usize;
    let nj = (bounds.h / cell).ceil().max(1.) as usize;
    let mid = bounds.center();
    let mut points: Vec<(usize, R2<f64>)> = (0..ni)
        .flat_map(|i| (0..nj).map(move |j| (i, j)))
        .map(|(i, j)| R2 {
            x: bounds.x + (i as f64 + 0.5) * cell,
            y: bounds.y + (j as f64 + 0.5) * cell,
        })
        .enumerate()
        .collect();
    points.sort_by_key(|(idx, p)| (OrderedFloat(p.distance(&mid)), *idx));
    points.into_iter().map(|(_, p)| p).collect()
}

#[cfg(feature = "parallel")]
fn find_first<F>(candidates: &[R2<f64>], parallel: bool, pred: F) -> Option<R2<f64>>
where
    F: Fn(&R2<f64>) -> bool + Sync,
{
    if parallel {
        candidates.par_iter().find_first(|p| pred(p)).copied()
    } else {
        candidates.iter().find(|p| pred(p)).copied()
    }
}

#[cfg(not(feature = "parallel"))]
fn find_first<F>(candidates: &[R2<f64>], _parallel: bool, pred: F) -> Option<R2<f64>>
where
    F: Fn(&R2<f64>) -> bool,
{
    candidates.iter().find(|p| pred(p)).copied()
}
