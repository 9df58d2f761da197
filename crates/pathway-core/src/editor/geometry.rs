//! Hit testing on the editing canvas.

use crate::config::EditorGeometry;
use crate::graph::Position;

/// Whether `(x, y)` falls inside the module rectangle centred on `centre`.
///
/// The rectangle is half-open: the left and top edges are inside, the right
/// and bottom edges are not.
pub fn in_module_rect(x: i32, y: i32, centre: Position, geometry: &EditorGeometry) -> bool {
    let (width, height) = (i64::from(geometry.module_width), i64::from(geometry.module_height));
    let x = i64::from(x) + width / 2 - i64::from(centre.x);
    let y = i64::from(y) + height / 2 - i64::from(centre.y);
    (0..width).contains(&x) && (0..height).contains(&y)
}

/// Perpendicular distance from `(x, y)` to the line from `source` to `target`.
///
/// Returns `None` when the point lies outside the segment's bounding range
/// widened by `margin`, so points beyond either end of a segment never match.
pub fn distance_to_segment(
    x: i32,
    y: i32,
    source: Position,
    target: Position,
    margin: i32,
) -> Option<f64> {
    let (px, py) = (
        i64::from(x) - i64::from(source.x),
        i64::from(y) - i64::from(source.y),
    );
    let (dx, dy) = (
        i64::from(target.x) - i64::from(source.x),
        i64::from(target.y) - i64::from(source.y),
    );
    let margin = i64::from(margin);
    if !(in_range_of(px, dx, margin) && in_range_of(py, dy, margin)) {
        return None;
    }

    // Offsets fit in 33 bits, so the conversion to f64 is exact
    let (px, py) = (px as f64, py as f64);
    let (dx, dy) = (dx as f64, dy as f64);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return Some(px.hypot(py));
    }
    let scale = (dx * px + dy * py) / length_sq;
    Some((scale * dx - px).hypot(scale * dy - py))
}

/// Whether offset `v` lies within `[0, dv]` (in either direction) give or take `margin`.
fn in_range_of(v: i64, dv: i64, margin: i64) -> bool {
    if dv < 0 {
        v >= dv - margin && v < margin
    } else {
        v <= dv + margin && v > -margin
    }
}
