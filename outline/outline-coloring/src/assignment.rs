//! Explicit per-edge color assignment.
//!
//! The assignment string lists colors contour by contour:
//!
//! - `C`, `M`, `Y`, `W` (any case) color the current edge cyan, magenta,
//!   yellow or white and move on to the next edge.
//! - `,` moves to the next contour. Edges of the finished contour that were
//!   not assigned are reset to white, unless a `?` appeared in it, in which
//!   case they keep whatever color they had.
//! - Every other character is ignored.
//!
//! Running out of contours or edges silently drops the rest of the string.

use outline_types::{EdgeColor, Shape};

/// Apply an explicit color assignment to `shape`.
///
/// Returns the number of edges that received a color from the string.
///
/// # Example
///
/// ```
/// use outline_coloring::apply_color_assignment;
/// use outline_types::{Contour, EdgeColor, Point2, Shape};
///
/// let triangle = Contour::polygon(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 2.0),
///     Point2::new(2.0, 0.0),
/// ]);
/// let mut shape = Shape::from_contours([triangle.clone(), triangle]);
///
/// let assigned = apply_color_assignment(&mut shape, "cmy,Y");
/// assert_eq!(assigned, 4);
/// assert_eq!(shape.contours[0].edges[1].color, EdgeColor::Magenta);
/// assert_eq!(shape.contours[1].edges[0].color, EdgeColor::Yellow);
/// ```
pub fn apply_color_assignment(shape: &mut Shape, assignment: &str) -> usize {
    let mut contour_index = 0;
    let mut edge = 0;
    let mut advance = false;
    let mut clear = true;
    let mut assigned = 0;

    if shape.contours.is_empty() {
        return 0;
    }

    for token in assignment.chars() {
        let contour = &mut shape.contours[contour_index];
        match token {
            ',' => {
                if advance {
                    edge += 1;
                }
                if clear {
                    for rest in contour.edges.iter_mut().skip(edge) {
                        rest.color = EdgeColor::White;
                    }
                }
                contour_index += 1;
                if contour_index >= shape.contours.len() {
                    break;
                }
                edge = 0;
                advance = false;
                clear = true;
            }
            '?' => clear = false,
            letter => {
                let Some(color) = EdgeColor::from_letter(letter) else {
                    continue;
                };
                if advance {
                    edge += 1;
                    advance = false;
                }
                if let Some(target) = contour.edges.get_mut(edge) {
                    target.color = color;
                    assigned += 1;
                    advance = true;
                }
            }
        }
    }
    assigned
}
