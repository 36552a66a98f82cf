use super::{
    DEFAULT_POSITION, GRID_SIZE, MAX_PLACEMENT_ATTEMPTS, NODE_HEIGHT, NODE_MARGIN, NODE_WIDTH,
    PLACEMENT_STEP,
};
use crate::graph::{Node, Position};
use tracing::trace;

/// Direction in which a blocked position is pushed until it is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementDirection {
    /// Increasing `y`.
    #[default]
    Bottom,
    /// Increasing `x` and `y` together.
    Diagonal,
}

/// Rounds both coordinates to the nearest multiple of `cell_size`.
/// A non-positive cell size leaves the point unchanged.
pub fn snap_to_grid(point: Position, cell_size: f64) -> Position {
    if cell_size <= 0.0 {
        return point;
    }
    Position::new(
        (point.x / cell_size).round() * cell_size,
        (point.y / cell_size).round() * cell_size,
    )
}

/// [`snap_to_grid`] with the editor grid.
pub fn snap(point: Position) -> Position {
    snap_to_grid(point, GRID_SIZE)
}

/// Axis-aligned overlap test between two node boxes whose top-left corners
/// are `a` and `b`, with `margin` of extra clearance.
pub fn nodes_overlap(a: Position, b: Position, margin: f64) -> bool {
    a.x < b.x + NODE_WIDTH + margin
        && a.x + NODE_WIDTH + margin > b.x
        && a.y < b.y + NODE_HEIGHT + margin
        && a.y + NODE_HEIGHT + margin > b.y
}

/// Moves `desired` along `direction` until it clears every node in
/// `existing`. Gives up after [`MAX_PLACEMENT_ATTEMPTS`] steps and returns
/// wherever the search stopped.
pub fn find_non_overlapping_position(
    desired: Position,
    existing: &[Node],
    direction: PlacementDirection,
) -> Position {
    let mut position = desired;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let blocked = existing
            .iter()
            .any(|node| nodes_overlap(position, node.position, NODE_MARGIN));
        if !blocked {
            return position;
        }
        position = match direction {
            PlacementDirection::Bottom => position.offset(0.0, PLACEMENT_STEP),
            PlacementDirection::Diagonal => position.offset(PLACEMENT_STEP, PLACEMENT_STEP),
        };
    }
    trace!(
        x = position.x,
        y = position.y,
        "no free position found within {} attempts",
        MAX_PLACEMENT_ATTEMPTS
    );
    position
}

/// Where a node added without an explicit drop point should go.
///
/// An empty graph gets the viewport center (or [`DEFAULT_POSITION`]).
/// Otherwise the node is centered on that point, snapped to the grid, and
/// pushed diagonally clear of the existing nodes.
pub fn default_node_position(existing: &[Node], viewport_center: Option<Position>) -> Position {
    let center = viewport_center.unwrap_or(DEFAULT_POSITION);
    if existing.is_empty() {
        return center;
    }
    let desired = snap(center.offset(-NODE_WIDTH / 2.0, -NODE_HEIGHT / 2.0));
    find_non_overlapping_position(desired, existing, PlacementDirection::Diagonal)
}
