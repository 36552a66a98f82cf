//! Node placement for the graph editor.
//!
//! Every function here is pure. The constants are shared by drop-time
//! placement and by [`auto_arrange`], so hand-placed and arranged nodes line
//! up on the same grid.

use crate::graph::Position;

mod arrange;
mod placement;

pub use arrange::auto_arrange;
pub use placement::*;

/// Side of a grid cell.
pub const GRID_SIZE: f64 = 20.0;
/// Rendered size of a node box.
pub const NODE_WIDTH: f64 = 280.0;
pub const NODE_HEIGHT: f64 = 120.0;
/// Clearance kept around a node when searching for free space.
pub const NODE_MARGIN: f64 = GRID_SIZE;
/// Distance moved per attempt while searching for free space.
pub const PLACEMENT_STEP: f64 = 2.0 * GRID_SIZE;
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;
/// Where the first node of an empty graph goes.
pub const DEFAULT_POSITION: Position = Position::new(250.0, 100.0);

/// Horizontal distance between the left edges of siblings in a layer.
pub const COLUMN_SPACING: f64 = NODE_WIDTH + 4.0 * GRID_SIZE;
/// Vertical distance between the top edges of consecutive layers.
pub const LAYER_SPACING: f64 = NODE_HEIGHT + 4.0 * GRID_SIZE;
/// Layer 0 is centered horizontally on this point's `x` and starts at its `y`.
pub const ARRANGE_ORIGIN: Position = Position::new(400.0, 100.0);
