use super::{ARRANGE_ORIGIN, COLUMN_SPACING, LAYER_SPACING};
use crate::graph::{Edge, GraphIndex, Node, Position};
use std::collections::VecDeque;
use tracing::debug;

/// Repositions every node into layered rows by graph depth.
///
/// Nodes without incoming edges form layer 0 and each breadth-first step
/// below them adds a layer. Nodes that no root reaches (for example a cycle
/// with no entry) are seeded one layer below the deepest layer found so far,
/// so every node ends up placed. Only `position` changes.
pub fn auto_arrange(nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
    let index = GraphIndex::new(nodes, edges);
    let layers = assign_layers(&index);

    let mut arranged = nodes.to_vec();
    for (depth, layer) in layers.iter().enumerate() {
        let row_width = layer.len().saturating_sub(1) as f64 * COLUMN_SPACING;
        let y = ARRANGE_ORIGIN.y + depth as f64 * LAYER_SPACING;
        for (column, &slot) in layer.iter().enumerate() {
            let x = ARRANGE_ORIGIN.x - row_width / 2.0 + column as f64 * COLUMN_SPACING;
            arranged[slot].position = Position::new(x, y);
        }
    }

    debug!(
        nodes = nodes.len(),
        layers = layers.len(),
        "auto-arranged workflow graph"
    );
    arranged
}

/// Groups node slots by depth, keeping breadth-first discovery order inside
/// each layer.
fn assign_layers(index: &GraphIndex<'_>) -> Vec<Vec<usize>> {
    let nodes = index.nodes();
    let mut depths: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(nodes.len());
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for (slot, node) in nodes.iter().enumerate() {
        if index.incoming_count(&node.id) == 0 {
            depths[slot] = Some(0);
            queue.push_back((slot, 0));
        }
    }
    visit_layers(index, &mut queue, &mut depths, &mut order);

    // Secondary sweep for nodes no root reaches.
    for slot in 0..nodes.len() {
        if depths[slot].is_some() {
            continue;
        }
        let depth = order.iter().map(|&(_, d)| d + 1).max().unwrap_or(0);
        depths[slot] = Some(depth);
        queue.push_back((slot, depth));
        visit_layers(index, &mut queue, &mut depths, &mut order);
    }

    let layer_count = order.iter().map(|&(_, d)| d + 1).max().unwrap_or(0);
    let mut layers = vec![Vec::new(); layer_count];
    for (slot, depth) in order {
        layers[depth].push(slot);
    }
    layers
}

fn visit_layers(
    index: &GraphIndex<'_>,
    queue: &mut VecDeque<(usize, usize)>,
    depths: &mut [Option<usize>],
    order: &mut Vec<(usize, usize)>,
) {
    let nodes = index.nodes();
    while let Some((slot, depth)) = queue.pop_front() {
        order.push((slot, depth));
        for edge in index.outgoing(&nodes[slot].id) {
            let Some(target) = index.slot(&edge.target) else {
                continue;
            };
            if depths[target].is_none() {
                depths[target] = Some(depth + 1);
                queue.push_back((target, depth + 1));
            }
        }
    }
}
