use super::{Edge, Node};
use ahash::AHashMap;

/// Borrowed adjacency lookups over a node/edge list.
///
/// Edges whose source or target does not resolve to a node are kept aside in
/// `dangling_edges` and take no part in any other lookup. When node ids are
/// duplicated, the first node in list order owns the id.
pub struct GraphIndex<'a> {
    nodes: &'a [Node],
    slots: AHashMap<&'a str, usize>,
    outgoing: AHashMap<&'a str, Vec<&'a Edge>>,
    incoming: AHashMap<&'a str, usize>,
    dangling: Vec<&'a Edge>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut slots: AHashMap<&'a str, usize> = AHashMap::with_capacity(nodes.len());
        for (slot, node) in nodes.iter().enumerate() {
            slots.entry(node.id.as_str()).or_insert(slot);
        }

        let mut outgoing: AHashMap<&'a str, Vec<&'a Edge>> = AHashMap::new();
        let mut incoming: AHashMap<&'a str, usize> = AHashMap::new();
        let mut dangling = Vec::new();
        for edge in edges {
            if !slots.contains_key(edge.source.as_str()) || !slots.contains_key(edge.target.as_str())
            {
                dangling.push(edge);
                continue;
            }
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
            *incoming.entry(edge.target.as_str()).or_insert(0) += 1;
        }

        Self {
            nodes,
            slots,
            outgoing,
            incoming,
            dangling,
        }
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// Position of the node in the ordered node list.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Outgoing edges of `id`, in edge-list order.
    pub fn outgoing(&self, id: &str) -> &[&'a Edge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming_count(&self, id: &str) -> usize {
        self.incoming.get(id).copied().unwrap_or(0)
    }

    /// The edge leaving `id` through `handle`. The first match wins.
    pub fn edge_from_handle(&self, id: &str, handle: &str) -> Option<&'a Edge> {
        self.outgoing(id)
            .iter()
            .copied()
            .find(|edge| edge.has_source_handle(handle))
    }

    /// Nodes without incoming edges, in node-list order.
    pub fn start_candidates(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes
            .iter()
            .filter(|node| self.incoming_count(&node.id) == 0)
    }

    /// The node a run begins at: the first start candidate in list order.
    /// Validation and compilation both resolve the start through here.
    pub fn start_node(&self) -> Option<&'a Node> {
        self.start_candidates().next()
    }

    pub fn dangling_edges(&self) -> &[&'a Edge] {
        &self.dangling
    }
}
