//! Node pool and the four-way circular doubly-linked list primitives that make up the
//! toroidal matrix.
//!
//! Every node lives in an arena (`Vec<Node>`) and is addressed by its index. This keeps
//! the classic Knuth pointer-rewrite style of cover/uncover (two-assignment unlink,
//! four-assignment relink) while staying entirely inside the borrow checker: there are no
//! raw pointers, only indices.

/// Index of a [`Node`] within a [`Pool`].
///
/// Node `0` is always the root. Nodes `1..=col_count` are column headers, addressed by
/// their own column number. Everything allocated afterwards is a row cell.
pub(crate) type NodeId = usize;

/// A single node of the torus: the root, a column header, or a row cell.
///
/// The three roles share one layout; fields that a given role doesn't use are simply
/// left at whatever [`Pool::alloc`] put there.
#[derive(Default, Clone, Copy)]
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub(crate) struct Node {
    pub left: NodeId,
    pub right: NodeId,
    pub up: NodeId,
    pub down: NodeId,
    /// Column number this node belongs to. For a header, its own column number.
    pub col: usize,
}

/// The node arena backing a matrix, plus the raw splice primitives cover/uncover are
/// built from.
///
/// All splice operations here are constant time and touch no allocation; `alloc` is the
/// only operation that grows the pool, and it never runs after the matrix leaves the
/// building phase.
#[cfg_attr(test, derive(Debug))]
pub(crate) struct Pool {
    pub nodes: Vec<Node>,
}

impl Pool {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Pool {
        Pool { nodes: vec![Node::default()] }
    }

    /// Allocates a new node, initially self-linked (a circular list of one).
    pub fn alloc(&mut self, col: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { left: id, right: id, up: id, down: id, col });
        id
    }

    #[inline]
    pub fn insert_right(&mut self, at: NodeId, node: NodeId) {
        let right = self.nodes[at].right;
        self.nodes[node].right = right;
        self.nodes[right].left = node;
        self.nodes[node].left = at;
        self.nodes[at].right = node;
    }

    #[inline]
    pub fn insert_down(&mut self, at: NodeId, node: NodeId) {
        let down = self.nodes[at].down;
        self.nodes[node].down = down;
        self.nodes[down].up = node;
        self.nodes[node].up = at;
        self.nodes[at].down = node;
    }

    /// Unlinks `node` from its horizontal list, leaving `node`'s own left/right fields
    /// untouched so [`relink_horizontal`](Pool::relink_horizontal) can restore it later.
    #[inline]
    pub fn unlink_horizontal(&mut self, node: NodeId) {
        let Node { left, right, .. } = self.nodes[node];
        self.nodes[left].right = right;
        self.nodes[right].left = left;
    }

    /// Mirror of [`unlink_horizontal`](Pool::unlink_horizontal): splices `node` back in
    /// using its own (untouched) left/right fields.
    #[inline]
    pub fn relink_horizontal(&mut self, node: NodeId) {
        let Node { left, right, .. } = self.nodes[node];
        self.nodes[left].right = node;
        self.nodes[right].left = node;
    }

    #[inline]
    pub fn unlink_vertical(&mut self, node: NodeId) {
        let Node { up, down, .. } = self.nodes[node];
        self.nodes[up].down = down;
        self.nodes[down].up = up;
    }

    #[inline]
    pub fn relink_vertical(&mut self, node: NodeId) {
        let Node { up, down, .. } = self.nodes[node];
        self.nodes[up].down = node;
        self.nodes[down].up = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_right_forms_a_circular_list() {
        let mut pool = Pool::new();
        let a = pool.alloc(1);
        let b = pool.alloc(1);
        let c = pool.alloc(1);

        pool.insert_right(a, b);
        pool.insert_right(b, c);

        assert_eq!(pool.nodes[a].right, b);
        assert_eq!(pool.nodes[b].right, c);
        assert_eq!(pool.nodes[c].right, a);
        assert_eq!(pool.nodes[a].left, c);
        assert_eq!(pool.nodes[b].left, a);
        assert_eq!(pool.nodes[c].left, b);
    }

    #[test]
    fn unlink_then_relink_horizontal_restores_links() {
        let mut pool = Pool::new();
        let a = pool.alloc(1);
        let b = pool.alloc(1);
        let c = pool.alloc(1);
        pool.insert_right(a, b);
        pool.insert_right(b, c);

        let before = pool.nodes.clone();
        pool.unlink_horizontal(b);
        assert_ne!(pool.nodes, before);
        pool.relink_horizontal(b);
        assert_eq!(pool.nodes, before);
    }

    #[test]
    fn unlink_then_relink_vertical_restores_links() {
        let mut pool = Pool::new();
        let a = pool.alloc(1);
        let b = pool.alloc(1);
        let c = pool.alloc(1);
        pool.insert_down(a, b);
        pool.insert_down(b, c);

        let before = pool.nodes.clone();
        pool.unlink_vertical(b);
        assert_ne!(pool.nodes, before);
        pool.relink_vertical(b);
        assert_eq!(pool.nodes, before);
    }
}
