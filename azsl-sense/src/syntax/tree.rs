use std::fmt;

use crate::grammar::NodeKind;

use super::node::Node;

/// Row / byte column of a location in the source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A byte range replacement, expressed in both byte offsets and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

impl InputEdit {
    fn shift_byte(&self, byte: usize) -> usize {
        byte + self.new_end_byte - self.old_end_byte
    }
    fn shift_point(&self, point: Point) -> Point {
        if point.row == self.old_end_position.row {
            Point::new(
                self.new_end_position.row,
                self.new_end_position.column + point.column.saturating_sub(self.old_end_position.column),
            )
        } else {
            Point::new(
                point.row - self.old_end_position.row + self.new_end_position.row,
                point.column,
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) start_byte: usize,
    pub(crate) end_byte: usize,
    pub(crate) start_point: Point,
    pub(crate) end_point: Point,
    pub(crate) parent: Option<NodeId>,
    pub(crate) index_in_parent: usize,
    pub(crate) children: Vec<NodeId>,
    pub(crate) has_error: bool,
    pub(crate) has_changes: bool,
}

/// How many top level declarations were copied from the previous tree and how many
/// went through the parser.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReuseStats {
    pub reused: usize,
    pub reparsed: usize,
}

/// Concrete syntax tree stored as an arena. Parent, child and sibling links are
/// [`NodeId`] indices into the arena, [`Node`] is the borrowed view over it.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    stats: ReuseStats,
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<NodeData>, root: NodeId, stats: ReuseStats) -> Self {
        Self { nodes, root, stats }
    }
    pub fn root_node(&self) -> Node<'_> {
        Node::new(self, self.root)
    }
    pub fn stats(&self) -> ReuseStats {
        self.stats
    }
    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
    /// Shift every node for a pending text change. Nodes intersecting or touching the
    /// edited range are flagged as changed and will never be reused by a reparse.
    pub fn edit(&mut self, edit: &InputEdit) {
        for node in &mut self.nodes {
            if node.end_byte < edit.start_byte {
                continue;
            }
            if node.start_byte > edit.old_end_byte {
                node.start_byte = edit.shift_byte(node.start_byte);
                node.end_byte = edit.shift_byte(node.end_byte);
                node.start_point = edit.shift_point(node.start_point);
                node.end_point = edit.shift_point(node.end_point);
                continue;
            }
            node.has_changes = true;
            if node.start_byte >= edit.start_byte {
                node.start_byte = edit.new_end_byte.min(edit.start_byte.max(node.start_byte));
                node.start_point = if node.start_byte == edit.start_byte {
                    edit.start_position
                } else {
                    edit.new_end_position
                };
            }
            if node.end_byte > edit.old_end_byte {
                node.end_byte = edit.shift_byte(node.end_byte);
                node.end_point = edit.shift_point(node.end_point);
            } else {
                node.end_byte = edit.new_end_byte;
                node.end_point = edit.new_end_position;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::AzslParser;

    use super::*;

    fn insert_edit(start: usize, text: &str, point: Point) -> InputEdit {
        InputEdit {
            start_byte: start,
            old_end_byte: start,
            new_end_byte: start + text.len(),
            start_position: point,
            old_end_position: point,
            new_end_position: Point::new(point.row, point.column + text.len()),
        }
    }

    #[test]
    fn test_edit_shift_following_nodes() {
        let parser = AzslParser::new();
        let mut tree = parser.parse("float a;\nfloat b;\n", None);
        // Rename a into abc.
        tree.edit(&insert_edit(7, "bc", Point::new(0, 7)));
        let root = tree.root_node();
        assert_eq!(root.end_byte(), 20);
        assert!(root.has_changes());
        let first = root.named_child(0).unwrap();
        let second = root.named_child(1).unwrap();
        assert!(first.has_changes());
        assert!(!second.has_changes());
        assert_eq!(second.start_byte(), 11);
        assert_eq!(second.start_position(), Point::new(1, 0));
    }

    #[test]
    fn test_edit_shift_same_row() {
        let parser = AzslParser::new();
        let mut tree = parser.parse("float a; float b;", None);
        tree.edit(&insert_edit(0, "static ", Point::new(0, 0)));
        let root = tree.root_node();
        let second = root.named_child(1).unwrap();
        assert!(!second.has_changes());
        assert_eq!(second.start_byte(), 16);
        assert_eq!(second.start_position(), Point::new(0, 16));
        assert_eq!(second.end_position(), Point::new(0, 24));
    }
}
