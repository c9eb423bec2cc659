use crate::grammar::NodeKind;

use super::tree::{NodeData, NodeId, Point, ReuseStats, SyntaxTree};

/// Position in the pending children buffer, used to wrap already built nodes
/// into a new parent once the parser knows which rule matched.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint(usize);

/// Builder state snapshot for speculative parsing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuilderMark {
    nodes: usize,
    children: usize,
    open: usize,
}

struct OpenNode {
    kind: NodeKind,
    first_child: usize,
}

/// Bottom-up arena builder. Children are pushed on a flat buffer and moved into
/// their parent when it is finished.
pub(crate) struct TreeBuilder<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
    nodes: Vec<NodeData>,
    open: Vec<OpenNode>,
    children: Vec<NodeId>,
}

impl<'s> TreeBuilder<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            source,
            line_starts,
            nodes: Vec::new(),
            open: Vec::new(),
            children: Vec::new(),
        }
    }

    fn point(&self, byte: usize) -> Point {
        let row = self.line_starts.partition_point(|start| *start <= byte) - 1;
        Point::new(row, byte - self.line_starts[row])
    }

    fn push_node(
        &mut self,
        kind: NodeKind,
        start_byte: usize,
        end_byte: usize,
        children: Vec<NodeId>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let mut has_error = kind == NodeKind::Error;
        for (index, child) in children.iter().enumerate() {
            let child = &mut self.nodes[child.index()];
            child.parent = Some(id);
            child.index_in_parent = index;
            has_error |= child.has_error;
        }
        self.nodes.push(NodeData {
            kind,
            start_byte,
            end_byte,
            start_point: self.point(start_byte),
            end_point: self.point(end_byte),
            parent: None,
            index_in_parent: 0,
            children,
            has_error,
            has_changes: false,
        });
        id
    }

    fn last_end(&self) -> usize {
        self.children
            .last()
            .map(|child| self.nodes[child.index()].end_byte)
            .unwrap_or(0)
    }

    pub(crate) fn leaf(&mut self, kind: NodeKind, start_byte: usize, end_byte: usize) {
        let id = self.push_node(kind, start_byte, end_byte, Vec::new());
        self.children.push(id);
    }

    pub(crate) fn start_node(&mut self, kind: NodeKind) {
        self.open.push(OpenNode {
            kind,
            first_child: self.children.len(),
        });
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        debug_assert!(checkpoint.0 <= self.children.len());
        self.open.push(OpenNode {
            kind,
            first_child: checkpoint.0,
        });
    }

    pub(crate) fn finish_node(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        let children: Vec<NodeId> = self.children.drain(open.first_child..).collect();
        let (start_byte, end_byte) = match (children.first(), children.last()) {
            (Some(first), Some(last)) => (
                self.nodes[first.index()].start_byte,
                self.nodes[last.index()].end_byte,
            ),
            _ => {
                let end = self.last_end();
                (end, end)
            }
        };
        let id = self.push_node(open.kind, start_byte, end_byte, children);
        self.children.push(id);
    }

    pub(crate) fn mark(&self) -> BuilderMark {
        BuilderMark {
            nodes: self.nodes.len(),
            children: self.children.len(),
            open: self.open.len(),
        }
    }

    pub(crate) fn rollback(&mut self, mark: BuilderMark) {
        self.nodes.truncate(mark.nodes);
        self.children.truncate(mark.children);
        self.open.truncate(mark.open);
    }

    /// Deep copy a subtree of a previous tree. Byte offsets are expected to be
    /// already shifted by [`SyntaxTree::edit`], points are recomputed for the new text.
    pub(crate) fn copy_subtree(&mut self, tree: &SyntaxTree, root: NodeId) {
        struct Frame {
            old: NodeId,
            next_child: usize,
            children: Vec<NodeId>,
        }
        let mut stack = vec![Frame {
            old: root,
            next_child: 0,
            children: Vec::new(),
        }];
        while let Some(frame) = stack.last_mut() {
            let data = tree.data(frame.old);
            if let Some(child) = data.children.get(frame.next_child) {
                frame.next_child += 1;
                stack.push(Frame {
                    old: *child,
                    next_child: 0,
                    children: Vec::with_capacity(tree.data(*child).children.len()),
                });
                continue;
            }
            let children = std::mem::take(&mut frame.children);
            stack.pop();
            let id = self.push_node(data.kind, data.start_byte, data.end_byte, children);
            match stack.last_mut() {
                Some(parent) => parent.children.push(id),
                None => self.children.push(id),
            }
        }
    }

    /// Close every open node and build the tree. The root always spans the whole text.
    pub(crate) fn finish(mut self, root_kind: NodeKind, stats: ReuseStats) -> SyntaxTree {
        while !self.open.is_empty() {
            self.finish_node();
        }
        let children = std::mem::take(&mut self.children);
        let root = self.push_node(root_kind, 0, self.source.len(), children);
        SyntaxTree::from_parts(self.nodes, root, stats)
    }
}
