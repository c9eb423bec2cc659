use std::{fmt, ops::Range};

use crate::grammar::NodeKind;

use super::tree::{NodeData, NodeId, Point, SyntaxTree};

/// Borrowed view over a node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree SyntaxTree,
    id: NodeId,
}

impl<'tree> PartialEq for Node<'tree> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'tree> Eq for Node<'tree> {}

impl<'tree> fmt::Debug for Node<'tree> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Node {} {} - {}}}",
            self.kind(),
            self.start_position(),
            self.end_position()
        )
    }
}

impl<'tree> Node<'tree> {
    pub(crate) fn new(tree: &'tree SyntaxTree, id: NodeId) -> Self {
        Self { tree, id }
    }
    fn data(&self) -> &'tree NodeData {
        self.tree.data(self.id)
    }
    pub fn id(&self) -> NodeId {
        self.id
    }
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }
    pub fn is_named(&self) -> bool {
        self.kind().is_named()
    }
    pub fn is_extra(&self) -> bool {
        self.kind().is_extra()
    }
    pub fn is_error(&self) -> bool {
        self.kind() == NodeKind::Error
    }
    /// Whether this node or one of its descendants is an error.
    pub fn has_error(&self) -> bool {
        self.data().has_error
    }
    /// Whether an edit touched this node since it was parsed.
    pub fn has_changes(&self) -> bool {
        self.data().has_changes
    }
    pub fn start_byte(&self) -> usize {
        self.data().start_byte
    }
    pub fn end_byte(&self) -> usize {
        self.data().end_byte
    }
    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }
    pub fn start_position(&self) -> Point {
        self.data().start_point
    }
    pub fn end_position(&self) -> Point {
        self.data().end_point
    }
    pub fn utf8_text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.byte_range()).unwrap_or("")
    }

    pub fn parent(&self) -> Option<Node<'tree>> {
        self.data().parent.map(|id| Node::new(self.tree, id))
    }
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }
    pub fn child(&self, index: usize) -> Option<Node<'tree>> {
        self.data()
            .children
            .get(index)
            .map(|id| Node::new(self.tree, *id))
    }
    pub fn children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |id| Node::new(tree, *id))
    }
    pub fn named_children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        self.children().filter(|child| child.is_named())
    }
    pub fn named_child(&self, index: usize) -> Option<Node<'tree>> {
        self.named_children().nth(index)
    }
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<Node<'tree>> {
        self.children().find(|child| child.kind() == kind)
    }

    fn sibling_at(&self, offset: isize) -> Option<Node<'tree>> {
        let parent = self.parent()?;
        let index = self.data().index_in_parent.checked_add_signed(offset)?;
        parent.child(index)
    }
    pub fn next_sibling(&self) -> Option<Node<'tree>> {
        self.sibling_at(1)
    }
    pub fn prev_sibling(&self) -> Option<Node<'tree>> {
        self.sibling_at(-1)
    }
    pub fn next_named_sibling(&self) -> Option<Node<'tree>> {
        let mut sibling = self.next_sibling();
        while let Some(node) = sibling {
            if node.is_named() {
                return Some(node);
            }
            sibling = node.next_sibling();
        }
        None
    }
    pub fn prev_named_sibling(&self) -> Option<Node<'tree>> {
        let mut sibling = self.prev_sibling();
        while let Some(node) = sibling {
            if node.is_named() {
                return Some(node);
            }
            sibling = node.prev_sibling();
        }
        None
    }

    /// Pre-order walk over this node and all its descendants.
    pub fn descendants(&self) -> Descendants<'tree> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
            skip_errors: false,
        }
    }
    /// Every descendant of the given kind, in source order. Error regions are opaque:
    /// nothing inside an `ERROR` node is returned.
    pub fn descendants_of_kind(&self, kind: NodeKind) -> Vec<Node<'tree>> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
            skip_errors: true,
        }
        .filter(|node| node.kind() == kind)
        .collect()
    }
    /// Outermost error nodes below this node.
    pub fn errors(&self) -> Vec<Node<'tree>> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
            skip_errors: true,
        }
        .filter(|node| node.is_error())
        .collect()
    }

    /// Smallest named node spanning the given point range. Descent stops on error
    /// nodes, which are returned as is.
    pub fn named_descendant_for_point_range(&self, start: Point, end: Point) -> Node<'tree> {
        let mut node = *self;
        let mut last_named = *self;
        'descend: loop {
            if node.is_error() && node != *self {
                return node;
            }
            for child in node.children() {
                let child_start = child.start_position();
                let child_end = child.end_position();
                // Must reach the end of the range...
                if child_end < end {
                    continue;
                }
                // ...and exceed its start, unless the child is empty.
                if child_end <= start && child_start < start {
                    continue;
                }
                if start < child_start {
                    break;
                }
                node = child;
                if node.is_named() {
                    last_named = node;
                }
                continue 'descend;
            }
            return last_named;
        }
    }

    /// S-expression of named nodes, mostly for tests and debug logs.
    pub fn to_sexp(&self) -> String {
        enum Step<'a> {
            Open(Node<'a>),
            Close,
        }
        let mut sexp = String::new();
        let mut stack = vec![Step::Open(*self)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node) => {
                    if !sexp.is_empty() {
                        sexp.push(' ');
                    }
                    sexp.push('(');
                    sexp.push_str(node.kind().as_str());
                    stack.push(Step::Close);
                    let children: Vec<Node> = node.named_children().collect();
                    for child in children.into_iter().rev() {
                        stack.push(Step::Open(child));
                    }
                }
                Step::Close => sexp.push(')'),
            }
        }
        sexp
    }
}

pub struct Descendants<'tree> {
    tree: &'tree SyntaxTree,
    stack: Vec<NodeId>,
    skip_errors: bool,
}

impl<'tree> Iterator for Descendants<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let data = self.tree.data(id);
        if !(self.skip_errors && data.kind == NodeKind::Error) {
            self.stack.extend(data.children.iter().rev());
        }
        Some(Node::new(self.tree, id))
    }
}
