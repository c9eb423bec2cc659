//! Reuse of top level declarations from a previous, edited, tree.
//!
//! Only declarations that end on their own closing token are candidates: given the
//! same tokens from the same start they always parse to the same subtree, so copying
//! them is indistinguishable from parsing them again.
use crate::grammar::NodeKind;

use super::tree::{NodeId, SyntaxTree};

fn is_self_delimiting(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::IncludeStatement
            | NodeKind::AttributedFunctionDefinition
            | NodeKind::AttributedFunctionDeclaration
            | NodeKind::VariableDeclarationStatement
            | NodeKind::AnyStructuredTypeDefinitionStatement
            | NodeKind::AttributedSrgDefinition
            | NodeKind::AttributedSrgSemantic
            | NodeKind::CompilerExtensionStatement
            | NodeKind::TypeAliasingDefinitionStatement
    )
}

/// Walks the top level declarations of a previous tree in source order.
pub(crate) struct ReuseCursor<'old> {
    tree: &'old SyntaxTree,
    declarations: Vec<NodeId>,
    current: usize,
}

impl<'old> ReuseCursor<'old> {
    pub(crate) fn new(tree: &'old SyntaxTree) -> Self {
        let declarations = tree
            .root_node()
            .children()
            .filter(|node| !node.is_extra())
            .map(|node| node.id())
            .collect();
        Self {
            tree,
            declarations,
            current: 0,
        }
    }

    pub(crate) fn tree(&self) -> &'old SyntaxTree {
        self.tree
    }

    /// Find an untouched declaration starting exactly at `start_byte`.
    pub(crate) fn find_at(&mut self, start_byte: usize) -> Option<NodeId> {
        while let Some(id) = self.declarations.get(self.current) {
            if self.tree.data(*id).start_byte >= start_byte {
                break;
            }
            self.current += 1;
        }
        let id = *self.declarations.get(self.current)?;
        let data = self.tree.data(id);
        if data.start_byte == start_byte
            && !data.has_changes
            && !data.has_error
            && is_self_delimiting(data.kind)
        {
            Some(id)
        } else {
            None
        }
    }
}
