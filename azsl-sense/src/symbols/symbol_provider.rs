//! Main entry point to inspect symbols from a syntax tree
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    grammar::NodeKind,
    position::ShaderPosition,
    shader_error::{ShaderDiagnostic, ShaderDiagnosticSeverity},
    shader_text::ShaderText,
    syntax::{Node, SyntaxTree},
};

use super::{
    symbol_parser::{AzslFunctionTreeParser, AzslIncludeTreeParser, SymbolTreeParser},
    symbols::ShaderSymbols,
};

pub const PARSE_ERROR_MESSAGE: &str =
    "Failed to parse this code. Some symbols might be missing from providers.";

fn default_max_disk_includes() -> usize {
    64
}

/// Settings of symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShaderSymbolParams {
    /// Directories searched for includes that match no known document.
    pub include_roots: Vec<PathBuf>,
    /// Only documents with one of these extensions resolve pending includes.
    /// Empty means every document does.
    pub retry_extensions: Vec<String>,
    /// Forget a document and its symbols when it is closed.
    pub evict_on_close: bool,
    /// Documents loaded from disk per analysis.
    #[serde(default = "default_max_disk_includes")]
    pub max_disk_includes: usize,
}

impl Default for ShaderSymbolParams {
    fn default() -> Self {
        Self {
            include_roots: Vec::new(),
            retry_extensions: Vec::new(),
            evict_on_close: false,
            max_disk_includes: default_max_disk_includes(),
        }
    }
}

impl ShaderSymbolParams {
    /// Whether analysing `uri` may resolve pending includes.
    pub fn can_resolve_pending(&self, uri: &Url) -> bool {
        self.retry_extensions.is_empty()
            || self
                .retry_extensions
                .iter()
                .any(|extension| uri.path().ends_with(extension.as_str()))
    }
}

/// A symbol provider is responsible of walking a syntax tree in order to find all
/// functions and includes and return them as [`ShaderSymbols`].
pub struct SymbolProvider {
    symbol_parsers: Vec<Box<dyn SymbolTreeParser>>,
}

impl Default for SymbolProvider {
    fn default() -> Self {
        Self::azsl()
    }
}

impl SymbolProvider {
    pub fn azsl() -> Self {
        Self::new(vec![
            Box::new(AzslFunctionTreeParser),
            Box::new(AzslIncludeTreeParser),
        ])
    }
    pub fn new(symbol_parsers: Vec<Box<dyn SymbolTreeParser>>) -> Self {
        Self { symbol_parsers }
    }
    /// Collect symbols of a tree. Error regions are skipped.
    pub fn query_file_symbols(&self, tree: &SyntaxTree, text: &ShaderText) -> ShaderSymbols {
        let mut symbols = ShaderSymbols::default();
        let root = tree.root_node();
        for parser in &self.symbol_parsers {
            for node in root.descendants_of_kind(parser.node_kind()) {
                parser.process_node(node, text, &mut symbols);
            }
        }
        symbols
    }
    /// One warning per outermost error region.
    pub fn query_file_errors(
        &self,
        uri: &Url,
        tree: &SyntaxTree,
        text: &ShaderText,
    ) -> Vec<ShaderDiagnostic> {
        tree.root_node()
            .errors()
            .into_iter()
            .map(|node| ShaderDiagnostic {
                severity: ShaderDiagnosticSeverity::Warning,
                error: PARSE_ERROR_MESSAGE.into(),
                range: text
                    .range_of(node.start_byte(), node.end_byte())
                    .into_file(uri.clone()),
            })
            .collect()
    }
    /// Name of the function called at `position`, if the identifier there is a call target.
    pub fn find_call_at_position<'a>(
        &self,
        tree: &SyntaxTree,
        text: &'a ShaderText,
        position: &ShaderPosition,
    ) -> Option<&'a str> {
        let point = text.point_at(text.offset_at(position));
        let node = tree
            .root_node()
            .named_descendant_for_point_range(point, point);
        if is_call_reference(node) {
            Some(node.utf8_text(text.as_str()))
        } else {
            None
        }
    }
}

/// Whether an identifier is the target of a call, purely from tree shape:
/// `(expression (expression (id_expression (identifier))) (argument_list))`.
/// Qualified names and member accesses reach the same shape through their
/// `id_expression` and the postfix `expression` wrapping them.
pub fn is_call_reference(node: Node) -> bool {
    if node.kind() != NodeKind::Identifier {
        return false;
    }
    let mut ancestor = node.parent();
    while let Some(current) = ancestor {
        match current.kind() {
            NodeKind::IdExpression => ancestor = current.parent(),
            NodeKind::Expression => {
                let mut sibling = current.next_named_sibling();
                while let Some(next) = sibling.filter(|next| next.is_extra()) {
                    sibling = next.next_named_sibling();
                }
                return sibling.is_some_and(|next| next.kind() == NodeKind::ArgumentList);
            }
            _ => return false,
        }
    }
    false
}
