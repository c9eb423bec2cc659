use crate::{
    grammar::NodeKind,
    shader_text::ShaderText,
    syntax::Node,
};

use super::symbols::{ShaderFunction, ShaderInclude, ShaderSymbols};

/// Turns every node of one kind into symbols.
pub trait SymbolTreeParser {
    // The node kind this parser handles
    fn node_kind(&self) -> NodeKind;
    // Process the node & convert it to symbol
    fn process_node(&self, node: Node, text: &ShaderText, symbols: &mut ShaderSymbols);
}

pub(super) fn get_name<'a>(text: &'a ShaderText, node: Node) -> &'a str {
    node.utf8_text(text.as_str())
}

pub(super) struct AzslFunctionTreeParser;

impl AzslFunctionTreeParser {
    // The comment sits before the statement wrapping the signature:
    // (comment) (attributed_function_definition (function_definition (leading_type_function_signature)))
    // Members of a resource group or an aggregate have one more wrapper level.
    fn find_comment(node: Node, text: &ShaderText) -> Option<String> {
        let mut statement = node.parent()?.parent()?;
        if let Some(member) = statement.parent().filter(|parent| {
            matches!(
                parent.kind(),
                NodeKind::SrgMemberDeclaration
                    | NodeKind::ClassMemberDeclaration
                    | NodeKind::StructMemberDeclaration
                    | NodeKind::InterfaceMemberDeclaration
            )
        }) {
            statement = member;
        }
        let previous = statement.prev_named_sibling()?;
        if previous.kind() == NodeKind::Comment {
            Some(get_name(text, previous).to_string())
        } else {
            None
        }
    }
}

impl SymbolTreeParser for AzslFunctionTreeParser {
    fn node_kind(&self) -> NodeKind {
        NodeKind::LeadingTypeFunctionSignature
    }
    fn process_node(&self, node: Node, text: &ShaderText, symbols: &mut ShaderSymbols) {
        // First identifier of the signature. A user defined return type or an
        // owner qualifier comes before the declared name and is taken instead.
        let Some(identifier) = node
            .descendants()
            .find(|descendant| descendant.kind() == NodeKind::Identifier)
        else {
            return;
        };
        symbols.functions.push(ShaderFunction {
            name: get_name(text, identifier).to_string(),
            text: get_name(text, node).to_string(),
            comment: Self::find_comment(node, text),
            range: text.range_of(node.start_byte(), node.end_byte()),
            node: node.id(),
        });
    }
}

pub(super) struct AzslIncludeTreeParser;

impl SymbolTreeParser for AzslIncludeTreeParser {
    fn node_kind(&self) -> NodeKind {
        NodeKind::IncludeFile
    }
    fn process_node(&self, node: Node, text: &ShaderText, symbols: &mut ShaderSymbols) {
        let path = get_name(text, node);
        if path.is_empty() {
            return;
        }
        symbols.includes.push(ShaderInclude {
            path: path.to_string(),
            range: text.range_of(node.start_byte(), node.end_byte()),
        });
    }
}
