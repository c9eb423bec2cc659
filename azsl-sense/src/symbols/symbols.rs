use std::collections::HashMap;

use url::Url;

use crate::{position::ShaderRange, syntax::NodeId};

/// A function declared or defined in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderFunction {
    pub name: String,
    /// Source text of the signature, `void main()` for `void main() { ... }`.
    pub text: String,
    /// Comment directly preceding the declaration, if any.
    pub comment: Option<String>,
    /// Range of the signature.
    pub range: ShaderRange,
    /// Signature node in the document tree the function was collected from.
    pub node: NodeId,
}

impl ShaderFunction {
    /// Text shown on hover: the comment, if any, on top of the signature.
    pub fn format(&self) -> String {
        match &self.comment {
            Some(comment) => format!("{}\n{}", comment, self.text),
            None => self.text.clone(),
        }
    }
}

/// An `#include` as written in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderInclude {
    pub path: String,
    pub range: ShaderRange,
}

/// Everything collected from one syntax tree, in source order.
#[derive(Debug, Default, Clone)]
pub struct ShaderSymbols {
    pub functions: Vec<ShaderFunction>,
    pub includes: Vec<ShaderInclude>,
}

/// Per document index: functions by name and resolved includes.
#[derive(Debug, Default, Clone)]
pub struct ShaderSymbolTable {
    functions: HashMap<String, ShaderFunction>,
    includes: Vec<Url>,
}

impl ShaderSymbolTable {
    /// Later functions replace earlier ones with the same name.
    pub fn from_symbols(symbols: &ShaderSymbols) -> Self {
        let mut table = Self::default();
        for function in &symbols.functions {
            table.add_function(function.clone());
        }
        table
    }
    pub fn add_function(&mut self, function: ShaderFunction) {
        self.functions.insert(function.name.clone(), function);
    }
    pub fn find_function(&self, name: &str) -> Option<&ShaderFunction> {
        self.functions.get(name)
    }
    pub fn functions(&self) -> impl Iterator<Item = &ShaderFunction> {
        self.functions.values()
    }
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
    /// Returns false if the include was already known.
    pub fn add_include(&mut self, uri: Url) -> bool {
        if self.includes.contains(&uri) {
            false
        } else {
            self.includes.push(uri);
            true
        }
    }
    /// Resolved includes, in resolution order.
    pub fn includes(&self) -> &[Url] {
        &self.includes
    }
}
