use lsp_types::{DocumentSymbol, SymbolKind, Url};

use super::{common::shader_range_to_lsp_range, ServerLanguage};

impl ServerLanguage {
    pub fn recolt_document_symbol(&self, uri: &Url) -> Vec<DocumentSymbol> {
        self.workspace
            .document_functions(uri)
            .into_iter()
            .map(|function| {
                let range = shader_range_to_lsp_range(&function.range);
                #[allow(deprecated)]
                // https://github.com/rust-lang/rust/issues/102777
                DocumentSymbol {
                    name: function.name.clone(),
                    detail: Some(function.text.clone()),
                    kind: SymbolKind::FUNCTION,
                    tags: None,
                    deprecated: None,
                    range,
                    selection_range: range,
                    children: None,
                }
            })
            .collect()
    }
}
