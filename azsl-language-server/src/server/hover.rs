use lsp_types::{Hover, HoverContents, HoverParams, MarkupContent, MarkupKind};

use super::{common::lsp_position_to_shader_position, ServerLanguage};

impl ServerLanguage {
    pub fn recolt_hover(&self, params: &HoverParams) -> Option<Hover> {
        let position = &params.text_document_position_params;
        let text = self.workspace.resolve_hover(
            &position.text_document.uri,
            &lsp_position_to_shader_position(&position.position),
        )?;
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: format!("```hlsl\n{}\n```", text),
            }),
            range: None,
        })
    }
}
