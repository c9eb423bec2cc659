use azsl_sense::position::ShaderRange;
use lsp_types::{GotoDefinitionParams, GotoDefinitionResponse};

use super::{
    common::{lsp_position_to_shader_position, shader_range_to_location},
    ServerLanguage,
};

impl ServerLanguage {
    /// Zero width location at the start of the called function declaration.
    pub fn recolt_goto(&self, params: &GotoDefinitionParams) -> Option<GotoDefinitionResponse> {
        let position = &params.text_document_position_params;
        let (uri, start) = self.workspace.resolve_definition(
            &position.text_document.uri,
            &lsp_position_to_shader_position(&position.position),
        )?;
        let location = shader_range_to_location(&ShaderRange::at(start).into_file(uri));
        Some(GotoDefinitionResponse::Scalar(location))
    }
}
