use azsl_sense::{
    position::{ShaderFileRange, ShaderPosition, ShaderRange},
    shader_error::ShaderDiagnosticSeverity,
};
use lsp_types::{DiagnosticSeverity, Location, Position, Range};

pub fn lsp_position_to_shader_position(position: &Position) -> ShaderPosition {
    ShaderPosition::new(position.line, position.character)
}

pub fn shader_position_to_lsp_position(position: &ShaderPosition) -> Position {
    Position::new(position.line, position.pos)
}

pub fn lsp_range_to_shader_range(range: &Range) -> ShaderRange {
    ShaderRange::new(
        lsp_position_to_shader_position(&range.start),
        lsp_position_to_shader_position(&range.end),
    )
}

pub fn shader_range_to_lsp_range(range: &ShaderRange) -> Range {
    Range::new(
        shader_position_to_lsp_position(&range.start),
        shader_position_to_lsp_position(&range.end),
    )
}

pub fn shader_range_to_location(range: &ShaderFileRange) -> Location {
    Location::new(range.file.clone(), shader_range_to_lsp_range(&range.range))
}

pub fn shader_severity_to_lsp_severity(severity: ShaderDiagnosticSeverity) -> DiagnosticSeverity {
    match severity {
        ShaderDiagnosticSeverity::Error => DiagnosticSeverity::ERROR,
        ShaderDiagnosticSeverity::Warning => DiagnosticSeverity::WARNING,
        ShaderDiagnosticSeverity::Information => DiagnosticSeverity::INFORMATION,
        ShaderDiagnosticSeverity::Hint => DiagnosticSeverity::HINT,
    }
}

#[cfg(test)]
mod tests {
    use lsp_types::Url;

    use super::*;

    #[test]
    fn test_location_from_range() {
        let file = Url::parse("file:///project/shared.azsli").unwrap();
        let range = ShaderRange::at(ShaderPosition::new(4, 2)).into_file(file.clone());
        let location = shader_range_to_location(&range);
        assert_eq!(location.uri, file);
        assert_eq!(location.range.start, Position::new(4, 2));
        assert_eq!(location.range.end, Position::new(4, 2));
    }

    #[test]
    fn test_range_conversion() {
        let range = Range::new(Position::new(1, 3), Position::new(2, 0));
        assert_eq!(shader_range_to_lsp_range(&lsp_range_to_shader_range(&range)), range);
    }
}
