mod symbol_parser;
pub mod symbol_provider;
pub mod symbols;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{grammar::AzslParser, shader_text::ShaderText};

    use super::{symbol_provider::SymbolProvider, symbols::ShaderSymbolTable};

    fn get_symbols(file_path: &Path) -> ShaderSymbolTable {
        let shader_content = std::fs::read_to_string(file_path).unwrap();
        let text = ShaderText::new(shader_content);
        let tree = AzslParser::new().parse(text.as_str(), None);
        let symbols = SymbolProvider::azsl().query_file_symbols(&tree, &text);
        ShaderSymbolTable::from_symbols(&symbols)
    }

    #[test]
    fn symbols_azsl_ok() {
        // Ensure parsing of symbols is OK
        let symbols = get_symbols(Path::new("./test/azsl/main.azsl"));
        assert!(symbols.find_function("MainPS").is_some());
        // Named after its return type.
        let vertex = symbols.find_function("VSOutput").unwrap();
        assert!(vertex.text.starts_with("VSOutput MainVS("));
        assert!(symbols.find_function("MainVS").is_none());
    }

    #[test]
    fn symbols_azsli_ok() {
        let symbols = get_symbols(Path::new("./test/azsl/shared.azsli"));
        let helper = symbols.find_function("ComputeLighting").unwrap();
        assert_eq!(
            helper.comment.as_deref(),
            Some("// Lambert term of a single light.")
        );
        assert!(helper.text.starts_with("float3 ComputeLighting("));
    }

    #[test]
    fn symbols_duplicate_ok() {
        let symbols = get_symbols(Path::new("./test/azsl/duplicates.azsl"));
        assert_eq!(symbols.function_count(), 1);
        let last = symbols.find_function("Blend").unwrap();
        assert_eq!(last.text, "float4 Blend(float4 a, float4 b, float t)");
    }
}
