use super::{
    lexer::TokenKind,
    parser::{Backtrack, PResult, Parser, Recovery},
    types::{
        ADDRESS_MODES, BORDER_COLORS, COMPARISON_FUNCTIONS, FILTER_MODES, REDUCTION_TYPES,
    },
    NodeKind,
};

const COMPILER_EXTENSIONS: &[&str] = &["__azslc_print_message", "__azslc_print_symbol"];
const PRINT_SYMBOL_QUALIFIERS: &[&str] = &[
    "__azslc_prtsym_fully_qualified",
    "__azslc_prtsym_least_qualified",
    "__azslc_prtsym_constint_value",
];
pub(super) const STRUCTURED_KEYWORDS: &[&str] = &["struct", "class", "interface", "enum"];

// Members allowed in a struct, a class or a shader resource group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberScope {
    Aggregate,
    ResourceGroup,
}

impl<'a> Parser<'a> {
    /// Lookahead index of the first token after a run of `[...]` attributes.
    pub(super) fn skip_attributes(&self) -> usize {
        let mut n = 0;
        while self.nth_at(n, "[") {
            let mut depth = 0usize;
            loop {
                if self.nth(n).is_none() {
                    return n;
                }
                if self.nth_at(n, "[") {
                    depth += 1;
                } else if self.nth_at(n, "]") {
                    depth -= 1;
                    if depth == 0 {
                        n += 1;
                        break;
                    }
                }
                n += 1;
            }
        }
        n
    }

    pub(super) fn at_compiler_extension(&self) -> bool {
        self.at_any(COMPILER_EXTENSIONS)
    }

    pub(super) fn top_level_declaration(&mut self) -> PResult {
        if self.at_kind(TokenKind::IncludeDirective) {
            return self.include_statement();
        }
        if self.eat(";") {
            return Ok(());
        }
        if self.at_compiler_extension() {
            return self.compiler_extension_statement();
        }
        if self.at_any(&["typealias", "typedef"]) {
            return self.type_aliasing_definition_statement();
        }
        let attributes = self.skip_attributes();
        match self.nth_text(attributes) {
            "partial" | "ShaderResourceGroup" => self.attributed_srg_definition(),
            "ShaderResourceGroupSemantic" => self.attributed_srg_semantic(),
            keyword if STRUCTURED_KEYWORDS.contains(&keyword) => self
                .attempt(|parser| parser.any_structured_type_definition_statement())
                .or_else(|_| self.variable_declaration_statement()),
            _ => {
                if self.attempt(|parser| parser.attributed_function()).is_ok() {
                    return Ok(());
                }
                if attributes > 0 && self.at_attribute_sequence() {
                    return self.attribute_specifier_sequence();
                }
                self.variable_declaration_statement()
            }
        }
    }

    pub(super) fn include_statement(&mut self) -> PResult {
        self.node(NodeKind::IncludeStatement, |parser| {
            parser.bump();
            let closing = match parser.nth_text(0) {
                "\"" => "\"",
                "<" => ">",
                _ => return Err(Backtrack),
            };
            parser.bump();
            if !parser.at_kind(TokenKind::IncludePath) {
                return Err(Backtrack);
            }
            parser.bump_as(NodeKind::IncludeFile);
            parser.expect(closing)
        })
    }

    // Functions

    /// `attributed_function_definition` or `attributed_function_declaration`,
    /// decided by what follows the signature.
    pub(super) fn attributed_function(&mut self) -> PResult {
        let outer = self.checkpoint();
        self.attribute_specifiers()?;
        let inner = self.checkpoint();
        self.leading_type_function_signature()?;
        let attributed = if self.at(";") {
            self.start_node_at(inner, NodeKind::FunctionDeclaration);
            self.bump();
            NodeKind::AttributedFunctionDeclaration
        } else if self.at("{") {
            self.start_node_at(inner, NodeKind::FunctionDefinition);
            self.block()?;
            NodeKind::AttributedFunctionDefinition
        } else {
            return Err(Backtrack);
        };
        self.finish_node();
        self.start_node_at(outer, attributed);
        self.finish_node();
        Ok(())
    }

    fn attributed_function_declaration(&mut self) -> PResult {
        self.node(NodeKind::AttributedFunctionDeclaration, |parser| {
            parser.attribute_specifiers()?;
            parser.node(NodeKind::FunctionDeclaration, |parser| {
                parser.leading_type_function_signature()?;
                parser.expect(";")
            })
        })
    }

    fn leading_type_function_signature(&mut self) -> PResult {
        self.node(NodeKind::LeadingTypeFunctionSignature, |parser| {
            parser.storage_flags();
            parser.type_()?;
            // `Type Owner::name(...)`
            let segments = parser.qualified_name_len();
            if segments > 1 {
                parser.node(NodeKind::UserDefinedType, |parser| {
                    parser.id_expression_segments(segments - 1)
                })?;
                parser.expect("::")?;
            }
            parser.identifier()?;
            if parser.at("<") {
                parser.generic_parameter_list()?;
            }
            parser.expect("(")?;
            if !parser.at(")") {
                parser.function_params()?;
            }
            parser.expect(")")?;
            parser.eat("override");
            if parser.at(":") {
                parser.hlsl_semantic()?;
            }
            Ok(())
        })
    }

    fn generic_parameter_list(&mut self) -> PResult {
        self.node(NodeKind::GenericParameterList, |parser| {
            parser.expect("<")?;
            parser.generic_type_definition()?;
            while parser.eat(",") {
                parser.generic_type_definition()?;
            }
            parser.expect(">")
        })
    }

    fn generic_type_definition(&mut self) -> PResult {
        self.node(NodeKind::GenericTypeDefinition, |parser| {
            parser.identifier()?;
            if parser.at(":") {
                parser.generic_constraint()?;
            }
            Ok(())
        })
    }

    fn generic_constraint(&mut self) -> PResult {
        self.node(NodeKind::GenericConstraint, |parser| {
            parser.expect(":")?;
            parser.user_defined_type()
        })
    }

    fn function_params(&mut self) -> PResult {
        self.node(NodeKind::FunctionParams, |parser| {
            parser.function_param()?;
            while parser.eat(",") {
                parser.function_param()?;
            }
            Ok(())
        })
    }

    fn function_param(&mut self) -> PResult {
        self.node(NodeKind::FunctionParam, |parser| {
            parser.attribute_specifiers()?;
            parser.storage_flags();
            parser.type_()?;
            if parser.at_identifier() {
                parser.identifier()?;
            }
            parser.declarator_suffix()
        })
    }

    // Variables

    pub(super) fn variable_declaration_statement(&mut self) -> PResult {
        self.node(NodeKind::VariableDeclarationStatement, |parser| {
            parser.variable_declaration()?;
            parser.expect(";")
        })
    }

    pub(super) fn variable_declaration(&mut self) -> PResult {
        self.node(NodeKind::VariableDeclaration, |parser| {
            parser.storage_flags();
            parser.type_()?;
            parser.node(NodeKind::VariableDeclarators, |parser| {
                parser.named_variable_decorator()?;
                while parser.eat(",") {
                    parser.named_variable_decorator()?;
                }
                Ok(())
            })
        })
    }

    fn named_variable_decorator(&mut self) -> PResult {
        self.node(NodeKind::NamedVariableDecorator, |parser| {
            parser.identifier()?;
            parser.declarator_suffix()
        })
    }

    // Array ranks, semantic, packoffset, register and initializer after a name.
    fn declarator_suffix(&mut self) -> PResult {
        while self.at("[") {
            self.array_rank_specifier()?;
        }
        if self.at(":") && !self.nth_at(1, "packoffset") && !self.nth_at(1, "register") {
            self.hlsl_semantic()?;
        }
        if self.at(":") && self.nth_at(1, "packoffset") {
            self.pack_offset_node()?;
        }
        if self.at(":") && self.nth_at(1, "register") {
            self.register_allocation()?;
        }
        if self.at_any(&["=", "{"]) {
            self.variable_initializer()?;
        }
        Ok(())
    }

    pub(super) fn array_rank_specifier(&mut self) -> PResult {
        self.node(NodeKind::ArrayRankSpecifier, |parser| {
            parser.expect("[")?;
            if !parser.at("]") {
                parser.expression()?;
            }
            parser.expect("]")
        })
    }

    fn hlsl_semantic(&mut self) -> PResult {
        self.node(NodeKind::HlslSemantic, |parser| {
            parser.expect(":")?;
            if !parser.at_kind(TokenKind::Word) {
                return Err(Backtrack);
            }
            let kind = parser.lexer().semantic_kind(parser.nth_text(0));
            parser.bump_as(kind);
            Ok(())
        })
    }

    fn pack_offset_node(&mut self) -> PResult {
        self.node(NodeKind::PackOffsetNode, |parser| {
            parser.expect(":")?;
            parser.expect("packoffset")?;
            parser.expect("(")?;
            parser.identifier()?;
            if parser.eat(".") {
                parser.identifier()?;
            }
            parser.expect(")")
        })
    }

    fn register_allocation(&mut self) -> PResult {
        self.node(NodeKind::RegisterAllocation, |parser| {
            parser.expect(":")?;
            parser.expect("register")?;
            parser.expect("(")?;
            parser.identifier()?;
            parser.expect(")")
        })
    }

    fn variable_initializer(&mut self) -> PResult {
        self.node(NodeKind::VariableInitializer, |parser| {
            if parser.eat("=") {
                parser.standard_variable_initializer()
            } else {
                parser.sampler_body_declaration()
            }
        })
    }

    fn standard_variable_initializer(&mut self) -> PResult {
        self.nested(|parser| {
            parser.node(NodeKind::StandardVariableInitializer, |parser| {
                if !parser.eat("{") {
                    return parser.expression();
                }
                parser.node(NodeKind::ArrayElementInitializers, |parser| {
                    parser.standard_variable_initializer()?;
                    while parser.eat(",") {
                        if parser.at("}") {
                            break;
                        }
                        parser.standard_variable_initializer()?;
                    }
                    Ok(())
                })?;
                parser.expect("}")
            })
        })
    }

    fn sampler_body_declaration(&mut self) -> PResult {
        self.node(NodeKind::SamplerBodyDeclaration, |parser| {
            parser.expect("{")?;
            while !parser.at("}") {
                parser.sampler_member_declaration()?;
            }
            parser.expect("}")
        })
    }

    fn sampler_member_declaration(&mut self) -> PResult {
        self.node(NodeKind::SamplerMemberDeclaration, |parser| {
            let field = parser.nth_text(0);
            parser.bump();
            parser.expect("=")?;
            match field {
                "MaxAnisotropy" => parser.signed_number(NodeKind::IntegerLiteral)?,
                "MinFilter" | "MagFilter" | "MipFilter" => {
                    parser.enum_value(NodeKind::FilterModeEnum, FILTER_MODES)?
                }
                "ReductionType" => parser.enum_value(NodeKind::ReductionTypeEnum, REDUCTION_TYPES)?,
                "ComparisonFunc" => {
                    parser.enum_value(NodeKind::ComparisonFunctionEnum, COMPARISON_FUNCTIONS)?
                }
                "AddressU" | "AddressV" | "AddressW" => {
                    parser.enum_value(NodeKind::AddressModeEnum, ADDRESS_MODES)?
                }
                "MinLOD" | "MaxLOD" | "MipLODBias" => parser.signed_number(NodeKind::FloatLiteral)?,
                "BorderColor" => parser.enum_value(NodeKind::BorderColorEnum, BORDER_COLORS)?,
                _ => return Err(Backtrack),
            }
            parser.expect(";")
        })
    }

    fn enum_value(&mut self, kind: NodeKind, values: &[&str]) -> PResult {
        if !self.at_any(values) {
            return Err(Backtrack);
        }
        self.token_node(kind);
        Ok(())
    }

    // Numbers in sampler states take an optional sign as part of the literal.
    fn signed_number(&mut self, kind: NodeKind) -> PResult {
        let signed = self.at_any(&["+", "-"]) && self.adjacent(0);
        let number = usize::from(signed);
        let accepted = match kind {
            NodeKind::IntegerLiteral => self.nth_kind(number) == Some(TokenKind::IntegerLiteral),
            _ => matches!(
                self.nth_kind(number),
                Some(TokenKind::FloatLiteral | TokenKind::IntegerLiteral)
            ),
        };
        if !accepted {
            return Err(Backtrack);
        }
        self.bump_joined(number + 1, kind);
        Ok(())
    }

    // Attributes

    fn at_attribute_sequence(&self) -> bool {
        self.at("[") && self.nth_at(1, "[") && self.adjacent(0)
    }

    /// Any number of `attribute_specifier_any`.
    pub(super) fn attribute_specifiers(&mut self) -> PResult {
        while self.at("[") {
            self.node(NodeKind::AttributeSpecifierAny, |parser| {
                if parser.at_attribute_sequence() {
                    parser.attribute_specifier_sequence()
                } else {
                    parser.attribute_specifier()
                }
            })?;
        }
        Ok(())
    }

    pub(super) fn attribute_specifier(&mut self) -> PResult {
        self.node(NodeKind::AttributeSpecifier, |parser| {
            parser.expect("[")?;
            parser.attribute()?;
            parser.expect("]")
        })
    }

    fn attribute_specifier_sequence(&mut self) -> PResult {
        self.node(NodeKind::AttributeSpecifierSequence, |parser| {
            if !parser.at_attribute_sequence() {
                return Err(Backtrack);
            }
            parser.bump_joined(2, NodeKind::Token);
            parser.attribute()?;
            while parser.eat(",") {
                parser.attribute()?;
            }
            if !(parser.at("]") && parser.nth_at(1, "]") && parser.adjacent(0)) {
                return Err(Backtrack);
            }
            parser.bump_joined(2, NodeKind::Token);
            Ok(())
        })
    }

    fn attribute(&mut self) -> PResult {
        self.node(NodeKind::Attribute, |parser| {
            if parser.at("global") && parser.nth_at(1, "::") {
                parser.bump();
                parser.bump();
            }
            parser.identifier()?;
            if parser.eat("::") {
                parser.identifier()?;
            }
            if parser.at("(") {
                parser.attribute_argument_list()?;
            }
            Ok(())
        })
    }

    fn attribute_argument_list(&mut self) -> PResult {
        self.node(NodeKind::AttributeArgumentList, |parser| {
            parser.expect("(")?;
            loop {
                parser.node(NodeKind::AttributeArguments, |parser| {
                    if parser.at_literal() {
                        parser.literal()
                    } else {
                        parser.id_expression()
                    }
                })?;
                if !parser.eat(",") && parser.at(")") {
                    break;
                }
            }
            parser.expect(")")
        })
    }

    // Structured types

    pub(super) fn any_structured_type_definition_statement(&mut self) -> PResult {
        self.node(NodeKind::AnyStructuredTypeDefinitionStatement, |parser| {
            parser.attribute_specifiers()?;
            parser.any_structured_type_definition()?;
            parser.expect(";")
        })
    }

    pub(super) fn any_structured_type_definition(&mut self) -> PResult {
        self.nested(|parser| {
            parser.node(NodeKind::AnyStructuredTypeDefinition, |parser| {
                match parser.nth_text(0) {
                    "class" => parser.class_definition(),
                    "interface" => parser.interface_definition(),
                    "struct" => parser.struct_definition(),
                    "enum" => parser.enum_definition(),
                    _ => Err(Backtrack),
                }
            })
        })
    }

    /// `{ member* }` where members that fail to parse become `ERROR` nodes.
    fn member_block(&mut self, member: impl Fn(&mut Self) -> PResult) -> PResult {
        self.expect("{")?;
        loop {
            if self.eat("}") {
                return Ok(());
            }
            if self.at_eof() {
                self.missing_at_end();
                return Ok(());
            }
            let start = self.nth(0).map(|token| token.start);
            if self.attempt(&member).is_err() || self.nth(0).map(|token| token.start) == start {
                self.recover(Recovery::Block);
            }
        }
    }

    fn class_definition(&mut self) -> PResult {
        self.node(NodeKind::ClassDefinition, |parser| {
            parser.expect("class")?;
            parser.identifier()?;
            if parser.at(":") {
                parser.node(NodeKind::BaseList, |parser| {
                    parser.bump();
                    parser.id_expression()?;
                    while parser.eat(",") {
                        parser.id_expression()?;
                    }
                    Ok(())
                })?;
            }
            parser.member_block(|parser| {
                parser.node(NodeKind::ClassMemberDeclaration, |parser| {
                    parser.member_declaration(MemberScope::Aggregate)
                })
            })
        })
    }

    fn struct_definition(&mut self) -> PResult {
        self.node(NodeKind::StructDefinition, |parser| {
            parser.expect("struct")?;
            parser.identifier()?;
            parser.member_block(|parser| {
                parser.node(NodeKind::StructMemberDeclaration, |parser| {
                    parser.member_declaration(MemberScope::Aggregate)
                })
            })
        })
    }

    fn interface_definition(&mut self) -> PResult {
        self.node(NodeKind::InterfaceDefinition, |parser| {
            parser.expect("interface")?;
            parser.identifier()?;
            parser.member_block(|parser| {
                parser.node(NodeKind::InterfaceMemberDeclaration, |parser| {
                    if parser.at("associatedtype") {
                        parser.associated_type_declaration()
                    } else if STRUCTURED_KEYWORDS.contains(&parser.nth_text(parser.skip_attributes())) {
                        parser.any_structured_type_definition_statement()
                    } else {
                        parser.attributed_function_declaration()
                    }
                })
            })
        })
    }

    fn associated_type_declaration(&mut self) -> PResult {
        self.node(NodeKind::AssociatedTypeDeclaration, |parser| {
            parser.expect("associatedtype")?;
            parser.identifier()?;
            if parser.at(":") {
                parser.generic_constraint()?;
            }
            parser.expect(";")
        })
    }

    fn enum_definition(&mut self) -> PResult {
        self.node(NodeKind::EnumDefinition, |parser| {
            parser.node(NodeKind::EnumKey, |parser| {
                parser.expect("enum")?;
                if parser.at_any(&["class", "struct"]) {
                    parser.bump();
                }
                Ok(())
            })?;
            parser.identifier()?;
            parser.member_block(|parser| {
                parser.node(NodeKind::EnumeratorListDefinition, |parser| {
                    parser.enumerator_declarator()?;
                    while parser.eat(",") {
                        if parser.at("}") {
                            break;
                        }
                        parser.enumerator_declarator()?;
                    }
                    Ok(())
                })
            })
        })
    }

    fn enumerator_declarator(&mut self) -> PResult {
        self.node(NodeKind::EnumeratorDeclarator, |parser| {
            parser.identifier()?;
            if parser.eat("=") {
                parser.expression()?;
            }
            Ok(())
        })
    }

    fn member_declaration(&mut self, scope: MemberScope) -> PResult {
        if self.at_any(&["typealias", "typedef"]) {
            return self.type_aliasing_definition_statement();
        }
        let attributes = self.skip_attributes();
        let keyword = self.nth_text(attributes);
        if scope == MemberScope::ResourceGroup && attributes == 0 {
            match keyword {
                "struct" => {
                    return self.node(NodeKind::StructDefinitionStatement, |parser| {
                        parser.struct_definition()?;
                        parser.expect(";")
                    })
                }
                "enum" => {
                    return self.node(NodeKind::EnumDefinitionStatement, |parser| {
                        parser.enum_definition()?;
                        parser.expect(";")
                    })
                }
                _ => {}
            }
        }
        if scope == MemberScope::Aggregate
            && STRUCTURED_KEYWORDS.contains(&keyword)
            && self
                .attempt(|parser| parser.any_structured_type_definition_statement())
                .is_ok()
        {
            return Ok(());
        }
        if self.attempt(|parser| parser.attributed_function()).is_ok() {
            return Ok(());
        }
        if attributes == 0 {
            return self.variable_declaration_statement();
        }
        // Attributes alone
        self.node(NodeKind::AttributeSpecifierAny, |parser| {
            if parser.at_attribute_sequence() {
                parser.attribute_specifier_sequence()
            } else {
                parser.attribute_specifier()
            }
        })
    }

    // Shader resource groups

    fn attributed_srg_definition(&mut self) -> PResult {
        self.node(NodeKind::AttributedSrgDefinition, |parser| {
            parser.attribute_specifiers()?;
            parser.node(NodeKind::SrgDefinition, |parser| {
                parser.eat("partial");
                parser.expect("ShaderResourceGroup")?;
                parser.identifier()?;
                if parser.eat(":") {
                    parser.identifier()?;
                }
                parser.member_block(|parser| {
                    parser.node(NodeKind::SrgMemberDeclaration, |parser| {
                        parser.member_declaration(MemberScope::ResourceGroup)
                    })
                })
            })
        })
    }

    fn attributed_srg_semantic(&mut self) -> PResult {
        self.node(NodeKind::AttributedSrgSemantic, |parser| {
            parser.attribute_specifiers()?;
            parser.node(NodeKind::SrgSemantic, |parser| {
                parser.expect("ShaderResourceGroupSemantic")?;
                parser.identifier()?;
                parser.node(NodeKind::SrgSemanticBodyDeclaration, |parser| {
                    parser.member_block(|parser| {
                        parser.node(NodeKind::SrgSemanticMemberDeclaration, |parser| {
                            if !parser.at_any(&["FrequencyId", "ShaderVariantFallback"]) {
                                return Err(Backtrack);
                            }
                            parser.bump();
                            parser.expect("=")?;
                            parser.literal()?;
                            parser.expect(";")
                        })
                    })
                })
            })
        })
    }

    // Compiler extensions and type aliases

    pub(super) fn compiler_extension_statement(&mut self) -> PResult {
        self.node(NodeKind::CompilerExtensionStatement, |parser| {
            if parser.eat("__azslc_print_message") {
                parser.expect("(")?;
                parser.string_literal()?;
            } else {
                parser.expect("__azslc_print_symbol")?;
                parser.expect("(")?;
                if parser.at("typeof") {
                    parser.typeof_expression()?;
                } else {
                    parser.id_expression()?;
                }
                parser.expect(",")?;
                if !parser.at_any(PRINT_SYMBOL_QUALIFIERS) {
                    return Err(Backtrack);
                }
                parser.bump();
            }
            parser.expect(")")?;
            parser.expect(";")
        })
    }

    pub(super) fn type_aliasing_definition_statement(&mut self) -> PResult {
        self.node(NodeKind::TypeAliasingDefinitionStatement, |parser| {
            if parser.at("typealias") {
                parser.node(NodeKind::TypeAliasStatement, |parser| {
                    parser.bump();
                    parser.identifier()?;
                    parser.expect("=")?;
                    parser.type_()?;
                    parser.expect(";")
                })
            } else {
                parser.node(NodeKind::TypedefStatement, |parser| {
                    parser.expect("typedef")?;
                    parser.type_()?;
                    parser.identifier()?;
                    parser.expect(";")
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::grammar::{AzslParser, NodeKind};

    fn parse_sexp(source: &str) -> String {
        let tree = AzslParser::new().parse(source, None);
        let root = tree.root_node();
        assert!(!root.has_error(), "{}", root.to_sexp());
        root.to_sexp()
    }

    #[test]
    fn test_parse_include() {
        assert_eq!(
            parse_sexp("#include <Atom/Features/SrgSemantics.azsli>\n#include \"a.azsli\""),
            "(source_file (include_statement (include_file)) (include_statement (include_file)))"
        );
    }

    #[test]
    fn test_parse_function_signature() {
        let source = "[[vk::binding(0, 1)]]\nfloat4 MainPS(VSOutput input, uint id : SV_InstanceID) : SV_Target0\n{\n    return input.color;\n}";
        let tree = AzslParser::new().parse(source, None);
        let root = tree.root_node();
        assert!(!root.has_error(), "{}", root.to_sexp());
        let signature = root.descendants_of_kind(NodeKind::LeadingTypeFunctionSignature)[0];
        assert_eq!(
            signature.child_of_kind(NodeKind::Identifier).unwrap().utf8_text(source),
            "MainPS"
        );
        let function = signature.parent().unwrap().parent().unwrap();
        assert_eq!(function.kind(), NodeKind::AttributedFunctionDefinition);
        let semantics: Vec<NodeKind> = root
            .descendants_of_kind(NodeKind::HlslSemantic)
            .iter()
            .map(|semantic| semantic.named_child(0).unwrap().kind())
            .collect();
        assert_eq!(
            semantics,
            vec![NodeKind::HlslSemanticSystem, NodeKind::HlslSemanticSystem]
        );
    }

    #[test]
    fn test_parse_qualified_function_name() {
        let source = "MyType Owner::Method() {}";
        let tree = AzslParser::new().parse(source, None);
        let root = tree.root_node();
        let signature = root.descendants_of_kind(NodeKind::LeadingTypeFunctionSignature)[0];
        assert_eq!(
            signature.child_of_kind(NodeKind::Identifier).unwrap().utf8_text(source),
            "Method"
        );
        assert_eq!(
            signature.child_of_kind(NodeKind::UserDefinedType).unwrap().utf8_text(source),
            "Owner"
        );
    }

    #[test]
    fn test_parse_function_declaration() {
        assert_eq!(
            parse_sexp("void f();"),
            "(source_file (attributed_function_declaration (function_declaration (leading_type_function_signature (type (predefined_type)) (identifier)))))"
        );
    }

    #[test]
    fn test_parse_srg() {
        let source = r#"
ShaderResourceGroupSemantic SRG_PerDraw
{
    FrequencyId = 3;
};
partial ShaderResourceGroup PassSrg : SRG_PerPass
{
    Texture2D<float4> m_texture;
    Sampler m_sampler
    {
        MaxAnisotropy = 16;
        AddressU = Wrap;
        MipLODBias = -0.5;
        ComparisonFunc = LessEqual;
    };
    struct Light { float3 position; };
    float4 Sample(float2 uv) { return m_texture.Sample(m_sampler, uv); }
}
"#;
        let tree = AzslParser::new().parse(source, None);
        let root = tree.root_node();
        assert!(!root.has_error(), "{}", root.to_sexp());
        let kinds: Vec<NodeKind> = root.named_children().map(|node| node.kind()).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::AttributedSrgSemantic, NodeKind::AttributedSrgDefinition]
        );
        let members = root.descendants_of_kind(NodeKind::SrgMemberDeclaration);
        assert_eq!(members.len(), 4);
        let bias = root.descendants_of_kind(NodeKind::FloatLiteral)[0];
        assert_eq!(bias.utf8_text(source), "-0.5");
        assert_eq!(root.descendants_of_kind(NodeKind::SamplerMemberDeclaration).len(), 4);
    }
}
