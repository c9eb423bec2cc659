//! AZSL grammar: token table, keyword tables and the recursive descent productions
//! that build a [`crate::syntax::SyntaxTree`].
mod declarations;
mod expressions;
pub mod lexer;
mod parser;
mod statements;
mod types;

use std::fmt;

pub use parser::AzslParser;

macro_rules! node_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// Type tag of a syntax node. Every grammar rule has its own kind, anonymous
        /// tokens (punctuation, keywords) all share [`NodeKind::Token`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant,)*
        }

        impl NodeKind {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $name,)*
                }
            }
        }
    };
}

node_kinds! {
    SourceFile => "source_file",
    Token => "token",
    Error => "ERROR",
    Comment => "comment",
    PreprocDirective => "preproc_directive",

    IncludeStatement => "include_statement",
    IncludeFile => "include_file",

    AttributedSrgDefinition => "attributed_srg_definition",
    SrgDefinition => "srg_definition",
    SrgMemberDeclaration => "srg_member_declaration",
    AttributedSrgSemantic => "attributed_srg_semantic",
    SrgSemantic => "srg_semantic",
    SrgSemanticBodyDeclaration => "srg_semantic_body_declaration",
    SrgSemanticMemberDeclaration => "srg_semantic_member_declaration",

    Expression => "expression",
    ExpressionExt => "expression_ext",
    PrefixUnaryOperator => "prefix_unary_operator",
    PostfixUnaryOperator => "postfix_unary_operator",
    BinaryOperator => "binary_operator",
    AssignmentOperator => "assignment_operator",
    IdExpression => "id_expression",
    Identifier => "identifier",
    ArgumentList => "argument_list",

    VariableDeclarationStatement => "variable_declaration_statement",
    VariableDeclaration => "variable_declaration",
    VariableDeclarators => "variable_declarators",
    NamedVariableDecorator => "named_variable_decorator",
    ArrayRankSpecifier => "array_rank_specifier",
    HlslSemantic => "hlsl_semantic",
    HlslSemanticStream => "hlsl_semantic_stream",
    HlslSemanticSystem => "hlsl_semantic_system",
    PackOffsetNode => "pack_offset_node",
    RegisterAllocation => "register_allocation",
    VariableInitializer => "variable_initializer",
    StandardVariableInitializer => "standard_variable_initializer",
    ArrayElementInitializers => "array_element_initializers",

    AttributeSpecifierAny => "attribute_specifier_any",
    AttributeSpecifier => "attribute_specifier",
    AttributeSpecifierSequence => "attribute_specifier_sequence",
    AttributeArguments => "attribute_arguments",
    AttributeArgumentList => "attribute_argument_list",
    Attribute => "attribute",

    SamplerBodyDeclaration => "sampler_body_declaration",
    SamplerMemberDeclaration => "sampler_member_declaration",
    FilterModeEnum => "filter_mode_enum",
    ReductionTypeEnum => "reduction_type_enum",
    AddressModeEnum => "address_mode_enum",
    ComparisonFunctionEnum => "comparison_function_enum",
    BorderColorEnum => "border_color_enum",

    AnyStructuredTypeDefinition => "any_structured_type_definition",
    AnyStructuredTypeDefinitionStatement => "any_structured_type_definition_statement",
    ClassDefinition => "class_definition",
    BaseList => "base_list",
    ClassMemberDeclaration => "class_member_declaration",
    InterfaceDefinition => "interface_definition",
    InterfaceMemberDeclaration => "interface_member_declaration",
    StructDefinitionStatement => "struct_definition_statement",
    StructDefinition => "struct_definition",
    StructMemberDeclaration => "struct_member_declaration",
    EnumDefinitionStatement => "enum_definition_statement",
    EnumDefinition => "enum_definition",
    EnumKey => "enum_key",
    EnumeratorListDefinition => "enumerator_list_definition",
    EnumeratorDeclarator => "enumerator_declarator",
    AssociatedTypeDeclaration => "associated_type_declaration",

    AttributedFunctionDeclaration => "attributed_function_declaration",
    AttributedFunctionDefinition => "attributed_function_definition",
    FunctionDeclaration => "function_declaration",
    FunctionDefinition => "function_definition",
    LeadingTypeFunctionSignature => "leading_type_function_signature",
    GenericParameterList => "generic_parameter_list",
    GenericTypeDefinition => "generic_type_definition",
    GenericConstraint => "generic_constraint",
    FunctionParams => "function_params",
    FunctionParam => "function_param",

    Block => "block",
    Statement => "statement",
    EmbeddedStatement => "embedded_statement",
    ElseClause => "else_clause",
    SwitchBlock => "switch_block",
    SwitchSection => "switch_section",
    SwitchLabel => "switch_label",
    ForInitializer => "for_initializer",

    CompilerExtensionStatement => "compiler_extension_statement",
    TypeofExpression => "typeof_expression",
    TypeAliasingDefinitionStatement => "type_aliasing_definition_statement",
    TypeAliasStatement => "type_alias_statement",
    TypedefStatement => "typedef_statement",

    Type => "type",
    UserDefinedType => "user_defined_type",
    PredefinedType => "predefined_type",
    BufferPredefinedType => "buffer_predefined_type",
    ByteAddressBufferTypes => "byte_address_buffer_types",
    PatchPredefinedType => "patch_predefined_type",
    BufferType => "buffer_type",
    ScalarOrVectorOrMatrixType => "scalar_or_vector_or_matrix_type",
    ScalarType => "scalar_type",
    VectorType => "vector_type",
    MatrixType => "matrix_type",
    GenericMatrixPredefinedType => "generic_matrix_predefined_type",
    SamplerStatePredefinedType => "sampler_state_predefined_type",
    StreamOutputPredefinedType => "stream_output_predefined_type",
    StructuredBufferPredefinedType => "structured_buffer_predefined_type",
    TexturePredefinedType => "texture_predefined_type",
    GenericTexturePredefinedType => "generic_texture_predefined_type",
    MsTexturePredefinedType => "ms_texture_predefined_type",
    GenericVectorType => "generic_vector_type",
    ConstantBufferTemplated => "constant_buffer_templated",
    OtherViewResourceType => "other_view_resource_type",
    SubobjectType => "subobject_type",
    RtxBuiltInTypes => "rtx_built_in_types",
    StorageFlag => "storage_flag",

    Literal => "literal",
    FloatLiteral => "float_literal",
    IntegerLiteral => "integer_literal",
    StringLiteral => "string_literal",
    EscapeSequence => "escape_sequence",
}

impl NodeKind {
    /// Anonymous tokens are not named, every rule is.
    pub fn is_named(&self) -> bool {
        *self != NodeKind::Token
    }
    /// Extras may appear between any two tokens and belong to no production.
    pub fn is_extra(&self) -> bool {
        matches!(self, NodeKind::Comment | NodeKind::PreprocDirective)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
