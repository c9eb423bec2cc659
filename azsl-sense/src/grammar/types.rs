//! Keyword tables (built-in types, storage flags, sampler state values) and the
//! type productions using them.
use super::{
    lexer::TokenKind,
    parser::{Backtrack, PResult, Parser},
    NodeKind,
};

/// Category of a built-in type keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PredefinedKind {
    Void,
    Scalar,
    Vector,
    Matrix,
    Buffer,
    ByteAddressBuffer,
    Patch,
    Sampler,
    StreamOutput,
    StructuredBuffer,
    Texture,
    MsTexture,
    ConstantBuffer,
    OtherViewResource,
    Subobject,
    RtxBuiltIn,
}

// Longest first so that prefixes such as `int` never shadow `uint`.
const SCALAR_TYPES: &[&str] = &[
    "min16float",
    "min10float",
    "min16uint",
    "min16int",
    "min12int",
    "double",
    "dword",
    "float",
    "bool",
    "half",
    "uint",
    "int",
];

const BUFFER_TYPES: &[&str] = &["Buffer", "RWBuffer", "RasterizerOrderedBuffer"];
const BYTE_ADDRESS_BUFFER_TYPES: &[&str] = &[
    "ByteAddressBuffer",
    "RWByteAddressBuffer",
    "RasterizerOrderedByteAddressBuffer",
];
const PATCH_TYPES: &[&str] = &["InputPatch", "OutputPatch"];
const SAMPLER_TYPES: &[&str] = &["sampler", "Sampler", "SamplerState", "SamplerComparisonState"];
const STREAM_OUTPUT_TYPES: &[&str] = &["PointStream", "LineStream", "TriangleStream"];
const STRUCTURED_BUFFER_TYPES: &[&str] = &[
    "AppendStructuredBuffer",
    "ConsumeStructuredBuffer",
    "RWStructuredBuffer",
    "StructuredBuffer",
    "RasterizerOrderedStructuredBuffer",
];
const TEXTURE_TYPES: &[&str] = &[
    "Texture1D",
    "Texture1DArray",
    "RasterizerOrderedTexture1D",
    "RasterizerOrderedTexture1DArray",
    "Texture2D",
    "Texture2DArray",
    "RasterizerOrderedTexture2D",
    "RasterizerOrderedTexture2DArray",
    "Texture3D",
    "RasterizerOrderedTexture3D",
    "TextureCube",
    "TextureCubeArray",
    "RWTexture1D",
    "RWTexture1DArray",
    "RWTexture2D",
    "RWTexture2DArray",
    "RWTexture3D",
    "SubpassInput",
    "SubpassInputMS",
];
const MS_TEXTURE_TYPES: &[&str] = &["Texture2DMS", "Texture2DMSArray"];
const CONSTANT_BUFFER_TYPES: &[&str] = &["ConstantBuffer", "constantBuffer"];
const SUBOBJECT_TYPES: &[&str] = &[
    "StateObjectConfig",
    "LocalRootSignature",
    "GlobalRootSignature",
    "SubobjectToExportsAssociation",
    "RaytracingShaderConfig",
    "RaytracingPipelineConfig",
    "RaytracingPipelineConfig1",
    "TriangleHitGroup",
    "ProceduralPrimitiveHitGroup",
];
const RTX_BUILT_IN_TYPES: &[&str] = &["BuiltInTriangleIntersectionAttributes", "RayDesc"];

pub(super) const STORAGE_FLAGS: &[&str] = &[
    // Type modifiers
    "const",
    "row_major",
    "column_major",
    // Storage classes
    "extern",
    "inline",
    "rootconstant",
    "option",
    "precise",
    "shared",
    "groupshared",
    "static",
    "uniform",
    "volatile",
    // Interpolation modifiers
    "linear",
    "centroid",
    "nointerpolation",
    "noperspective",
    "sample",
    // Parameter modifiers, `in out` is joined by the parser
    "in",
    "out",
    "inout",
    // Geometry shader primitives
    "point",
    "line",
    "triangle",
    "lineadj",
    "triangleadj",
];

/// Words that never stand for an identifier.
const RESERVED_WORDS: &[&str] = &[
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "case",
    "default",
    "break",
    "continue",
    "discard",
    "return",
    "struct",
    "class",
    "interface",
    "enum",
    "typedef",
    "typealias",
    "typeof",
    "true",
    "false",
    "unsigned",
    "ShaderResourceGroup",
    "ShaderResourceGroupSemantic",
];

pub(super) const FILTER_MODES: &[&str] = &["Point", "Linear"];
pub(super) const REDUCTION_TYPES: &[&str] = &["Filter", "Comparison", "Minimum", "Maximum"];
pub(super) const ADDRESS_MODES: &[&str] = &["Wrap", "Mirror", "Clamp", "Border", "MirrorOnce"];
pub(super) const COMPARISON_FUNCTIONS: &[&str] = &[
    "Never",
    "Less",
    "Equal",
    "LessEqual",
    "Greater",
    "NotEqual",
    "GreaterEqual",
    "Always",
];
pub(super) const BORDER_COLORS: &[&str] = &["OpaqueBlack", "TransparentBlack", "OpaqueWhite"];

fn is_dimension(c: u8) -> bool {
    (b'1'..=b'4').contains(&c)
}

/// Classify `float`, `float3`, `float3x4` and friends.
fn classify_numeric(word: &str) -> Option<PredefinedKind> {
    let scalar = SCALAR_TYPES.iter().find(|scalar| word.starts_with(*scalar))?;
    match word[scalar.len()..].as_bytes() {
        [] => Some(PredefinedKind::Scalar),
        [rows] if is_dimension(*rows) => Some(PredefinedKind::Vector),
        [rows, b'x', columns] if is_dimension(*rows) && is_dimension(*columns) => {
            Some(PredefinedKind::Matrix)
        }
        _ => None,
    }
}

/// Built-in type category of a word. `vector` and `matrix` followed by a template
/// argument list are handled by the parser since they need lookahead.
pub(super) fn classify(word: &str) -> Option<PredefinedKind> {
    let tables: [(&[&str], PredefinedKind); 12] = [
        (BUFFER_TYPES, PredefinedKind::Buffer),
        (BYTE_ADDRESS_BUFFER_TYPES, PredefinedKind::ByteAddressBuffer),
        (PATCH_TYPES, PredefinedKind::Patch),
        (SAMPLER_TYPES, PredefinedKind::Sampler),
        (STREAM_OUTPUT_TYPES, PredefinedKind::StreamOutput),
        (STRUCTURED_BUFFER_TYPES, PredefinedKind::StructuredBuffer),
        (TEXTURE_TYPES, PredefinedKind::Texture),
        (MS_TEXTURE_TYPES, PredefinedKind::MsTexture),
        (CONSTANT_BUFFER_TYPES, PredefinedKind::ConstantBuffer),
        (&["RaytracingAccelerationStructure"], PredefinedKind::OtherViewResource),
        (SUBOBJECT_TYPES, PredefinedKind::Subobject),
        (RTX_BUILT_IN_TYPES, PredefinedKind::RtxBuiltIn),
    ];
    match word {
        "void" => Some(PredefinedKind::Void),
        "vector" => Some(PredefinedKind::Vector),
        _ => classify_numeric(word).or_else(|| {
            tables
                .iter()
                .find(|(table, _)| table.contains(&word))
                .map(|(_, kind)| *kind)
        }),
    }
}

pub(super) fn is_storage_flag(word: &str) -> bool {
    STORAGE_FLAGS.contains(&word)
}

pub(super) fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word) || classify(word).is_some()
}

/// Keywords that start a new declaration when found at the start of a line.
pub(super) fn is_declaration_keyword(word: &str) -> bool {
    matches!(
        word,
        "struct"
            | "class"
            | "interface"
            | "enum"
            | "ShaderResourceGroup"
            | "ShaderResourceGroupSemantic"
            | "partial"
            | "typedef"
            | "typealias"
    )
}


impl<'a> Parser<'a> {
    fn at_unsigned_int(&self) -> bool {
        self.at("unsigned") && self.nth_at(1, "int") && self.contiguous(0)
    }

    pub(super) fn at_predefined_type(&self) -> bool {
        if self.nth_kind(0) != Some(TokenKind::Word) {
            return false;
        }
        let word = self.nth_text(0);
        classify(word).is_some()
            || self.at_unsigned_int()
            || (word == "matrix" && self.nth_at(1, "<"))
    }

    /// Whether the word at `n` may start a type.
    pub(super) fn nth_starts_type(&self, n: usize) -> bool {
        if self.nth_kind(n) != Some(TokenKind::Word) {
            return self.nth_at(n, "::");
        }
        let word = self.nth_text(n);
        !is_reserved(word)
            || classify(word).is_some()
            || matches!(word, "typeof" | "unsigned" | "struct" | "class" | "interface" | "enum")
    }

    /// `type`. Returns whether the type is predefined.
    pub(super) fn type_(&mut self) -> PResult<bool> {
        self.nested(|parser| {
            parser.node(NodeKind::Type, |parser| {
                if parser.at("typeof") {
                    parser.typeof_expression()?;
                    Ok(false)
                } else if parser.at_predefined_type() {
                    parser.predefined_type()?;
                    Ok(true)
                } else {
                    parser.user_defined_type()?;
                    Ok(false)
                }
            })
        })
    }

    pub(super) fn user_defined_type(&mut self) -> PResult {
        self.node(NodeKind::UserDefinedType, |parser| {
            if parser.at_any(&["struct", "class", "interface", "enum"]) {
                parser.any_structured_type_definition()
            } else {
                parser.id_expression()
            }
        })
    }

    pub(super) fn typeof_expression(&mut self) -> PResult {
        self.node(NodeKind::TypeofExpression, |parser| {
            parser.expect("typeof")?;
            parser.expect("(")?;
            let is_type = parser
                .attempt(|parser| {
                    parser.type_()?;
                    if parser.at(")") {
                        Ok(())
                    } else {
                        Err(Backtrack)
                    }
                })
                .is_ok();
            if !is_type {
                parser.expression_ext()?;
            }
            parser.expect(")")?;
            if parser.eat("::") {
                parser.id_expression()?;
            }
            Ok(())
        })
    }

    fn template_argument<T>(&mut self, argument: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.expect("<")?;
        let result = argument(self)?;
        self.expect(">")?;
        Ok(result)
    }

    fn integer_literal(&mut self) -> PResult {
        if !self.at_kind(TokenKind::IntegerLiteral) {
            return Err(Backtrack);
        }
        self.bump_as(NodeKind::IntegerLiteral);
        Ok(())
    }

    pub(super) fn scalar_type(&mut self) -> PResult {
        if self.at_unsigned_int() {
            self.start_node(NodeKind::ScalarType);
            self.bump_joined(2, NodeKind::Token);
            self.finish_node();
            return Ok(());
        }
        if classify(self.nth_text(0)) != Some(PredefinedKind::Scalar) {
            return Err(Backtrack);
        }
        self.token_node(NodeKind::ScalarType);
        Ok(())
    }

    fn scalar_or_vector_type(&mut self) -> PResult {
        match classify(self.nth_text(0)) {
            Some(PredefinedKind::Vector) if !self.nth_at(1, "<") => {
                self.token_node(NodeKind::VectorType);
                Ok(())
            }
            _ => self.scalar_type(),
        }
    }

    pub(super) fn scalar_or_vector_or_matrix_type(&mut self) -> PResult {
        self.node(NodeKind::ScalarOrVectorOrMatrixType, |parser| {
            match classify(parser.nth_text(0)) {
                Some(PredefinedKind::Matrix) => {
                    parser.token_node(NodeKind::MatrixType);
                    Ok(())
                }
                _ => parser.scalar_or_vector_type(),
            }
        })
    }

    fn predefined_type(&mut self) -> PResult {
        self.start_node(NodeKind::PredefinedType);
        let word = self.nth_text(0);
        if word == "matrix" {
            self.node(NodeKind::GenericMatrixPredefinedType, |parser| {
                parser.bump();
                parser.template_argument(|parser| {
                    parser.scalar_type()?;
                    parser.expect(",")?;
                    parser.integer_literal()?;
                    parser.expect(",")?;
                    parser.integer_literal()
                })
            })?;
            self.finish_node();
            return Ok(());
        }
        let Some(kind) = classify(word) else {
            self.scalar_type()?;
            self.finish_node();
            return Ok(());
        };
        match kind {
            PredefinedKind::Void => self.bump(),
            PredefinedKind::Scalar => self.scalar_type()?,
            PredefinedKind::Vector if self.nth_at(1, "<") => {
                self.node(NodeKind::GenericVectorType, |parser| {
                    parser.bump();
                    parser.template_argument(|parser| {
                        parser.scalar_type()?;
                        parser.expect(",")?;
                        parser.integer_literal()
                    })
                })?;
            }
            PredefinedKind::Vector => self.token_node(NodeKind::VectorType),
            PredefinedKind::Matrix => self.token_node(NodeKind::MatrixType),
            PredefinedKind::Buffer => {
                self.node(NodeKind::BufferPredefinedType, |parser| {
                    parser.token_node(NodeKind::BufferType);
                    parser.template_argument(|parser| parser.scalar_or_vector_or_matrix_type())
                })?;
            }
            PredefinedKind::ByteAddressBuffer => self.token_node(NodeKind::ByteAddressBufferTypes),
            PredefinedKind::Patch => {
                self.node(NodeKind::PatchPredefinedType, |parser| {
                    parser.bump();
                    parser.template_argument(|parser| {
                        parser.user_defined_type()?;
                        parser.expect(",")?;
                        parser.integer_literal()
                    })
                })?;
            }
            PredefinedKind::Sampler => self.token_node(NodeKind::SamplerStatePredefinedType),
            PredefinedKind::StreamOutput => self.templated_type(NodeKind::StreamOutputPredefinedType)?,
            PredefinedKind::StructuredBuffer => {
                self.templated_type(NodeKind::StructuredBufferPredefinedType)?
            }
            PredefinedKind::ConstantBuffer => self.templated_type(NodeKind::ConstantBufferTemplated)?,
            PredefinedKind::Texture if self.nth_at(1, "<") => {
                self.node(NodeKind::GenericTexturePredefinedType, |parser| {
                    parser.token_node(NodeKind::TexturePredefinedType);
                    parser.template_argument(|parser| parser.scalar_or_vector_type())
                })?;
            }
            PredefinedKind::Texture => self.token_node(NodeKind::TexturePredefinedType),
            PredefinedKind::MsTexture => {
                self.node(NodeKind::MsTexturePredefinedType, |parser| {
                    parser.bump();
                    parser.template_argument(|parser| {
                        parser.scalar_or_vector_type()?;
                        if parser.eat(",") {
                            parser.integer_literal()?;
                        }
                        Ok(())
                    })
                })?;
            }
            PredefinedKind::OtherViewResource => self.token_node(NodeKind::OtherViewResourceType),
            PredefinedKind::Subobject => self.token_node(NodeKind::SubobjectType),
            PredefinedKind::RtxBuiltIn => self.token_node(NodeKind::RtxBuiltInTypes),
        }
        self.finish_node();
        Ok(())
    }

    // `Name<type>`
    fn templated_type(&mut self, kind: NodeKind) -> PResult {
        self.node(kind, |parser| {
            parser.bump();
            parser.template_argument(|parser| parser.type_().map(|_| ()))
        })
    }

    // A storage flag word is only a flag when a type can still follow it.
    fn at_storage_flag(&self) -> bool {
        if self.nth_kind(0) != Some(TokenKind::Word) || !is_storage_flag(self.nth_text(0)) {
            return false;
        }
        if self.nth_kind(1) != Some(TokenKind::Word) {
            return self.nth_at(1, "::");
        }
        let next = self.nth_text(1);
        if is_reserved(next) || is_storage_flag(next) || next == "unsigned" || next == "matrix" {
            return true;
        }
        !matches!(self.nth_text(2), ";" | "=" | "," | "[" | ":" | ")")
    }

    pub(super) fn storage_flags(&mut self) {
        while self.at_storage_flag() {
            self.start_node(NodeKind::StorageFlag);
            if self.at("in") && self.nth_at(1, "out") && self.contiguous(0) {
                self.bump_joined(2, NodeKind::Token);
            } else {
                self.bump();
            }
            self.finish_node();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::AzslParser;

    fn declaration_type_sexp(source: &str) -> String {
        let tree = AzslParser::new().parse(source, None);
        let root = tree.root_node();
        assert!(!root.has_error(), "{}", root.to_sexp());
        root.descendants_of_kind(NodeKind::Type)[0].to_sexp()
    }

    #[test]
    fn test_classify_numeric_types() {
        assert_eq!(classify("float"), Some(PredefinedKind::Scalar));
        assert_eq!(classify("uint3"), Some(PredefinedKind::Vector));
        assert_eq!(classify("min16float4"), Some(PredefinedKind::Vector));
        assert_eq!(classify("half4x4"), Some(PredefinedKind::Matrix));
        assert_eq!(classify("double2x3"), Some(PredefinedKind::Matrix));
        assert_eq!(classify("float5"), None);
        assert_eq!(classify("float4x0"), None);
        assert_eq!(classify("floating"), None);
        assert_eq!(classify("integer"), None);
    }

    #[test]
    fn test_classify_resources() {
        assert_eq!(classify("Texture2DMS"), Some(PredefinedKind::MsTexture));
        assert_eq!(classify("RWTexture2D"), Some(PredefinedKind::Texture));
        assert_eq!(classify("RayDesc"), Some(PredefinedKind::RtxBuiltIn));
        assert_eq!(classify("SamplerState"), Some(PredefinedKind::Sampler));
        assert_eq!(classify("MyTexture"), None);
    }

    #[test]
    fn test_storage_flags_are_not_reserved() {
        assert!(is_storage_flag("point"));
        assert!(!is_reserved("point"));
        assert!(!is_reserved("matrix"));
        assert!(is_reserved("float4"));
        assert!(is_reserved("return"));
    }

    #[test]
    fn test_parse_templated_types() {
        assert_eq!(
            declaration_type_sexp("StructuredBuffer<Light> lights;"),
            "(type (predefined_type (structured_buffer_predefined_type (type (user_defined_type (id_expression (identifier)))))))"
        );
        assert_eq!(
            declaration_type_sexp("Texture2DMS<float4, 4> tex;"),
            "(type (predefined_type (ms_texture_predefined_type (vector_type) (integer_literal))))"
        );
        assert_eq!(
            declaration_type_sexp("Texture2D<float4> tex;"),
            "(type (predefined_type (generic_texture_predefined_type (texture_predefined_type) (vector_type))))"
        );
        assert_eq!(
            declaration_type_sexp("matrix<float, 4, 4> m;"),
            "(type (predefined_type (generic_matrix_predefined_type (scalar_type) (integer_literal) (integer_literal))))"
        );
        assert_eq!(
            declaration_type_sexp("ConstantBuffer<ConstantBuffer<Data> > nested;"),
            "(type (predefined_type (constant_buffer_templated (type (predefined_type (constant_buffer_templated (type (user_defined_type (id_expression (identifier))))))))))"
        );
    }

    #[test]
    fn test_parse_storage_flags() {
        let source = "static const unsigned int count = 4;
float line = 1;
void f(in out float a, in Foo b) {}";
        let tree = AzslParser::new().parse(source, None);
        let root = tree.root_node();
        assert!(!root.has_error(), "{}", root.to_sexp());
        let flags: Vec<&str> = root
            .descendants_of_kind(NodeKind::StorageFlag)
            .iter()
            .map(|node| node.utf8_text(source))
            .collect();
        assert_eq!(flags, vec!["static", "const", "in out", "in"]);
        let scalar = root.descendants_of_kind(NodeKind::ScalarType)[0];
        assert_eq!(scalar.utf8_text(source), "unsigned int");
    }
}
