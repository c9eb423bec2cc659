//! Expressions, parsed by precedence climbing.
use crate::syntax::Checkpoint;

use super::{
    lexer::TokenKind,
    parser::{Backtrack, PResult, Parser},
    types::{classify, is_reserved, PredefinedKind},
    NodeKind,
};

const ASSIGNMENT_POWER: u8 = 1;
const TERNARY_POWER: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Assignment,
    Ternary,
    Binary(u8),
}

fn binary_power(operator: &str) -> Option<u8> {
    let power = match operator {
        "||" => 3,
        "&&" => 4,
        "|" => 5,
        "^" => 6,
        "&" => 7,
        "==" | "!=" => 8,
        "<" | ">" | "<=" | ">=" => 9,
        "<<" | ">>" => 10,
        "+" | "-" => 11,
        "*" | "/" | "%" => 12,
        _ => return None,
    };
    Some(power)
}

fn is_assignment(operator: &str) -> bool {
    matches!(
        operator,
        "=" | "*=" | "/=" | "%=" | "+=" | "-=" | "<<=" | ">>=" | "&=" | "^=" | "|="
    )
}

impl<'a> Parser<'a> {
    /// `>` is lexed alone, join it with the adjacent `>` and `=` that follow.
    fn greater_operator(&self) -> (usize, String) {
        let mut count = 1;
        let mut operator = String::from(">");
        if self.adjacent(0) && self.nth_at(1, ">") {
            count += 1;
            operator.push('>');
        }
        if self.adjacent(count - 1) && self.nth_at(count, "=") {
            count += 1;
            operator.push('=');
        }
        (count, operator)
    }

    fn infix_operator(&self) -> Option<(Infix, usize)> {
        if !self.at_kind(TokenKind::Punct) {
            return None;
        }
        let (count, operator) = match self.nth_text(0) {
            ">" => self.greater_operator(),
            text => (1, text.to_string()),
        };
        if operator == "?" {
            Some((Infix::Ternary, count))
        } else if is_assignment(&operator) {
            Some((Infix::Assignment, count))
        } else {
            binary_power(&operator).map(|power| (Infix::Binary(power), count))
        }
    }

    /// `expression_ext`: comma separated list of expressions, nested to the left.
    pub(super) fn expression_ext(&mut self) -> PResult {
        let checkpoint = self.checkpoint();
        self.node(NodeKind::ExpressionExt, |parser| parser.expression())?;
        while self.at(",") {
            self.start_node_at(checkpoint, NodeKind::ExpressionExt);
            self.bump();
            self.node(NodeKind::ExpressionExt, |parser| parser.expression())?;
            self.finish_node();
        }
        Ok(())
    }

    pub(super) fn expression(&mut self) -> PResult {
        self.expression_with_power(0)
    }

    // A single expression in a position the grammar types as `expression_ext`.
    fn single_expression_ext(&mut self, min_power: u8) -> PResult {
        self.node(NodeKind::ExpressionExt, |parser| {
            parser.expression_with_power(min_power)
        })
    }

    fn expression_with_power(&mut self, min_power: u8) -> PResult {
        let checkpoint = self.checkpoint();
        self.unary_expression()?;
        while let Some((infix, count)) = self.infix_operator() {
            match infix {
                Infix::Assignment if ASSIGNMENT_POWER >= min_power => {
                    self.start_node_at(checkpoint, NodeKind::Expression);
                    self.start_node(NodeKind::AssignmentOperator);
                    self.bump_joined(count, NodeKind::Token);
                    self.finish_node();
                    self.single_expression_ext(ASSIGNMENT_POWER)?;
                    self.finish_node();
                }
                Infix::Ternary if TERNARY_POWER >= min_power => {
                    self.start_node_at(checkpoint, NodeKind::Expression);
                    self.bump();
                    self.expression_ext()?;
                    self.expect(":")?;
                    self.single_expression_ext(TERNARY_POWER)?;
                    self.finish_node();
                }
                Infix::Binary(power) if power >= min_power => {
                    self.start_node_at(checkpoint, NodeKind::Expression);
                    self.start_node(NodeKind::BinaryOperator);
                    self.bump_joined(count, NodeKind::Token);
                    self.finish_node();
                    self.expression_with_power(power + 1)?;
                    self.finish_node();
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn unary_expression(&mut self) -> PResult {
        self.nested(|parser| {
            if parser.at_any(&["+", "-", "!", "~", "++", "--"]) {
                parser.start_node(NodeKind::Expression);
                parser.token_node(NodeKind::PrefixUnaryOperator);
                parser.unary_expression()?;
                parser.finish_node();
                return Ok(());
            }
            if parser.at("(") && parser.attempt(|parser| parser.cast_expression()).is_ok() {
                return Ok(());
            }
            let checkpoint = parser.checkpoint();
            parser.primary_expression()?;
            parser.postfix_expressions(checkpoint)
        })
    }

    /// `( type [ranks] ) operand`. A user defined type only makes a cast when an
    /// operand follows, `(a) - b` stays a parenthesized expression.
    fn cast_expression(&mut self) -> PResult {
        self.start_node(NodeKind::Expression);
        self.bump();
        let predefined = self.type_()?;
        while self.at("[") {
            self.array_rank_specifier()?;
        }
        self.expect(")")?;
        if !predefined && !self.at_operand_start() {
            return Err(Backtrack);
        }
        self.unary_expression()?;
        self.finish_node();
        Ok(())
    }

    fn at_operand_start(&self) -> bool {
        match self.nth_kind(0) {
            Some(TokenKind::IntegerLiteral | TokenKind::FloatLiteral | TokenKind::StringLiteral) => true,
            Some(TokenKind::Word) => {
                let word = self.nth_text(0);
                !is_reserved(word) || classify(word).is_some() || matches!(word, "true" | "false")
            }
            Some(TokenKind::Punct) => self.at_any(&["(", "::"]),
            _ => false,
        }
    }

    fn postfix_expressions(&mut self, checkpoint: Checkpoint) -> PResult {
        loop {
            if self.at(".") {
                self.start_node_at(checkpoint, NodeKind::Expression);
                self.bump();
                self.id_expression()?;
            } else if self.at("[") {
                self.start_node_at(checkpoint, NodeKind::Expression);
                self.bump();
                self.expression()?;
                self.expect("]")?;
            } else if self.at("(") {
                self.start_node_at(checkpoint, NodeKind::Expression);
                self.argument_list()?;
            } else if self.at_any(&["++", "--"]) {
                self.start_node_at(checkpoint, NodeKind::Expression);
                self.token_node(NodeKind::PostfixUnaryOperator);
            } else {
                return Ok(());
            }
            self.finish_node();
        }
    }

    fn at_constructor(&self) -> bool {
        let type_len = if self.at("unsigned") && self.nth_at(1, "int") {
            2
        } else {
            1
        };
        let numeric = matches!(
            classify(self.nth_text(0)),
            Some(PredefinedKind::Scalar | PredefinedKind::Vector | PredefinedKind::Matrix)
        ) || type_len == 2;
        numeric && self.nth_at(type_len, "(")
    }

    fn primary_expression(&mut self) -> PResult {
        if self.at_literal() {
            return self.node(NodeKind::Expression, |parser| parser.literal());
        }
        if self.at("(") {
            return self.node(NodeKind::Expression, |parser| {
                parser.bump();
                parser.expression_ext()?;
                parser.expect(")")
            });
        }
        if self.at_constructor() {
            return self.node(NodeKind::Expression, |parser| {
                parser.scalar_or_vector_or_matrix_type()?;
                parser.argument_list()
            });
        }
        if self.at_identifier() || self.at("::") {
            return self.node(NodeKind::Expression, |parser| parser.id_expression());
        }
        Err(Backtrack)
    }

    pub(super) fn argument_list(&mut self) -> PResult {
        self.node(NodeKind::ArgumentList, |parser| {
            parser.expect("(")?;
            if !parser.at(")") {
                parser.expression()?;
                while parser.eat(",") {
                    parser.expression()?;
                }
            }
            parser.expect(")")
        })
    }

    pub(super) fn at_identifier(&self) -> bool {
        self.at_kind(TokenKind::Word) && !is_reserved(self.nth_text(0))
    }

    pub(super) fn identifier(&mut self) -> PResult {
        if !self.at_identifier() {
            return Err(Backtrack);
        }
        self.bump_as(NodeKind::Identifier);
        Ok(())
    }

    /// Number of identifiers of the `a::b::c` chain at the cursor.
    pub(super) fn qualified_name_len(&self) -> usize {
        let mut n = usize::from(self.at("::"));
        let mut segments = 0;
        loop {
            if self.nth_kind(n) != Some(TokenKind::Word) || is_reserved(self.nth_text(n)) {
                return segments;
            }
            segments += 1;
            if !self.nth_at(n + 1, "::") {
                return segments;
            }
            n += 2;
        }
    }

    pub(super) fn id_expression(&mut self) -> PResult {
        let segments = self.qualified_name_len();
        self.id_expression_segments(segments)
    }

    /// `id_expression` made of the first `segments` identifiers of a qualified name.
    pub(super) fn id_expression_segments(&mut self, segments: usize) -> PResult {
        if segments == 0 {
            return Err(Backtrack);
        }
        self.node(NodeKind::IdExpression, |parser| {
            parser.eat("::");
            parser.identifier()?;
            for _ in 1..segments {
                parser.expect("::")?;
                parser.identifier()?;
            }
            Ok(())
        })
    }

    pub(super) fn at_literal(&self) -> bool {
        matches!(
            self.nth_kind(0),
            Some(TokenKind::IntegerLiteral | TokenKind::FloatLiteral | TokenKind::StringLiteral)
        ) || self.at_any(&["true", "false"])
    }

    pub(super) fn literal(&mut self) -> PResult {
        self.node(NodeKind::Literal, |parser| match parser.nth_kind(0) {
            Some(TokenKind::IntegerLiteral) => {
                parser.bump_as(NodeKind::IntegerLiteral);
                Ok(())
            }
            Some(TokenKind::FloatLiteral) => {
                parser.bump_as(NodeKind::FloatLiteral);
                Ok(())
            }
            Some(TokenKind::StringLiteral) => parser.string_literal(),
            _ if parser.at_any(&["true", "false"]) => {
                parser.bump();
                Ok(())
            }
            _ => Err(Backtrack),
        })
    }

    /// String literal split into its quotes and escape sequences.
    pub(super) fn string_literal(&mut self) -> PResult {
        let Some(token) = self.nth(0).filter(|token| token.kind == TokenKind::StringLiteral) else {
            return Err(Backtrack);
        };
        self.start_node(NodeKind::StringLiteral);
        let text = token.text(self.source());
        self.leaf(NodeKind::Token, token.start, token.start + 1);
        let mut escaped = false;
        for (offset, c) in text.char_indices().skip(1) {
            if escaped {
                let start = token.start + offset - 1;
                self.leaf(NodeKind::EscapeSequence, start, start + 1 + c.len_utf8());
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            }
        }
        self.leaf(NodeKind::Token, token.end - 1, token.end);
        self.skip_token();
        self.finish_node();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::grammar::{AzslParser, NodeKind};

    // S-expression of the initializer expression of `float v = <expression>;`.
    fn initializer_sexp(expression: &str) -> String {
        let source = format!("float v = {};", expression);
        let tree = AzslParser::new().parse(&source, None);
        let root = tree.root_node();
        assert!(!root.has_error(), "{}", root.to_sexp());
        let initializer = root.descendants_of_kind(NodeKind::StandardVariableInitializer);
        initializer[0].named_child(0).unwrap().to_sexp()
    }

    #[test]
    fn test_binary_precedence() {
        assert_eq!(
            initializer_sexp("a + b * c"),
            "(expression (expression (id_expression (identifier))) (binary_operator) (expression (expression (id_expression (identifier))) (binary_operator) (expression (id_expression (identifier)))))"
        );
        assert_eq!(
            initializer_sexp("a - b - c"),
            "(expression (expression (expression (id_expression (identifier))) (binary_operator) (expression (id_expression (identifier)))) (binary_operator) (expression (id_expression (identifier))))"
        );
    }

    #[test]
    fn test_joined_shift_operators() {
        let source = "float v = a >> 2 >= b;";
        let tree = AzslParser::new().parse(source, None);
        let operators: Vec<&str> = tree
            .root_node()
            .descendants_of_kind(NodeKind::BinaryOperator)
            .iter()
            .map(|node| node.utf8_text(source))
            .collect();
        assert_eq!(operators, vec![">>", ">="]);
    }

    #[test]
    fn test_call_and_member() {
        assert_eq!(
            initializer_sexp("tex.Sample(s, uv).x"),
            "(expression (expression (expression (expression (id_expression (identifier))) (id_expression (identifier))) (argument_list (expression (id_expression (identifier))) (expression (id_expression (identifier))))) (id_expression (identifier)))"
        );
    }

    #[test]
    fn test_cast_and_parenthesis() {
        assert_eq!(
            initializer_sexp("(float)x"),
            "(expression (type (predefined_type (scalar_type))) (expression (id_expression (identifier))))"
        );
        assert_eq!(
            initializer_sexp("(MyType)x"),
            "(expression (type (user_defined_type (id_expression (identifier)))) (expression (id_expression (identifier))))"
        );
        assert_eq!(
            initializer_sexp("(a) - b"),
            "(expression (expression (expression_ext (expression (id_expression (identifier))))) (binary_operator) (expression (id_expression (identifier))))"
        );
    }

    #[test]
    fn test_constructor_ternary_and_literals() {
        assert_eq!(
            initializer_sexp("float4(1, 2.0f, true, x)"),
            "(expression (scalar_or_vector_or_matrix_type (vector_type)) (argument_list (expression (literal (integer_literal))) (expression (literal (float_literal))) (expression (literal)) (expression (id_expression (identifier)))))"
        );
        assert_eq!(
            initializer_sexp("c ? a : b"),
            "(expression (expression (id_expression (identifier))) (expression_ext (expression (id_expression (identifier)))) (expression_ext (expression (id_expression (identifier)))))"
        );
    }

    #[test]
    fn test_string_escapes() {
        let source = r#"void main() { __azslc_print_message("a\tb\\"); }"#;
        let tree = AzslParser::new().parse(source, None);
        let escapes: Vec<&str> = tree
            .root_node()
            .descendants_of_kind(NodeKind::EscapeSequence)
            .iter()
            .map(|node| node.utf8_text(source))
            .collect();
        assert_eq!(escapes, vec![r"\t", r"\\"]);
    }
}
