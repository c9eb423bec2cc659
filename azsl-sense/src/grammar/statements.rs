use super::{
    declarations::STRUCTURED_KEYWORDS,
    parser::{Backtrack, PResult, Parser, Recovery},
    NodeKind,
};

impl<'a> Parser<'a> {
    /// `{ statement* }`. Statements that fail to parse become `ERROR` nodes, a
    /// missing `}` at the end of the input is reported with a zero width one.
    pub(super) fn block(&mut self) -> PResult {
        self.nested(|parser| {
            parser.node(NodeKind::Block, |parser| {
                parser.expect("{")?;
                loop {
                    if parser.eat("}") {
                        return Ok(());
                    }
                    if parser.at_eof() {
                        parser.missing_at_end();
                        return Ok(());
                    }
                    parser.statement_or_recover();
                }
            })
        })
    }

    fn statement_or_recover(&mut self) {
        let start = self.nth(0).map(|token| token.start);
        let parsed = self.attempt(|parser| parser.statement());
        if parsed.is_err() || self.nth(0).map(|token| token.start) == start {
            self.recover(Recovery::Block);
        }
    }

    fn statement(&mut self) -> PResult {
        self.node(NodeKind::Statement, |parser| {
            let keyword = parser.nth_text(parser.skip_attributes());
            if STRUCTURED_KEYWORDS.contains(&keyword)
                && parser
                    .attempt(|parser| parser.any_structured_type_definition_statement())
                    .is_ok()
            {
                return Ok(());
            }
            if !parser.at_compiler_extension()
                && parser.nth_starts_type(0)
                && parser
                    .attempt(|parser| parser.variable_declaration_statement())
                    .is_ok()
            {
                return Ok(());
            }
            parser.embedded_statement()
        })
    }

    fn embedded_statement(&mut self) -> PResult {
        self.nested(|parser| {
            parser.node(NodeKind::EmbeddedStatement, |parser| {
                if parser.eat(";") {
                    return Ok(());
                }
                if parser.at("{") {
                    return parser.block();
                }
                let attributed = parser.at("[");
                while parser.at("[") {
                    parser.attribute_specifier()?;
                }
                match parser.nth_text(0) {
                    "if" => parser.if_statement(),
                    "switch" => parser.switch_statement(),
                    "while" => parser.while_statement(),
                    "do" => parser.do_statement(),
                    "for" => parser.for_statement(),
                    _ if attributed => Err(Backtrack),
                    "break" | "continue" | "discard" => {
                        parser.bump();
                        parser.expect(";")
                    }
                    "return" => {
                        parser.bump();
                        if !parser.at(";") {
                            parser.expression_ext()?;
                        }
                        parser.expect(";")
                    }
                    "typealias" | "typedef" => parser.type_aliasing_definition_statement(),
                    _ if parser.at_compiler_extension() => parser.compiler_extension_statement(),
                    _ => {
                        parser.expression_ext()?;
                        parser.expect(";")
                    }
                }
            })
        })
    }

    fn parenthesized_condition(&mut self) -> PResult {
        self.expect("(")?;
        self.expression_ext()?;
        self.expect(")")
    }

    fn if_statement(&mut self) -> PResult {
        self.expect("if")?;
        self.parenthesized_condition()?;
        self.embedded_statement()?;
        if self.at("else") {
            self.node(NodeKind::ElseClause, |parser| {
                parser.bump();
                parser.embedded_statement()
            })?;
        }
        Ok(())
    }

    fn switch_statement(&mut self) -> PResult {
        self.expect("switch")?;
        self.parenthesized_condition()?;
        self.node(NodeKind::SwitchBlock, |parser| {
            parser.expect("{")?;
            loop {
                if parser.eat("}") {
                    return Ok(());
                }
                if parser.at_eof() {
                    parser.missing_at_end();
                    return Ok(());
                }
                if parser.at_switch_label() {
                    parser.switch_section()?;
                } else {
                    parser.recover(Recovery::Block);
                }
            }
        })
    }

    fn at_switch_label(&self) -> bool {
        self.at_any(&["case", "default"])
    }

    // Labels grouped with the statements that follow them, fallthrough included.
    fn switch_section(&mut self) -> PResult {
        self.node(NodeKind::SwitchSection, |parser| {
            while parser.at_switch_label() {
                parser.node(NodeKind::SwitchLabel, |parser| {
                    if parser.eat("case") {
                        parser.expression()?;
                    } else {
                        parser.bump();
                    }
                    parser.expect(":")
                })?;
            }
            while !parser.at_eof() && !parser.at("}") && !parser.at_switch_label() {
                parser.statement_or_recover();
            }
            Ok(())
        })
    }

    fn while_statement(&mut self) -> PResult {
        self.expect("while")?;
        self.parenthesized_condition()?;
        self.embedded_statement()
    }

    fn do_statement(&mut self) -> PResult {
        self.expect("do")?;
        self.embedded_statement()?;
        self.expect("while")?;
        self.parenthesized_condition()?;
        self.expect(";")
    }

    fn for_statement(&mut self) -> PResult {
        self.expect("for")?;
        self.expect("(")?;
        if !self.at(";") {
            self.node(NodeKind::ForInitializer, |parser| {
                if parser
                    .attempt(|parser| {
                        parser.variable_declaration()?;
                        if parser.at(";") {
                            Ok(())
                        } else {
                            Err(Backtrack)
                        }
                    })
                    .is_ok()
                {
                    return Ok(());
                }
                parser.expression_ext()
            })?;
        }
        self.expect(";")?;
        if !self.at(";") {
            self.expression_ext()?;
        }
        self.expect(";")?;
        if !self.at(")") {
            self.expression_ext()?;
        }
        self.expect(")")?;
        self.embedded_statement()
    }
}
