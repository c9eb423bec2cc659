use crate::syntax::{incremental::ReuseCursor, Checkpoint, ReuseStats, SyntaxTree, TreeBuilder};

use super::{
    lexer::{Lexer, Token, TokenKind},
    types::{is_declaration_keyword, is_reserved, is_storage_flag},
    NodeKind,
};

// Recursion bound of nested productions. Deeper input is a syntax error.
const MAX_DEPTH: usize = 64;

/// A production did not match. The caller either tries another alternative or
/// recovers with an error node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Backtrack;

pub(super) type PResult<T = ()> = Result<T, Backtrack>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Recovery {
    TopLevel,
    Block,
}

/// Parser for AZSL source. Holds the compiled token table, create it once and
/// reuse it for every document.
pub struct AzslParser {
    lexer: Lexer,
}

impl Default for AzslParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AzslParser {
    pub fn new() -> Self {
        Self {
            lexer: Lexer::new(),
        }
    }
    /// Parse `text` into a syntax tree. Never fails, malformed regions become
    /// `ERROR` nodes.
    ///
    /// When `old` is given it must be the tree of the previous text with every
    /// change already applied through [`SyntaxTree::edit`]. Top level declarations
    /// the edits did not touch are copied instead of parsed again.
    pub fn parse(&self, text: &str, old: Option<&SyntaxTree>) -> SyntaxTree {
        let mut parser = Parser::new(&self.lexer, text, old);
        parser.source_file();
        parser.finish()
    }
}

pub(super) struct Parser<'a> {
    lexer: &'a Lexer,
    source: &'a str,
    tokens: Vec<Token>,
    // Indices of non trivia tokens in `tokens`.
    significant: Vec<usize>,
    // Current position in `significant`.
    pos: usize,
    // First token of `tokens` not yet added to the tree.
    emitted: usize,
    builder: TreeBuilder<'a>,
    depth: usize,
    reuse: Option<ReuseCursor<'a>>,
    stats: ReuseStats,
}

impl<'a> Parser<'a> {
    fn new(lexer: &'a Lexer, source: &'a str, old: Option<&'a SyntaxTree>) -> Self {
        let tokens = lexer.tokenize(source);
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.kind.is_trivia())
            .map(|(index, _)| index)
            .collect();
        Self {
            lexer,
            source,
            tokens,
            significant,
            pos: 0,
            emitted: 0,
            builder: TreeBuilder::new(source),
            depth: 0,
            reuse: old.map(ReuseCursor::new),
            stats: ReuseStats::default(),
        }
    }

    fn finish(mut self) -> SyntaxTree {
        self.pos = self.significant.len();
        self.flush_trivia();
        self.builder.finish(NodeKind::SourceFile, self.stats)
    }

    fn source_file(&mut self) {
        while !self.at_eof() {
            if self.try_reuse() {
                continue;
            }
            let start = self.pos;
            self.stats.reparsed += 1;
            let parsed = self.attempt(|parser| parser.top_level_declaration());
            if parsed.is_err() || self.pos == start {
                self.recover(Recovery::TopLevel);
            }
        }
    }

    // Copy an untouched declaration of the previous tree if the new tokens line up
    // with its bounds.
    fn try_reuse(&mut self) -> bool {
        let Some(token) = self.nth(0) else {
            return false;
        };
        let Some(cursor) = self.reuse.as_mut() else {
            return false;
        };
        let Some(id) = cursor.find_at(token.start) else {
            return false;
        };
        let tree = cursor.tree();
        let end_byte = tree.data(id).end_byte;
        let last = self.tokens.partition_point(|token| token.end <= end_byte);
        let Some(last) = last.checked_sub(1) else {
            return false;
        };
        if self.tokens[last].end != end_byte || self.tokens[last].kind.is_trivia() {
            return false;
        }
        self.flush_trivia();
        self.builder.copy_subtree(tree, id);
        self.emitted = last + 1;
        self.pos = self.significant.partition_point(|index| *index <= last);
        self.stats.reused += 1;
        true
    }

    // Token access

    pub(super) fn source(&self) -> &'a str {
        self.source
    }
    pub(super) fn lexer(&self) -> &'a Lexer {
        self.lexer
    }
    pub(super) fn nth(&self, n: usize) -> Option<Token> {
        self.significant
            .get(self.pos + n)
            .map(|index| self.tokens[*index])
    }
    pub(super) fn nth_text(&self, n: usize) -> &'a str {
        self.nth(n)
            .map(|token| token.text(self.source))
            .unwrap_or("")
    }
    /// Keyword or punctuation `text` at lookahead `n`.
    pub(super) fn nth_at(&self, n: usize, text: &str) -> bool {
        self.nth(n).is_some_and(|token| {
            matches!(token.kind, TokenKind::Word | TokenKind::Punct) && token.text(self.source) == text
        })
    }
    pub(super) fn at(&self, text: &str) -> bool {
        self.nth_at(0, text)
    }
    pub(super) fn at_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| self.at(text))
    }
    pub(super) fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.nth(n).map(|token| token.kind)
    }
    pub(super) fn at_kind(&self, kind: TokenKind) -> bool {
        self.nth_kind(0) == Some(kind)
    }
    pub(super) fn at_eof(&self) -> bool {
        self.pos >= self.significant.len()
    }
    /// Tokens `n` and `n + 1` touch, without whitespace in between.
    pub(super) fn adjacent(&self, n: usize) -> bool {
        match (self.nth(n), self.nth(n + 1)) {
            (Some(first), Some(second)) => first.end == second.start,
            _ => false,
        }
    }
    /// Tokens `n` and `n + 1` are not separated by a comment or a directive.
    pub(super) fn contiguous(&self, n: usize) -> bool {
        match (
            self.significant.get(self.pos + n),
            self.significant.get(self.pos + n + 1),
        ) {
            (Some(first), Some(second)) => first + 1 == *second,
            _ => false,
        }
    }

    // Tree building

    fn flush_trivia(&mut self) {
        let until = self
            .significant
            .get(self.pos)
            .copied()
            .unwrap_or(self.tokens.len());
        while self.emitted < until {
            let token = self.tokens[self.emitted];
            let kind = match token.kind {
                TokenKind::Comment => NodeKind::Comment,
                _ => NodeKind::PreprocDirective,
            };
            self.builder.leaf(kind, token.start, token.end);
            self.emitted += 1;
        }
    }
    pub(super) fn bump(&mut self) {
        self.bump_as(NodeKind::Token);
    }
    pub(super) fn bump_as(&mut self, kind: NodeKind) {
        self.bump_joined(1, kind);
    }
    /// Add the next `count` tokens to the tree as a single leaf.
    pub(super) fn bump_joined(&mut self, count: usize, kind: NodeKind) {
        self.flush_trivia();
        let (Some(first), Some(last)) = (self.nth(0), self.nth(count - 1)) else {
            return;
        };
        self.builder.leaf(kind, first.start, last.end);
        self.emitted = self.significant[self.pos + count - 1] + 1;
        self.pos += count;
    }
    /// Leaf inside the current token, for productions splitting a token.
    pub(super) fn leaf(&mut self, kind: NodeKind, start: usize, end: usize) {
        self.builder.leaf(kind, start, end);
    }
    /// Move past the current token without adding it to the tree.
    pub(super) fn skip_token(&mut self) {
        if let Some(index) = self.significant.get(self.pos) {
            self.emitted = index + 1;
            self.pos += 1;
        }
    }
    pub(super) fn eat(&mut self, text: &str) -> bool {
        if self.at(text) {
            self.bump();
            true
        } else {
            false
        }
    }
    pub(super) fn expect(&mut self, text: &str) -> PResult {
        if self.eat(text) {
            Ok(())
        } else {
            Err(Backtrack)
        }
    }
    pub(super) fn start_node(&mut self, kind: NodeKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }
    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }
    /// Open a node whose first child is the one built right after `checkpoint`.
    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        self.builder.start_node_at(checkpoint, kind);
    }
    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }
    /// Wrap a single production in a node of `kind`.
    pub(super) fn node<T>(
        &mut self,
        kind: NodeKind,
        production: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.start_node(kind);
        let result = production(self)?;
        self.finish_node();
        Ok(result)
    }
    /// A single token wrapped in a node of `kind`.
    pub(super) fn token_node(&mut self, kind: NodeKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    // Control

    /// Run a speculative production, restoring the parser on failure.
    pub(super) fn attempt<T>(&mut self, production: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let mark = self.builder.mark();
        let (pos, emitted, depth) = (self.pos, self.emitted, self.depth);
        let result = production(self);
        if result.is_err() {
            self.builder.rollback(mark);
            self.pos = pos;
            self.emitted = emitted;
            self.depth = depth;
        }
        result
    }
    pub(super) fn nested<T>(&mut self, production: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Backtrack);
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    // A token at the start of its line that opens a declaration: a directive, a
    // declaration keyword, a storage flag, an attribute, a predefined type, or a
    // user type followed by a name.
    fn at_line_leading_declaration(&self) -> bool {
        let Some(token) = self.nth(0) else {
            return false;
        };
        if token.kind == TokenKind::IncludeDirective {
            return true;
        }
        let line_leading = self.source[..token.start]
            .rsplit('\n')
            .next()
            .is_some_and(|line| line.trim().is_empty());
        if !line_leading {
            return false;
        }
        match token.kind {
            TokenKind::Word => {
                let word = token.text(self.source);
                is_declaration_keyword(word)
                    || is_storage_flag(word)
                    || self.at_predefined_type()
                    || (!is_reserved(word)
                        && self.nth_kind(1) == Some(TokenKind::Word)
                        && !is_reserved(self.nth_text(1)))
            }
            TokenKind::Punct => self.at("["),
            _ => false,
        }
    }

    /// Consume at least one token into an `ERROR` node, up to the next point where
    /// parsing can resume.
    pub(super) fn recover(&mut self, mode: Recovery) {
        self.start_node(NodeKind::Error);
        let mut depth = 0usize;
        let mut first = true;
        while !self.at_eof() {
            if !first && depth == 0 {
                match mode {
                    Recovery::Block if self.at("}") => break,
                    Recovery::TopLevel if self.at_line_leading_declaration() => break,
                    _ => {}
                }
            }
            first = false;
            let text = self.nth_text(0);
            let is_punct = self.at_kind(TokenKind::Punct);
            self.bump();
            if !is_punct {
                continue;
            }
            match text {
                "{" | "(" | "[" => depth += 1,
                "}" if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                ")" | "]" => depth = depth.saturating_sub(1),
                ";" if depth == 0 => break,
                _ => {}
            }
        }
        self.finish_node();
    }

    /// Zero width `ERROR` node at the end of the input, standing for a missing
    /// closing token.
    pub(super) fn missing_at_end(&mut self) {
        self.flush_trivia();
        let end = self.source.len();
        self.builder.leaf(NodeKind::Error, end, end);
    }
}
