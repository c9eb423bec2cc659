//! Token table of the language. Every rule is an anchored regex compiled once when
//! the [`Lexer`] is created.
use regex::Regex;

use super::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Punct,
    /// `#include`, switches the lexer to include path mode.
    IncludeDirective,
    IncludePath,
    Comment,
    /// Any other preprocessor line.
    Directive,
    Unknown,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Directive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

// Longest first. `>` is never merged, the parser joins adjacent `>` for shifts
// so that nested template arguments close correctly.
const PUNCTUATION: &[&str] = &[
    "<<=", "::", "++", "--", "&&", "||", "<<", "<=", "==", "!=", "*=", "/=", "%=", "+=", "-=",
    "&=", "^=", "|=", "{", "}", "(", ")", "[", "]", ";", ",", ".", ":", "?", "=", "<", ">", "+",
    "-", "*", "/", "%", "&", "|", "^", "!", "~",
];

struct TokenRule {
    kind: TokenKind,
    regex: Regex,
}

impl TokenRule {
    fn new(kind: TokenKind, pattern: &str) -> Self {
        Self {
            kind,
            regex: Regex::new(pattern).expect("Invalid token pattern"),
        }
    }
    fn match_len(&self, text: &str) -> usize {
        self.regex.find(text).map(|m| m.end()).unwrap_or(0)
    }
}

pub struct Lexer {
    whitespace: Regex,
    inline_whitespace: Regex,
    // Matched in order, first match wins.
    leading_rules: Vec<TokenRule>,
    // Matched together, longest match wins, ties go to the earliest rule.
    word_rules: Vec<TokenRule>,
    include_path: Regex,
    semantic_rules: Vec<(NodeKind, Regex)>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"^\s+").expect("Invalid whitespace pattern"),
            inline_whitespace: Regex::new(r"^[ \t]+").expect("Invalid whitespace pattern"),
            leading_rules: vec![
                TokenRule::new(TokenKind::Comment, r"^//(?:\\(?:.|\r?\n)|[^\\\n])*"),
                TokenRule::new(TokenKind::Comment, r"^/\*[^*]*\*+(?:[^/*][^*]*\*+)*/"),
                // Unterminated block comment runs to the end of the text.
                TokenRule::new(TokenKind::Comment, r"^/\*(?s:.)*"),
                TokenRule::new(TokenKind::IncludeDirective, r"^#include\b"),
                TokenRule::new(TokenKind::Directive, r"^#(?:\\\r?\n|[^\r\n])*"),
                TokenRule::new(
                    TokenKind::StringLiteral,
                    r#"^"(?:[^\\"\n]|\\['"?abfnrtv\\])*""#,
                ),
            ],
            word_rules: vec![
                TokenRule::new(
                    TokenKind::IntegerLiteral,
                    r"^(?:0[xX][0-9a-fA-F]+|[0-9]+)(?:UL|LU|ul|lu|U|u|L|l)?",
                ),
                TokenRule::new(
                    TokenKind::FloatLiteral,
                    r"^(?:(?:[0-9]+\.[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[hHfFlL]?|[0-9]+[eE][+-]?[0-9]+[hHfFlL]?|[0-9]+[hHfF])",
                ),
                TokenRule::new(TokenKind::Word, r"^[a-zA-Z0-9_]+"),
            ],
            include_path: Regex::new(r#"^[^<>"'\r\n]*"#).expect("Invalid include pattern"),
            semantic_rules: vec![
                (
                    NodeKind::HlslSemanticStream,
                    Regex::new(r"^(?:(?:BINORMAL|BINOMIAL|BLENDINDICES|BLENDWEIGHT|COLOR|NORMAL|POSITION|PSIZE|TANGENT|TEXCOORD|TESSFACTOR|VPOS|DEPTH)[0-9]*|POSITIONT|FOG|VFACE)$")
                        .expect("Invalid semantic pattern"),
                ),
                (
                    NodeKind::HlslSemanticSystem,
                    Regex::new(r"^[sS][vV]_[a-zA-Z]+[0-9]*$").expect("Invalid semantic pattern"),
                ),
            ],
        }
    }

    /// Kind of an HLSL semantic word, identifier if it is neither a stream nor a system value.
    pub fn semantic_kind(&self, word: &str) -> NodeKind {
        self.semantic_rules
            .iter()
            .find(|(_, regex)| regex.is_match(word))
            .map(|(kind, _)| *kind)
            .unwrap_or(NodeKind::Identifier)
    }

    /// Split the whole text into tokens, trivia included. Whitespace is dropped.
    /// Never fails, unknown characters become [`TokenKind::Unknown`] tokens.
    pub fn tokenize(&self, source: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < source.len() {
            let rest = &source[pos..];
            if let Some(m) = self.whitespace.find(rest) {
                pos += m.end();
                continue;
            }
            let (kind, len) = self.next_token(rest);
            tokens.push(Token {
                kind,
                start: pos,
                end: pos + len,
            });
            pos += len;
            if kind == TokenKind::IncludeDirective {
                pos = self.tokenize_include_path(source, pos, &mut tokens);
            }
        }
        tokens
    }

    fn next_token(&self, rest: &str) -> (TokenKind, usize) {
        for rule in &self.leading_rules {
            let len = rule.match_len(rest);
            if len > 0 {
                return (rule.kind, len);
            }
        }
        let mut best = (TokenKind::Unknown, 0);
        for rule in &self.word_rules {
            let len = rule.match_len(rest);
            if len > best.1 {
                best = (rule.kind, len);
            }
        }
        if best.1 > 0 {
            return best;
        }
        if let Some(punct) = PUNCTUATION.iter().find(|punct| rest.starts_with(*punct)) {
            return (TokenKind::Punct, punct.len());
        }
        let len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        (TokenKind::Unknown, len)
    }

    // `"path"` or `<path>` right after `#include`, on the same line.
    fn tokenize_include_path(&self, source: &str, mut pos: usize, tokens: &mut Vec<Token>) -> usize {
        if let Some(m) = self.inline_whitespace.find(&source[pos..]) {
            pos += m.end();
        }
        let closing = match source[pos..].chars().next() {
            Some('"') => '"',
            Some('<') => '>',
            _ => return pos,
        };
        tokens.push(Token {
            kind: TokenKind::Punct,
            start: pos,
            end: pos + 1,
        });
        pos += 1;
        let len = self
            .include_path
            .find(&source[pos..])
            .map(|m| m.end())
            .unwrap_or(0);
        tokens.push(Token {
            kind: TokenKind::IncludePath,
            start: pos,
            end: pos + len,
        });
        pos += len;
        if source[pos..].starts_with(closing) {
            tokens.push(Token {
                kind: TokenKind::Punct,
                start: pos,
                end: pos + 1,
            });
            pos += 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new()
            .tokenize(source)
            .iter()
            .map(|token| (token.kind, token.text(source)))
            .collect()
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            lex("1 1u 0x1FUL 1.5 .5 1. 1e3 1.5e-3h 2f 1L 12abc"),
            vec![
                (TokenKind::IntegerLiteral, "1"),
                (TokenKind::IntegerLiteral, "1u"),
                (TokenKind::IntegerLiteral, "0x1FUL"),
                (TokenKind::FloatLiteral, "1.5"),
                (TokenKind::FloatLiteral, ".5"),
                (TokenKind::FloatLiteral, "1."),
                (TokenKind::FloatLiteral, "1e3"),
                (TokenKind::FloatLiteral, "1.5e-3h"),
                (TokenKind::FloatLiteral, "2f"),
                (TokenKind::IntegerLiteral, "1L"),
                (TokenKind::Word, "12abc"),
            ]
        );
    }

    #[test]
    fn test_lex_trivia() {
        assert_eq!(
            lex("// line \\\n continued\n#define A \\\n 1\n/* block */x"),
            vec![
                (TokenKind::Comment, "// line \\\n continued"),
                (TokenKind::Directive, "#define A \\\n 1"),
                (TokenKind::Comment, "/* block */"),
                (TokenKind::Word, "x"),
            ]
        );
    }

    #[test]
    fn test_lex_include() {
        assert_eq!(
            lex("#include <Atom/Features/SrgSemantics.azsli>\n#include \"a b.azsli\""),
            vec![
                (TokenKind::IncludeDirective, "#include"),
                (TokenKind::Punct, "<"),
                (TokenKind::IncludePath, "Atom/Features/SrgSemantics.azsli"),
                (TokenKind::Punct, ">"),
                (TokenKind::IncludeDirective, "#include"),
                (TokenKind::Punct, "\""),
                (TokenKind::IncludePath, "a b.azsli"),
                (TokenKind::Punct, "\""),
            ]
        );
    }

    #[test]
    fn test_lex_never_merges_greater() {
        assert_eq!(
            lex("a>>=b<<=c>=d"),
            vec![
                (TokenKind::Word, "a"),
                (TokenKind::Punct, ">"),
                (TokenKind::Punct, ">"),
                (TokenKind::Punct, "="),
                (TokenKind::Word, "b"),
                (TokenKind::Punct, "<<="),
                (TokenKind::Word, "c"),
                (TokenKind::Punct, ">"),
                (TokenKind::Punct, "="),
                (TokenKind::Word, "d"),
            ]
        );
    }

    #[test]
    fn test_lex_strings_and_unknown() {
        assert_eq!(
            lex(r#""ok\n" "bad\q" @"#),
            vec![
                (TokenKind::StringLiteral, r#""ok\n""#),
                (TokenKind::Unknown, "\""),
                (TokenKind::Word, "bad"),
                (TokenKind::Unknown, "\\"),
                (TokenKind::Word, "q"),
                (TokenKind::Unknown, "\""),
                (TokenKind::Unknown, "@"),
            ]
        );
    }

    #[test]
    fn test_semantic_kind() {
        let lexer = Lexer::new();
        assert_eq!(lexer.semantic_kind("TEXCOORD0"), NodeKind::HlslSemanticStream);
        assert_eq!(lexer.semantic_kind("POSITIONT"), NodeKind::HlslSemanticStream);
        assert_eq!(lexer.semantic_kind("SV_Position"), NodeKind::HlslSemanticSystem);
        assert_eq!(lexer.semantic_kind("sv_target0"), NodeKind::HlslSemanticSystem);
        assert_eq!(lexer.semantic_kind("MyValue"), NodeKind::Identifier);
    }
}
