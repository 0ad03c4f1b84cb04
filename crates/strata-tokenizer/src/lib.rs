//! Lexer producing tokens with attached leading and trailing trivia.
//!
//! Trailing trivia runs up to and including the first newline after a token;
//! everything after that belongs to the next token's leading trivia. A `#` at
//! the start of a line opens a directive, which is kept whole as one trivia
//! piece and tokenized separately by [`tokenize_directive`].

mod cursor;

use cursor::Cursor;
pub use strata_syntax::SyntaxKind;
use strata_syntax::SyntaxKind::*;
use strata_syntax::TriviaPieceKind;
use text_size::{TextRange, TextSize};

/// A trivia piece located in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTrivia {
    pub kind: TriviaPieceKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub leading: Vec<RawTrivia>,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: Vec<RawTrivia>,
}

impl Token {
    fn eof() -> Self {
        Self {
            leading: Vec::new(),
            kind: EOF,
            kind_range: TextRange::empty(TextSize::new(0)),
            trailing: Vec::new(),
        }
    }

    /// Range including leading and trailing trivia.
    pub fn full_range(&self) -> TextRange {
        let start = self.leading.first().map_or(self.kind_range.start(), |it| it.range.start());
        let end = self.trailing.last().map_or(self.kind_range.end(), |it| it.range.end());
        TextRange::new(start, end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Source,
    Directive,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    current: Token,
    mode: Mode,
    at_line_start: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_mode(text, Mode::Source)
    }

    fn with_mode(text: &'a str, mode: Mode) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::eof(),
            mode,
            at_line_start: true,
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let len = self.cursor.pos_within_token();
        TextRange::at(self.offset() - len, len)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    /// Returns the current token and advances to the next one.
    pub fn next_token(&mut self) -> Token {
        let leading = self.trivia(false);
        let (kind, kind_range) = self.syntax_kind();
        self.at_line_start = false;
        let trailing = self.trivia(true);

        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    fn trivia(&mut self, trailing: bool) -> Vec<RawTrivia> {
        let mut pieces = Vec::new();
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '\n' => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\r' if self.cursor.second() == '\n' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.block_comment();
                    TriviaPieceKind::MultiLineComment
                }
                '#' if self.mode == Mode::Source && self.at_line_start && !trailing => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::Directive
                }
                c if c.is_whitespace() => {
                    self.cursor.advance_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                    if self.cursor.pos_within_token() == TextSize::new(0) {
                        // A lone '\r' not followed by '\n'.
                        self.cursor.advance();
                    }
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            pieces.push(RawTrivia { kind, range: self.range() });
            self.cursor.reset_pos_within_token();

            match kind {
                TriviaPieceKind::Newline => {
                    self.at_line_start = true;
                    if trailing {
                        break;
                    }
                }
                TriviaPieceKind::Whitespace => {}
                _ => self.at_line_start = false,
            }
        }
        pieces
    }

    fn block_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_eof() && !self.cursor.rest_starts_with("*/") {
            self.cursor.advance();
        }
        if !self.cursor.is_eof() {
            self.cursor.advance();
            self.cursor.advance();
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        if self.cursor.is_eof() {
            return (EOF, TextRange::empty(self.offset()));
        }

        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ';' => SEMICOLON,
            ',' => COMMA,
            '.' => DOT,
            '+' => PLUS,
            '-' => MINUS,
            '*' => STAR,
            '/' => SLASH,
            '<' => LT,
            '>' => GT,
            '!' => BANG,
            '#' if self.mode == Mode::Directive => HASH,
            '=' => {
                if self.cursor.matches('=') {
                    self.cursor.advance();
                    EQ2
                } else {
                    EQ
                }
            }
            '0'..='9' => {
                self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_');
                INT_NUMBER
            }
            '"' => {
                self.string();
                STRING
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                match self.mode {
                    Mode::Source => SyntaxKind::from_keyword(self.text()).unwrap_or(NAME),
                    Mode::Directive => NAME,
                }
            }
            _ => UNKNOWN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    fn string(&mut self) {
        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => return,
                '"' => {
                    self.cursor.advance();
                    return;
                }
                '\n' | '\r' => return,
                '\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }
}

/// Tokenizes `text` up to and including the `EOF` token.
pub fn tokenize(text: &str) -> Vec<Token> {
    collect(Tokenizer::new(text))
}

/// Tokenizes the text of a single directive line.
pub fn tokenize_directive(text: &str) -> Vec<Token> {
    collect(Tokenizer::with_mode(text, Mode::Directive))
}

fn collect(mut tokenizer: Tokenizer<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let eof = token.kind == EOF;
        tokens.push(token);
        if eof {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        tokenize(text).into_iter().map(|token| token.kind).collect()
    }

    fn trivia_text<'a>(text: &'a str, trivia: &[RawTrivia]) -> Vec<(TriviaPieceKind, &'a str)> {
        trivia.iter().map(|piece| (piece.kind, &text[piece.range])).collect()
    }

    #[test]
    fn keywords_and_punctuation() {
        assert_eq!(
            kinds("class C { int i; }"),
            [CLASS_KW, NAME, LEFT_BRACE, INT_KW, NAME, SEMICOLON, RIGHT_BRACE, EOF]
        );
        assert_eq!(kinds("a == b = \"s\\\"\" 12"), [NAME, EQ2, NAME, EQ, STRING, INT_NUMBER, EOF]);
        assert_eq!(kinds("@"), [UNKNOWN, EOF]);
    }

    #[test]
    fn trailing_trivia_stops_after_newline() {
        let text = "x; // done\n  // next\ny";
        let tokens = tokenize(text);

        assert_eq!(tokens[1].kind, SEMICOLON);
        assert_eq!(
            trivia_text(text, &tokens[1].trailing),
            [
                (TriviaPieceKind::Whitespace, " "),
                (TriviaPieceKind::SingleLineComment, "// done"),
                (TriviaPieceKind::Newline, "\n"),
            ]
        );
        assert_eq!(
            trivia_text(text, &tokens[2].leading),
            [
                (TriviaPieceKind::Whitespace, "  "),
                (TriviaPieceKind::SingleLineComment, "// next"),
                (TriviaPieceKind::Newline, "\n"),
            ]
        );
        assert_eq!(&text[tokens[2].kind_range], "y");
    }

    #[test]
    fn directives_only_at_line_start() {
        let text = "  #pragma warning disable 1\r\nx # y";
        let tokens = tokenize(text);

        assert_eq!(
            trivia_text(text, &tokens[0].leading),
            [
                (TriviaPieceKind::Whitespace, "  "),
                (TriviaPieceKind::Directive, "#pragma warning disable 1"),
                (TriviaPieceKind::Newline, "\r\n"),
            ]
        );
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(kinds, [NAME, UNKNOWN, NAME, EOF]);
    }

    #[test]
    fn directive_tokens() {
        let kinds: Vec<_> = tokenize_directive("#region Fields 2")
            .into_iter()
            .map(|token| token.kind)
            .collect();
        assert_eq!(kinds, [HASH, NAME, NAME, INT_NUMBER, EOF]);
    }

    #[test]
    fn full_ranges_cover_the_text() {
        let text = "/* a\n b */ class\tC\n{\r\n}\n";
        let tokens = tokenize(text);

        let mut end = TextSize::new(0);
        for token in &tokens {
            assert_eq!(token.full_range().start(), end);
            end = token.full_range().end();
        }
        assert_eq!(end, TextSize::of(text));
        assert_eq!(tokens.last().unwrap().kind, EOF);
    }
}
