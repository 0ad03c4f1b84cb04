use drop_bomb::DropBomb;
use strata_errors::{Diagnostic, DiagnosticCode};
use strata_syntax::{
    Builder, GreenNodeId, GreenTrivia, SyntaxKind, SyntaxSet, SyntaxStore, TextRange, TextSize,
    TriviaPiece, TriviaPieceKind,
};
use strata_text::{FileId, Location};
use strata_tokenizer::{RawTrivia, Token, tokenize};

use crate::directive;

pub(crate) struct Parser<'a> {
    file: Option<FileId>,
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    last_end: TextSize,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(file: Option<FileId>, text: &'a str) -> Self {
        Self {
            file,
            text,
            tokens: tokenize(text),
            pos: 0,
            last_end: TextSize::new(0),
            events: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens.get(self.pos + n).map_or(SyntaxKind::EOF, |token| token.kind)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn advance(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        self.last_end = self.tokens[self.pos].kind_range.end();
        self.events.push(Event::Token(self.pos));
        self.pos += 1;
    }

    /// Attaches the end-of-file token, which owns the trailing trivia of the file.
    pub(crate) fn eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        self.events.push(Event::Token(self.pos));
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    /// Consumes `kind`, or reports it and inserts a missing token in its place.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let message = match kind.fixed_text() {
            Some(text) => format!("expected `{text}`"),
            None => format!("expected {}", kind.describe()),
        };
        self.push_diagnostic(message, TextRange::empty(self.last_end));
        self.missing(kind);
        false
    }

    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Missing(kind));
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: &str) {
        let range = self.tokens.get(self.pos).map_or(TextRange::empty(self.last_end), |token| {
            token.kind_range
        });
        self.push_diagnostic(message.to_owned(), range);
    }

    pub(crate) fn error_and_bump(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    fn push_diagnostic(&mut self, message: String, range: TextRange) {
        let diagnostic = Diagnostic::error(DiagnosticCode::Syntax, message);
        self.diagnostics.push(match self.file {
            Some(file) => diagnostic.with_location(Location::new(file, range)),
            None => diagnostic,
        });
    }

    pub(crate) fn build(self, store: &mut SyntaxStore) -> (GreenNodeId, Vec<Diagnostic>) {
        let Parser { text, tokens, mut events, diagnostics, .. } = self;
        let mut builder = Builder::new(store);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(index) => {
                    let Token { leading, kind, kind_range, trailing } = &tokens[index];
                    let leading = trivia(&mut builder, text, leading);
                    let trailing = trivia(&mut builder, text, trailing);
                    builder.token(*kind, &text[*kind_range], leading, trailing);
                }
                Event::Missing(kind) => {
                    builder.missing(kind);
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

fn trivia(builder: &mut Builder<'_>, text: &str, raw: &[RawTrivia]) -> GreenTrivia {
    let mut pieces = Vec::with_capacity(raw.len());
    for piece in raw {
        let piece_text = &text[piece.range];
        pieces.push(match piece.kind {
            TriviaPieceKind::Directive => {
                let root = directive::build(builder.store(), piece_text);
                TriviaPiece::structured(piece.kind, piece_text, root)
            }
            kind => TriviaPiece::new(kind, piece_text),
        });
    }
    GreenTrivia::new(pieces)
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(usize),
    Missing(SyntaxKind),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self {
            position: pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
