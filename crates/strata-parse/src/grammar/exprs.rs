use strata_syntax::SyntaxKind::{self, *};
use strata_syntax::SyntaxSet;

use super::{PREDEFINED_TYPES, items};
use crate::parser::{CompletedMarker, Parser};

const LITERALS: SyntaxSet = SyntaxSet::new([INT_NUMBER, STRING, TRUE_KW, FALSE_KW, NULL_KW]);
const EXPR_END: SyntaxSet = SyntaxSet::new([SEMICOLON, RIGHT_PAREN, RIGHT_BRACE, COMMA, EOF]);
const STMT_RECOVERY: SyntaxSet = SyntaxSet::new([RIGHT_PAREN, COMMA]);

pub(crate) fn block(p: &mut Parser<'_>) {
    let m = p.start();
    if p.expect(LEFT_BRACE) {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            if p.at_set(&STMT_RECOVERY) {
                p.error_and_bump("expected a statement");
                continue;
            }
            stmt(p);
        }
    }
    p.expect(RIGHT_BRACE);
    m.complete(p, BLOCK);
}

pub(crate) fn stmt(p: &mut Parser<'_>) {
    match p.peek_kind() {
        LEFT_BRACE => block(p),
        SEMICOLON => {
            let m = p.start();
            p.advance();
            m.complete(p, EMPTY_STMT);
        }
        RETURN_KW => {
            let m = p.start();
            p.advance();
            if !p.at(SEMICOLON) {
                expr(p);
            }
            p.expect(SEMICOLON);
            m.complete(p, RETURN_STMT);
        }
        _ if at_local_decl(p) => {
            let m = p.start();
            items::variable_decl(p);
            p.expect(SEMICOLON);
            m.complete(p, LOCAL_DECL_STMT);
        }
        _ => {
            let m = p.start();
            expr(p);
            p.expect(SEMICOLON);
            m.complete(p, EXPR_STMT);
        }
    }
}

fn at_local_decl(p: &Parser<'_>) -> bool {
    p.at_set(&PREDEFINED_TYPES) || (p.at(NAME) && p.nth(1) == NAME)
}

pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let lhs = binary_expr(p, 0)?;
    if !p.at(EQ) {
        return Some(lhs);
    }

    let m = lhs.precede(p);
    p.advance();
    expr(p);
    Some(m.complete(p, ASSIGN_EXPR))
}

fn binding_power(kind: SyntaxKind) -> Option<u8> {
    Some(match kind {
        EQ2 => 1,
        LT | GT => 2,
        PLUS | MINUS => 3,
        STAR | SLASH => 4,
        _ => return None,
    })
}

fn binary_expr(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = prefix_expr(p)?;

    while let Some(bp) = binding_power(p.peek_kind()) {
        if bp <= min_bp {
            break;
        }

        let m = lhs.precede(p);
        p.advance();
        binary_expr(p, bp);
        lhs = m.complete(p, BINARY_EXPR);
    }

    Some(lhs)
}

fn prefix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(MINUS) || p.at(BANG) {
        let m = p.start();
        p.advance();
        prefix_expr(p);
        return Some(m.complete(p, PREFIX_EXPR));
    }
    postfix_expr(p)
}

fn postfix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    loop {
        lhs = match p.peek_kind() {
            DOT => {
                let m = lhs.precede(p);
                p.advance();
                p.expect(NAME);
                m.complete(p, MEMBER_EXPR)
            }
            LEFT_PAREN => {
                let m = lhs.precede(p);
                arg_list(p);
                m.complete(p, CALL_EXPR)
            }
            _ => break,
        };
    }

    Some(lhs)
}

fn arg_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    if !p.at(RIGHT_PAREN) {
        loop {
            expr(p);
            if !p.eat(COMMA) {
                break;
            }
        }
    }
    p.expect(RIGHT_PAREN);
    m.complete(p, ARG_LIST);
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let kind = match p.peek_kind() {
        kind if LITERALS.contains(kind) => {
            p.advance();
            LITERAL_EXPR
        }
        NAME => {
            p.advance();
            NAME_EXPR
        }
        LEFT_PAREN => {
            p.advance();
            expr(p);
            p.expect(RIGHT_PAREN);
            PAREN_EXPR
        }
        kind if EXPR_END.contains(kind) => {
            p.error("expected an expression");
            p.missing(NAME);
            NAME_EXPR
        }
        _ => {
            p.error("expected an expression");
            p.advance();
            m.complete(p, ERROR);
            return None;
        }
    };
    Some(m.complete(p, kind))
}
