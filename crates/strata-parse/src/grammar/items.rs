use strata_syntax::SyntaxKind::*;
use strata_syntax::SyntaxSet;

use super::{TYPE_FIRST, exprs, types};
use crate::parser::Parser;

const MODIFIERS: SyntaxSet = SyntaxSet::new([PUBLIC_KW, PRIVATE_KW, STATIC_KW]);
const TYPE_DECL_FIRST: SyntaxSet = MODIFIERS.union(&SyntaxSet::new([CLASS_KW, STRUCT_KW]));
const MEMBER_FIRST: SyntaxSet = MODIFIERS.union(&TYPE_FIRST);

pub(crate) fn compilation_unit(p: &mut Parser<'_>) {
    let m = p.start();
    while !p.at(EOF) {
        type_decl(p);
    }
    p.eof();
    m.complete(p, COMPILATION_UNIT);
}

fn type_decl(p: &mut Parser<'_>) {
    if !p.at_set(&TYPE_DECL_FIRST) {
        p.error_and_bump("expected a class or struct declaration");
        return;
    }

    let m = p.start();
    modifiers(p);
    let kind = match p.peek_kind() {
        CLASS_KW => CLASS_DECL,
        STRUCT_KW => STRUCT_DECL,
        _ => {
            p.error("expected `class` or `struct`");
            m.complete(p, ERROR);
            return;
        }
    };
    p.advance();
    p.expect(NAME);
    member_list(p);
    m.complete(p, kind);
}

fn modifiers(p: &mut Parser<'_>) {
    while p.at_set(&MODIFIERS) {
        p.advance();
    }
}

fn member_list(p: &mut Parser<'_>) {
    if !p.expect(LEFT_BRACE) {
        return;
    }
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        member(p);
    }
    p.expect(RIGHT_BRACE);
}

pub(crate) fn member(p: &mut Parser<'_>) {
    if !p.at_set(&MEMBER_FIRST) {
        p.error_and_bump("expected a field or method declaration");
        return;
    }

    let m = p.start();
    modifiers(p);
    if p.at_set(&TYPE_FIRST) && p.nth(1) == NAME && p.nth(2) == LEFT_PAREN {
        types::ty(p);
        p.advance();
        param_list(p);
        exprs::block(p);
        m.complete(p, METHOD_DECL);
    } else {
        variable_decl(p);
        p.expect(SEMICOLON);
        m.complete(p, FIELD_DECL);
    }
}

/// `Type name [= init] (, name [= init])*`, shared by fields and locals.
pub(crate) fn variable_decl(p: &mut Parser<'_>) {
    let m = p.start();
    types::ty(p);
    declarator(p);
    while p.eat(COMMA) {
        declarator(p);
    }
    m.complete(p, VARIABLE_DECL);
}

fn declarator(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect(NAME);
    if p.at(EQ) {
        let init = p.start();
        p.advance();
        exprs::expr(p);
        init.complete(p, EQUALS_VALUE);
    }
    m.complete(p, VARIABLE_DECLARATOR);
}

fn param_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.expect(LEFT_PAREN);
    if !p.at(RIGHT_PAREN) {
        loop {
            param(p);
            if !p.eat(COMMA) {
                break;
            }
        }
    }
    p.expect(RIGHT_PAREN);
    m.complete(p, PARAM_LIST);
}

fn param(p: &mut Parser<'_>) {
    let m = p.start();
    types::ty(p);
    p.expect(NAME);
    m.complete(p, PARAM);
}
