use strata_syntax::SyntaxKind::*;

use super::PREDEFINED_TYPES;
use crate::parser::Parser;

pub(crate) fn ty(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at_set(&PREDEFINED_TYPES) {
        p.advance();
        m.complete(p, PREDEFINED_TYPE);
    } else if p.at(NAME) {
        p.advance();
        m.complete(p, NAME_TYPE);
    } else {
        p.error("expected a type");
        p.missing(NAME);
        m.complete(p, NAME_TYPE);
    }
}
