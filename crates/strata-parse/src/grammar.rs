use strata_syntax::SyntaxKind::*;
use strata_syntax::SyntaxSet;

pub(crate) mod exprs;
pub(crate) mod items;
pub(crate) mod types;

pub(crate) const PREDEFINED_TYPES: SyntaxSet =
    SyntaxSet::new([INT_KW, BOOL_KW, STRING_KW, VOID_KW]);
pub(crate) const TYPE_FIRST: SyntaxSet = PREDEFINED_TYPES.union(&SyntaxSet::new([NAME]));
