//! Checks run over transformed trees.

use rustc_hash::FxHashSet;
use strata_errors::{Diagnostic, DiagnosticCode};
use strata_syntax::ast::{ClassDecl, CompilationUnit, Member};
use strata_syntax::{SyntaxStore, SyntaxToken};
use strata_text::{FileId, Location};

use crate::Compilation;

/// Duplicate member names and missing tokens, in file order.
pub fn check(compilation: &Compilation) -> Vec<Diagnostic> {
    let store = compilation.store();
    let mut diagnostics = Vec::new();
    for tree in compilation.trees() {
        let file = tree.file();
        for class in CompilationUnit::new(tree.root().clone()).types(store) {
            duplicate_members(store, file, &class, &mut diagnostics);
        }
        for token in tree.root().descendant_tokens(store) {
            if token.is_missing(store) {
                let kind = token.kind(store);
                let message = match kind.fixed_text() {
                    Some(text) => format!("missing `{text}`"),
                    None => format!("missing {}", kind.describe()),
                };
                let location = Location::new(file, token.range(store));
                diagnostics.push(
                    Diagnostic::error(DiagnosticCode::MissingToken, message)
                        .with_location(location),
                );
            }
        }
    }
    diagnostics
}

fn duplicate_members(
    store: &SyntaxStore,
    file: FileId,
    class: &ClassDecl,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let class_name = class.name(store).map_or_else(String::new, |name| name.text(store).into());
    let mut seen = FxHashSet::default();
    for name in class.members(store).flat_map(|member| member_names(store, &member)) {
        if name.is_missing(store) || seen.insert(name.text(store)) {
            continue;
        }
        let message = format!("`{class_name}` already declares `{}`", name.text(store));
        diagnostics.push(
            Diagnostic::error(DiagnosticCode::DuplicateMember, message)
                .with_location(Location::new(file, name.range(store))),
        );
    }
}

fn member_names(store: &SyntaxStore, member: &Member) -> Vec<SyntaxToken> {
    match member {
        Member::Field(field) => field
            .declaration(store)
            .into_iter()
            .flat_map(|decl| decl.declarators(store))
            .filter_map(|declarator| declarator.name(store))
            .collect(),
        Member::Method(method) => method.name(store).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;

    fn check_lint(text: &str, expect: Expect) {
        let compilation = Compilation::from_sources([("test.cs", text)]);
        let actual: String =
            check(&compilation).iter().map(|diagnostic| format!("{diagnostic}\n")).collect();
        expect.assert_eq(&actual);
    }

    #[test]
    fn clean() {
        check_lint("class C { int a, b; void M() { } }", expect![""]);
    }

    #[test]
    fn duplicate_field_and_method() {
        check_lint(
            "class C { int a, a; void a() { } }\nstruct D { int a; }",
            expect![[r#"
                error[STR0002]: `C` already declares `a` at file#0@17..18
                error[STR0002]: `C` already declares `a` at file#0@25..26
            "#]],
        );
    }

    #[test]
    fn missing_tokens() {
        check_lint(
            "class C { int a }",
            expect![[r#"
                error[STR0003]: missing `;` at file#0@16..16
            "#]],
        );
    }
}
