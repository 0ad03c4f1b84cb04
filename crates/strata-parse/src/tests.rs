use expect_test::{Expect, expect};
use strata_syntax::{SyntaxKind, SyntaxNode, SyntaxStore};
use strata_text::FileId;

use crate::{parse, parse_expression, parse_member, parse_statement};

fn check(text: &str, expect: Expect) {
    let mut store = SyntaxStore::default();
    let parse = parse(&mut store, FileId::new(0), text);
    let mut actual = parse.root.debug_dump(&store);
    for diagnostic in &parse.diagnostics {
        actual.push_str(&format!("{diagnostic}\n"));
    }
    assert_eq!(parse.root.text(&store), text, "parse must be lossless");
    expect.assert_eq(&actual);
}

#[test]
fn field() {
    check(
        "class C { int i; }",
        expect![[r#"
            COMPILATION_UNIT@0..18
              CLASS_DECL@0..18
                CLASS_KW@0..5 "class"
                WHITESPACE@5..6 " "
                NAME@6..7 "C"
                WHITESPACE@7..8 " "
                LEFT_BRACE@8..9 "{"
                WHITESPACE@9..10 " "
                FIELD_DECL@10..17
                  VARIABLE_DECL@10..15
                    PREDEFINED_TYPE@10..14
                      INT_KW@10..13 "int"
                      WHITESPACE@13..14 " "
                    VARIABLE_DECLARATOR@14..15
                      NAME@14..15 "i"
                  SEMICOLON@15..16 ";"
                  WHITESPACE@16..17 " "
                RIGHT_BRACE@17..18 "}"
              EOF@18..18 ""
        "#]],
    );
}

#[test]
fn missing_semicolon() {
    check(
        "class C { int i }",
        expect![[r#"
            COMPILATION_UNIT@0..17
              CLASS_DECL@0..17
                CLASS_KW@0..5 "class"
                WHITESPACE@5..6 " "
                NAME@6..7 "C"
                WHITESPACE@7..8 " "
                LEFT_BRACE@8..9 "{"
                WHITESPACE@9..10 " "
                FIELD_DECL@10..16
                  VARIABLE_DECL@10..16
                    PREDEFINED_TYPE@10..14
                      INT_KW@10..13 "int"
                      WHITESPACE@13..14 " "
                    VARIABLE_DECLARATOR@14..16
                      NAME@14..15 "i"
                      WHITESPACE@15..16 " "
                  SEMICOLON@16..16 missing
                RIGHT_BRACE@16..17 "}"
              EOF@17..17 ""
            error[STR0001]: expected `;` at file#0@15..15
        "#]],
    );
}

#[test]
fn region_directive() {
    check(
        "#region R\nclass C {}\n",
        expect![[r##"
            COMPILATION_UNIT@0..21
              CLASS_DECL@0..21
                DIRECTIVE_TRIVIA@0..9 "#region R"
                  REGION_DIRECTIVE@0..9
                    HASH@0..1 "#"
                    NAME@1..7 "region"
                    WHITESPACE@7..8 " "
                    NAME@8..9 "R"
                NEWLINE@9..10 "\n"
                CLASS_KW@10..15 "class"
                WHITESPACE@15..16 " "
                NAME@16..17 "C"
                WHITESPACE@17..18 " "
                LEFT_BRACE@18..19 "{"
                RIGHT_BRACE@19..20 "}"
                NEWLINE@20..21 "\n"
              EOF@21..21 ""
        "##]],
    );
}

#[test]
fn unexpected_top_level_token() {
    let mut store = SyntaxStore::default();
    let parse = parse(&mut store, FileId::new(0), "int x; class C {}");
    assert!(parse.has_errors());
    assert_eq!(parse.root.text(&store), "int x; class C {}");
    let errors = parse.root.children(&store).filter(|n| n.kind(&store) == SyntaxKind::ERROR);
    assert_eq!(errors.count(), 3);
    assert!(parse.root.children(&store).any(|n| n.kind(&store) == SyntaxKind::CLASS_DECL));
}

#[test]
fn method_with_statements() {
    let text = "\
class C
{
    // counter
    public int Count(int a, string b)
    {
        int x = a * 2 + 1;
        x = x - 1;
        Trace.Enter(\"Count\");
        return (x);
    }
}
";
    let mut store = SyntaxStore::default();
    let parse = parse(&mut store, FileId::new(0), text);
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
    assert_eq!(parse.root.text(&store), text);

    let kinds: Vec<_> = parse.root.descendants(&store).map(|n| n.kind(&store)).collect();
    for kind in [
        SyntaxKind::METHOD_DECL,
        SyntaxKind::PARAM_LIST,
        SyntaxKind::LOCAL_DECL_STMT,
        SyntaxKind::ASSIGN_EXPR,
        SyntaxKind::CALL_EXPR,
        SyntaxKind::MEMBER_EXPR,
        SyntaxKind::RETURN_STMT,
        SyntaxKind::PAREN_EXPR,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }
    assert_eq!(kinds.iter().filter(|&&kind| kind == SyntaxKind::PARAM).count(), 2);
}

#[test]
fn binary_precedence() {
    let mut store = SyntaxStore::default();
    let fragment = parse_expression(&mut store, "a + b * c == d");
    assert!(fragment.is_ok());
    let root = SyntaxNode::new_root(fragment.green);
    assert_eq!(root.kind(&store), SyntaxKind::BINARY_EXPR);

    let children: Vec<_> = root.children(&store).map(|n| n.text(&store)).collect();
    assert_eq!(children, ["a + b * c ", "d"]);
    let lhs = root.children(&store).next().unwrap();
    let lhs_children: Vec<_> = lhs.children(&store).map(|n| n.text(&store)).collect();
    assert_eq!(lhs_children, ["a ", "b * c "]);
}

#[test]
fn assignment_is_right_associative() {
    let mut store = SyntaxStore::default();
    let fragment = parse_expression(&mut store, "a = b = c");
    let root = SyntaxNode::new_root(fragment.green);
    assert_eq!(root.kind(&store), SyntaxKind::ASSIGN_EXPR);
    let rhs = root.children(&store).nth(1).unwrap();
    assert_eq!(rhs.kind(&store), SyntaxKind::ASSIGN_EXPR);
    assert_eq!(rhs.text(&store), "b = c");
}

#[test]
fn statement_fragment_keeps_trivia() {
    let mut store = SyntaxStore::default();
    let text = "        Trace.Enter(\"M\");\n";
    let fragment = parse_statement(&mut store, text);
    assert!(fragment.is_ok());
    let root = SyntaxNode::new_root(fragment.green);
    assert_eq!(root.kind(&store), SyntaxKind::EXPR_STMT);
    assert_eq!(root.text(&store), text);
}

#[test]
fn member_fragment() {
    let mut store = SyntaxStore::default();
    let fragment = parse_member(&mut store, "private bool ready = true;");
    assert!(fragment.is_ok());
    let root = SyntaxNode::new_root(fragment.green);
    assert_eq!(root.kind(&store), SyntaxKind::FIELD_DECL);
}

#[test]
fn fragment_with_trailing_text() {
    let mut store = SyntaxStore::default();
    let fragment = parse_expression(&mut store, "a b");
    assert!(!fragment.is_ok());
    assert!(fragment.diagnostics.iter().all(|d| d.location().is_none()));
}

#[test]
fn missing_expression() {
    let mut store = SyntaxStore::default();
    let fragment = parse_statement(&mut store, "x = ;");
    assert_eq!(fragment.diagnostics.len(), 1);
    assert_eq!(fragment.diagnostics[0].message(), "expected an expression");
    let root = SyntaxNode::new_root(fragment.green);
    let missing = root.descendant_tokens(&store).find(|t| t.is_missing(&store)).unwrap();
    assert_eq!(missing.kind(&store), SyntaxKind::NAME);
    assert_eq!(missing.parent().kind(&store), SyntaxKind::NAME_EXPR);
}
