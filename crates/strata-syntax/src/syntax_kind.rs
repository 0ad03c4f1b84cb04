#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACE,
    RIGHT_BRACE,
    SEMICOLON,
    COMMA,
    DOT,
    EQ,
    EQ2,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LT,
    GT,
    BANG,
    HASH,

    CLASS_KW,
    STRUCT_KW,
    PUBLIC_KW,
    PRIVATE_KW,
    STATIC_KW,
    RETURN_KW,
    INT_KW,
    BOOL_KW,
    STRING_KW,
    VOID_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    NAME,
    INT_NUMBER,
    STRING,

    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DIRECTIVE_TRIVIA,

    UNKNOWN,
    EOF,

    COMPILATION_UNIT,
    CLASS_DECL,
    STRUCT_DECL,
    FIELD_DECL,
    METHOD_DECL,
    VARIABLE_DECL,
    VARIABLE_DECLARATOR,
    EQUALS_VALUE,
    PARAM_LIST,
    PARAM,
    PREDEFINED_TYPE,
    NAME_TYPE,
    BLOCK,
    LOCAL_DECL_STMT,
    RETURN_STMT,
    EXPR_STMT,
    EMPTY_STMT,
    LITERAL_EXPR,
    NAME_EXPR,
    PREFIX_EXPR,
    BINARY_EXPR,
    ASSIGN_EXPR,
    PAREN_EXPR,
    MEMBER_EXPR,
    CALL_EXPR,
    ARG_LIST,
    PRAGMA_DIRECTIVE,
    REGION_DIRECTIVE,
    END_REGION_DIRECTIVE,
    BAD_DIRECTIVE,
    ERROR,
    TOMBSTONE,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE | LINE_COMMENT | BLOCK_COMMENT | DIRECTIVE_TRIVIA)
    }

    pub fn is_keyword(self) -> bool {
        (CLASS_KW as u16..=NULL_KW as u16).contains(&(self as u16))
    }

    pub fn is_token(self) -> bool {
        (self as u16) < COMPILATION_UNIT as u16
    }

    /// Looks up the keyword spelled `text`.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "class" => CLASS_KW,
            "struct" => STRUCT_KW,
            "public" => PUBLIC_KW,
            "private" => PRIVATE_KW,
            "static" => STATIC_KW,
            "return" => RETURN_KW,
            "int" => INT_KW,
            "bool" => BOOL_KW,
            "string" => STRING_KW,
            "void" => VOID_KW,
            "true" => TRUE_KW,
            "false" => FALSE_KW,
            "null" => NULL_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// The spelling of punctuation and keyword kinds.
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            LEFT_PAREN => "(",
            RIGHT_PAREN => ")",
            LEFT_BRACE => "{",
            RIGHT_BRACE => "}",
            SEMICOLON => ";",
            COMMA => ",",
            DOT => ".",
            EQ => "=",
            EQ2 => "==",
            PLUS => "+",
            MINUS => "-",
            STAR => "*",
            SLASH => "/",
            LT => "<",
            GT => ">",
            BANG => "!",
            HASH => "#",
            CLASS_KW => "class",
            STRUCT_KW => "struct",
            PUBLIC_KW => "public",
            PRIVATE_KW => "private",
            STATIC_KW => "static",
            RETURN_KW => "return",
            INT_KW => "int",
            BOOL_KW => "bool",
            STRING_KW => "string",
            VOID_KW => "void",
            TRUE_KW => "true",
            FALSE_KW => "false",
            NULL_KW => "null",
            _ => return None,
        };
        Some(text)
    }

    /// Human readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self.fixed_text() {
            Some(text) => text,
            None => match self {
                NAME => "identifier",
                INT_NUMBER => "number",
                STRING => "string literal",
                EOF => "end of file",
                _ => "token",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SyntaxKind::*;
    use super::*;

    #[test]
    fn keywords_round_trip_through_fixed_text() {
        for kind in [CLASS_KW, STRUCT_KW, RETURN_KW, VOID_KW, NULL_KW] {
            let text = kind.fixed_text().unwrap();
            assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
            assert!(kind.is_keyword());
        }
        assert_eq!(SyntaxKind::from_keyword("Class"), None);
    }

    #[test]
    fn classification() {
        assert!(DIRECTIVE_TRIVIA.is_trivia());
        assert!(!NAME.is_trivia());
        assert!(EOF.is_token());
        assert!(!FIELD_DECL.is_token());
        assert!(!NAME.is_keyword());
    }
}
