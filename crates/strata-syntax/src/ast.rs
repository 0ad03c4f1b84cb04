use crate::SyntaxKind::{self, *};
use crate::{SyntaxNode, SyntaxStore, SyntaxToken};

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(store: &SyntaxStore, syntax: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $($kind)|+)
            }

            fn cast(store: &SyntaxStore, syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind(store)).then_some(Self(syntax))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(CompilationUnit, COMPILATION_UNIT);
ast_node!(
    /// A `class` or `struct` declaration.
    ClassDecl,
    CLASS_DECL | STRUCT_DECL
);
ast_node!(FieldDecl, FIELD_DECL);
ast_node!(MethodDecl, METHOD_DECL);
ast_node!(VariableDecl, VARIABLE_DECL);
ast_node!(VariableDeclarator, VARIABLE_DECLARATOR);
ast_node!(Block, BLOCK);
ast_node!(
    Stmt,
    BLOCK | LOCAL_DECL_STMT | RETURN_STMT | EXPR_STMT | EMPTY_STMT
);
ast_node!(
    Expr,
    LITERAL_EXPR
        | NAME_EXPR
        | PREFIX_EXPR
        | BINARY_EXPR
        | ASSIGN_EXPR
        | PAREN_EXPR
        | MEMBER_EXPR
        | CALL_EXPR
);
ast_node!(NameExpr, NAME_EXPR);
ast_node!(
    /// `receiver.Name`
    MemberExpr,
    MEMBER_EXPR
);

fn child<N: AstNode>(store: &SyntaxStore, parent: &SyntaxNode) -> Option<N> {
    parent.children(store).find_map(|node| N::cast(store, node))
}

fn children<'s, N: AstNode + 's>(
    store: &'s SyntaxStore,
    parent: &SyntaxNode,
) -> impl Iterator<Item = N> + use<'s, N> {
    parent.children(store).filter_map(move |node| N::cast(store, node))
}

fn token(store: &SyntaxStore, parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent.children_with_tokens(store).filter_map(|child| child.into_token()).find(|token| {
        token.kind(store) == kind
    })
}

impl CompilationUnit {
    pub fn new(root: SyntaxNode) -> Self {
        Self(root)
    }

    pub fn types<'s>(&self, store: &'s SyntaxStore) -> impl Iterator<Item = ClassDecl> + use<'s> {
        children(store, &self.0)
    }
}

/// Member of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Member::Field(field) => field.syntax(),
            Member::Method(method) => method.syntax(),
        }
    }
}

impl ClassDecl {
    pub fn name(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, NAME)
    }

    pub fn members<'s>(&self, store: &'s SyntaxStore) -> impl Iterator<Item = Member> + use<'s> {
        self.0.children(store).filter_map(move |node| match node.kind(store) {
            FIELD_DECL => Some(Member::Field(FieldDecl(node))),
            METHOD_DECL => Some(Member::Method(MethodDecl(node))),
            _ => None,
        })
    }

    pub fn fields<'s>(&self, store: &'s SyntaxStore) -> impl Iterator<Item = FieldDecl> + use<'s> {
        children(store, &self.0)
    }

    pub fn methods<'s>(
        &self,
        store: &'s SyntaxStore,
    ) -> impl Iterator<Item = MethodDecl> + use<'s> {
        children(store, &self.0)
    }
}

impl FieldDecl {
    pub fn declaration(&self, store: &SyntaxStore) -> Option<VariableDecl> {
        child(store, &self.0)
    }

    pub fn semicolon(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, SEMICOLON)
    }
}

impl VariableDecl {
    /// The declared type, either `PREDEFINED_TYPE` or `NAME_TYPE`.
    pub fn ty(&self, store: &SyntaxStore) -> Option<SyntaxNode> {
        self.0
            .children(store)
            .find(|node| matches!(node.kind(store), PREDEFINED_TYPE | NAME_TYPE))
    }

    pub fn declarators<'s>(
        &self,
        store: &'s SyntaxStore,
    ) -> impl Iterator<Item = VariableDeclarator> + use<'s> {
        children(store, &self.0)
    }
}

impl VariableDeclarator {
    pub fn name(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, NAME)
    }

    pub fn initializer(&self, store: &SyntaxStore) -> Option<Expr> {
        let equals_value = self.0.children(store).find(|node| node.kind(store) == EQUALS_VALUE)?;
        child(store, &equals_value)
    }
}

impl MethodDecl {
    pub fn name(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, NAME)
    }

    pub fn param_list(&self, store: &SyntaxStore) -> Option<SyntaxNode> {
        self.0.children(store).find(|node| node.kind(store) == PARAM_LIST)
    }

    pub fn body(&self, store: &SyntaxStore) -> Option<Block> {
        child(store, &self.0)
    }
}

impl Block {
    pub fn l_brace(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, LEFT_BRACE)
    }

    pub fn r_brace(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, RIGHT_BRACE)
    }

    pub fn statements<'s>(&self, store: &'s SyntaxStore) -> impl Iterator<Item = Stmt> + use<'s> {
        children(store, &self.0)
    }
}

impl Stmt {
    pub fn kind(&self, store: &SyntaxStore) -> SyntaxKind {
        self.0.kind(store)
    }
}

impl Expr {
    pub fn kind(&self, store: &SyntaxStore) -> SyntaxKind {
        self.0.kind(store)
    }
}

impl NameExpr {
    pub fn name(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, NAME)
    }
}

impl MemberExpr {
    pub fn receiver(&self, store: &SyntaxStore) -> Option<Expr> {
        child(store, &self.0)
    }

    pub fn name(&self, store: &SyntaxStore) -> Option<SyntaxToken> {
        token(store, &self.0, NAME)
    }
}
