use strata_syntax::ast::{AstNode, ClassDecl, CompilationUnit, MemberExpr, MethodDecl, NameExpr};
use strata_syntax::SyntaxKind::{self, *};
use strata_syntax::{NodeOrToken, SyntaxNode, SyntaxStore, TextSize};
use strata_track::TrackingContext;

use super::token_starting_at;
use crate::{Compilation, SourceTransformer, TransformError};

/// Renames a field and the references to it inside its class.
///
/// References are unqualified names and `Class.field` accesses in the
/// methods of a class declaring the field. Methods with a parameter or local
/// of the same name are left alone. The new name tokens are generated code.
#[derive(Debug, Clone)]
pub struct RenameField {
    from: String,
    to: String,
}

impl RenameField {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    fn targets(&self, store: &SyntaxStore, root: &SyntaxNode) -> Vec<TextSize> {
        let mut offsets = Vec::new();
        for class in CompilationUnit::new(root.clone()).types(store) {
            let fields = self.field_names(store, &class);
            if fields.is_empty() {
                continue;
            }
            offsets.extend(fields);
            let class_name = class.name(store).map(|name| name.text(store).to_owned());
            for method in class.methods(store) {
                if !self.shadowed(store, &method) {
                    self.references(store, &method, class_name.as_deref(), &mut offsets);
                }
            }
        }
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }

    fn field_names(&self, store: &SyntaxStore, class: &ClassDecl) -> Vec<TextSize> {
        class
            .fields(store)
            .filter_map(|field| field.declaration(store))
            .flat_map(|decl| decl.declarators(store))
            .filter_map(|declarator| declarator.name(store))
            .filter(|name| name.text(store) == self.from)
            .map(|name| name.range(store).start())
            .collect()
    }

    fn shadowed(&self, store: &SyntaxStore, method: &MethodDecl) -> bool {
        method.syntax().descendants(store).any(|node| {
            matches!(node.kind(store), PARAM | VARIABLE_DECLARATOR)
                && direct_name(store, &node).is_some_and(|name| name == self.from)
        })
    }

    fn references(
        &self,
        store: &SyntaxStore,
        method: &MethodDecl,
        class_name: Option<&str>,
        offsets: &mut Vec<TextSize>,
    ) {
        let Some(body) = method.body(store) else { return };
        for node in body.syntax().descendants(store) {
            let name = match node.kind(store) {
                NAME_EXPR => NameExpr::cast(store, node).and_then(|expr| expr.name(store)),
                MEMBER_EXPR => MemberExpr::cast(store, node).and_then(|expr| {
                    let receiver = expr.receiver(store)?;
                    let qualified = receiver.kind(store) == NAME_EXPR
                        && class_name.is_some()
                        && direct_name(store, receiver.syntax()).as_deref() == class_name;
                    qualified.then(|| expr.name(store)).flatten()
                }),
                _ => None,
            };
            if let Some(name) = name.filter(|name| name.text(store) == self.from) {
                offsets.push(name.range(store).start());
            }
        }
    }
}

fn direct_name(store: &SyntaxStore, node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens(store)
        .filter_map(NodeOrToken::into_token)
        .find(|token| token.kind(store) == NAME && !token.is_missing(store))
        .map(|token| token.text(store).to_owned())
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && SyntaxKind::from_keyword(text).is_none()
}

impl SourceTransformer for RenameField {
    fn name(&self) -> &str {
        "strata.RenameField"
    }

    fn transform(
        &self,
        compilation: &mut Compilation,
        tracking: &TrackingContext,
    ) -> Result<(), TransformError> {
        if !is_identifier(&self.to) {
            return Err(TransformError::InvalidFragment {
                text: self.to.clone(),
                message: "not an identifier".to_owned(),
            });
        }

        for file in compilation.files() {
            let Some(tree) = compilation.tree(file) else { continue };
            let mut root = tree.root().clone();
            let targets = self.targets(compilation.store(), &root);
            if targets.is_empty() {
                continue;
            }
            tracing::debug!(%file, count = targets.len(), from = %self.from, "renaming");

            let store = compilation.store_mut();
            for offset in targets.into_iter().rev() {
                let Some(token) = token_starting_at(store, &root, offset, NAME) else { continue };
                let renamed = store.with_token_text(token.green(), &self.to);
                let renamed = tracking.mark_synthetic(store, NodeOrToken::Token(renamed));
                root = tracking.replace_element(store, &root, &NodeOrToken::Token(token), renamed)?;
            }
            compilation.set_root(file, root);
        }
        Ok(())
    }
}
