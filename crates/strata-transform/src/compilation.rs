use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use strata_errors::Diagnostic;
use strata_syntax::{SyntaxNode, SyntaxStore};
use strata_text::{FileId, SourceText};
use strata_track::{TrackingContext, TreeSource};

/// One source file: its original parse and its current generation.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file: FileId,
    path: Utf8PathBuf,
    source: SourceText,
    original: SyntaxNode,
    root: SyntaxNode,
    diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Text the file was parsed from.
    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn original_root(&self) -> &SyntaxNode {
        &self.original
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Syntax diagnostics of the original parse.
    pub fn parse_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// All trees of one compilation and the store they live in.
#[derive(Debug, Default)]
pub struct Compilation {
    store: SyntaxStore,
    trees: Vec<SyntaxTree>,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources<P, T>(sources: impl IntoIterator<Item = (P, T)>) -> Self
    where
        P: Into<Utf8PathBuf>,
        T: Into<Arc<str>>,
    {
        let mut compilation = Self::new();
        for (path, text) in sources {
            compilation.add_source(path, text);
        }
        compilation
    }

    pub fn add_source(
        &mut self,
        path: impl Into<Utf8PathBuf>,
        text: impl Into<Arc<str>>,
    ) -> FileId {
        let file = FileId::new(self.trees.len() as u32);
        let source = SourceText::new(text);
        let parse = strata_parse::parse(&mut self.store, file, source.as_str());
        let path = path.into();
        tracing::debug!(%path, errors = parse.diagnostics.len(), "parsed source");
        self.trees.push(SyntaxTree {
            file,
            path,
            source,
            original: parse.root.clone(),
            root: parse.root,
            diagnostics: parse.diagnostics,
        });
        file
    }

    pub fn store(&self) -> &SyntaxStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SyntaxStore {
        &mut self.store
    }

    pub fn files(&self) -> impl Iterator<Item = FileId> + use<> {
        (0..self.trees.len() as u32).map(FileId::new)
    }

    pub fn tree(&self, file: FileId) -> Option<&SyntaxTree> {
        self.trees.get(file.index() as usize)
    }

    pub fn trees(&self) -> impl Iterator<Item = &SyntaxTree> {
        self.trees.iter()
    }

    /// Replaces the current root of `file`.
    ///
    /// # Panics
    ///
    /// Panics if `file` does not belong to this compilation.
    pub fn set_root(&mut self, file: FileId, root: SyntaxNode) {
        self.trees[file.index() as usize].root = root;
    }

    /// Current text of `file`.
    pub fn text(&self, file: FileId) -> Option<String> {
        Some(self.tree(file)?.root.text(&self.store))
    }

    pub fn parse_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.trees.iter().flat_map(|tree| &tree.diagnostics)
    }

    pub(crate) fn roots(&self) -> Vec<SyntaxNode> {
        self.trees.iter().map(|tree| tree.root.clone()).collect()
    }

    pub(crate) fn restore_roots(&mut self, roots: Vec<SyntaxNode>) {
        for (tree, root) in self.trees.iter_mut().zip(roots) {
            tree.root = root;
        }
    }

    /// Stamps every current root so the next pass maps onto this generation.
    pub(crate) fn track_roots(&mut self, tracking: &TrackingContext) {
        for tree in &mut self.trees {
            tree.root = tracking.track_root(&mut self.store, &tree.root);
        }
    }
}

impl TreeSource for Compilation {
    fn store(&self) -> &SyntaxStore {
        &self.store
    }

    fn root(&self, file: FileId) -> Option<SyntaxNode> {
        Some(self.tree(file)?.root.clone())
    }
}
