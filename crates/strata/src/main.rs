mod config;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use config::{Config, Remap};
use strata_errors::{Diagnostic, Renderer};
use strata_syntax::SyntaxStore;
use strata_text::FileId;
use strata_transform::{Compilation, DiagnosticSuppressor, Pipeline, lint};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Provenance-tracking source rewriter")]
enum Options {
    /// Print the syntax tree and syntax errors of a file.
    Parse { path: Utf8PathBuf },
    /// Rewrite files and report diagnostics against the original sources.
    Rewrite {
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,
        #[arg(long)]
        config: Option<Utf8PathBuf>,
        /// Rename a field, as `from=to`.
        #[arg(long, value_parser = parse_rename)]
        rename: Option<(String, String)>,
        /// Trace every method entry through this receiver.
        #[arg(long)]
        trace: Option<String>,
        #[arg(long, value_enum)]
        remap: Option<Remap>,
    },
    /// Print the order transformers would run in.
    Order {
        #[arg(long)]
        config: Utf8PathBuf,
    },
}

fn parse_rename(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_owned(), to.to_owned()))
        }
        _ => Err(format!("expected `from=to`, found `{value}`")),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let renderer = Renderer::styled();

    match Options::parse() {
        Options::Parse { path } => {
            let text = read(&path)?;
            let mut store = SyntaxStore::new();
            let parse = strata_parse::parse(&mut store, FileId::new(0), &text);
            print!("{}", parse.root.debug_dump(&store));
            for diagnostic in &parse.diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
            }
            Ok(())
        }
        Options::Rewrite { paths, config, rename, trace, remap } => {
            let mut config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            };
            if let Some((from, to)) = rename {
                config.rename(from, to);
            }
            if let Some(receiver) = trace {
                config.trace(receiver);
            }
            if let Some(remap) = remap {
                config.pipeline.remap = remap;
            }
            rewrite(&config, &paths, &renderer)
        }
        Options::Order { config } => {
            let config = Config::load(&config)?;
            let pipeline = Pipeline::new(config.transformers()?, &config.orders(), config.policy());
            for diagnostic in pipeline.ordering_diagnostics() {
                eprintln!("{}", diagnostic.render(&renderer, "", ""));
            }
            if !pipeline.is_ordered() {
                bail!("transformers could not be ordered");
            }
            for (position, name) in pipeline.names().enumerate() {
                println!("{}. {name}", position + 1);
            }
            Ok(())
        }
    }
}

fn rewrite(config: &Config, paths: &[Utf8PathBuf], renderer: &Renderer) -> anyhow::Result<()> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push((path.clone(), read(path)?));
    }
    let compilation = Compilation::from_sources(sources);

    let mut syntax_errors = false;
    for tree in compilation.trees() {
        for diagnostic in tree.parse_diagnostics() {
            syntax_errors |= diagnostic.is_error();
            let (path, text) = (tree.path().as_str(), tree.source().as_str());
            eprintln!("{}", diagnostic.render(renderer, path, text));
        }
    }
    if syntax_errors {
        bail!("aborting due to syntax errors");
    }

    let pipeline = Pipeline::new(config.transformers()?, &config.orders(), config.policy());
    let output = pipeline.run(compilation);
    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic.render(renderer, "", ""));
    }
    if !pipeline.is_ordered() {
        bail!("transformers could not be ordered");
    }

    let compilation = &output.compilation;
    for tree in compilation.trees() {
        print!("{}", tree.root().text(compilation.store()));
    }

    let suppressor = DiagnosticSuppressor::new(&output.tracking);
    let (diagnostics, report) = suppressor.apply(compilation, lint::check(compilation));
    for diagnostic in &diagnostics {
        eprintln!("{}", render(diagnostic, compilation, renderer));
    }
    if !report.suppressed.is_empty() {
        eprintln!(
            "note: {} diagnostic(s) in generated code were suppressed",
            report.suppressed.len()
        );
    }
    tracing::info!(
        remapped = report.remapped,
        suppressed = report.suppressed.len(),
        "rewrite finished"
    );
    Ok(())
}

/// Renders a remapped diagnostic against the original source of its file.
fn render(diagnostic: &Diagnostic, compilation: &Compilation, renderer: &Renderer) -> String {
    let tree = diagnostic.location().and_then(|location| compilation.tree(location.file));
    match tree {
        Some(tree) => {
            diagnostic.render(renderer, tree.path().as_str(), tree.source().as_str()).to_string()
        }
        None => diagnostic.render(renderer, "", "").to_string(),
    }
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let filter =
        EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| EnvFilter::new("strata=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
