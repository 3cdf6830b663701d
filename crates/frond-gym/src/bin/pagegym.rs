//! Build a sample page, replay a script against it and print the result.

use std::{io, path::PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use frond::{config::Config, dump, testing::Harness};
use frond_gym::{pages::Sample, script::Step};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI flags for pagegym.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Sample page to build.
    #[clap(short, long, value_enum, default_value = "listing")]
    page: Sample,

    /// Configuration file, in TOML.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Viewport width.
    #[clap(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height.
    #[clap(long, default_value_t = 800.0)]
    height: f64,

    /// Print the connected widgets.
    #[clap(short, long)]
    widgets: bool,

    /// Steps to replay, e.g. `click:open key:Tab wait:300`.
    steps: Vec<Step>,
}

/// Navigations and custom events raised during the session.
fn outbound(h: &Harness) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["kind", "detail"]);
    for n in h.page.navigations() {
        let kind = if n.new_tab { "open" } else { "navigate" };
        table.add_row(vec![kind.to_string(), n.url.clone()]);
    }
    for e in h.page.emitted() {
        let source = dump::describe(h.doc(), e.source);
        table.add_row(vec![format!("event {}", e.name), format!("{source} {}", e.detail)]);
    }
    table.to_string()
}

/// Run pagegym.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("FROND_LOG"))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    let mut h = args.page.build(config, (args.width, args.height))?;
    info!(page = ?args.page, steps = args.steps.len(), "page built");
    for step in &args.steps {
        step.apply(&mut h).with_context(|| format!("step {step}"))?;
    }

    println!("{}", dump::dump(h.doc(), h.doc().root())?);
    if args.widgets {
        println!("{}", dump::widget_table(&h.page));
    }
    if !h.page.navigations().is_empty() || !h.page.emitted().is_empty() {
        println!("{}", outbound(&h));
    }
    Ok(())
}
