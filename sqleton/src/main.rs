use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sqleton::config::{self, Config, RenderConfig};
use sqleton::utils::logging::init_logging;

/// Draw the schema of a SQLite database as a Graphviz diagram
#[derive(Parser, Debug)]
#[command(name = "sqleton", version, about)]
struct Cli {
    /// The SQLite database file
    db_file: PathBuf,

    /// The layout command: neato, dot, circo, fdp (default), osage, sfdp, twopi
    #[arg(short = 'L', long)]
    layout: Option<String>,

    /// Label foreign key edges
    #[arg(short = 'e', long)]
    edge_labels: bool,

    /// Optional title string
    #[arg(short = 't', long)]
    title: Option<String>,

    /// The font to use, by default "Helvetica"
    #[arg(short = 'f', long)]
    font: Option<String>,

    /// Graph direction, "TB" or "LR" (default)
    #[arg(short = 'd', long)]
    direction: Option<String>,

    /// Output file (determines output format); if not given DOT is printed to stdout
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Skip writing table indexes
    #[arg(long)]
    skip_index: bool,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            layout: self.layout.clone(),
            direction: self.direction.clone(),
            font: self.font.clone(),
            title: self.title.clone(),
            edge_labels: self.edge_labels.then_some(true),
            skip_index: self.skip_index.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_from_file(path)?,
        None => Config::default(),
    };

    init_logging(&config.logging)?;

    sqleton::run(&cli.db_file, &config, cli.render_config(), cli.out.as_deref()).await?;

    Ok(())
}
