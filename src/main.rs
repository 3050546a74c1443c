// Command-line entry point for astview.

use anyhow::Result;
use astview::application::VisualizeUsecase;
use astview::infrastructure::{source, PythonAstParser};
use astview::ports::dot_exporter::DotExporter;
use astview::ports::json_exporter::JsonExporter;
use astview::ports::GraphExporter;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Python source file to visualise
    input: Option<String>,

    /// Fetch the source from a URL instead of a local file
    #[arg(long, conflicts_with = "input")]
    url: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = "ast.dot")]
    output: String,

    /// Output format (dot, json)
    #[arg(short, long, default_value = "dot")]
    format: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let source_text = match (&cli.input, &cli.url) {
        (Some(path), _) => source::from_path(path)?,
        (None, Some(url)) => source::from_url(url)?,
        (None, None) => {
            println!("No filepath given.");
            return Ok(());
        }
    };

    let exporter: &dyn GraphExporter = match cli.format.as_str() {
        "json" => &JsonExporter,
        "dot" => &DotExporter,
        other => anyhow::bail!("unknown output format: {other}"),
    };

    let usecase = VisualizeUsecase {
        parser: &PythonAstParser,
        exporter,
    };
    usecase.run(&source_text, &cli.output)?;

    println!(
        "Wrote {} (format: {})",
        cli.output, cli.format
    );
    Ok(())
}
