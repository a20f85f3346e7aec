use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "pubmed-papers",
    version,
    about = "Fetch research papers from PubMed and print them or save them as CSV",
    long_about = "Searches PubMed for QUERY, fetches title, authors and abstract of the top matches \
                  and prints them as a table, or writes them to a CSV file with --file"
)]
struct Cli {
    #[command(flatten)]
    fetch: commands::fetch::Fetch,

    /// Email for NCBI requests (recommended by NCBI)
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name reported to NCBI
    #[arg(long, env = "NCBI_TOOL")]
    tool: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_filter(cli.fetch.debug))
        .init();

    cli.fetch
        .execute_with_config(cli.email.as_deref(), cli.tool.as_deref())
        .await
}

/// Debug output covers this tool's crates only; dependencies stay at info.
/// `--debug` wins over `RUST_LOG`.
fn log_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new(DEBUG_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

const DEBUG_DIRECTIVES: &str = "pubmed_papers=debug,pubmed_papers_cli=debug,info";
