use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pubmed_papers::config::DEFAULT_MAX_RESULTS;
use pubmed_papers::PaperRecord;

use super::create_pubmed_client;
use crate::output;

#[derive(Args, Debug)]
pub struct Fetch {
    /// Search query (free text, PubMed search syntax is passed through)
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Save results as CSV to this file instead of printing a table
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print how many papers were fetched and enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Maximum number of papers to fetch
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    /// HTTP request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,
}

impl Fetch {
    pub async fn execute_with_config(
        &self,
        email: Option<&str>,
        tool: Option<&str>,
    ) -> Result<()> {
        let client = create_pubmed_client(email, tool, self.max_results, self.timeout)?;

        let papers = client.fetch_records(&self.query).await?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.report(&papers, &mut out)
    }

    fn report<W: Write>(&self, papers: &[PaperRecord], out: &mut W) -> Result<()> {
        if self.debug {
            writeln!(out, "Fetched {} papers.", papers.len())?;
        }

        if papers.is_empty() {
            writeln!(out, "No papers found.")?;
            return Ok(());
        }

        match &self.file {
            Some(path) => {
                output::write_csv(path, papers)?;
                tracing::debug!(path = %path.display(), rows = papers.len(), "CSV written");
                writeln!(out, "Saved results to {}.", path.display())?;
            }
            None => {
                writeln!(out, "{}", output::render_table(papers))?;
            }
        }

        Ok(())
    }
}
