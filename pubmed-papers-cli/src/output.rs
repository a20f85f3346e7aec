//! Console table and CSV rendering of fetched papers

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, Table};
use pubmed_papers::PaperRecord;

const TITLE_WIDTH: usize = 60;
const AUTHORS_WIDTH: usize = 40;
const ABSTRACT_WIDTH: usize = 80;

/// Table with one row per paper; long cells are cut with `...`
pub fn render_table(papers: &[PaperRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["PubmedID", "Title", "Authors", "Abstract"]);

    for paper in papers {
        table.add_row(vec![
            Cell::new(&paper.pubmed_id),
            Cell::new(truncate(&paper.title, TITLE_WIDTH)).add_attribute(Attribute::Bold),
            Cell::new(truncate(&paper.authors, AUTHORS_WIDTH)),
            Cell::new(truncate(&paper.abstract_text, ABSTRACT_WIDTH)),
        ]);
    }

    table
}

/// Write papers as CSV with a `PubmedID,Title,Authors,Abstract` header
pub fn write_csv(path: &Path, papers: &[PaperRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv_to(file, papers)
}

pub fn write_csv_to<W: Write>(writer: W, papers: &[PaperRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for paper in papers {
        wtr.serialize(paper).context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
