//! Field extraction from PubMed EFetch XML
//!
//! Every `<PubmedArticle>` in the document becomes one [`PaperRecord`]. Lookups
//! go through the recursive search of [`XmlNode`], so records are found at any
//! nesting depth and missing fields fall back to [`NOT_AVAILABLE`].

use tracing::{debug, instrument};

use crate::error::Result;
use crate::pubmed::models::{PaperRecord, NOT_AVAILABLE};
use crate::xml::XmlNode;

const ARTICLE_TAG: &str = "PubmedArticle";
const ABSTRACT_PATH: [&str; 2] = ["Abstract", "AbstractText"];

/// Parse every article of an EFetch XML response
///
/// # Errors
///
/// Returns `PubMedError::XmlError` if the document is not well-formed.
///
/// # Example
///
/// ```
/// use pubmed_papers::pubmed::parse_records;
///
/// let xml = r#"<PubmedArticleSet>
///   <PubmedArticle>
///     <MedlineCitation>
///       <PMID>12345</PMID>
///       <Article><ArticleTitle>Example Study</ArticleTitle></Article>
///     </MedlineCitation>
///   </PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let records = parse_records(xml).unwrap();
/// assert_eq!(records[0].pubmed_id, "12345");
/// assert_eq!(records[0].authors, "N/A");
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_records(xml: &str) -> Result<Vec<PaperRecord>> {
    let root = XmlNode::parse(xml)?;
    let records = records_from_tree(&root);
    debug!(records = records.len(), "Extracted records from EFetch XML");
    Ok(records)
}

/// Extract a record for every `PubmedArticle` in the tree, root included
pub fn records_from_tree(root: &XmlNode) -> Vec<PaperRecord> {
    std::iter::once(root)
        .chain(root.descendants())
        .filter(|node| node.name == ARTICLE_TAG)
        .map(extract_record)
        .collect()
}

/// Build a record from a single `PubmedArticle` node
pub fn extract_record(article: &XmlNode) -> PaperRecord {
    PaperRecord {
        pubmed_id: first_text(article.find("PMID")),
        title: first_text(article.find("ArticleTitle")),
        authors: extract_authors(article),
        abstract_text: first_text(article.find_path(&ABSTRACT_PATH)),
    }
}

/// `"ForeName LastName"` for each author that has both names, joined by `", "`
fn extract_authors(article: &XmlNode) -> String {
    let names: Vec<String> = article
        .find_all("Author")
        .filter_map(|author| {
            let last = author.child("LastName")?.trimmed_text()?;
            let fore = author.child("ForeName")?.trimmed_text()?;
            Some(format!("{} {}", fore, last))
        })
        .collect();

    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(", ")
    }
}

fn first_text(node: Option<&XmlNode>) -> String {
    node.and_then(XmlNode::trimmed_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
