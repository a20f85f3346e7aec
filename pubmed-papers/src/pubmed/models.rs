use serde::{Deserialize, Serialize};

/// Placeholder used for any field that is missing from the EFetch record
pub const NOT_AVAILABLE: &str = "N/A";

/// Bibliographic summary of one PubMed article
///
/// Every field is always populated; missing values are [`NOT_AVAILABLE`].
/// Serialized column names match the CSV header `PubmedID,Title,Authors,Abstract`.
///
/// # Example
///
/// ```
/// use pubmed_papers::PaperRecord;
///
/// let record = PaperRecord {
///     pubmed_id: "12345".to_string(),
///     title: "Example Study".to_string(),
///     authors: "Jane Smith".to_string(),
///     abstract_text: "An example abstract.".to_string(),
/// };
/// assert_eq!(record.authors, "Jane Smith");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    /// PubMed ID
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    /// Article title
    #[serde(rename = "Title")]
    pub title: String,
    /// `"ForeName LastName"` pairs joined with `", "`
    #[serde(rename = "Authors")]
    pub authors: String,
    /// First abstract paragraph
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
}

/// Why one of the two E-utilities calls did not produce a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// HTTP status, when the server answered at all
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of a search-then-fetch round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// EFetch succeeded; records are in document order
    Found(Vec<PaperRecord>),
    /// ESearch returned an empty identifier list, EFetch was not called
    NoMatches,
    /// ESearch could not be completed
    SearchFailed(TransportFailure),
    /// EFetch could not be completed; identifiers from ESearch were discarded
    FetchFailed(TransportFailure),
}

impl FetchOutcome {
    /// Records on success, an empty vector for every other outcome
    pub fn into_records(self) -> Vec<PaperRecord> {
        match self {
            FetchOutcome::Found(records) => records,
            FetchOutcome::NoMatches
            | FetchOutcome::SearchFailed(_)
            | FetchOutcome::FetchFailed(_) => Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FetchOutcome::SearchFailed(_) | FetchOutcome::FetchFailed(_)
        )
    }

    /// Human-readable note for outcomes that carry no records
    pub fn message(&self) -> Option<String> {
        match self {
            FetchOutcome::Found(_) => None,
            FetchOutcome::NoMatches => Some("No papers found for the given query.".to_string()),
            FetchOutcome::SearchFailed(failure) => Some(format!(
                "Failed to fetch data from PubMed ({})",
                failure
            )),
            FetchOutcome::FetchFailed(failure) => {
                Some(format!("Failed to fetch paper details ({})", failure))
            }
        }
    }
}
