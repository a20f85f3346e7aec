//! # PubMed Papers
//!
//! Search PubMed by keyword and fetch the identifier, title, authors and
//! abstract of the top matches.
//!
//! A round is two requests against NCBI E-utilities: ESearch turns the query
//! into at most `max_results` PMIDs (10 by default), then a single EFetch call
//! returns the XML records, which are reduced to [`PaperRecord`]s. Fields that
//! are missing from a record are set to `"N/A"`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_papers::PubMedClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new()?;
//!
//!     for paper in client.fetch_records("covid-19 treatment").await? {
//!         println!("{} - {}", paper.pubmed_id, paper.title);
//!         println!("Authors: {}", paper.authors);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Telling failures apart
//!
//! [`PubMedClient::fetch_records`] returns an empty vector whenever a request
//! fails. [`PubMedClient::fetch_papers`] returns a [`FetchOutcome`] instead:
//!
//! ```no_run
//! use pubmed_papers::{ClientConfig, FetchOutcome, PubMedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::with_config(ClientConfig::new().with_max_results(3))?;
//!
//!     match client.fetch_papers("zika microcephaly").await? {
//!         FetchOutcome::Found(papers) => println!("{} papers", papers.len()),
//!         FetchOutcome::NoMatches => println!("No papers found."),
//!         other => eprintln!("{}", other.message().unwrap_or_default()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pubmed;
pub mod xml;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use pubmed::{FetchOutcome, PaperRecord, PubMedClient, TransportFailure, NOT_AVAILABLE};
