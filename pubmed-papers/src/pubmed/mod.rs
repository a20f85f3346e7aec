//! PubMed search-and-fetch
//!
//! - `client` - ESearch and EFetch requests, and the search-then-fetch round
//! - `models` - Extracted records and round outcomes
//! - `parser` - Field extraction from EFetch XML
//! - `responses` - ESearch JSON response types

pub mod client;
pub mod models;
pub mod parser;
pub(crate) mod responses;

pub use client::PubMedClient;
pub use models::{FetchOutcome, PaperRecord, TransportFailure, NOT_AVAILABLE};
pub use parser::{extract_record, parse_records, records_from_tree};
