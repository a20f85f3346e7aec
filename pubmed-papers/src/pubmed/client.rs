use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::pubmed::models::{FetchOutcome, PaperRecord, TransportFailure};
use crate::pubmed::parser::parse_records;
use crate::pubmed::responses::ESearchResult;

/// ESearch refuses `retmax` values above this
const MAX_RETRIEVABLE: usize = 9999;

/// Client for the PubMed ESearch and EFetch endpoints
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_papers::PubMedClient;
    ///
    /// let client = PubMedClient::new().unwrap();
    /// assert_eq!(client.config().max_results, 10);
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `PubMedError::RequestError` if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_papers::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_max_results(5)
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a new PubMed client around an existing reqwest client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search PubMed and return up to `max_results` records
    ///
    /// Every way the round trip can fail on the network collapses into an empty
    /// vector; the cause is logged. Use [`PubMedClient::fetch_papers`] to branch
    /// on it instead.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - If the query is empty
    /// * `PubMedError::JsonError` - If the ESearch body is not valid JSON
    /// * `PubMedError::XmlError` - If the EFetch body is not well-formed XML
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_papers::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     for record in client.fetch_records("crispr off-target").await? {
    ///         println!("{}: {}", record.pubmed_id, record.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_records(&self, query: &str) -> Result<Vec<PaperRecord>> {
        Ok(self.fetch_papers(query).await?.into_records())
    }

    /// Search PubMed, fetch the matching records and report how the round went
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_papers::{FetchOutcome, PubMedClient};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     match client.fetch_papers("malaria vaccine").await? {
    ///         FetchOutcome::Found(records) => println!("{} records", records.len()),
    ///         FetchOutcome::NoMatches => println!("nothing matched"),
    ///         FetchOutcome::SearchFailed(f) | FetchOutcome::FetchFailed(f) => {
    ///             eprintln!("request failed: {}", f)
    ///         }
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(query = %query))]
    pub async fn fetch_papers(&self, query: &str) -> Result<FetchOutcome> {
        let outcome = self.search_then_fetch(query).await?;
        report_outcome(&outcome);
        Ok(outcome)
    }

    async fn search_then_fetch(&self, query: &str) -> Result<FetchOutcome> {
        let ids = match self.search_ids(query).await {
            Ok(ids) => ids,
            Err(e) if e.is_transport_failure() => {
                return Ok(FetchOutcome::SearchFailed(transport_failure(&e)));
            }
            Err(e) => return Err(e),
        };

        if ids.is_empty() {
            return Ok(FetchOutcome::NoMatches);
        }

        let xml = match self.fetch_xml(&ids).await {
            Ok(xml) => xml,
            Err(e) if e.is_transport_failure() => {
                debug!(discarded_ids = ids.len(), "Dropping ESearch identifiers");
                return Ok(FetchOutcome::FetchFailed(transport_failure(&e)));
            }
            Err(e) => return Err(e),
        };

        let records = parse_records(&xml)?;
        info!(
            requested = ids.len(),
            fetched = records.len(),
            "Fetched paper details"
        );

        Ok(FetchOutcome::Found(records))
    }

    /// Run ESearch and return the matching PMIDs in ranking order
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - If the query is empty
    /// * `PubMedError::SearchLimitExceeded` - If `max_results` is above 9999
    /// * `PubMedError::ApiError` - On a non-success status or an `ERROR` in the body
    /// * `PubMedError::RequestError` - If the HTTP request fails
    /// * `PubMedError::JsonError` - If JSON parsing fails
    #[instrument(skip(self), fields(query = %query, limit = self.config.max_results))]
    pub async fn search_ids(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.config.max_results;

        if query.trim().is_empty() {
            return Err(PubMedError::InvalidQuery(
                "search query must not be empty".to_string(),
            ));
        }

        if limit > MAX_RETRIEVABLE {
            return Err(PubMedError::SearchLimitExceeded {
                requested: limit,
                maximum: MAX_RETRIEVABLE,
            });
        }

        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=json&retmax={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let search_result: ESearchResult = serde_json::from_str(&body)?;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = &search_result.esearchresult.error {
            return Err(PubMedError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        debug!(
            total = search_result.esearchresult.count.as_deref().unwrap_or("0"),
            translation = search_result
                .esearchresult
                .querytranslation
                .as_deref()
                .unwrap_or(""),
            returned = search_result.esearchresult.idlist.len(),
            "ESearch completed"
        );

        Ok(search_result.esearchresult.idlist)
    }

    /// Fetch the raw EFetch XML for a list of PMIDs in one request
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - If `ids` is empty
    /// * `PubMedError::ApiError` - On a non-success status
    /// * `PubMedError::RequestError` - If the HTTP request fails
    #[instrument(skip(self, ids), fields(ids_count = ids.len()))]
    pub async fn fetch_xml(&self, ids: &[String]) -> Result<String> {
        if ids.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "at least one identifier is required".to_string(),
            ));
        }

        let id_list = ids
            .iter()
            .map(|id| urlencoding::encode(id.trim()).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url, id_list
        );

        debug!("Making EFetch API request");
        let response = self.make_request(&url).await?;
        Ok(response.text().await?)
    }

    /// Fetch and parse records for known PMIDs
    ///
    /// An empty slice returns an empty vector without touching the network.
    pub async fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<PaperRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let xml = self.fetch_xml(ids).await?;
        parse_records(&xml)
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        debug!("Making API request to: {}", final_url);
        let response = self.client.get(&final_url).send().await?;

        if !response.status().is_success() {
            debug!("API request failed with status: {}", response.status());
            return Err(PubMedError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

/// One user-facing note per round: failures at warn, no matches at info
fn report_outcome(outcome: &FetchOutcome) {
    match outcome.message() {
        Some(message) if outcome.is_failure() => warn!("{}", message),
        Some(message) => info!("{}", message),
        None => {}
    }
}

fn transport_failure(error: &PubMedError) -> TransportFailure {
    let message = match error {
        PubMedError::ApiError { message, .. } => message.clone(),
        other => other.to_string(),
    };

    TransportFailure {
        status: error.status(),
        message,
    }
}
