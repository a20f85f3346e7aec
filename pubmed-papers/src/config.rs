use std::time::Duration;

/// Default NCBI E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default number of identifiers requested from ESearch
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Configuration for the PubMed client
///
/// The defaults produce exactly the request set `db`, `term`/`id`, `retmode`
/// and `retmax`; `tool` and `email` are only sent when configured.
///
/// # Example
///
/// ```
/// use pubmed_papers::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_max_results(5)
///     .with_email("researcher@university.edu")
///     .with_timeout_seconds(10);
///
/// assert_eq!(config.max_results, 5);
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL override, mainly for pointing tests at a mock server
    pub base_url: Option<String>,
    /// Number of identifiers requested from ESearch (`retmax`)
    pub max_results: usize,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Custom User-Agent header
    pub user_agent: Option<String>,
    /// Tool name reported to NCBI
    pub tool: Option<String>,
    /// Contact email reported to NCBI
    pub email: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: None,
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(30),
            user_agent: None,
            tool: None,
            email: None,
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Base URL with any trailing slash removed
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        match &self.user_agent {
            Some(agent) => agent.clone(),
            None => format!("pubmed-papers/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Optional NCBI etiquette parameters appended to every request
    pub fn build_api_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
