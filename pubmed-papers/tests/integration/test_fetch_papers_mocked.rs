//! Integration tests for the search-then-fetch round using mocked HTTP responses
//!
//! A wiremock server stands in for NCBI ESearch and EFetch, so no real API calls
//! are made.

use pubmed_papers::{ClientConfig, FetchOutcome, PaperRecord, PubMedClient, PubMedError};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ESEARCH_TWO_IDS: &str = r#"{
    "header": {"type": "esearch", "version": "0.3"},
    "esearchresult": {
        "count": "2",
        "retmax": "2",
        "retstart": "0",
        "idlist": ["12345", "67890"],
        "querytranslation": "example[All Fields]"
    }
}"#;

const ESEARCH_NO_IDS: &str = r#"{
    "header": {"type": "esearch", "version": "0.3"},
    "esearchresult": {
        "count": "0",
        "retmax": "0",
        "retstart": "0",
        "idlist": []
    }
}"#;

const EFETCH_TWO_ARTICLES: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
    <PubmedArticle>
        <MedlineCitation>
            <PMID Version="1">12345</PMID>
            <Article>
                <ArticleTitle>Example Study</ArticleTitle>
                <Abstract>
                    <AbstractText>An example abstract.</AbstractText>
                </Abstract>
                <AuthorList>
                    <Author>
                        <LastName>Smith</LastName>
                        <ForeName>Jane</ForeName>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
    <PubmedArticle>
        <MedlineCitation>
            <PMID Version="1">67890</PMID>
            <Article>
                <ArticleTitle>Second Study</ArticleTitle>
                <AuthorList>
                    <Author>
                        <LastName>Nakamura</LastName>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
</PubmedArticleSet>"#;

async fn mount_esearch(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body.to_string())
                .insert_header("content-type", "application/json"),
        )
        .mount(server)
        .await;
}

async fn mount_efetch(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body.to_string())
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    let config = ClientConfig::new().with_base_url(mock_server.uri());
    PubMedClient::with_config(config).expect("client should build")
}

#[tokio::test]
#[traced_test]
async fn test_fetch_records_returns_records_in_document_order() {
    let server = MockServer::start().await;
    mount_esearch(&server, 200, ESEARCH_TWO_IDS).await;
    mount_efetch(&server, 200, EFETCH_TWO_ARTICLES).await;
    let client = create_mock_client(&server);

    let records = client
        .fetch_records("example")
        .await
        .expect("round should succeed");

    assert_eq!(
        records,
        vec![
            PaperRecord {
                pubmed_id: "12345".to_string(),
                title: "Example Study".to_string(),
                authors: "Jane Smith".to_string(),
                abstract_text: "An example abstract.".to_string(),
            },
            PaperRecord {
                pubmed_id: "67890".to_string(),
                title: "Second Study".to_string(),
                authors: "N/A".to_string(),
                abstract_text: "N/A".to_string(),
            },
        ]
    );
}

#[tokio::test]
#[traced_test]
async fn test_requests_carry_the_fixed_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("term", "heart failure"))
        .and(query_param("retmode", "json"))
        .and(query_param("retmax", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ESEARCH_TWO_IDS))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("id", "12345,67890"))
        .and(query_param("retmode", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_TWO_ARTICLES))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_mock_client(&server);
    let outcome = client.fetch_papers("heart failure").await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Found(ref r) if r.len() == 2));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let keys: Vec<String> = request
            .url
            .query_pairs()
            .map(|(k, _)| k.into_owned())
            .collect();
        assert!(!keys.contains(&"tool".to_string()));
        assert!(!keys.contains(&"email".to_string()));
    }
}

#[tokio::test]
#[traced_test]
async fn test_configured_result_cap_and_etiquette_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retmax", "3"))
        .and(query_param("tool", "pubmed-papers"))
        .and(query_param("email", "me@example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ESEARCH_NO_IDS))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_max_results(3)
        .with_tool("pubmed-papers")
        .with_email("me@example.org");
    let client = PubMedClient::with_config(config).unwrap();

    let outcome = client.fetch_papers("anything").await.unwrap();
    assert_eq!(outcome, FetchOutcome::NoMatches);
}

#[tokio::test]
#[traced_test]
async fn test_empty_idlist_skips_fetch() {
    let server = MockServer::start().await;
    mount_esearch(&server, 200, ESEARCH_NO_IDS).await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_TWO_ARTICLES))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_mock_client(&server);

    let outcome = client.fetch_papers("no such topic").await.unwrap();
    assert_eq!(outcome, FetchOutcome::NoMatches);

    let records = client.fetch_records("no such topic").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_esearch_body_without_result_is_no_match() {
    let server = MockServer::start().await;
    mount_esearch(
        &server,
        200,
        r#"{"header": {"type": "esearch", "version": "0.3"}}"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_TWO_ARTICLES))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_mock_client(&server);

    let outcome = client.fetch_papers("asthma").await.unwrap();
    assert_eq!(outcome, FetchOutcome::NoMatches);

    let records = client.fetch_records("asthma").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_search_failure_collapses_to_empty() {
    let server = MockServer::start().await;
    mount_esearch(&server, 500, "Internal Server Error").await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_TWO_ARTICLES))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_mock_client(&server);

    match client.fetch_papers("asthma").await.unwrap() {
        FetchOutcome::SearchFailed(failure) => assert_eq!(failure.status, Some(500)),
        other => panic!("expected SearchFailed, got {:?}", other),
    }

    assert!(client.fetch_records("asthma").await.unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_esearch_error_field_is_a_search_failure() {
    let server = MockServer::start().await;
    mount_esearch(
        &server,
        200,
        r#"{"esearchresult": {"ERROR": "Search Backend failed"}}"#,
    )
    .await;
    let client = create_mock_client(&server);

    match client.fetch_papers("asthma").await.unwrap() {
        FetchOutcome::SearchFailed(failure) => {
            assert_eq!(failure.status, Some(200));
            assert!(failure.message.contains("Search Backend failed"));
        }
        other => panic!("expected SearchFailed, got {:?}", other),
    }
}

#[tokio::test]
#[traced_test]
async fn test_fetch_failure_collapses_to_empty() {
    let server = MockServer::start().await;
    mount_esearch(&server, 200, ESEARCH_TWO_IDS).await;
    mount_efetch(&server, 503, "Service Unavailable").await;
    let client = create_mock_client(&server);

    match client.fetch_papers("asthma").await.unwrap() {
        FetchOutcome::FetchFailed(failure) => {
            assert_eq!(failure.status, Some(503));
            assert_eq!(failure.message, "Service Unavailable");
        }
        other => panic!("expected FetchFailed, got {:?}", other),
    }

    assert!(client.fetch_records("asthma").await.unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_unreachable_server_is_a_search_failure() {
    // Nothing listens on port 1
    let config = ClientConfig::new()
        .with_base_url("http://127.0.0.1:1")
        .with_timeout_seconds(5);
    let client = PubMedClient::with_config(config).unwrap();

    let outcome = client.fetch_papers("asthma").await.unwrap();
    match outcome {
        FetchOutcome::SearchFailed(failure) => assert_eq!(failure.status, None),
        other => panic!("expected SearchFailed, got {:?}", other),
    }
}

#[tokio::test]
#[traced_test]
async fn test_malformed_xml_propagates() {
    let server = MockServer::start().await;
    mount_esearch(&server, 200, ESEARCH_TWO_IDS).await;
    mount_efetch(
        &server,
        200,
        "<PubmedArticleSet><PubmedArticle><PMID>1</PMID></PubmedArticleSet>",
    )
    .await;
    let client = create_mock_client(&server);

    let result = client.fetch_records("asthma").await;
    assert!(matches!(result, Err(PubMedError::XmlError(_))));
}

#[tokio::test]
#[traced_test]
async fn test_malformed_json_propagates() {
    let server = MockServer::start().await;
    mount_esearch(&server, 200, "not json").await;
    let client = create_mock_client(&server);

    let result = client.fetch_papers("asthma").await;
    assert!(matches!(result, Err(PubMedError::JsonError(_))));
}

#[tokio::test]
#[traced_test]
async fn test_empty_article_set_is_found_with_no_records() {
    let server = MockServer::start().await;
    mount_esearch(&server, 200, ESEARCH_TWO_IDS).await;
    mount_efetch(&server, 200, "<PubmedArticleSet></PubmedArticleSet>").await;
    let client = create_mock_client(&server);

    let outcome = client.fetch_papers("asthma").await.unwrap();
    assert_eq!(outcome, FetchOutcome::Found(Vec::new()));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_by_ids_uses_single_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "12345,67890"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_TWO_ARTICLES))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_mock_client(&server);
    let ids = vec!["12345".to_string(), "67890".to_string()];
    let records = client.fetch_by_ids(&ids).await.unwrap();

    let pmids: Vec<&str> = records.iter().map(|r| r.pubmed_id.as_str()).collect();
    assert_eq!(pmids, vec!["12345", "67890"]);
}
