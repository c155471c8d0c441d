//! Integration tests for the RCSB client
//!
//! Every service is replaced by a local mock server, so these tests exercise
//! request building, transport and response parsing end to end without
//! touching rcsb.org.

use mockito::{Matcher, ServerGuard};
use rcsb_client::clients::{DataClient, FastaClient, FileClient, PdbFileType, SearchClient};
use rcsb_client::config::{Config, ConfigFile};
use rcsb_client::models::{
    ComparisonOperator, ComparisonType, DataQuery, DataType, DefaultOperator, ExactMatchOperator,
    QueryGroup, RangeOperator, RequestOptions, ReturnType, SearchOperator, SearchRequest,
    SequenceOperator, TextQuery,
};
use rcsb_client::{ClientError, ErrorCategory};
use serde_json::json;

const ORGANISM: &str = "rcsb_entity_source_organism.taxonomy_lineage.name";

/// Configuration with every endpoint on the mock server
fn mock_config(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.endpoints.search = format!("{}/rcsbsearch/v2/query", server.url());
    config.endpoints.graphql = format!("{}/graphql", server.url());
    config.endpoints.data = format!("{}/rest/v1/core", server.url());
    config.endpoints.fasta = format!("{}/fasta/entry", server.url());
    config.endpoints.files = format!("{}/download", server.url());
    config
}

fn organism_and_resolution() -> QueryGroup {
    let organisms = QueryGroup::or(vec![
        SearchOperator::from(ExactMatchOperator::new(ORGANISM, "Mus musculus")).into(),
        SearchOperator::from(ExactMatchOperator::new(ORGANISM, "Homo sapiens")).into(),
    ])
    .unwrap();

    let resolution = SearchOperator::from(ComparisonOperator::new(
        "rcsb_entry_info.resolution_combined",
        4,
        ComparisonType::Less,
    ));

    QueryGroup::and(vec![organisms.into(), resolution.into()]).unwrap()
}

#[test]
fn test_ribosome_request_defaults() {
    let request = SearchRequest::new(
        SearchOperator::from(DefaultOperator::new("ribosome")),
        ReturnType::Entry,
        None,
    );
    let body = serde_json::to_value(&request).unwrap();

    assert_eq!(body["return_type"], "entry");
    assert_eq!(body["request_options"]["pager"]["start"], 0);
    assert_eq!(body["query"]["parameters"]["value"], "ribosome");
}

#[test]
fn test_nested_tree_shape() {
    let body = SearchRequest::new(organism_and_resolution(), ReturnType::Entry, None).to_json();
    let query = &body["query"];

    assert_eq!(query["type"], "group");
    assert_eq!(query["logical_operator"], "and");
    assert_eq!(query["nodes"][0]["logical_operator"], "or");
    assert_eq!(query["nodes"][0]["nodes"][0]["parameters"]["value"], "Mus musculus");
    assert_eq!(query["nodes"][0]["nodes"][1]["parameters"]["value"], "Homo sapiens");
    assert_eq!(query["nodes"][1]["service"], "text");
    assert_eq!(query["nodes"][1]["parameters"]["operator"], "less");
}

#[test]
fn test_release_date_range() {
    let range = RangeOperator::new(
        "rcsb_accession_info.initial_release_date",
        "2019-01-01",
        "2020-01-01",
    )
    .include_lower(true)
    .include_upper(false);

    let params = SearchOperator::from(range).parameters();
    assert_eq!(params["value"]["from"], "2019-01-01");
    assert_eq!(params["value"]["to"], "2020-01-01");
    assert_eq!(params["value"]["include_lower"], true);
    assert_eq!(params["value"]["include_upper"], false);
}

#[test]
fn test_identity_cutoff_bounds() {
    let too_high = SequenceOperator::builder("MTEYKLVVVGAGGVGKSALTIQLIQNHF")
        .identity_cutoff(1.5)
        .build();
    assert!(too_high.is_err());

    let ok = SequenceOperator::builder("MTEYKLVVVGAGGVGKSALTIQLIQNHF")
        .identity_cutoff(0.99)
        .build();
    assert!(ok.is_ok());
}

#[tokio::test]
async fn test_search_then_fetch_metadata() {
    let mut server = mockito::Server::new_async().await;
    let config = mock_config(&server);

    let search_mock = server
        .mock("POST", "/rcsbsearch/v2/query")
        .match_body(Matcher::PartialJson(json!({
            "query": {"type": "group", "logical_operator": "and"},
            "request_options": {"pager": {"start": 0, "rows": 2}}
        })))
        .with_status(200)
        .with_body(
            r#"{"total_count": 5123, "result_set": [
                {"identifier": "1A00", "score": 1.0},
                {"identifier": "1A01", "score": 1.0}
            ]}"#,
        )
        .create_async()
        .await;

    let graphql_mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJsonString(
            r#"{"query": "{entries(entry_ids: [\"1A00\",\"1A01\"]){rcsb_id,exptl{method}}}"}"#
                .to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"data": {"entries": [
                {"rcsb_id": "1A00", "exptl": [{"method": "X-RAY DIFFRACTION"}]},
                {"rcsb_id": "1A01", "exptl": [{"method": "SOLUTION NMR"}]}
            ]}}"#,
        )
        .create_async()
        .await;

    let search = SearchClient::from_config(&config).unwrap();
    let hits = search
        .perform_search_with_graph(
            organism_and_resolution(),
            ReturnType::Entry,
            Some(RequestOptions::new().paginate(0, 2)),
        )
        .await
        .unwrap();

    assert_eq!(hits.total_count, 5123);
    assert_eq!(hits.identifiers(), vec!["1A00", "1A01"]);

    let query = DataQuery::new(hits.identifiers(), DataType::from(ReturnType::Entry))
        .unwrap()
        .add_property("rcsb_id", Vec::<String>::new())
        .add_property("exptl", ["method"]);

    let data = DataClient::from_config(&config).unwrap();
    let rows = data.fetch_table(&query).await.unwrap();

    search_mock.assert_async().await;
    graphql_mock.assert_async().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].identifier, "1A01");
    assert_eq!(rows[1].get("exptl.method"), Some(&json!("SOLUTION NMR")));
}

#[tokio::test]
async fn test_remote_error_keeps_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/rcsbsearch/v2/query")
        .with_status(400)
        .with_body("JSON schema validation failed for query: nodes must not be empty")
        .create_async()
        .await;

    let search = SearchClient::from_config(&mock_config(&server)).unwrap();
    let err = search
        .perform_search(DefaultOperator::new("ribosome"), ReturnType::Entry, None)
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Remote);
    assert!(err.to_string().contains("nodes must not be empty"));
}

#[tokio::test]
async fn test_no_match_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/rcsbsearch/v2/query")
        .with_status(204)
        .create_async()
        .await;

    let search = SearchClient::from_config(&mock_config(&server)).unwrap();
    let result = search
        .perform_search(
            ExactMatchOperator::new(ORGANISM, "Nonexistent organism"),
            ReturnType::PolymerEntity,
            None,
        )
        .await
        .unwrap();

    assert_eq!(result.total_count, 0);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_graphql_error_payload() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"errors": [{"message": "Validation error of type FieldUndefined"}]}"#)
        .create_async()
        .await;

    let data = DataClient::from_config(&mock_config(&server)).unwrap();
    let query = DataQuery::new(["4HHB_1"], DataType::PolymerEntity)
        .unwrap()
        .add_property("not_a_field", ["x"]);

    let err = data.fetch(&query).await.unwrap_err();
    assert!(matches!(err, ClientError::GraphQl(ref m) if m.len() == 1));
    assert_eq!(err.category(), ErrorCategory::Remote);
}

#[tokio::test]
async fn test_fasta_and_structure_file() {
    let mut server = mockito::Server::new_async().await;
    let config = mock_config(&server);

    let _fasta = server
        .mock("GET", "/fasta/entry/6TML")
        .with_status(200)
        .with_body(
            ">6TML_1|Chains Q7,Q8,Q9,q7,q8,q9|ATPTG11|Toxoplasma gondii (strain ATCC 50853 / GT1) (507601)\n\
             MVRNQRYPASPVQEIFLPEPVPFVQFDQTAPSPNSPPAPLPSPSLSQCEEQKDRYR\n",
        )
        .create_async()
        .await;

    let _file = server
        .mock("GET", "/download/6TML.pdb")
        .with_status(200)
        .with_body("HEADER    MEMBRANE PROTEIN                        04-DEC-19   6TML\n")
        .create_async()
        .await;

    let fasta = FastaClient::from_config(&config).unwrap();
    let sequences = fasta.get_fasta("6TML").await.unwrap();
    assert_eq!(sequences[0].entity_id, "6TML_1");
    assert_eq!(sequences[0].chains.len(), 6);

    let files = FileClient::from_config(&config).unwrap();
    let pdb = files
        .get_pdb_file("6TML", PdbFileType::Pdb, false)
        .await
        .unwrap();
    assert!(pdb.starts_with("HEADER"));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let files = FileClient::from_config(&mock_config(&server)).unwrap();
    let err = files
        .get_pdb_file("TOOLONG", PdbFileType::Cif, true)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.category(), ErrorCategory::Local);
}

#[test]
fn test_config_file_drives_clients() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rcsb.toml");
    std::fs::write(
        &path,
        r#"
[endpoints]
search = "http://localhost:8080/query"

[http]
timeout_secs = 5
"#,
    )
    .unwrap();

    let file = ConfigFile::load(&path).unwrap();
    assert_eq!(file.config.endpoints.search, "http://localhost:8080/query");

    let client = SearchClient::from_config(&file.config).unwrap();
    assert_eq!(client.endpoint(), "http://localhost:8080/query");
}

#[tokio::test]
async fn test_pubmed_search_then_nested_metadata() {
    let mut server = mockito::Server::new_async().await;
    let config = mock_config(&server);

    let search_mock = server
        .mock("POST", "/rcsbsearch/v2/query")
        .match_body(Matcher::PartialJson(json!({
            "query": {
                "service": "text",
                "parameters": {
                    "attribute": "rcsb_pubmed_container_identifiers.pubmed_id",
                    "operator": "in",
                    "value": [27499440]
                }
            },
            "request_options": {"return_all_hits": true}
        })))
        .with_status(200)
        .with_body(r#"{"total_count": 1, "result_set": [{"identifier": "5T89", "score": 1.0}]}"#)
        .create_async()
        .await;

    let graphql_mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJsonString(
            r#"{"query": "{entries(entry_ids: [\"5T89\"]){rcsb_id,rcsb_entry_info{diffrn_resolution_high{value},resolution_combined}}}"}"#
                .to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"data": {"entries": [
                {"rcsb_id": "5T89", "rcsb_entry_info": {
                    "diffrn_resolution_high": {"value": 3.3},
                    "resolution_combined": [3.3]
                }}
            ]}}"#,
        )
        .create_async()
        .await;

    let search = SearchClient::from_config(&config).unwrap();
    let hits = search
        .perform_text_search(TextQuery::PubmedId(27499440), ReturnType::Entry)
        .await
        .unwrap();

    let query = DataQuery::new(hits.identifiers(), DataType::Entry)
        .unwrap()
        .add_property("rcsb_id", Vec::<String>::new())
        .add_property("rcsb_entry_info.diffrn_resolution_high", ["value"])
        .add_property("rcsb_entry_info", ["resolution_combined"]);

    let rows = DataClient::from_config(&config)
        .unwrap()
        .fetch_table(&query)
        .await
        .unwrap();

    search_mock.assert_async().await;
    graphql_mock.assert_async().await;
    assert_eq!(rows[0].identifier, "5T89");
    assert_eq!(
        rows[0].get("rcsb_entry_info.diffrn_resolution_high.value"),
        Some(&json!(3.3))
    );
    assert_eq!(rows[0].get("rcsb_entry_info.resolution_combined"), Some(&json!(3.3)));
}

#[tokio::test]
async fn test_rate_limit_body_reaches_caller() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/fasta/entry/4HHB")
        .with_status(429)
        .with_body("Too many requests: slow down to 2 rps")
        .create_async()
        .await;

    let fasta = FastaClient::from_config(&mock_config(&server)).unwrap();
    let err = fasta.get_fasta("4HHB").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Remote);
    assert_eq!(err.status(), Some(429));
    assert!(matches!(
        err,
        ClientError::RateLimit { ref body } if body == "Too many requests: slow down to 2 rps"
    ));
}
