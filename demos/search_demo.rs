//! Search for human or mouse structures better than 4 Å, then pull their
//! experimental method and the FASTA of the top hit.
//!
//! ```bash
//! RUST_LOG=rcsb_client=debug cargo run --example search_demo
//! ```

use anyhow::Result;
use rcsb_client::config::{ConfigFile, Config};
use rcsb_client::models::{
    ComparisonOperator, ComparisonType, DataQuery, DataType, ExactMatchOperator, QueryGroup,
    RequestOptions, ReturnType, SearchOperator,
};
use rcsb_client::{DataClient, FastaClient, SearchClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match ConfigFile::find() {
        Some(path) => ConfigFile::load(&path)?.config,
        None => Config::default(),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("rcsb_client={}", config.logging.level)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let organism = "rcsb_entity_source_organism.taxonomy_lineage.name";
    let query = QueryGroup::and(vec![
        QueryGroup::or(vec![
            SearchOperator::from(ExactMatchOperator::new(organism, "Mus musculus")).into(),
            SearchOperator::from(ExactMatchOperator::new(organism, "Homo sapiens")).into(),
        ])?
        .into(),
        SearchOperator::from(ComparisonOperator::new(
            "rcsb_entry_info.resolution_combined",
            4,
            ComparisonType::Less,
        ))
        .into(),
    ])?;

    let search = SearchClient::from_config(&config)?;
    let result = search
        .perform_search_with_graph(
            query,
            ReturnType::Entry,
            Some(RequestOptions::new().paginate(0, 5).with_scores()),
        )
        .await?;

    println!("{} matching entries", result.total_count);
    for hit in &result.hits {
        println!("  {} ({:.3})", hit.identifier, hit.score.unwrap_or_default());
    }

    if result.is_empty() {
        return Ok(());
    }

    let data = DataClient::from_config(&config)?;
    let details = DataQuery::new(result.identifiers(), DataType::Entry)?
        .add_property("rcsb_id", Vec::<String>::new())
        .add_property("exptl", ["method"])
        .add_property("struct", ["title"]);

    for row in data.fetch_table(&details).await? {
        println!(
            "{}: {} | {}",
            row.identifier,
            row.get("exptl.method").and_then(|v| v.as_str()).unwrap_or("-"),
            row.get("struct.title").and_then(|v| v.as_str()).unwrap_or("-"),
        );
    }

    let fasta = FastaClient::from_config(&config)?;
    for sequence in fasta.get_fasta(&result.hits[0].identifier).await? {
        println!(
            ">{} chains {}: {} residues",
            sequence.entity_id,
            sequence.chains.join(","),
            sequence.sequence.len()
        );
    }

    Ok(())
}
