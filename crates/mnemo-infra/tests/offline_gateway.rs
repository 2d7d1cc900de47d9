//! End-to-end tests for the offline path: digest embedder + SQLite
//! store behind the gateway, no network anywhere.

use mnemo_core::gateway::MemoryGateway;
use mnemo_core::{BoxEmbedder, BoxVectorStore};
use mnemo_infra::embed::DigestEmbedder;
use mnemo_infra::sqlite::{DatabasePool, SqliteVectorStore};
use mnemo_types::config::MemoryConfig;
use mnemo_types::error::MemoryError;
use mnemo_types::record::Metadata;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn offline_gateway(journal_queries: bool) -> (tempfile::TempDir, MemoryGateway) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let pool = DatabasePool::open(&dir.path().join("mnemo.db")).await.unwrap();

    let config = MemoryConfig {
        journal_queries,
        ..MemoryConfig::default()
    };
    let gateway = MemoryGateway::new(
        BoxEmbedder::new(DigestEmbedder::new(config.offline_dimension)),
        BoxVectorStore::new(SqliteVectorStore::new(pool)),
        config,
    );
    (dir, gateway)
}

#[tokio::test]
async fn overlapping_text_outranks_unrelated_text() {
    let (_dir, gateway) = offline_gateway(false).await;
    gateway
        .store("kia ora koutou", Metadata::new(), None)
        .await
        .unwrap();
    gateway.store("hello there", Metadata::new(), None).await.unwrap();

    let results = gateway.search("kia ora", 10, -1.0, None).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.content, "kia ora koutou");
    assert!(results[0].similarity > results[1].similarity);
}

#[tokio::test]
async fn top_k_ranks_exact_match_first() {
    let (_dir, gateway) = offline_gateway(false).await;
    for text in ["kia ora", "hello", "kia ora koutou"] {
        gateway.store(text, Metadata::new(), None).await.unwrap();
    }

    let results = gateway.search("kia ora", 2, -1.0, None).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.content, "kia ora");
    assert!((results[0].similarity - 1.0).abs() < 1e-5);
    assert_eq!(results[1].record.content, "kia ora koutou");
    assert!(results[0].similarity >= results[1].similarity);
}

#[tokio::test]
async fn identical_text_scores_one() {
    let (_dir, gateway) = offline_gateway(false).await;
    gateway.store("te reo", Metadata::new(), None).await.unwrap();

    let results = gateway.search("te reo", 1, 0.0, None).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!((results[0].similarity - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn min_similarity_filters_results() {
    let (_dir, gateway) = offline_gateway(false).await;
    gateway
        .store("completely unrelated words", Metadata::new(), None)
        .await
        .unwrap();
    gateway.store("kia ora koutou", Metadata::new(), None).await.unwrap();

    let all = gateway.search("kia ora", 10, -1.0, None).await.unwrap();
    assert_eq!(all.len(), 2);

    // Tighten the threshold until only the overlapping text survives.
    let strict = gateway
        .search("kia ora", 10, all[1].similarity + 0.01, None)
        .await
        .unwrap();
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].record.content, "kia ora koutou");
}

#[tokio::test]
async fn metadata_survives_storage() {
    let (_dir, gateway) = offline_gateway(false).await;
    let mut meta = Metadata::new();
    meta.insert("lang".to_string(), serde_json::json!("mi"));
    meta.insert("tags".to_string(), serde_json::json!(["greeting", "formal"]));
    let receipt = gateway.store("kia ora", meta, None).await.unwrap();

    let records = gateway.records(None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, receipt.id);
    assert_eq!(records[0].metadata["lang"], "mi");
    assert_eq!(records[0].metadata["tags"][0], "greeting");
}

#[tokio::test]
async fn search_journals_queries_when_enabled() {
    let (_dir, gateway) = offline_gateway(true).await;
    gateway.store("something to find", Metadata::new(), None).await.unwrap();
    gateway.search("something", 5, 0.0, None).await.unwrap();

    let records = gateway.records(None).await.unwrap();
    assert_eq!(records.len(), 2);
    let journal = records
        .iter()
        .find(|r| r.metadata.get("kind") == Some(&serde_json::json!("search_query")))
        .expect("journal entry missing");
    assert_eq!(journal.content, "something");
    assert_eq!(journal.metadata["top_k"], 5);
    assert_eq!(journal.metadata["result_count"], 1);
}

#[tokio::test]
async fn prune_keeps_newest_records() {
    let (_dir, gateway) = offline_gateway(false).await;
    for i in 0..6 {
        gateway
            .store(&format!("note number {i}"), Metadata::new(), None)
            .await
            .unwrap();
    }

    let removed = gateway.prune(2, None).await.unwrap();
    assert_eq!(removed, 4);

    // records() lists newest first.
    let remaining = gateway.records(None).await.unwrap();
    let contents: Vec<&str> = remaining.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["note number 5", "note number 4"]);
}

#[tokio::test]
async fn empty_input_is_rejected() {
    let (_dir, gateway) = offline_gateway(false).await;
    let err = gateway.store("   ", Metadata::new(), None).await.unwrap_err();
    assert!(matches!(err, MemoryError::InvalidInput(_)));

    let err = gateway.search("", 5, 0.0, None).await.unwrap_err();
    assert!(matches!(err, MemoryError::InvalidInput(_)));

    // Nothing was persisted by the rejected calls.
    assert!(gateway.records(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn same_text_always_embeds_identically() {
    let (_dir, gateway) = offline_gateway(false).await;
    let a = gateway.embed("tena koe").await.unwrap();
    let b = gateway.embed("tena koe").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
}
