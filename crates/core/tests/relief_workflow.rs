//! End-to-end flow through the core: classify, store, match, summarise, escalate.

use std::sync::Arc;

use relief_core::classifier::{Classifier, LlmClassifier};
use relief_core::testing::{fixtures, MockClassifier, MockLlmClient};
use relief_core::{
    match_entries, stock_summary, CrisisConfig, CrisisCoordinator, DispatchOutcome, EntryFilter,
    EntryStatus, EntryStore, LookupCatalog, MatchQuery, NewEntry, SqliteEntryStore,
};

async fn submit(
    store: &dyn EntryStore,
    classifier: &dyn Classifier,
    text: &str,
    name: &str,
) -> String {
    let analysis = classifier.classify(text).await.unwrap();
    store
        .insert(NewEntry {
            name: Some(name.to_string()),
            original_text: text.to_string(),
            analysis,
        })
        .unwrap()
        .id
}

#[tokio::test]
async fn test_izmir_water_scenario() {
    let store = SqliteEntryStore::in_memory().unwrap();
    let classifier = MockClassifier::new();
    classifier
        .set_analysis(
            "İzmir'de 50 su ihtiyacımız var",
            fixtures::need("İzmir", "su", 50, "high"),
        )
        .await;
    classifier
        .set_analysis(
            "İzmir'de 200 su fazlamız var",
            fixtures::offer("İzmir", "su", 200),
        )
        .await;

    submit(&store, &classifier, "İzmir'de 50 su ihtiyacımız var", "Ali").await;
    submit(&store, &classifier, "İzmir'de 200 su fazlamız var", "Market A").await;

    let result = match_entries(&store, &MatchQuery::new("İzmir", "su")).unwrap();
    assert_eq!(result.totals.demand, 50);
    assert_eq!(result.totals.supply, 200);
    assert_eq!(result.demand[0].name.as_deref(), Some("Ali"));
    assert_eq!(result.supply[0].name.as_deref(), Some("Market A"));

    let miss = match_entries(&store, &MatchQuery::new("IZMIR", "su")).unwrap();
    assert!(miss.demand.is_empty() && miss.supply.is_empty());
}

#[tokio::test]
async fn test_llm_classifier_with_fenced_reply_feeds_the_store() {
    let client = Arc::new(MockLlmClient::new(
        "```json\n{\"need\": false, \"location\": \"Ankara\", \"items\": [{\"name\": \"battaniye\", \"quantity\": 10, \"unit\": \"adet\"}], \"priority\": \"low\"}\n```",
    ));
    client
        .push_reply(
            "{\"ihtiyac_var\": true, \"konum\": \"Ankara\", \"urunler\": [{\"urun_adi\": \"battaniye\", \"miktar\": 5, \"birim\": \"adet\"}], \"öncelik\": \"acil\"}",
        )
        .await;
    let classifier = LlmClassifier::new(client);
    let store = SqliteEntryStore::in_memory().unwrap();

    submit(&store, &classifier, "Ankara'da 5 battaniye lazım", "Zeynep").await;
    submit(&store, &classifier, "Ankara'da 10 battaniye verebiliriz", "Dernek").await;

    let summary = stock_summary(&store).unwrap();
    assert_eq!(summary["Ankara"].supplies["battaniye"], 15);
    assert_eq!(summary["Ankara"].entries.len(), 2);
}

#[tokio::test]
async fn test_escalation_then_dispatch() {
    let store = Arc::new(SqliteEntryStore::in_memory().unwrap());
    store
        .insert(fixtures::demand(
            "Ayşe",
            "Hatay",
            vec![fixtures::item("çadır", 20)],
            "acil",
        ))
        .unwrap();
    store
        .insert(fixtures::supply(
            "Belediye",
            "Hatay",
            vec![fixtures::item("su", 500)],
        ))
        .unwrap();

    let coordinator = CrisisCoordinator::new(
        store.clone(),
        Arc::new(LookupCatalog::builtin()),
        CrisisConfig::default(),
    );

    let first = coordinator.escalate("Hatay").await.unwrap();
    assert_eq!(first.urgent_needs.len(), 1);
    assert_eq!(first.available_resources["su"], 500);
    assert_eq!(first.logistics_support.len(), 3);

    let second = coordinator.escalate("Hatay").await.unwrap();
    assert!(second.urgent_needs.is_empty());
    assert_eq!(
        store
            .count(&EntryFilter::active_at("Hatay"))
            .unwrap(),
        0
    );
    assert_eq!(
        store
            .count(&EntryFilter::new().with_status(EntryStatus::CrisisMode))
            .unwrap(),
        2
    );

    let refused = coordinator.dispatch_help("İzmir", "Hatay", "Çadır", 500).await;
    assert!(matches!(
        refused,
        DispatchOutcome::InsufficientStock { available: 105, requested: 500, .. }
    ));

    let sent = coordinator.dispatch_help("İzmir", "Hatay", "Çadır", 100).await;
    assert_eq!(sent.status(), "dispatched");
}
