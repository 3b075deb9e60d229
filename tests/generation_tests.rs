//! End-to-end generation and ingestion flows over a real SQLite store.

mod common;

use common::{valid_blueprint_candidate, valid_style_candidate, StubProvider};
use kaidan::operations::{
    create_blueprint, create_style, extract_blueprint_from_text, generate_story, GenerateOptions,
};
use kaidan::repository::{SqliteStore, Store};
use kaidan::scoring::GateThresholds;

fn options(word: &str) -> GenerateOptions {
    GenerateOptions {
        word: word.to_string(),
        blueprint_id: None,
        style_id: None,
        auto_style: true,
        model: "test-model".to_string(),
    }
}

#[test]
fn generate_persists_story_and_counts_style_usage() {
    let store = SqliteStore::open_in_memory().unwrap();
    create_blueprint(&store, None, vec![], valid_blueprint_candidate(), None).unwrap();
    let style = create_style(&store, valid_style_candidate()).unwrap();

    let provider = StubProvider::returning("# 合わせ鏡\n\n引っ越した日、洗面所の鏡を拭いた。");
    let record = generate_story(&store, &provider, &GateThresholds::default(), options("鏡"))
        .unwrap();

    let fetched = store.get_story(&record.id).unwrap().unwrap();
    assert_eq!(fetched.title, "合わせ鏡");
    assert_eq!(fetched.word, "鏡");
    assert_eq!(fetched.style_id, Some(style.record.id.clone()));

    let style_row = store.get_style(&style.record.id).unwrap().unwrap();
    assert_eq!(style_row.usage_count, 1);
}

#[test]
fn generate_spreads_usage_across_archetypes() {
    let store = SqliteStore::open_in_memory().unwrap();
    create_blueprint(&store, None, vec![], valid_blueprint_candidate(), None).unwrap();
    let first = create_style(&store, valid_style_candidate()).unwrap();
    let second = create_style(&store, valid_style_candidate()).unwrap();

    let provider = StubProvider::returning("t\n\nb");
    let gate = GateThresholds::default();

    // Least-used selection alternates between the two archetypes.
    generate_story(&store, &provider, &gate, options("a")).unwrap();
    generate_story(&store, &provider, &gate, options("b")).unwrap();

    let first_row = store.get_style(&first.record.id).unwrap().unwrap();
    let second_row = store.get_style(&second.record.id).unwrap().unwrap();
    assert_eq!(first_row.usage_count, 1);
    assert_eq!(second_row.usage_count, 1);
}

#[test]
fn extraction_feeds_the_same_boundary_as_manual_saves() {
    let store = SqliteStore::open_in_memory().unwrap();
    let provider = StubProvider::returning(
        r#"```json
{
  "anomaly": "足音が最上階の上から聞こえる",
  "normal_rule": "静かなアパートの夜",
  "irreversible_point": "天井を叩き返した",
  "constraints": {"single_anomaly_only": true}
}
```"#,
    );

    let outcome = extract_blueprint_from_text(
        &store,
        &provider,
        "test-model",
        "毎晩二時に上の階から足音がした。",
        None,
    )
    .unwrap();

    // Thin candidate, but well-formed: stored with its honest score.
    let fetched = store.get_blueprint(&outcome.record.id).unwrap().unwrap();
    assert_eq!(fetched.quality_score, outcome.scoring.score);
    assert!(fetched.quality_score < 100);

    // The origin prose is not in the stored record.
    let row_json = serde_json::to_string(&fetched).unwrap();
    assert!(!row_json.contains("毎晩二時"));
}

#[test]
fn ranking_orders_by_blueprint_score() {
    let store = SqliteStore::open_in_memory().unwrap();

    let strong =
        create_blueprint(&store, None, vec![], valid_blueprint_candidate(), None).unwrap();
    let mut weaker_candidate = valid_blueprint_candidate();
    weaker_candidate["detail_bank"] = serde_json::json!(["only one"]);
    let weaker = create_blueprint(&store, None, vec![], weaker_candidate, None).unwrap();

    let provider = StubProvider::returning("t\n\nb");
    let gate = GateThresholds::default();

    let from_strong = generate_story(
        &store,
        &provider,
        &gate,
        GenerateOptions {
            blueprint_id: Some(strong.record.id.clone()),
            auto_style: false,
            ..options("a")
        },
    )
    .unwrap();
    let from_weaker = generate_story(
        &store,
        &provider,
        &gate,
        GenerateOptions {
            blueprint_id: Some(weaker.record.id.clone()),
            auto_style: false,
            ..options("b")
        },
    )
    .unwrap();

    let mut stories = store.list_stories().unwrap();
    stories.sort_by(|a, b| b.quality_score.cmp(&a.quality_score));
    assert_eq!(stories[0].id, from_strong.id);
    assert_eq!(stories[1].id, from_weaker.id);
}
