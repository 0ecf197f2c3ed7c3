//! 照合の結合テスト
//!
//! オントロジーファイルとリクエストファイルから出力JSONまでを検証

use prop_match_common::{OntologySources, SharedOntology};
use prop_match_rust::config::Config;
use prop_match_rust::runner::MatchRunner;
use prop_match_rust::scanner;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::tempdir;

const SYNONYMS: &str = r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xml:base="http://example.org/synonyms">
  <owl:Class rdf:about="#mass">
    <rdfs:label>weight</rdfs:label>
  </owl:Class>
</rdf:RDF>"##;

const UNITS: &str = r##"<?xml version="1.0"?>
<!DOCTYPE rdf:RDF [
  <!ENTITY om "http://www.ontology-of-units-of-measure.org/resource/om-2/" >
]>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:om="&om;">
  <om:Unit rdf:about="&om;millimetre">
    <rdfs:label xml:lang="en">millimetre</rdfs:label>
    <om:symbol>mm</om:symbol>
    <om:hasDimension rdf:resource="&om;length-Dimension"/>
  </om:Unit>
  <om:Unit rdf:about="&om;metre">
    <rdfs:label xml:lang="en">metre</rdfs:label>
    <om:symbol>m</om:symbol>
    <om:hasDimension rdf:resource="&om;length-Dimension"/>
  </om:Unit>
  <om:PrefixedUnit rdf:about="&om;kilogram">
    <rdfs:label xml:lang="en">kilogram</rdfs:label>
    <om:symbol>kg</om:symbol>
    <om:hasDimension rdf:resource="&om;mass-Dimension"/>
  </om:PrefixedUnit>
</rdf:RDF>"##;

/// オントロジーファイルを書き出して設定を作る
fn write_ontologies(dir: &Path) -> Config {
    let synonyms = dir.join("synonyms.owl");
    let units = dir.join("om-2.0.rdf");
    std::fs::write(&synonyms, SYNONYMS).unwrap();
    std::fs::write(&units, UNITS).unwrap();

    Config {
        synonyms_ontology: synonyms,
        unit_ontology: units,
        suggestion_size: 2,
        min_similarity_value: 0.5,
        matched_pairs_dir: dir.join("pairs"),
    }
}

fn request() -> Value {
    json!({
        "inputObjectData": {
            "dimensions": [
                { "name": "Width", "value": 10, "unit": "mm" },
                { "name": "Length", "value": 2, "unit": "m" }
            ],
            "part.mass": [ { "name": "part.mass", "value": 3, "unit": "kg" } ],
            "vendor": "ACME"
        },
        "outputObjectData": [
            { "name": "width", "value": "", "unit": "mm" },
            { "name": "weight", "value": "", "unit": "kilogram" },
            { "name": "temperature", "value": "", "unit": "K" }
        ]
    })
}

/// リクエスト1件の照合結果
#[test]
fn test_match_request_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_ontologies(dir.path());

    let shared = SharedOntology::new();
    let ontology = shared.initialize(&config.ontology_sources()).unwrap();
    let runner = MatchRunner::new(ontology, config.match_settings().unwrap());

    let output = runner.match_payload(&request()).unwrap();

    // 戦略は宣言順
    let strategies: Vec<&String> = output.as_object().unwrap().keys().collect();
    assert_eq!(
        strategies,
        vec!["jaroWinkler", "jaccard", "normalizedLevenshtein", "min", "max", "average", "weighted"]
    );

    // 同じ名前・同じ次元の単位
    let width = &output["jaroWinkler"]["width"];
    let first = match width {
        Value::String(s) => s.clone(),
        Value::Array(items) => items[0].as_str().unwrap().to_string(),
        other => panic!("unexpected shape: {other}"),
    };
    assert_eq!(first, "Width|1.0");

    // 同義語展開: part.mass → クラス mass → ラベル weight
    assert_eq!(output["min"]["weight"], json!("part.mass|1.0"));

    // 単位 K はオントロジーにない
    for strategy in strategies {
        assert_eq!(output[strategy.as_str()]["temperature"], json!("noSimilarity"));
    }
    assert_eq!(output["weighted"]["width"], json!("noSimilarity"));
}

/// 複数リクエストの一括処理
#[test]
fn test_batch_from_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = write_ontologies(dir.path());

    let requests_dir = dir.path().join("requests");
    std::fs::create_dir_all(&requests_dir).unwrap();
    std::fs::write(requests_dir.join("a.json"), request().to_string()).unwrap();
    std::fs::write(requests_dir.join("b.json"), request().to_string()).unwrap();

    let requests = scanner::collect_requests(&[requests_dir.clone()], false).unwrap();
    assert_eq!(requests.len(), 2);

    let shared = SharedOntology::new();
    let ontology = shared.initialize(&config.ontology_sources()).unwrap();
    let runner = MatchRunner::new(ontology, config.match_settings().unwrap());
    let outcomes = runner.run_batch(&requests, None, false).unwrap();
    assert!(outcomes.iter().all(|o| o.is_ok()));

    let a: Value =
        serde_json::from_str(&std::fs::read_to_string(requests_dir.join("a.matching.json")).unwrap()).unwrap();
    let b: Value =
        serde_json::from_str(&std::fs::read_to_string(requests_dir.join("b.matching.json")).unwrap()).unwrap();
    assert_eq!(a, b);

    // 出力ファイルは次回のスキャン対象にならない
    assert_eq!(scanner::collect_requests(&[requests_dir], false).unwrap().len(), 2);
}

/// オントロジーが読めなければ照合できない
#[test]
fn test_missing_ontology_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let shared = SharedOntology::new();
    let sources = OntologySources::new(dir.path().join("none.owl"), dir.path().join("none.rdf"));

    assert!(shared.initialize(&sources).is_err());
    assert!(shared.get().is_none());
}
