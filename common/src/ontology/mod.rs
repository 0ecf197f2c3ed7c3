//! オントロジー
//!
//! 同義語オントロジー（クラス名とラベル）と単位オントロジー（OM-2）を
//! 起動時に1度だけ読み込み、以後は読み取り専用で共有する。

pub mod index;
pub mod rdfxml;
pub mod units;

pub use index::{build_class_label_index, build_unit_index, local_name, Graph, OntologyClass};
pub use units::{are_units_compatible, OntologyUnit, UnitLookup};

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use rdfxml::parse_rdfxml;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// オントロジーファイルの場所
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologySources {
    pub synonyms: PathBuf,
    pub units: PathBuf,
}

impl OntologySources {
    pub fn new(synonyms: impl Into<PathBuf>, units: impl Into<PathBuf>) -> Self {
        Self {
            synonyms: synonyms.into(),
            units: units.into(),
        }
    }
}

/// クラス一覧と単位一覧
#[derive(Debug, Clone, Default)]
pub struct OntologyIndex {
    classes: Vec<OntologyClass>,
    units: Vec<OntologyUnit>,
    unit_lookup: UnitLookup,
}

impl OntologyIndex {
    pub fn new(classes: Vec<OntologyClass>, units: Vec<OntologyUnit>) -> Self {
        let unit_lookup = UnitLookup::new(&units);
        Self {
            classes,
            units,
            unit_lookup,
        }
    }

    /// ファイルから読み込む
    ///
    /// # Arguments
    /// * `sources` - 同義語オントロジーと単位オントロジーのパス
    ///
    /// # Returns
    /// どちらかが読めない・解析できない場合は `Error::Ontology`
    pub fn load(sources: &OntologySources) -> Result<Self> {
        let synonyms = read_document(&sources.synonyms)?;
        let units = read_document(&sources.units)?;

        let index = Self::from_documents_with_base(
            &synonyms,
            &document_base(&sources.synonyms),
            &units,
            &document_base(&sources.units),
        )?;

        info!(
            classes = index.classes.len(),
            units = index.units.len(),
            "Ontologies loaded"
        );
        Ok(index)
    }

    /// RDF/XML文字列から作る
    pub fn from_documents(synonyms: &str, units: &str) -> Result<Self> {
        Self::from_documents_with_base(
            synonyms,
            "urn:prop-match:synonyms",
            units,
            "urn:prop-match:units",
        )
    }

    fn from_documents_with_base(
        synonyms: &str,
        synonyms_base: &str,
        units: &str,
        units_base: &str,
    ) -> Result<Self> {
        let synonym_triples = parse_rdfxml(synonyms, synonyms_base)
            .map_err(|e| Error::Ontology(format!("synonyms ontology: {e}")))?;
        let classes = build_class_label_index(&Graph::new(&synonym_triples));
        debug!(triples = synonym_triples.len(), classes = classes.len(), "Synonyms ontology parsed");

        let unit_triples = parse_rdfxml(units, units_base)
            .map_err(|e| Error::Ontology(format!("unit ontology: {e}")))?;
        let unit_list = build_unit_index(&Graph::new(&unit_triples));
        debug!(triples = unit_triples.len(), units = unit_list.len(), "Unit ontology parsed");

        Ok(Self::new(classes, unit_list))
    }

    pub fn classes(&self) -> &[OntologyClass] {
        &self.classes
    }

    pub fn units(&self) -> &[OntologyUnit] {
        &self.units
    }

    /// クラス名が一致するクラス（複数あれば最後のもの）
    pub fn find_class(&self, class_name: &str) -> Option<&OntologyClass> {
        self.classes.iter().rev().find(|c| c.class_name == class_name)
    }

    /// 2つの単位文字列が同じ次元か
    pub fn units_compatible(&self, unit_a: &str, unit_b: &str) -> bool {
        self.unit_lookup.are_compatible(unit_a, unit_b)
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Ontology(format!("cannot read {}: {}", path.display(), e)))
}

/// ファイルパスから相対IRI解決用のベースを作る（空白はパーセントエンコード）
fn document_base(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let text = absolute
        .to_string_lossy()
        .replace('\\', "/")
        .replace(' ', "%20");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

/// 1度だけ構築されるオントロジーの共有ハンドル
///
/// 最初の `initialize` が構築を行い、並行して呼ばれた他のスレッドは
/// 完了を待って同じ索引を受け取る。構築に失敗した場合は未初期化のまま。
#[derive(Debug, Default)]
pub struct SharedOntology {
    cell: OnceCell<OntologyIndex>,
}

impl SharedOntology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&self, sources: &OntologySources) -> Result<&OntologyIndex> {
        self.cell.get_or_try_init(|| OntologyIndex::load(sources))
    }

    /// 構築済みなら索引を返す
    pub fn get(&self) -> Option<&OntologyIndex> {
        self.cell.get()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    const SYNONYMS: &str = r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/syn#width">
    <rdfs:label>breadth</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/other#width">
    <rdfs:label>span</rdfs:label>
  </owl:Class>
</rdf:RDF>"##;

    const UNITS: &str = r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:om="http://www.ontology-of-units-of-measure.org/resource/om-2/">
  <om:Unit rdf:about="http://www.ontology-of-units-of-measure.org/resource/om-2/metre">
    <rdfs:label>metre</rdfs:label>
    <om:symbol>m</om:symbol>
    <om:hasDimension rdf:resource="http://www.ontology-of-units-of-measure.org/resource/om-2/length-Dimension"/>
  </om:Unit>
  <om:Unit rdf:about="http://www.ontology-of-units-of-measure.org/resource/om-2/millimetre">
    <rdfs:label>millimetre</rdfs:label>
    <om:symbol>mm</om:symbol>
    <om:hasDimension rdf:resource="http://www.ontology-of-units-of-measure.org/resource/om-2/length-Dimension"/>
  </om:Unit>
  <om:Unit rdf:about="http://www.ontology-of-units-of-measure.org/resource/om-2/kilogram">
    <rdfs:label>kilogram</rdfs:label>
    <om:symbol>kg</om:symbol>
    <om:hasDimension rdf:resource="http://www.ontology-of-units-of-measure.org/resource/om-2/mass-Dimension"/>
  </om:Unit>
</rdf:RDF>"##;

    #[test]
    fn test_from_documents() {
        let index = OntologyIndex::from_documents(SYNONYMS, UNITS).unwrap();
        assert_eq!(index.classes().len(), 2);
        assert_eq!(index.units().len(), 3);
        assert!(index.units_compatible("m", "millimetre"));
        assert!(!index.units_compatible("m", "kg"));
    }

    #[test]
    fn test_find_class_last_match_wins() {
        let index = OntologyIndex::from_documents(SYNONYMS, UNITS).unwrap();
        let class = index.find_class("width").unwrap();
        assert_eq!(class.labels, vec!["span"]);
        assert!(index.find_class("height").is_none());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sources = OntologySources::new(dir.path().join("none.owl"), dir.path().join("none.rdf"));
        let result = OntologyIndex::load(&sources);
        assert!(matches!(result, Err(Error::Ontology(_))));
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let synonyms = dir.path().join("synonyms.owl");
        let units = dir.path().join("units.rdf");
        fs::write(&synonyms, "<rdf:RDF><broken").unwrap();
        fs::write(&units, UNITS).unwrap();

        let result = OntologyIndex::load(&OntologySources::new(synonyms, units));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path_with_spaces() {
        let dir = tempdir().expect("Failed to create temp dir");
        let folder = dir.path().join("unit ontologies");
        fs::create_dir_all(&folder).unwrap();
        let synonyms = folder.join("synonyms.owl");
        let units = folder.join("om 2.rdf");
        fs::write(&synonyms, SYNONYMS).unwrap();
        fs::write(&units, UNITS).unwrap();

        let index = OntologyIndex::load(&OntologySources::new(synonyms, units)).unwrap();
        assert_eq!(index.units().len(), 3);
    }

    #[test]
    fn test_shared_ontology_initializes_once() {
        let dir = tempdir().expect("Failed to create temp dir");
        let synonyms = dir.path().join("synonyms.owl");
        let units = dir.path().join("units.rdf");
        fs::write(&synonyms, SYNONYMS).unwrap();
        fs::write(&units, UNITS).unwrap();
        let sources = OntologySources::new(&synonyms, &units);

        let shared = Arc::new(SharedOntology::new());
        assert!(shared.get().is_none());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let sources = sources.clone();
                thread::spawn(move || shared.initialize(&sources).map(|i| i.classes().len()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 2);
        }

        // 構築後にファイルを消しても再読み込みはしない
        fs::remove_file(&synonyms).unwrap();
        assert_eq!(shared.initialize(&sources).unwrap().units().len(), 3);
        assert_eq!(shared.get().map(|i| i.classes().len()), Some(2));
    }

    #[test]
    fn test_shared_ontology_failure_stays_uninitialized() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sources = OntologySources::new(dir.path().join("a.owl"), dir.path().join("b.rdf"));
        let shared = SharedOntology::new();
        assert!(shared.initialize(&sources).is_err());
        assert!(shared.get().is_none());
    }
}
