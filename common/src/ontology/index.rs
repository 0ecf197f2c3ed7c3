//! トリプルからクラス・単位の索引を作る

use super::rdfxml::{Term, Triple, OWL_NS, RDFS_NS, RDF_NS};
use super::units::OntologyUnit;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// OM-2 の名前空間
pub const OM_NS: &str = "http://www.ontology-of-units-of-measure.org/resource/om-2/";

/// 単位クラスとみなすローカル名
const UNIT_CLASS_NAMES: &[&str] = &["Unit", "PrefixedUnit"];

/// 同義語オントロジーのクラス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyClass {
    pub class_name: String,
    pub labels: Vec<String>,
}

impl OntologyClass {
    pub fn new(class_name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            class_name: class_name.into(),
            labels,
        }
    }

    /// 同義語展開に使う名前（クラス名、続いてラベル）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.class_name.as_str()).chain(self.labels.iter().map(String::as_str))
    }
}

/// IRIのローカル名（最後の `#` または `/` の後ろ）
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(pos) => &iri[pos + 1..],
        None => iri,
    }
}

/// 主語ごとのトリプル索引
pub struct Graph<'a> {
    triples: &'a [Triple],
    by_subject: HashMap<&'a Term, Vec<usize>>,
}

impl<'a> Graph<'a> {
    pub fn new(triples: &'a [Triple]) -> Self {
        let mut by_subject: HashMap<&Term, Vec<usize>> = HashMap::new();
        for (i, triple) in triples.iter().enumerate() {
            by_subject.entry(&triple.subject).or_default().push(i);
        }
        Self {
            triples,
            by_subject,
        }
    }

    /// 主語・述語に対する目的語（文書順）
    pub fn objects<'s>(
        &'s self,
        subject: &Term,
        predicate: &'s str,
    ) -> impl Iterator<Item = &'a Term> + 's {
        let triples = self.triples;
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(move |&i| &triples[i])
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn triples(&self) -> &'a [Triple] {
        self.triples
    }

    /// `rdfs:label` のリテラル値
    pub fn labels(&self, subject: &Term) -> Vec<String> {
        let label = format!("{RDFS_NS}label");
        self.objects(subject, &label)
            .filter_map(Term::as_literal)
            .map(str::to_string)
            .collect()
    }
}

/// 同義語オントロジーのクラス一覧を作る
///
/// `owl:Class` または `rdfs:Class` 型のIRI主語を初出順に並べる。
pub fn build_class_label_index(graph: &Graph<'_>) -> Vec<OntologyClass> {
    let rdf_type = format!("{RDF_NS}type");
    let class_types = [format!("{OWL_NS}Class"), format!("{RDFS_NS}Class")];

    let mut seen: HashSet<&Term> = HashSet::new();
    let mut classes = Vec::new();

    for triple in graph.triples() {
        if triple.predicate != rdf_type {
            continue;
        }
        let is_class = triple
            .object
            .as_iri()
            .is_some_and(|object| class_types.iter().any(|c| c == object));
        let Some(iri) = triple.subject.as_iri() else {
            // 匿名クラス（制約など）は名前を持たない
            continue;
        };
        if is_class && seen.insert(&triple.subject) {
            classes.push(OntologyClass::new(local_name(iri), graph.labels(&triple.subject)));
        }
    }

    classes
}

/// 単位クラス（`Unit` / `PrefixedUnit` とその下位クラス）のIRI集合
fn unit_classes(graph: &Graph<'_>) -> HashSet<String> {
    let rdf_type = format!("{RDF_NS}type");
    let sub_class_of = format!("{RDFS_NS}subClassOf");

    let mut classes: HashSet<String> = HashSet::new();
    for triple in graph.triples() {
        let candidates = [
            triple.subject.as_iri(),
            (triple.predicate == rdf_type || triple.predicate == sub_class_of)
                .then(|| triple.object.as_iri())
                .flatten(),
        ];
        for iri in candidates.into_iter().flatten() {
            if UNIT_CLASS_NAMES.contains(&local_name(iri)) {
                classes.insert(iri.to_string());
            }
        }
    }

    // subClassOf の推移閉包
    loop {
        let mut added = false;
        for triple in graph.triples() {
            if triple.predicate != sub_class_of {
                continue;
            }
            if let (Some(sub), Some(sup)) = (triple.subject.as_iri(), triple.object.as_iri()) {
                if classes.contains(sup) && !classes.contains(sub) {
                    classes.insert(sub.to_string());
                    added = true;
                }
            }
        }
        if !added {
            break;
        }
    }

    classes
}

/// 単位オントロジーの単位一覧を作る
///
/// 単位クラスの個体を主語の初出順に並べる。記号は最初の `om:symbol`、
/// 次元は最初の `om:hasDimension`（IRI文字列）。
pub fn build_unit_index(graph: &Graph<'_>) -> Vec<OntologyUnit> {
    let rdf_type = format!("{RDF_NS}type");
    let symbol = format!("{OM_NS}symbol");
    let has_dimension = format!("{OM_NS}hasDimension");
    let classes = unit_classes(graph);

    let mut seen: HashSet<&Term> = HashSet::new();
    let mut units = Vec::new();

    for triple in graph.triples() {
        if triple.predicate != rdf_type {
            continue;
        }
        let is_unit = triple
            .object
            .as_iri()
            .is_some_and(|class| classes.contains(class));
        if !is_unit || !seen.insert(&triple.subject) {
            continue;
        }

        let subject = &triple.subject;
        units.push(OntologyUnit {
            labels: graph.labels(subject),
            symbol: graph
                .objects(subject, &symbol)
                .next()
                .map(|t| t.as_str().to_string()),
            dimension: graph
                .objects(subject, &has_dimension)
                .next()
                .map(|t| t.as_str().to_string()),
        });
    }

    units
}
