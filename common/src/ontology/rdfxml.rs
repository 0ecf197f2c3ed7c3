//! RDF/XML リーダー
//!
//! オントロジーファイル（OM-2 の単位オントロジー、OWLの同義語オントロジー）を
//! sophia の RDF/XML パーサーでトリプル列に変換する。
//! 実体参照（`&om;` など）・`xml:base`・相対IRIの解決はパーサー側で行う。

use crate::error::{Error, Result};
use sophia::api::parser::TripleParser;
use sophia::api::source::TripleSource;
use sophia::api::term::{Term as RdfTerm, TermKind};
use sophia::api::triple::Triple as RdfTriple;
use sophia::iri::Iri;
use sophia::xml::parser::RdfXmlParser;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

/// RDFの項
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(String),
}

impl Term {
    /// IRI・ブランクノードID・リテラルの字句形
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(s) | Term::Blank(s) | Term::Literal(s) => s,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Term::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// sophia の項から変換する。言語タグ・データ型は捨てて字句形だけ残す
    fn from_rdf<T: RdfTerm>(term: T) -> Option<Self> {
        match term.kind() {
            TermKind::Iri => term.iri().map(|iri| Term::Iri(iri.as_str().to_string())),
            TermKind::BlankNode => term.bnode_id().map(|id| Term::Blank(id.as_str().to_string())),
            TermKind::Literal => term.lexical_form().map(|lex| Term::Literal(lex.to_string())),
            _ => None,
        }
    }
}

/// トリプル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

/// RDF/XML文書をトリプル列に変換する（文書順）
///
/// `base` は相対IRIの解決に使う文書のベースIRI。
pub fn parse_rdfxml(content: &str, base: &str) -> Result<Vec<Triple>> {
    let base = Iri::new(base.to_string())
        .map_err(|e| Error::Ontology(format!("invalid base IRI {base}: {e}")))?;
    let parser = RdfXmlParser { base: Some(base) };

    let mut triples = Vec::new();
    parser
        .parse(content.as_bytes())
        .for_each_triple(|t| {
            let subject = Term::from_rdf(t.s());
            let predicate = Term::from_rdf(t.p());
            let object = Term::from_rdf(t.o());
            if let (Some(subject), Some(Term::Iri(predicate)), Some(object)) =
                (subject, predicate, object)
            {
                triples.push(Triple {
                    subject,
                    predicate,
                    object,
                });
            }
        })
        .map_err(|e| Error::Ontology(format!("RDF/XML parse error: {e}")))?;

    Ok(triples)
}
