//! リクエストの実行
//!
//! 構築済みのオントロジーを共有し、リクエストJSONを変換 → 照合 → 出力JSONにする。
//! 複数リクエストは rayon で並列に処理する（リクエスト間で共有するのは
//! 読み取り専用のオントロジーだけ）。

use crate::converter::{convert_request, PartDatabaseConverter, PropertyConverter, VirtualSatelliteConverter};
use crate::error::{PropMatchError, Result};
use crate::scanner::RequestFile;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use prop_match_common::{render_table, MatchSettings, Matcher, OntologyIndex};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 1リクエストの処理結果
#[derive(Debug)]
pub struct BatchOutcome {
    pub request: RequestFile,
    pub result: Result<PathBuf>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct MatchRunner<'a> {
    matcher: Matcher<'a>,
    source_converter: &'a dyn PropertyConverter,
    target_converter: &'a dyn PropertyConverter,
}

impl<'a> MatchRunner<'a> {
    /// 部品DB（ソース）・Virtual Satellite（ターゲット）形式で照合する
    pub fn new(ontology: &'a OntologyIndex, settings: MatchSettings) -> Self {
        Self::with_converters(ontology, settings, &PartDatabaseConverter, &VirtualSatelliteConverter)
    }

    pub fn with_converters(
        ontology: &'a OntologyIndex,
        settings: MatchSettings,
        source_converter: &'a dyn PropertyConverter,
        target_converter: &'a dyn PropertyConverter,
    ) -> Self {
        Self {
            matcher: Matcher::new(ontology, settings),
            source_converter,
            target_converter,
        }
    }

    /// リクエストJSON → 照合結果JSON
    pub fn match_payload(&self, payload: &Value) -> Result<Value> {
        let input = convert_request(payload, self.source_converter, self.target_converter)?;
        debug!(
            sources = input.source.len(),
            targets = input.target.len(),
            "Request converted"
        );

        let table = self.matcher.match_all(&input.source, &input.target);
        Ok(render_table(&table))
    }

    pub fn match_str(&self, request: &str) -> Result<Value> {
        let payload: Value = serde_json::from_str(request)
            .map_err(|e| PropMatchError::InvalidRequest(format!("JSONではありません: {}", e)))?;
        self.match_payload(&payload)
    }

    pub fn match_file(&self, path: &Path) -> Result<Value> {
        if !path.is_file() {
            return Err(PropMatchError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        self.match_str(&content).map_err(|e| match e {
            PropMatchError::InvalidRequest(msg) => {
                PropMatchError::InvalidRequest(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// 複数リクエストを並列に処理し、結果を `<名前>.matching.json` に書く
    ///
    /// # Arguments
    /// * `requests` - リクエストファイル
    /// * `output_dir` - 出力先（省略時は各リクエストと同じフォルダ）
    /// * `show_progress` - 進捗バーを表示するか
    ///
    /// # Returns
    /// リクエストと同じ順の処理結果。1件の失敗で他を止めない。
    /// 出力先が先のリクエストと重複したものは書かずに `OutputConflict` とする
    pub fn run_batch(
        &self,
        requests: &[RequestFile],
        output_dir: Option<&Path>,
        show_progress: bool,
    ) -> Result<Vec<BatchOutcome>> {
        if let Some(dir) = output_dir {
            std::fs::create_dir_all(dir)?;
        }

        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let planned: Vec<(&RequestFile, PathBuf, bool)> = requests
            .iter()
            .map(|request| {
                let output_path = request.output_path(output_dir);
                let is_first = claimed.insert(output_path.clone());
                (request, output_path, is_first)
            })
            .collect();

        let progress = progress_bar(requests.len() as u64, show_progress);

        let outcomes: Vec<BatchOutcome> = planned
            .par_iter()
            .map(|(request, output_path, is_first)| {
                let result = if *is_first {
                    self.run_one(request, output_path)
                } else {
                    Err(PropMatchError::OutputConflict(output_path.display().to_string()))
                };
                if let Err(e) = &result {
                    warn!(request = %request.path.display(), error = %e, "Request failed");
                }
                progress.inc(1);
                BatchOutcome {
                    request: (*request).clone(),
                    result,
                }
            })
            .collect();

        progress.finish_and_clear();
        Ok(outcomes)
    }

    fn run_one(&self, request: &RequestFile, output_path: &Path) -> Result<PathBuf> {
        let output = self.match_file(&request.path)?;
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&output)?;
        std::fs::write(output_path, json)?;
        debug!(output = %output_path.display(), "Result written");
        Ok(output_path.to_path_buf())
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if !visible {
        bar.set_draw_target(ProgressDrawTarget::hidden());
        return bar;
    }
    let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message("照合中");
    bar
}
