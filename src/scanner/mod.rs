use crate::error::{PropMatchError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 照合結果ファイルの接尾辞（入力として拾わない）
pub const OUTPUT_SUFFIX: &str = ".matching.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFile {
    pub path: PathBuf,
    pub file_name: String,
    /// スキャンしたフォルダからの相対フォルダ（直接指定したファイルは空）
    pub relative_dir: PathBuf,
}

impl RequestFile {
    fn new(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
            relative_dir: PathBuf::new(),
        }
    }

    fn in_folder(path: &Path, root: &Path) -> Self {
        let relative_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            relative_dir,
            ..Self::new(path)
        }
    }

    /// 拡張子を除いたファイル名
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone())
    }

    /// 結果ファイルのパス
    ///
    /// `dir` 指定時はその下にスキャン元からの相対フォルダを再現する。
    /// 省略時はリクエストと同じ場所。
    pub fn output_path(&self, dir: Option<&Path>) -> PathBuf {
        let name = format!("{}{}", self.stem(), OUTPUT_SUFFIX);
        match dir {
            Some(dir) => dir.join(&self.relative_dir).join(name),
            None => self.path.with_file_name(name),
        }
    }
}

fn is_request_file(path: &Path) -> bool {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));
    let is_output = path
        .file_name()
        .is_some_and(|n| n.to_string_lossy().ends_with(OUTPUT_SUFFIX));
    is_json && !is_output
}

/// フォルダ内のリクエストJSONを列挙する
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<RequestFile>> {
    if !folder.is_dir() {
        return Err(PropMatchError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut requests: Vec<RequestFile> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_request_file(e.path()))
        .map(|e| RequestFile::in_folder(e.path(), folder))
        .collect();

    // パスでソート
    requests.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(requests)
}

/// ファイル・フォルダの指定からリクエストJSONを集める
///
/// ファイルは拡張子を問わずそのまま使う。
pub fn collect_requests(inputs: &[PathBuf], recursive: bool) -> Result<Vec<RequestFile>> {
    let mut requests = Vec::new();

    for input in inputs {
        if input.is_file() {
            requests.push(RequestFile::new(input));
        } else if input.is_dir() {
            requests.extend(scan_folder(input, recursive)?);
        } else {
            return Err(PropMatchError::FileNotFound(input.display().to_string()));
        }
    }

    if requests.is_empty() {
        let names: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
        return Err(PropMatchError::NoRequestsFound(names.join(", ")));
    }

    Ok(requests)
}
