//! prop-match: プロパティ名照合ツール
//!
//! 照合コアは `prop_match_common`。このクレートは入力変換・設定・
//! 確定ペアの保存・リクエストの一括実行とCLIを持つ。

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod runner;
pub mod scanner;
pub mod store;
