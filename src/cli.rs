use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prop-match")]
#[command(about = "エンジニアリングデータのプロパティ名照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（JSON または .properties）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// リクエストJSONを照合して候補を出力
    Match {
        /// リクエストJSONファイルまたはフォルダ
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力先（1件ならファイル、複数ならフォルダ。省略時は標準出力/リクエストと同じ場所）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 2つの名前の戦略別スコアを表示
    Score {
        name_a: String,
        name_b: String,
    },

    /// 確定した照合ペアを保存
    Confirm {
        /// 確定ペアのJSONファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// オントロジーを読み込んで概要を表示
    Ontology {
        /// 単位一覧を表示
        #[arg(long)]
        units: bool,

        /// クラス一覧を表示
        #[arg(long)]
        classes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 1プロパティあたりの最大候補数を設定
        #[arg(long)]
        set_suggestion_size: Option<usize>,

        /// 候補として残す最低スコアを設定（0.0-1.0）
        #[arg(long)]
        set_min_similarity: Option<f64>,
    },
}
