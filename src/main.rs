use anyhow::{bail, Context};
use clap::Parser;
use prop_match_common::types::format_score;
use prop_match_common::{score, OntologyIndex, SharedOntology, Strategy};
use prop_match_rust::{cli, config, error, runner, scanner, store};
use cli::{Cli, Commands};
use config::Config;
use error::PropMatchError;
use runner::MatchRunner;
use std::path::Path;
use std::process::ExitCode;
use store::FileMatchedPairStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "prop_match=debug" } else { "prop_match=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?.with_env_overrides()?,
        None => Config::load()?,
    };
    Ok(config)
}

/// 起動できなかった（設定・オントロジーの読み込みに失敗した）場合の終了コード
const EXIT_STARTUP_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("エラー: {:#}", e);
            if is_startup_failure(&e) {
                ExitCode::from(EXIT_STARTUP_FAILURE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn is_startup_failure(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| cause.downcast_ref::<PropMatchError>().is_some_and(PropMatchError::is_fatal))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Match { inputs, output, recursive } => {
            let settings = config.match_settings()?;

            // オントロジーは最初に1度だけ構築する（失敗したら照合しない）
            let shared = SharedOntology::new();
            let ontology = shared
                .initialize(&config.ontology_sources())
                .map_err(PropMatchError::from)
                .context("オントロジーの読み込みに失敗しました")?;

            let requests = scanner::collect_requests(&inputs, recursive)?;
            let runner = MatchRunner::new(ontology, settings);

            let single_file = requests.len() == 1 && inputs.len() == 1 && inputs[0].is_file();
            if single_file {
                let result = runner.match_file(&requests[0].path)?;
                let json = serde_json::to_string_pretty(&result)?;
                match output {
                    Some(path) if path.is_dir() => {
                        let path = requests[0].output_path(Some(&path));
                        std::fs::write(&path, json)?;
                        eprintln!("✔ 結果を保存: {}", path.display());
                    }
                    Some(path) => {
                        std::fs::write(&path, json)?;
                        eprintln!("✔ 結果を保存: {}", path.display());
                    }
                    None => println!("{}", json),
                }
                return Ok(());
            }

            eprintln!("{}件のリクエストを照合中...", requests.len());
            let outcomes = runner.run_batch(&requests, output.as_deref(), true)?;

            let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(path) => eprintln!("✔ {} → {}", outcome.request.file_name, path.display()),
                    Err(e) => eprintln!("✗ {}: {}", outcome.request.file_name, e),
                }
            }

            if !failed.is_empty() {
                bail!("{}/{}件のリクエストが失敗しました", failed.len(), outcomes.len());
            }
            eprintln!("\n✅ 照合完了");
        }

        Commands::Score { name_a, name_b } => {
            let scores = score(&name_a, &name_b);
            for (strategy, value) in scores.iter() {
                println!("{:<22} {}", strategy.name(), format_score(value));
            }
        }

        Commands::Confirm { input } => {
            if !input.is_file() {
                return Err(PropMatchError::FileNotFound(input.display().to_string()).into());
            }
            let content = std::fs::read_to_string(&input)?;
            let request: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| PropMatchError::InvalidRequest(e.to_string()))?;

            let store = FileMatchedPairStore::new(&config.matched_pairs_dir);
            let added = store::add_confirmed_pairs(&store, &request)?;
            println!("✔ {}件の確定ペアを追加しました ({})", added, store.dir().display());
        }

        Commands::Ontology { units, classes } => {
            let index = OntologyIndex::load(&config.ontology_sources())
                .map_err(PropMatchError::from)
                .context("オントロジーの読み込みに失敗しました")?;
            info!(classes = index.classes().len(), units = index.units().len(), "Ontology summary");

            println!("オントロジー:");
            println!("  同義語オントロジー: {}", config.synonyms_ontology.display());
            println!("  単位オントロジー: {}", config.unit_ontology.display());
            println!("  クラス数: {}", index.classes().len());
            println!("  単位数: {}", index.units().len());

            if classes {
                println!("\nクラス:");
                for class in index.classes() {
                    println!("  {} [{}]", class.class_name, class.labels.join(", "));
                }
            }

            if units {
                println!("\n単位:");
                for unit in index.units() {
                    println!(
                        "  {} | {} | {}",
                        unit.labels.join(", "),
                        unit.symbol.as_deref().unwrap_or("-"),
                        unit.dimension
                            .as_deref()
                            .map(prop_match_common::ontology::local_name)
                            .unwrap_or("-")
                    );
                }
            }
        }

        Commands::Config { show, set_suggestion_size, set_min_similarity } => {
            let mut config = config;
            let changed = set_suggestion_size.is_some() || set_min_similarity.is_some();

            if let Some(size) = set_suggestion_size {
                config.set_suggestion_size(size)?;
            }
            if let Some(value) = set_min_similarity {
                config.set_min_similarity(value)?;
            }

            if changed {
                match cli.config.as_deref() {
                    Some(path) if path.extension().is_some_and(|ext| ext == "properties") => {
                        bail!(".properties ファイルは編集できません: {}", path.display());
                    }
                    Some(path) => config.save_to(path)?,
                    None => config.save()?,
                }
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  同義語オントロジー: {}", config.synonyms_ontology.display());
                println!("  単位オントロジー: {}", config.unit_ontology.display());
                println!("  最大候補数: {}", config.suggestion_size);
                println!("  最低スコア: {}", config.min_similarity_value);
                println!("  確定ペア保存先: {}", config.matched_pairs_dir.display());
                println!("  戦略: {}", Strategy::ALL.map(|s| s.name()).join(", "));
            }
        }
    }

    Ok(())
}
