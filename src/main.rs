use anyhow::Context;
use clap::Parser;
use skin_analyzer::{analyzer, cli, client, config, report, scanner};
use analyzer::Analyzer;
use cli::{Cli, Commands};
use client::PredictClient;
use config::Config;
use skin_analyzer_common::Endpoint;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Predict { paths, output, save_images, endpoint, timeout, quiet } => {
            let mut config = Config::load()
                .context("設定の読み込みに失敗（skin-analyzer config --set-endpoint で修正できます）")?;
            // 上書きはこの実行だけ（保存しない）
            let endpoint = match endpoint {
                Some(url) => Endpoint::new(url)?,
                None => config.effective_endpoint()?,
            };
            if let Some(secs) = timeout {
                config.timeout_seconds = secs;
            }
            let save_images = save_images.or_else(|| config.save_images_dir.clone());

            let paths = if paths.is_empty() { prompt_for_path()? } else { paths };
            let files = scanner::collect_inputs(&paths)?;

            println!("🔬 skin-analyzer - {}\n", endpoint.predict_url());

            let transport = PredictClient::new(endpoint, config.timeout())?;
            let mut analyzer = Analyzer::new(transport, !quiet);

            let entries = analyzer
                .analyze_paths(&files, save_images.as_deref(), |entry| {
                    print_entry(entry, quiet);
                })
                .await;

            if let Some(output) = output {
                report::write_report(&entries, &output)
                    .with_context(|| format!("レポートの書き込みに失敗: {}", output.display()))?;
                println!("✔ レポートを保存: {}", output.display());
            }

            let failed = entries.iter().filter(|e| !e.is_success()).count();
            if failed > 0 {
                anyhow::bail!("{}/{} 件の解析に失敗", failed, entries.len());
            }
            println!("\n✅ 解析完了 ({}件)", entries.len());
        }

        Commands::Config { set_endpoint, set_timeout, show } => {
            // 壊れた設定ファイルもここで直せるように既定値で続行
            let mut config = Config::load_or_default()?;

            if let Some(url) = set_endpoint {
                config.set_endpoint(&url)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(secs) = set_timeout {
                config.set_timeout(secs)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint.predict_url());
                match config.effective_endpoint() {
                    Ok(effective) if effective != config.endpoint => println!(
                        "    ({} により {} を使用)",
                        config::ENDPOINT_ENV,
                        effective.predict_url()
                    ),
                    Ok(_) => {}
                    Err(e) => println!("    ({} が不正: {})", config::ENDPOINT_ENV, e),
                }
                println!(
                    "  タイムアウト: {}",
                    match config.timeout_seconds {
                        0 => "なし".to_string(),
                        secs => format!("{}秒", secs),
                    }
                );
                println!(
                    "  画像保存先: {}",
                    config
                        .save_images_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".to_string())
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn prompt_for_path() -> anyhow::Result<Vec<PathBuf>> {
    let input: String = dialoguer::Input::new()
        .with_prompt("Image file or folder")
        .interact_text()
        .context("入力の取得に失敗")?;
    Ok(vec![PathBuf::from(input.trim())])
}

fn print_entry(entry: &report::ReportEntry, quiet: bool) {
    match (&entry.result, &entry.error) {
        (Some(result), _) => {
            println!("✔ {}", entry.file_name);
            if !quiet {
                println!("{}", report::render_text(result));
            }
        }
        (None, Some(error)) => eprintln!("✘ {}: {}\n", entry.file_name, error),
        (None, None) => eprintln!("✘ {}\n", entry.file_name),
    }
}
