use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skin-analyzer")]
#[command(about = "AI skin-condition screening client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を推論サーバーに送って解析
    Predict {
        /// 画像ファイルまたはフォルダ（省略時は対話入力）
        paths: Vec<PathBuf>,

        /// JSONレポートの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// マスク/オーバーレイPNGの保存先
        #[arg(long)]
        save_images: Option<PathBuf>,

        /// 推論サーバーのベースURL（設定・環境変数より優先）
        #[arg(long)]
        endpoint: Option<String>,

        /// タイムアウト秒数（0 で無制限）
        #[arg(long)]
        timeout: Option<u64>,

        /// 結果のテキスト表示を省略
        #[arg(short, long)]
        quiet: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 推論サーバーのベースURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// タイムアウト秒数を設定（0 で無制限）
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
