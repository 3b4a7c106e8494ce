mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "r2-body")]
#[command(about = "R2バケットのサブリソース設定からAPIリクエストボディを生成・検証する", long_about = None)]
struct Cli {
    /// デバッグログを出力
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// 対象のサブリソース
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Lifecycle,
    Cors,
    EventNotification,
    Sippy,
    CustomDomain,
}

/// バケットの指定 (アカウントID / バケット名 / ジュリスディクション)
#[derive(Debug, Clone, clap::Args)]
pub struct BucketArgs {
    /// アカウントID
    #[arg(long, env = "CLOUDFLARE_ACCOUNT_ID")]
    pub account_id: String,

    /// バケット名
    #[arg(short, long)]
    pub bucket: String,

    /// ジュリスディクション (default, eu, fedramp)
    #[arg(short, long, default_value = "default")]
    pub jurisdiction: String,

    /// イベント通知のキューID (event-notification のみ)
    #[arg(long)]
    pub queue_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// リクエストボディを生成して標準出力に書き出す
    Render {
        /// サブリソースの種類
        #[arg(value_enum)]
        kind: Kind,
        /// 目標状態のJSONファイル
        desired: PathBuf,
        /// 現在の状態のJSONファイル (指定時は更新用の差分ボディを生成)
        #[arg(long)]
        prior: Option<PathBuf>,
        /// 整形して出力
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        bucket: BucketArgs,
    },
    /// 設定を検証
    Validate {
        /// サブリソースの種類
        #[arg(value_enum)]
        kind: Kind,
        /// 検証するJSONファイル
        file: PathBuf,
        #[command(flatten)]
        bucket: BucketArgs,
    },
    /// バージョン情報を表示
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdoutはボディ出力に使うので、ログはstderrへ
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Render {
            kind,
            desired,
            prior,
            pretty,
            bucket,
        } => commands::render::handle(kind, &bucket, &desired, prior.as_deref(), pretty),
        Commands::Validate { kind, file, bucket } => {
            commands::validate::handle(kind, &bucket, &file)
        }
        Commands::Version => {
            println!("r2-body {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
