//! Quarto 対戦サーバーに参加し、手の要求に応答するクライアント。
//!
//! 起動時にサーバーへ参加登録し、その後は `--port-client` で要求を待ち受ける。
//! 1回の接続で JSON の要求を1つ受け取り、応答を1つ返して切断する。

mod cli;
mod server;
mod subscribe;
mod wire;

use anyhow::Context as _;
use clap::Parser as _;
use quarto_core::protocol::Request;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, LogFormat};

/// ログ出力を初期化する。`RUST_LOG` がなければ `info` 以上を出す。
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let strategy = args.strategy();
    info!(?strategy, "starting client");

    if args.skip_subscribe {
        info!("subscription skipped");
    } else {
        let request = Request::Subscribe {
            name: args.name.clone(),
            port: args.port_client,
            matricules: args.matricules.clone(),
        };
        let server = args.server_addr();
        subscribe::subscribe(&server, &request)
            .await
            .with_context(|| format!("could not subscribe to {server}"))?;
    }

    server::serve(args.listen_addr(), strategy).await
}
