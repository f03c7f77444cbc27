//! 手の要求を待ち受けるサーバー。

use std::net::SocketAddr;

use anyhow::Context as _;
use quarto_core::protocol::{self, Response};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt as _};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::Strategy;
use crate::wire::{WireError, read_json, write_json};

/// `addr` で待ち受け、接続ごとにタスクを起こす。
///
/// # Errors
///
/// 待ち受けを開始できない場合はエラーを返す。
pub async fn serve(addr: SocketAddr, strategy: Strategy) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not listen on {addr}"))?;
    info!(%addr, "listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, strategy).await {
                warn!(%peer, %err, "connection failed");
            }
        });
    }
}

/// 要求を1つ読み、応答を1つ書いて閉じる。
///
/// 探索はブロッキング用のスレッドで、要求ごとに新しいエージェントを使って行う。
pub async fn handle_connection<S>(mut stream: S, strategy: Strategy) -> Result<(), WireError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = read_json(&mut stream).await?;
    info!(request = %request, "request received");

    let response = tokio::task::spawn_blocking(move || {
        let mut agent = strategy.agent();
        protocol::handle(request, agent.as_mut())
    })
    .await
    .unwrap_or_else(|err| Response::error(format!("engine task failed: {err}")));

    match &response {
        Response::Move { mv } => info!(pos = ?mv.pos, piece = ?mv.piece, "move sent"),
        Response::Error { error } => warn!(%error, "request failed"),
        other => info!(response = ?other, "response sent"),
    }

    write_json(&mut stream, &response).await?;
    stream.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use quarto_core::ai::alphabeta::Config;
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

    use super::handle_connection;
    use crate::cli::{Strategy, StrategyKind};

    /// 要求を送り、接続が閉じるまでに返った応答を読む。
    async fn round_trip(kind: StrategyKind, request: &Value) -> Value {
        let (mut client, server) = tokio::io::duplex(64);
        let strategy = Strategy::new(kind, Config::default().with_node_budget(Some(5_000)));
        let task = tokio::spawn(handle_connection(server, strategy));

        let bytes = serde_json::to_vec(request).unwrap_or_else(|err| panic!("{err}"));
        client
            .write_all(&bytes)
            .await
            .unwrap_or_else(|err| panic!("{err}"));
        let mut reply = Vec::new();
        client
            .read_to_end(&mut reply)
            .await
            .unwrap_or_else(|err| panic!("{err}"));

        let served = task.await.unwrap_or_else(|err| panic!("{err}"));
        assert!(served.is_ok(), "got={served:?}");
        serde_json::from_slice(&reply).unwrap_or_else(|err| panic!("{err}"))
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let reply = round_trip(StrategyKind::Random, &json!({"request": "ping"})).await;
        assert_eq!(reply, json!({"response": "pong"}));
    }

    #[tokio::test]
    async fn play_gets_a_move_from_each_strategy() {
        let mut board = vec![Value::Null; 16];
        board[0] = json!("BDEC");
        board[15] = json!("SLFP");
        let request = json!({"request": "play", "state": {"board": board, "piece": "BLEP"}});

        for kind in [StrategyKind::Random, StrategyKind::Heuristic, StrategyKind::Alphabeta] {
            let reply = round_trip(kind, &request).await;
            assert_eq!(reply["response"], "move", "kind={kind:?} reply={reply}");
            let pos = reply["move"]["pos"].as_u64().unwrap_or(u64::MAX);
            assert!(pos < 16 && pos != 0 && pos != 15, "kind={kind:?} pos={pos}");
        }
    }

    #[tokio::test]
    async fn unknown_request_gets_an_error() {
        let reply = round_trip(StrategyKind::Alphabeta, &json!({"request": "hello"})).await;
        assert_eq!(
            reply,
            json!({"response": "error", "error": "Unknown request 'hello'"})
        );
    }
}
