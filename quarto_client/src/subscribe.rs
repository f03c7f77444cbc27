//! 対戦サーバーへの参加登録。

use core::time::Duration;

use anyhow::{Context as _, bail};
use quarto_core::protocol::{Request, Response};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::wire::{read_json, write_json};

/// 事前の到達確認の待ち時間。
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// 参加登録の接続待ち時間。
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// 接続拒否時の試行回数。
const MAX_ATTEMPTS: u32 = 3;

/// サーバーが接続を受け付けるか確かめる。
pub async fn check_server(addr: &str) -> bool {
    matches!(
        timeout(PROBE_TIMEOUT, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// 参加登録する。接続を拒否されたら `2 * 試行回数` 秒待って再試行する。
///
/// # Errors
///
/// サーバーに到達できない場合や、応答が `ok` でない場合はエラーを返す。
pub async fn subscribe(addr: &str, request: &Request) -> anyhow::Result<()> {
    info!(addr, "checking server availability");
    if !check_server(addr).await {
        bail!("server at {addr} is not responding");
    }

    let mut attempt = 1;
    let stream = loop {
        match timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => break stream,
            Ok(Err(err))
                if err.kind() == std::io::ErrorKind::ConnectionRefused
                    && attempt < MAX_ATTEMPTS =>
            {
                let wait = Duration::from_secs(u64::from(attempt) * 2);
                warn!(attempt, wait_secs = wait.as_secs(), "connection refused, retrying");
                sleep(wait).await;
                attempt += 1;
            }
            Ok(Err(err)) => {
                return Err(err).with_context(|| {
                    format!("could not connect to {addr} after {attempt} attempts")
                });
            }
            Err(_elapsed) => bail!("connection to {addr} timed out"),
        }
    };

    exchange(stream, request).await?;
    info!(addr, "subscribed");
    Ok(())
}

/// 参加登録の要求を送り、`ok` が返るか確かめる。
async fn exchange<S>(mut stream: S, request: &Request) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_json(&mut stream, request).await?;
    let reply = read_json(&mut stream).await?;
    match serde_json::from_value::<Response>(reply.clone()) {
        Ok(Response::Ok) => Ok(()),
        _ => bail!("subscription rejected: {reply}"),
    }
}

#[cfg(test)]
mod tests {
    use quarto_core::protocol::Request;
    use serde_json::json;

    use super::exchange;
    use crate::wire::{read_json, write_json};

    fn subscribe_request() -> Request {
        Request::Subscribe {
            name: "bot".to_owned(),
            port: 8080,
            matricules: vec!["11111".to_owned(), "22222".to_owned()],
        }
    }

    #[tokio::test]
    async fn ok_reply_completes_subscription() {
        let (client, mut server) = tokio::io::duplex(256);
        let peer = tokio::spawn(async move {
            let received = read_json(&mut server).await.unwrap_or_else(|err| panic!("{err}"));
            write_json(&mut server, &json!({"response": "ok"}))
                .await
                .unwrap_or_else(|err| panic!("{err}"));
            received
        });

        let result = exchange(client, &subscribe_request()).await;
        assert!(result.is_ok(), "got={result:?}");
        let received = peer.await.unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(received["request"], "subscribe");
        assert_eq!(received["port"], 8080);
        assert_eq!(received["matricules"], json!(["11111", "22222"]));
    }

    #[tokio::test]
    async fn other_replies_are_rejections() {
        let (client, mut server) = tokio::io::duplex(256);
        let peer = tokio::spawn(async move {
            let _request = read_json(&mut server).await;
            write_json(&mut server, &json!({"response": "error", "error": "name taken"}))
                .await
                .unwrap_or_else(|err| panic!("{err}"));
        });

        let result = exchange(client, &subscribe_request()).await;
        let message = result.map_err(|err| err.to_string()).err().unwrap_or_default();
        assert!(message.contains("name taken"), "got={message}");
        drop(peer.await);
    }

    #[tokio::test]
    async fn unreachable_server_fails_the_probe() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|err| panic!("{err}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("{err}"))
            .to_string();
        drop(listener);

        assert!(!super::check_server(&addr).await);
    }
}
