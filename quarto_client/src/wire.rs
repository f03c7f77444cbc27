//! 1接続1メッセージの JSON 送受信。
//!
//! 区切り文字は使わず、受け取ったバイト列が JSON として完結した時点で1メッセージとみなす。

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};

/// 1回に読むバイト数。
const CHUNK_SIZE: usize = 1024;

/// 1メッセージの上限。
const MAX_MESSAGE_LEN: usize = 1 << 20;

/// 送受信の失敗。
#[derive(Debug, Error)]
pub enum WireError {
    /// メッセージが完結する前に接続が閉じた。
    #[error("Connection closed")]
    ConnectionClosed,
    /// 入出力エラー。
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON として読めない。
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// メッセージが長すぎる。
    #[error("message exceeds {MAX_MESSAGE_LEN} bytes")]
    TooLarge,
}

/// JSON 値を1つ読み取る。
///
/// 途中までしか届いていなければ続きを待つ。文法エラーは即座に返す。
pub async fn read_json<R>(reader: &mut R) -> Result<Value, WireError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            return Err(WireError::ConnectionClosed);
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());

        match serde_json::from_slice(&buffer) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_eof() => {}
            Err(err) => return Err(err.into()),
        }
        if buffer.len() > MAX_MESSAGE_LEN {
            return Err(WireError::TooLarge);
        }
    }
}

/// JSON 値を1つ書き込む。
pub async fn write_json<W, T>(writer: &mut W, message: &T) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(message)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
