//! Newline-delimited JSON request loop.

use color_eyre::eyre::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use rootscan_scan::{EntrySource, ScanDispatcher};

use crate::wire::{self, ErrorResponse, Request, ScanResponse};

/// Answer one request per input line until the input ends.
pub async fn serve<S, R, W>(dispatcher: &ScanDispatcher<S>, reader: R, mut writer: W) -> Result<()>
where
    S: EntrySource + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle(dispatcher, &line).await?;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

async fn handle<S: EntrySource + 'static>(
    dispatcher: &ScanDispatcher<S>,
    line: &str,
) -> serde_json::Result<String> {
    match wire::decode(line) {
        Ok(Request::Scan(roots)) => {
            info!(roots = roots.len(), "scan requested");
            let result = dispatcher.scan(&roots).await;
            serde_json::to_string(&ScanResponse::from(&result))
        }
        Err(err) => {
            warn!(error = %err, "rejecting request");
            serde_json::to_string(&ErrorResponse::new(&err))
        }
    }
}
