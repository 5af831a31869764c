//! Line-delimited stdio transport for the tool protocol
//!
//! One JSON-RPC message per line in, one per line out. Each request is
//! handled on its own task so a slow management call does not hold up the
//! others; responses are written in completion order.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::protocol::ToolServer;

/// Serve until `reader` reaches EOF and every in-flight request has answered
pub async fn serve<R, W>(server: Arc<ToolServer>, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut lines = reader.lines();

    info!("Tool server listening on stdio");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                trace!("<- {}", line);

                let server = Arc::clone(&server);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = server.handle_line(&line).await {
                        // The receiver only goes away once serve() returns
                        let _ = tx.send(response);
                    }
                });
            }
            Some(response) = rx.recv() => {
                write_line(&mut writer, &response).await?;
            }
        }
    }

    // Drain responses from requests still running
    drop(tx);
    while let Some(response) = rx.recv().await {
        write_line(&mut writer, &response).await?;
    }
    writer.flush().await?;
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    trace!("-> {}", line);
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::protocol::tests::server;
    use serde_json::Value;

    #[tokio::test]
    async fn test_serve_answers_every_request() {
        let (server, transport) = server(200, r#"{"name":"p1"}"#);
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"anf_pools_get","arguments":{"poolName":"p1"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"anf_pools_get","arguments":{"poolName":"p2"}}}"#,
            "\n",
        );

        let mut output = Vec::new();
        serve(Arc::new(server), input.as_bytes(), &mut output)
            .await
            .unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 4);

        let mut ids: Vec<i64> = responses
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(transport.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_serve_empty_input() {
        let (server, _) = server(200, "{}");
        let mut output = Vec::new();
        serve(Arc::new(server), &b""[..], &mut output).await.unwrap();
        assert!(output.is_empty());
    }
}
