//! `leadline bridge`: JSON-lines tool-call bridge for the voice runtime.
//!
//! Protocol: one [`ToolCall`] per input line, one [`ToolResult`] per output
//! line, in the same order. Blank lines are skipped. EOF ends the session.

use leadline_agent::LeadSession;
use leadline_core::error::Result;
use leadline_core::session::SessionId;
use leadline_core::tool::{ToolCall, ToolResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::warn;

use super::{build_registry, load_config};

pub async fn run(session_id: Option<String>) -> Result<()> {
    let config = load_config()?;
    let tools = build_registry(&config);
    let session = match session_id {
        Some(id) => LeadSession::with_id(tools, SessionId(id)),
        None => LeadSession::new(tools),
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(session, stdin, stdout).await?;
    Ok(())
}

pub async fn tools() -> Result<()> {
    let config = load_config()?;
    let definitions = build_registry(&config).definitions();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}

/// Drive one session from a line-oriented reader until EOF.
pub async fn serve<R, W>(
    mut session: LeadSession,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<ToolCall>(line) {
            Ok(call) => session.handle(&call).await,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed tool call");
                ToolResult::failed(format!("Error: invalid tool call: {e}"))
            }
        };

        let mut out = serde_json::to_vec(&result)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    session.end();
    Ok(())
}
