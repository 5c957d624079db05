//! Connection handler
//!
//! Bridges one client stream to the board: prompts for a name, logs in,
//! then publishes every line the client sends while relaying other
//! members' lines back to it.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::board::BoardHandle;
use crate::error::AppError;
use crate::message::{Delivery, PROMPT};
use crate::types::ConnectionId;

/// Handle one accepted connection until the client goes away
///
/// Whatever ends the session after login (end of stream, read error,
/// write error), a `Logout` for the client's name is submitted before
/// returning. IO errors are returned to the caller.
pub async fn handle_connection<S>(
    stream: S,
    connection_id: ConnectionId,
    board: BoardHandle,
    delivery_capacity: usize,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite,
{
    let (read_half, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    // Login prompt
    writer.write_all(PROMPT.as_bytes()).await?;
    writer.flush().await?;

    let Some(line) = read_line(&mut reader).await? else {
        debug!("Connection {} closed before sending a name", connection_id);
        return Ok(());
    };
    let name = line.trim().to_string();

    // Create channel for board -> client deliveries
    let (delivery_tx, delivery_rx) = mpsc::channel::<Delivery>(delivery_capacity);
    board.login(name.clone(), delivery_tx).await?;
    info!(
        "Connection {} logged in as [{}] on board {}",
        connection_id,
        name,
        board.name()
    );

    let outcome = {
        let reading = relay_lines(&mut reader, &board, &name);
        tokio::pin!(reading);
        let writing = relay_deliveries(&mut writer, delivery_rx);

        tokio::select! {
            result = &mut reading => result,
            result = writing => match result {
                // The board dropped our channel: someone else logged in
                // under this name. Keep publishing until the client leaves.
                Ok(()) => {
                    debug!("Connection {} lost its delivery channel", connection_id);
                    reading.await
                }
                Err(e) => Err(e),
            },
        }
    };

    // The delivery receiver is already dropped, so a publish blocked on
    // it cannot hold this logout up.
    let logged_out = board.logout(name.clone()).await;
    if let Err(e) = &logged_out {
        debug!("Connection {} [{}] logout failed: {}", connection_id, name, e);
    }
    info!("Connection {} [{}] disconnected", connection_id, name);

    // An error that ended the session takes precedence over a failed logout
    outcome.and(logged_out)
}

/// Read one `\n`-terminated line
///
/// Returns None at end of stream. A trailing line without a newline is
/// dropped and counts as end of stream. Invalid UTF-8 is replaced with
/// U+FFFD rather than rejected.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line).await?;
    if n == 0 || line.last() != Some(&b'\n') {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Stream → Board: publish each line verbatim
async fn relay_lines<R>(reader: &mut R, board: &BoardHandle, name: &str) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = read_line(reader).await? {
        board.publish(name, line).await?;
    }
    Ok(())
}

/// Board → Stream: write each delivery as `"<from>: <text>"`
///
/// Returns Ok when the channel closes, Err on the first failed write.
async fn relay_deliveries<W>(
    writer: &mut W,
    mut deliveries: mpsc::Receiver<Delivery>,
) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(delivery) = deliveries.recv().await {
        writer.write_all(delivery.to_wire().as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
