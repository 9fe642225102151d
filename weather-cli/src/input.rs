//! Terminal input on a dedicated thread.

use std::{
    borrow::Cow,
    io::{self, BufRead},
    thread,
};

use tokio::sync::mpsc;

use crate::command::Command;

#[derive(Debug)]
pub enum InputEvent {
    Command(Command),
    /// End of input; no more events follow.
    Closed,
    /// Reading failed; no more events follow.
    Failed(io::Error),
}

/// Read lines until EOF or error, forwarding each non-blank line in order.
///
/// Bytes that are not UTF-8 are replaced, not treated as a stream failure.
/// Returns early if the receiving side has gone away.
pub fn read_commands<R: BufRead>(mut reader: R, tx: &mpsc::UnboundedSender<InputEvent>) {
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                let _ = tx.send(InputEvent::Failed(err));
                return;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            tracing::warn!("input line was not valid UTF-8, replaced invalid bytes");
        }

        let Some(cmd) = Command::parse(&line) else {
            continue;
        };

        if tx.send(InputEvent::Command(cmd)).is_err() {
            return;
        }
    }

    let _ = tx.send(InputEvent::Closed);
}

/// Spawn the reader on its own OS thread so blocking reads never stall the runtime.
pub fn spawn_reader<R>(reader: R) -> io::Result<mpsc::UnboundedReceiver<InputEvent>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("input-reader".into())
        .spawn(move || read_commands(reader, &tx))?;

    Ok(rx)
}
