use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// A line of terminal input stamped with the time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub received: Instant,
    pub text: String,
}

/// Read lines on a background task so they are stamped as they arrive,
/// not when the event loop gets around to them.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<InputLine>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(text)) => {
                    let line = InputLine {
                        received: Instant::now(),
                        text,
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read input");
                    break;
                }
            }
        }
    });
    rx
}

pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<InputLine> {
    spawn_line_reader(BufReader::new(tokio::io::stdin()))
}

/// Drops input that was typed while a question pool was loading.
#[derive(Debug, Clone, Copy)]
pub struct InputGate {
    open_since: Instant,
}

impl InputGate {
    /// Open the gate now; earlier lines are rejected.
    #[must_use]
    pub fn opened_now() -> Self {
        Self {
            open_since: Instant::now(),
        }
    }

    /// Call when a load completes.
    pub fn reopen(&mut self) {
        self.open_since = Instant::now();
    }

    #[must_use]
    pub fn admits(&self, line: &InputLine) -> bool {
        line.received >= self.open_since
    }
}
