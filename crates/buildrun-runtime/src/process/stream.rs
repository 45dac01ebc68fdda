//! Async stream line readers (non-UTF8-safe).
//!
//! Toolchains (and the C compilers they drive) can emit non-UTF8 bytes on
//! stdout/stderr. `BufReader::lines()` would terminate the reader on invalid
//! UTF-8, so lines are read byte-wise and decoded lossily instead.

use buildrun_core::{OutputLine, OutputSource};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Spawn a task that pushes every line of `stream` into `tx`.
///
/// The task exits on EOF, on a read error, when the receiver is dropped, or
/// when `cancel` fires. Dropping its sender is what lets the receiver close.
pub fn spawn_line_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    source: OutputSource,
    tx: mpsc::UnboundedSender<OutputLine>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => read,
                () = cancel.cancelled() => {
                    debug!(%source, "line reader cancelled");
                    break;
                }
            };

            match read {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let text = decode_line(&mut buf);
                    if tx.send(OutputLine { source, text }).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(%source, error = %e, "line reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(%source, "line reader task exiting");
    })
}

/// Strip a trailing `\n` / `\r\n` and decode lossily.
fn decode_line(buf: &mut Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8_lossy(buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_trims_newlines() {
        let mut buf = b"hello\r\n".to_vec();
        assert_eq!(decode_line(&mut buf), "hello");

        let mut buf = b"no newline".to_vec();
        assert_eq!(decode_line(&mut buf), "no newline");
    }

    #[test]
    fn test_decode_line_is_lossy() {
        let mut buf = vec![b'o', b'k', 0xff, b'\n'];
        assert_eq!(decode_line(&mut buf), "ok\u{fffd}");
    }

    #[tokio::test]
    async fn test_reader_pushes_lines_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &'static [u8] = b"first\nsecond\r\nthird";
        let _reader = spawn_line_reader(input, OutputSource::Stderr, tx, CancellationToken::new());

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            assert_eq!(line.source, OutputSource::Stderr);
            lines.push(line.text);
        }
        assert_eq!(lines, vec!["first", "second", "third"]);
    }
}
