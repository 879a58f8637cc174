//! Streams child process output into the log while a step runs.

use std::io::{BufRead, BufReader, Read};

/// Which pipe a line came from.
#[derive(Clone, Copy)]
pub(super) enum StreamType {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Extracts a human-readable message from a thread panic payload.
pub(super) fn panic_message(err: &(dyn std::any::Any + Send)) -> &str {
    err.downcast_ref::<&str>()
        .copied()
        .or_else(|| err.downcast_ref::<String>().map(|s| s.as_str()))
        .unwrap_or("unknown panic")
}

/// Reads `pipe` until EOF, logging each line as it arrives.
///
/// stdout goes to INFO and stderr to WARN so conda and pip progress stays
/// visible at the default log level. Output is best-effort: a read error
/// stops streaming but never fails the step, whose outcome is decided by the
/// exit status alone.
pub(super) fn read_pipe_to_log<R: Read>(pipe: Option<R>, stream_type: StreamType) {
    let Some(pipe) = pipe else {
        tracing::error!(stream = %stream_type, "pipe was not captured, no output will be logged");
        return;
    };

    let mut reader = BufReader::new(pipe);
    let mut line_buf = Vec::new();

    loop {
        line_buf.clear();
        match reader.read_until(b'\n', &mut line_buf) {
            Ok(0) => break,
            Ok(_) => {
                let content = line_buf.strip_suffix(b"\n").unwrap_or(&line_buf);
                log_line(content, stream_type);
            }
            Err(e) => {
                tracing::error!(stream = %stream_type, error = %e, "I/O error, stopping read");
                break;
            }
        }
    }
}

/// Collapses terminal redraws into the text a terminal would finally show.
///
/// Conda spinners erase with backspaces and pip progress bars rewrite the
/// line after a bare CR. A CR clears what came before it, a backspace drops
/// the previous character, and any other control character except tab is
/// discarded.
pub(super) fn render_line(line: &str) -> String {
    let mut rendered = String::with_capacity(line.len());
    for c in line.trim_end_matches('\r').chars() {
        match c {
            '\r' => rendered.clear(),
            '\x08' => {
                rendered.pop();
            }
            '\t' => rendered.push(c),
            c if c.is_control() => {}
            c => rendered.push(c),
        }
    }
    rendered.trim_end().to_string()
}

/// Logs the rendered form of one line; lines that render empty are skipped.
fn log_line(line: &[u8], stream_type: StreamType) {
    let text = String::from_utf8_lossy(line);
    let rendered = render_line(&text);
    if rendered.is_empty() {
        return;
    }
    match stream_type {
        StreamType::Stdout => tracing::info!(stream = %stream_type, "{}", rendered),
        StreamType::Stderr => tracing::warn!(stream = %stream_type, "{}", rendered),
    }
}
