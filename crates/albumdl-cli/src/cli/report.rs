//! Console lines and exit codes for a run.

use albumdl_core::error::FatalError;
use albumdl_core::pipeline::{RunEvent, Terminal};

/// Completed, empty-album and aborted runs.
pub const EXIT_OK: u8 = 0;
/// Fatal fetch error or startup failure.
pub const EXIT_FAILURE: u8 = 1;
/// Album id argument rejected.
pub const EXIT_USAGE: u8 = 2;

pub(super) fn event_line(event: &RunEvent<'_>) -> String {
    match event {
        RunEvent::Started { album_id } => format!("album id: {}", album_id),
        RunEvent::TracksListed { total } => format!("all track list got, total: {}", total),
        RunEvent::Downloaded { saved, .. } => {
            format!("downloaded! file: {}", saved.path.display())
        }
        RunEvent::DownloadFailed { error, .. } => {
            format!("error in audio download, err: {}", error)
        }
        RunEvent::ResolutionFailed { error, .. } => {
            format!("error in get audio address, err: {}", error)
        }
    }
}

pub(super) fn print_event(event: RunEvent<'_>) {
    println!("{}", event_line(&event));
}

/// Summary line, and whether it belongs on stderr.
pub(super) fn terminal_line(terminal: &Terminal) -> (String, bool) {
    match terminal {
        Terminal::EmptyAlbum => ("album has no tracks".to_string(), false),
        Terminal::Fatal(e) => (format!("error: {}", e), true),
        Terminal::Aborted {
            successes,
            failures,
            ..
        } => (
            format!(
                "aborted: {} downloaded, {} failed before address resolution failed",
                successes, failures
            ),
            false,
        ),
        Terminal::Completed {
            successes,
            failures,
        } => (
            format!("done: {} downloaded, {} failed", successes, failures),
            false,
        ),
    }
}

pub(super) fn print_terminal(terminal: &Terminal) {
    let (line, to_stderr) = terminal_line(terminal);
    if to_stderr {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

pub fn exit_code(terminal: &Terminal) -> u8 {
    match terminal {
        Terminal::Fatal(FatalError::Validation(_)) => EXIT_USAGE,
        Terminal::Fatal(FatalError::Fetch(_)) => EXIT_FAILURE,
        Terminal::EmptyAlbum | Terminal::Aborted { .. } | Terminal::Completed { .. } => EXIT_OK,
    }
}
