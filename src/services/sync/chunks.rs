use crate::types::DateWindow;
use chrono::Duration;

/// Split a window into consecutive inclusive chunks of at most `chunk_days`
/// calendar dates. The chunks cover the window exactly, without gaps or
/// overlap. An empty window yields no chunks.
pub fn chunk_windows(window: DateWindow, chunk_days: u32) -> Vec<DateWindow> {
    let span = Duration::days(i64::from(chunk_days.max(1)) - 1);
    let mut chunks = Vec::new();
    let mut start = window.start;

    while start <= window.end {
        let end = start
            .checked_add_signed(span)
            .map_or(window.end, |d| d.min(window.end));
        chunks.push(DateWindow::new(start, end));

        match end.succ_opt() {
            Some(next) => start = next,
            None => break,
        }
    }

    chunks
}
