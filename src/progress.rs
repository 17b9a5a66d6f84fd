// src/progress.rs
/// Lightweight progress reporting used by the ingestion run.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of pages planned (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one tournament day has been fetched and parsed.
    fn item_done(&mut self, _day: u32) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
