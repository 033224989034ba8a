// Library root: the orchestrator, the message protocol between it and the
// terminal UI, and the UI itself. Exposed so the binary and tests share them.

pub mod app;
pub mod protocol;
pub mod tui;
