// Library root: the snake draft engine and its supporting pieces.
//
// The engine consumes a ranked list of source records and emits pick events;
// it never renders anything or reaches out to storage on its own.

pub mod config;
pub mod draft;
pub mod scheduler;
pub mod source;
