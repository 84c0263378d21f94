//! Query history: a JSONL log of every submitted search and a reporter
//! that summarizes it.

pub mod logger;
pub mod reporter;
