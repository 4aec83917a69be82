//! Sample aggregation
//!
//! Samples arrive at the poll rate; the history graph advances at a slower
//! rate. The window averages a fixed batch of readings into one history
//! point.

pub mod history;
pub mod window;

pub use history::{History, HistorySeries, HISTORY_LEN};
pub use window::{ReadingWindow, AVERAGE_WINDOW};
