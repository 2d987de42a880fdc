pub mod board_display;
pub mod compressed_actions;
pub mod delta;
pub mod error;
pub mod format;

pub use compressed_actions::{ActionGroup, ActionSummary, render_actions, summarize};
pub use error::CliError;
pub use format::{Report, eprint_report, print_report};
