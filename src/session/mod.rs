pub mod act;
pub mod commands;
pub mod waiter;

#[cfg(test)]
pub(crate) mod fake;

pub use act::{NextStep, act, next_step};
pub use waiter::{Outcome, Phase, Step, WaitOptions, WaitState, wait_for_turn};
