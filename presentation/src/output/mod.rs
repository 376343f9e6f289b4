//! Output rendering for turns, history and sessions

pub mod console;
pub mod history;
pub mod json;
pub mod sessions;

#[cfg(test)]
pub(crate) mod testing;
