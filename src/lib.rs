//! Keyboard-driven quick-pick file browser.
//!
//! The navigation core ([`browser`], [`session`]) talks to its host only
//! through the [`fs::FileSystem`], [`host::Editor`] and [`host::PickList`]
//! traits; [`tui`] is the terminal implementation of those traits.

pub mod browser;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod host;
pub mod ignore;
pub mod path;
pub mod session;
pub mod tui;

#[cfg(test)]
mod testing;
