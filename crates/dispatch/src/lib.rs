// crates/dispatch/src/lib.rs
//! Detached launching of an external verification command.
//!
//! A [`LaunchContext`] is built once from the plugin configuration. Each
//! verification event then goes through [`Dispatcher::dispatch`], which starts
//! the command through a double fork and returns as soon as the intermediate
//! relay process has exited. Completion is reported by the command itself,
//! out of band, never through the dispatcher.

mod context;
mod dispatcher;
mod env;
mod error;
mod os;

pub use context::LaunchContext;
pub use dispatcher::{DispatchState, Dispatcher, FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE};
pub use env::Environment;
pub use error::{ConfigError, DetachFailure, DispatchError};
pub use os::{Fork, SystemFork, exit_now};

pub use nix::errno::Errno;
pub use nix::unistd::ForkResult;
