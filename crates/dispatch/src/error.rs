// crates/dispatch/src/error.rs
use nix::errno::Errno;
use thiserror::Error;

/// The plugin cannot be activated with the configuration it was given.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no script_path specified in config file")]
    NoCommand,
    #[error("argument {index} contains a NUL byte")]
    Nul { index: usize },
    #[error("struct version was older than required ({found} < {required})")]
    StructVersion { found: i32, required: i32 },
}

/// A dispatch that failed before the caller committed to a deferred result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("fork failed: {}", .0.desc())]
    Spawn(Errno),
    #[error("environment entry {index} contains a NUL byte")]
    Environment { index: usize },
}

/// Failures inside the relay or worker. These only ever reach the log; the
/// affected process exits with [`FAILURE_EXIT_CODE`](crate::FAILURE_EXIT_CODE).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetachFailure<'a> {
    #[error("fork failed in relay: {}", .0.desc())]
    Fork(Errno),
    #[error("execve failed in worker: [{}]: [{path}]", .errno.desc())]
    Exec { errno: Errno, path: &'a str },
}
