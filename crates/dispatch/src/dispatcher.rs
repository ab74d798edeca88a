// crates/dispatch/src/dispatcher.rs
//! Double-fork launch of the configured command.
//!
//! Three processes take part in a dispatch:
//!
//! * the **caller** (the host) forks the relay and waits for it;
//! * the **relay** forks the worker and exits at once;
//! * the **worker**, orphaned by the relay's exit and adopted by the
//!   process-tree root, `execve`s the command.
//!
//! The caller therefore only ever waits for a process whose whole life is a
//! single `fork`, and the worker is reaped by whoever adopts it rather than by
//! the host. The worker's exit status is never collected here; the command
//! reports its verdict through its environment (e.g. `auth_control_file`).
//!
//! The relay and the worker log only when they fail. Their `error!` callsites
//! are first registered inside the child, under `tracing`'s global callsite
//! lock. A child forked while another host thread holds that lock blocks.

use std::ffi::CString;

use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execve};
use tracing::{debug, dispatcher, error};

use crate::context::LaunchContext;
use crate::env::Environment;
use crate::error::{DetachFailure, DispatchError};
use crate::os::{Fork, SystemFork, exit_now};

pub const SUCCESS_EXIT_CODE: i32 = 0;
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Caller-visible progress of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    RelaySpawned,
    Pending,
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher<F = SystemFork> {
    fork: F,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { fork: SystemFork }
    }
}

impl<F: Fork> Dispatcher<F> {
    pub fn with_fork(fork: F) -> Self {
        Self { fork }
    }

    /// Launch `ctx`'s command with `env` as its complete environment.
    ///
    /// Returns `Ok(())` (pending) once the relay has exited; the command
    /// itself may still be running, may not have started yet, or may have
    /// failed to `execve`. The only error is a failure that happens before
    /// anything was detached. Every failure is logged through the context's
    /// logger.
    pub fn dispatch(&self, ctx: &LaunchContext, env: &Environment) -> Result<(), DispatchError> {
        dispatcher::with_default(ctx.logger(), || self.run(ctx, env))
    }

    fn run(&self, ctx: &LaunchContext, env: &Environment) -> Result<(), DispatchError> {
        let mut state = DispatchState::Idle;
        debug!(
            "Deferred handler using script_path={}",
            ctx.command_path()
        );
        let envp = env.to_cstrings().inspect_err(|err| error!("{err}"))?;

        let relay = match self.fork.fork() {
            Ok(ForkResult::Parent { child }) => child,
            Ok(ForkResult::Child) => self.relay(ctx, &envp),
            Err(errno) => {
                let err = DispatchError::Spawn(errno);
                error!("{err}");
                return Err(err);
            }
        };
        state = advance(state, DispatchState::RelaySpawned);

        match wait_for(relay) {
            Ok(WaitStatus::Exited(_, SUCCESS_EXIT_CODE)) => {
                debug!("relay {relay} exited, worker detached");
            }
            Ok(status) => error!("relay {relay} did not detach the worker: {status:?}"),
            Err(errno) => error!("waitpid on relay {relay} failed: {}", errno.desc()),
        }
        state = advance(state, DispatchState::Pending);
        debug_assert_eq!(state, DispatchState::Pending);
        Ok(())
    }

    fn relay(&self, ctx: &LaunchContext, envp: &[CString]) -> ! {
        match self.fork.fork() {
            Ok(ForkResult::Parent { .. }) => exit_now(SUCCESS_EXIT_CODE),
            Ok(ForkResult::Child) => worker(ctx, envp),
            Err(errno) => {
                error!("{}", DetachFailure::Fork(errno));
                exit_now(FAILURE_EXIT_CODE)
            }
        }
    }
}

fn worker(ctx: &LaunchContext, envp: &[CString]) -> ! {
    let errno = match execve(ctx.exec_path(), ctx.exec_argv(), envp) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };
    let failure = DetachFailure::Exec {
        errno,
        path: ctx.command_path(),
    };
    error!("{failure}");
    exit_now(FAILURE_EXIT_CODE)
}

fn wait_for(pid: Pid) -> nix::Result<WaitStatus> {
    loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => continue,
            other => return other,
        }
    }
}

fn advance(from: DispatchState, to: DispatchState) -> DispatchState {
    debug_assert!(matches!(
        (from, to),
        (DispatchState::Idle, DispatchState::RelaySpawned)
            | (DispatchState::RelaySpawned, DispatchState::Pending)
    ));
    to
}
