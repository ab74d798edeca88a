// crates/dispatch/src/os.rs
#![allow(unsafe_code)]

use nix::unistd::{ForkResult, fork};

/// Process creation used by the dispatcher.
///
/// Implementations other than [`SystemFork`] exist to inject failures in
/// tests. A child returned from [`Fork::fork`] may only fork again, `execve`,
/// log and leave through [`exit_now`].
pub trait Fork: Send + Sync {
    fn fork(&self) -> nix::Result<ForkResult>;
}

/// `fork(2)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemFork;

impl Fork for SystemFork {
    /// # Safety
    /// This wrapper is safe because it performs the raw `fork(2)` and returns
    /// immediately without touching shared state in the child. The caller is
    /// responsible for performing only async-signal-safe operations before
    /// `execve` or [`exit_now`].
    fn fork(&self) -> nix::Result<ForkResult> {
        // SAFETY: see above. The dispatcher's children run no destructors and
        // never return into the host.
        unsafe { fork() }
    }
}

/// Terminate the current process with `_exit(2)`.
///
/// Used by the relay and the worker: neither may run the host's `atexit`
/// handlers or flush stdio buffers it inherited.
pub fn exit_now(code: i32) -> ! {
    // SAFETY: `_exit` is async-signal-safe and takes no pointers.
    unsafe { nix::libc::_exit(code) }
}
