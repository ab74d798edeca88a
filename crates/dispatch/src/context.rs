// crates/dispatch/src/context.rs
use std::ffi::{CStr, CString};

use tracing::{Dispatch, debug, dispatcher, error};

use crate::error::ConfigError;

/// What to run and where to log, fixed for the lifetime of the plugin.
///
/// `argv()[0]` is the command path. The `execve` argument array is built
/// here, once, so that dispatches never have to rebuild it. The context is
/// never mutated after construction and is shared freely between concurrent
/// dispatches.
#[derive(Debug)]
pub struct LaunchContext {
    argv: Vec<String>,
    exec_argv: Vec<CString>,
    logger: Dispatch,
}

impl LaunchContext {
    /// Build a context from the plugin's configuration arguments. Index 0
    /// names the plugin itself and is skipped; index 1 is the command and
    /// the rest are its arguments.
    pub fn from_plugin_args<I, S>(args: I, logger: Dispatch) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(args.into_iter().skip(1).map(Into::into).collect(), logger)
    }

    pub fn new(argv: Vec<String>, logger: Dispatch) -> Result<Self, ConfigError> {
        dispatcher::with_default(&logger, || -> Result<Vec<CString>, ConfigError> {
            let exec_argv = build_exec_argv(&argv).inspect_err(|err| error!("{err}"))?;
            debug!("script_path={}", argv[0]);
            Ok(exec_argv)
        })
        .map(|exec_argv| Self {
            argv,
            exec_argv,
            logger,
        })
    }

    pub fn command_path(&self) -> &str {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn logger(&self) -> &Dispatch {
        &self.logger
    }

    pub(crate) fn exec_path(&self) -> &CStr {
        &self.exec_argv[0]
    }

    pub(crate) fn exec_argv(&self) -> &[CString] {
        &self.exec_argv
    }
}

fn build_exec_argv(argv: &[String]) -> Result<Vec<CString>, ConfigError> {
    if argv.first().is_none_or(|path| path.is_empty()) {
        return Err(ConfigError::NoCommand);
    }
    argv.iter()
        .enumerate()
        .map(|(index, arg)| CString::new(arg.as_bytes()).map_err(|_| ConfigError::Nul { index }))
        .collect()
}
