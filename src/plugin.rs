// src/plugin.rs
//! Host-facing plugin lifecycle: `open`, `invoke`, `close`.

use std::io;

use clap::ValueEnum;
use dispatch::{ConfigError, Dispatcher, Environment, Fork, LaunchContext, SystemFork};
use thiserror::Error;
use tracing::{Dispatch, debug, dispatcher, error, info};

use crate::config::PluginConfig;

/// Component name attached to every log line.
pub const PLUGIN_NAME: &str = "auth-script";

/// Oldest plugin API version this plugin can be loaded by.
pub const MIN_PLUGIN_VERSION: i32 = 3;

/// Oldest layout of the open/invoke argument structures that is accepted.
pub const MIN_STRUCT_VERSION: i32 = 5;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_REVISION: &str = match option_env!("BUILD_REVISION") {
    Some(v) => v,
    None => "unknown",
};
const BUILD_TIME: &str = match option_env!("BUILD_TIME") {
    Some(v) => v,
    None => "unknown",
};

/// Events a host can deliver to a plugin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum EventType {
    Up,
    Down,
    RouteUp,
    IpChange,
    TlsVerify,
    AuthUserPassVerify,
    ClientConnect,
    ClientDisconnect,
    LearnAddress,
    ClientConnectV2,
    TlsFinal,
    RoutePredown,
    ClientConnectDefer,
    ClientConnectDeferV2,
    ClientCrresponse,
}

impl EventType {
    pub const fn code(self) -> u32 {
        match self {
            EventType::Up => 0,
            EventType::Down => 1,
            EventType::RouteUp => 2,
            EventType::IpChange => 3,
            EventType::TlsVerify => 4,
            EventType::AuthUserPassVerify => 5,
            EventType::ClientConnect => 6,
            EventType::ClientDisconnect => 7,
            EventType::LearnAddress => 8,
            EventType::ClientConnectV2 => 9,
            EventType::TlsFinal => 10,
            EventType::RoutePredown => 12,
            EventType::ClientConnectDefer => 13,
            EventType::ClientConnectDeferV2 => 14,
            EventType::ClientCrresponse => 15,
        }
    }

    pub const fn mask(self) -> u32 {
        1 << self.code()
    }
}

/// What `invoke` tells the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// The event is not one this plugin handles.
    Success,
    Error,
    /// The command was launched; the verdict arrives out of band.
    Deferred,
}

impl Status {
    pub const fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Error => 1,
            Status::Deferred => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
            Status::Deferred => "deferred",
        }
    }
}

#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot set up logging: {0}")]
    Logging(#[from] io::Error),
}

/// API version the host must at least speak.
pub const fn min_version_required() -> i32 {
    MIN_PLUGIN_VERSION
}

/// A plugin returned from [`Plugin::open`] together with the events it asks
/// the host to deliver.
#[derive(Debug)]
pub struct Opened<F = SystemFork> {
    pub plugin: Plugin<F>,
    pub type_mask: u32,
}

/// One loaded instance of the plugin. The host owns it, calls
/// [`invoke`](Plugin::invoke) from as many threads as it likes and finally
/// hands it back to [`close`](Plugin::close).
#[derive(Debug)]
pub struct Plugin<F = SystemFork> {
    context: LaunchContext,
    dispatcher: Dispatcher<F>,
}

impl Plugin {
    /// Open the plugin. `args[0]` names the plugin itself, `args[1]` is the
    /// verification command and the rest are passed on to it.
    pub fn open<I, S>(struct_version: i32, args: I, logger: Dispatch) -> Result<Opened, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        dispatcher::with_default(&logger, || {
            debug!("FUNC: open");
            info!("Version: [{VERSION}]");
            info!("Commit Hash: [{BUILD_REVISION}]");
            info!("Build Time: [{BUILD_TIME}]");
            check_struct_version(struct_version)
        })?;

        let context = LaunchContext::from_plugin_args(args, logger)?;
        dispatcher::with_default(context.logger(), || {
            debug!("plugin initialized successfully");
        });
        Ok(Opened {
            plugin: Plugin {
                context,
                dispatcher: Dispatcher::new(),
            },
            type_mask: EventType::AuthUserPassVerify.mask(),
        })
    }

    /// Like [`Plugin::open`], building the logger from `cfg`.
    pub fn open_with_config<I, S>(
        struct_version: i32,
        args: I,
        cfg: &PluginConfig,
    ) -> Result<Opened, OpenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let logger = logging::dispatch(cfg.subscriber_config())?;
        Ok(Self::open(struct_version, args, logger)?)
    }
}

impl<F: Fork> Plugin<F> {
    /// Replace the process-creation primitive used for dispatches.
    pub fn with_fork<G: Fork>(self, fork: G) -> Plugin<G> {
        Plugin {
            context: self.context,
            dispatcher: Dispatcher::with_fork(fork),
        }
    }

    pub fn context(&self) -> &LaunchContext {
        &self.context
    }

    /// Handle one event. Only [`EventType::AuthUserPassVerify`] launches the
    /// command; everything else is acknowledged with [`Status::Success`].
    pub fn invoke(&self, struct_version: i32, event: EventType, env: &Environment) -> Status {
        dispatcher::with_default(self.context.logger(), || {
            debug!("FUNC: invoke");
            if check_struct_version(struct_version).is_err() {
                return Status::Error;
            }
            if event != EventType::AuthUserPassVerify {
                return Status::Success;
            }
            debug!("Handling auth with deferred script");
            match self.dispatcher.dispatch(&self.context, env) {
                Ok(()) => Status::Deferred,
                Err(_) => Status::Error,
            }
        })
    }

    /// Release the plugin. Launched commands are not tracked and keep running.
    pub fn close(self) {
        dispatcher::with_default(self.context.logger(), || debug!("plugin closed"));
    }
}

fn check_struct_version(found: i32) -> Result<(), ConfigError> {
    if found < MIN_STRUCT_VERSION {
        let err = ConfigError::StructVersion {
            found,
            required: MIN_STRUCT_VERSION,
        };
        error!("{err}");
        return Err(err);
    }
    Ok(())
}
