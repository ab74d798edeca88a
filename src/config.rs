// src/config.rs

use logging::{HostSink, LogFormat, StderrMode, SubscriberConfig};
use std::path::PathBuf;

use crate::plugin::PLUGIN_NAME;

/// Logging configuration for a plugin instance.
///
/// The defaults suit a plugin loaded into a host: nothing goes to stderr,
/// everything down to debug is handed to the host's log callback, and the
/// host decides what to show.
#[derive(Clone, Debug)]
pub struct PluginConfig {
    pub log_format: LogFormat,
    pub verbose: u8,
    pub quiet: bool,
    pub stderr: StderrMode,
    pub log_file: Option<(PathBuf, Option<LogFormat>)>,
    pub syslog: bool,
    pub colored: bool,
    pub timestamps: bool,
    pub host: Option<HostSink>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Text,
            verbose: 2,
            quiet: false,
            stderr: StderrMode::Off,
            log_file: None,
            syslog: false,
            colored: false,
            timestamps: false,
            host: None,
        }
    }
}

impl PluginConfig {
    /// Create a new builder for [`PluginConfig`].
    pub fn builder() -> PluginConfigBuilder {
        PluginConfigBuilder::default()
    }

    /// The subscriber configuration these settings translate to. Every
    /// destination logs under the plugin's name.
    pub fn subscriber_config(&self) -> SubscriberConfig {
        SubscriberConfig::builder()
            .format(self.log_format)
            .verbose(self.verbose)
            .quiet(self.quiet)
            .stderr(self.stderr)
            .log_file(self.log_file.clone())
            .syslog(self.syslog)
            .colored(self.colored)
            .timestamps(self.timestamps)
            .component(PLUGIN_NAME)
            .host(self.host.clone())
            .build()
    }
}

/// Builder for [`PluginConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct PluginConfigBuilder {
    cfg: PluginConfig,
}

impl PluginConfigBuilder {
    pub fn log_format(mut self, log_format: LogFormat) -> Self {
        self.cfg.log_format = log_format;
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.cfg.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.cfg.quiet = quiet;
        self
    }

    pub fn stderr(mut self, stderr: StderrMode) -> Self {
        self.cfg.stderr = stderr;
        self
    }

    pub fn log_file(mut self, log_file: Option<(PathBuf, Option<LogFormat>)>) -> Self {
        self.cfg.log_file = log_file;
        self
    }

    pub fn syslog(mut self, syslog: bool) -> Self {
        self.cfg.syslog = syslog;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.cfg.colored = colored;
        self
    }

    pub fn timestamps(mut self, timestamps: bool) -> Self {
        self.cfg.timestamps = timestamps;
        self
    }

    pub fn host(mut self, host: HostSink) -> Self {
        self.cfg.host = Some(host);
        self
    }

    pub fn build(self) -> PluginConfig {
        self.cfg
    }
}
