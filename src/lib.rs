// src/lib.rs
//! Deferred authentication plugin.
//!
//! The host opens the plugin with the path of a verification command, then
//! calls [`Plugin::invoke`] for every authentication attempt. The command is
//! started fully detached and the host is told the result is deferred; the
//! command later writes its verdict to the control file named in its
//! environment.
//!
//! ```no_run
//! use auth_script::{Environment, EventType, MIN_STRUCT_VERSION, Plugin, PluginConfig, Status};
//!
//! let opened = Plugin::open_with_config(
//!     MIN_STRUCT_VERSION,
//!     ["auth-script.so", "/etc/openvpn/verify-totp"],
//!     &PluginConfig::default(),
//! )
//! .unwrap();
//! let env = Environment::from_envp(["username=alice", "auth_control_file=/tmp/acf"]);
//! let status = opened
//!     .plugin
//!     .invoke(MIN_STRUCT_VERSION, EventType::AuthUserPassVerify, &env);
//! assert_eq!(status, Status::Deferred);
//! opened.plugin.close();
//! ```

mod config;
pub mod plugin;

pub use config::{PluginConfig, PluginConfigBuilder};
pub use dispatch::{ConfigError, DispatchError, Environment, LaunchContext};
pub use plugin::{
    EventType, MIN_PLUGIN_VERSION, MIN_STRUCT_VERSION, OpenError, Opened, PLUGIN_NAME, Plugin,
    Status, min_version_required,
};
