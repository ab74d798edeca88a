// src/bin/auth-script-host.rs
//! Minimal host: opens the plugin, delivers one event and prints the status.

use std::path::PathBuf;

use auth_script::{Environment, EventType, MIN_STRUCT_VERSION, Plugin, PluginConfig, Status};
use clap::{ArgAction, Parser};
use logging::{LogFormat, StderrMode};

#[derive(Parser, Debug)]
#[command(name = "auth-script-host", version)]
#[command(about = "Run a verification command through the auth-script plugin", long_about = None)]
struct Opts {
    /// add KEY=VALUE to the command's environment
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_entry, help_heading = "Environment")]
    env: Vec<(String, String)>,
    /// start from this process's environment instead of an empty one
    #[arg(long, help_heading = "Environment")]
    inherit_env: bool,
    /// event delivered to the plugin
    #[arg(long, value_enum, default_value = "auth-user-pass-verify")]
    event: EventType,
    #[arg(long = "log-format", value_enum, default_value = "text", help_heading = "Output")]
    log_format: LogFormat,
    #[arg(short, long, action = ArgAction::Count, help_heading = "Output")]
    verbose: u8,
    #[arg(short, long, help_heading = "Output")]
    quiet: bool,
    #[arg(long = "log-file", value_name = "FILE", help_heading = "Output")]
    log_file: Option<PathBuf>,
    #[arg(long, help_heading = "Output")]
    syslog: bool,
    #[arg(long, help_heading = "Output")]
    timestamps: bool,
    /// verification command and its arguments
    #[arg(last = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn parse_env_entry(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err("empty variable name".to_string()),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

fn main() {
    let opts = Opts::parse();
    let cfg = PluginConfig::builder()
        .log_format(opts.log_format)
        .verbose(opts.verbose)
        .quiet(opts.quiet)
        .stderr(StderrMode::All)
        .log_file(opts.log_file.map(|path| (path, None)))
        .syslog(opts.syslog)
        .timestamps(opts.timestamps)
        .build();

    let args = std::iter::once(env!("CARGO_BIN_NAME").to_string()).chain(opts.command);
    let opened = match Plugin::open_with_config(MIN_STRUCT_VERSION, args, &cfg) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let mut env = if opts.inherit_env {
        Environment::from_current()
    } else {
        Environment::new()
    };
    for (key, value) in &opts.env {
        env.insert(key, value);
    }

    let status = opened.plugin.invoke(MIN_STRUCT_VERSION, opts.event, &env);
    println!("{}", status.as_str());
    opened.plugin.close();
    std::process::exit(if status == Status::Error { 1 } else { 0 });
}
