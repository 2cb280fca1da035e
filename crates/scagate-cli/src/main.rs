use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use scagate_core::gate::exit_codes;
use scagate_core::report::model::ToolInfo;

mod args;
mod commands;

fn main() -> Result<()> {
    // Usage errors share the infrastructure exit code; 2 means a policy failure.
    let args = match args::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() {
                exit_codes::INFRA
            } else {
                exit_codes::PASS
            });
        }
    };

    // stdout carries arguments and reports; logs go to stderr.
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let tool_info = |commit: Option<String>| ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit,
    };

    let exit_code = match args.command {
        args::Command::Compile(a) => {
            let tool = tool_info(a.commit.clone());
            commands::compile(a, tool)?
        }
        args::Command::Gate(a) => {
            let tool = tool_info(a.commit.clone());
            commands::gate(a, tool)?
        }
        args::Command::Catalog(a) => commands::catalog(a)?,
    };

    std::process::exit(exit_code);
}
