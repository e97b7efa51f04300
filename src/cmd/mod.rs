//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], or [`health`]. Each
//! handler lives in its own submodule.

pub mod health;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::MulticasterError;

pub async fn dispatch(cli: Cli) -> Result<(), MulticasterError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  multicaster v{version} \u{2014} HTTP request multicasting proxy\n\n  \
         No command provided. To get started:\n\n    \
         multicaster run --backends b1:80,b2:80    Multicast every request to two backends\n    \
         multicaster run -c multicaster.yaml       Start with a config file\n    \
         multicaster validate multicaster.yaml     Check a config file\n    \
         multicaster --help                        See all commands and options\n"
    );
}
