pub mod arity;
pub mod cap;
pub mod cascade;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod document;
pub mod error;
pub mod family;
pub mod interval;
pub mod ir;
pub mod logger;
pub mod lower;
pub mod naming;
pub mod output;
pub mod plan;
pub mod varg;

use std::process::ExitCode;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
