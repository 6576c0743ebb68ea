// Infrastructure: command line entry point and logging setup

pub mod cli;

pub use cli::{init_tracing, run, Cli};
