use anyhow::Result;
use argh::FromArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vidsort::{Config, Interpreter, Session};

#[derive(FromArgs)]
/// Interactive shell for tidying up a directory of video footage.
struct Args {
    #[argh(option)]
    /// path to a JSON configuration file replacing the built-in one
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::builtin()?,
    };

    println!("{}", config.header.join("\n"));

    let mut shell = Interpreter::new(Session::new(config));
    shell.repl()
}
