use clap::Parser;
use tracing_subscriber::EnvFilter;

use graphql_typegen::cli::Args;
use graphql_typegen::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let output = args.command.run(&config, args.format)?;
    println!("{}", output);
    Ok(())
}
