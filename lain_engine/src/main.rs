use anyhow::Result;

mod cli;
mod runtime;

fn main() -> Result<()> {
    let args = cli::parse()?;
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    runtime::execute(args)
}
