use clap::Parser;
use env_logger::Target;
use eyre::{Report, Result};
use fgc::cfg::ConfigSpec;
use fgc::cli::Cli;
use fgc::ports::{HttpSdkFetcher, RealFs};
use log::info;
use std::io::Write;

fn setup_logging() -> Result<(), Report> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"))
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.args()
            )
        })
        .try_init()?;

    Ok(())
}

async fn run(cli: Cli) -> Result<(), Report> {
    let config = cli.apply_overrides(ConfigSpec::discover(cli.config.as_deref())?);
    let fetcher = HttpSdkFetcher::new(atty::is(atty::Stream::Stderr));

    cli.execute(&config, fetcher, &RealFs).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = setup_logging() {
        eprintln!("Failed to setup logging: {e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();
    info!("Starting fgc");

    if let Err(e) = run(cli).await {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}
