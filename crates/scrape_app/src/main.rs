use clap::Parser;
use log::LevelFilter;
use scrape_app::{App, Cli};
use scrape_logging::{scrape_error, LogDestination};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    scrape_logging::initialize(destination, level);

    let mut app = App::from_cli(&cli)?;
    let result = app.run(cli.command).await;

    for line in app.drain_notifications() {
        println!("{line}");
    }
    match result {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            scrape_error!("{:#}", err);
            Err(err)
        }
    }
}
