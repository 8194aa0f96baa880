use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use page_loader::cli::LoaderCommand;

#[tokio::main]
async fn main() {
    let args = LoaderCommand::parse();
    init_tracing(args.debug);

    match page_loader::load_page(&args.url, &args.output).await {
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            eprintln!("{} {}", "Error:".red(), err);
            std::process::exit(1);
        }
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "page_loader=debug"
    } else {
        "page_loader=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
