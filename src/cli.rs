use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "page-loader",
    about = "Page loader utility",
    version,
    long_about = "Downloads a web page into the output directory together with its local images, \
stylesheets, scripts, and linked pages, rewriting the saved markup to reference the local copies."
)]
pub struct LoaderCommand {
    /// The URL of the page to download
    #[arg(required = true)]
    pub url: String,

    /// Output directory for the saved page and its resources
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}
