use clap::Parser;
use radtree::app::{AppConfig, RadialTreeApp};

fn main() {
    let _ = env_logger::builder().format_timestamp(None).try_init();

    let config = AppConfig::parse();
    if let Err(err) = RadialTreeApp::run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
