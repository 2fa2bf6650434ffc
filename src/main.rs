// keyproof - CLI

use clap::Parser;
use keyproof::{Cli, CliHandler};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match CliHandler::new().handle(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
