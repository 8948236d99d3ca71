use clap::Parser;
use std::process;
use wdf_converter::cli::{self, Args};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Err(error) = cli::setup_logging(&args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }

    match cli::run(&args) {
        Ok(_report) => {
            // Success - the report has already been printed
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(error.exit_code());
        }
    }
}
