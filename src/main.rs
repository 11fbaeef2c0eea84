use std::process;

fn main() {
    if let Err(e) = stagehand::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
