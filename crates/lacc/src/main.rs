//! lacc entry point.

fn main() {
    if let Err(e) = lacc::cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
