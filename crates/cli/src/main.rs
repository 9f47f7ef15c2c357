fn main() {
    if let Err(e) = splitdex_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
