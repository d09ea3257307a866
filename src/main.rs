fn main() {
    if let Err(e) = accountdeck_lib::run() {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
