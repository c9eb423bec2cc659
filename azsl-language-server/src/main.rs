mod server;

fn main() {
    // stdout carries the protocol, logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    log::info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if let Err(err) = server::run() {
        log::error!("Server stopped: {:#}", err);
        std::process::exit(1);
    }
    log::info!("Server shut down");
}
