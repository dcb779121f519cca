fn main() {
    #[cfg(feature = "cli")]
    rundelta::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("rundelta: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
