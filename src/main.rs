use clap::Parser;

use gramview::app::GalleryConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gramview=info".parse().unwrap()),
        )
        .init();

    let config = GalleryConfig::parse();
    if let Err(err) = gramview::run(config) {
        tracing::error!("fatal: {err:#}");
        std::process::exit(1);
    }
}
