use gamedex::{Config, run};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if config.general.worker_threads > 0 {
        builder.worker_threads(config.general.worker_threads);
    }

    builder.build()?.block_on(run(config))
}
