use clap::Parser;
use horizon_csv::domain::ports::ConfigProvider;
use horizon_csv::utils::{logger, validation::Validate};
use horizon_csv::{
    CliConfig, EtlEngine, HorizonClient, Interrupt, LocalStorage, RunOptions, TransactionPipeline,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.chain());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(config.log_path(), cli.verbose);
    tracing::debug!("Export config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = match HorizonClient::with_timeout(config.base_url(), config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Cannot build HTTP client: {}", e.chain());
            std::process::exit(1);
        }
    };

    let interrupt = Interrupt::listen_for_ctrl_c();
    let storage = LocalStorage::new(config.output_path());
    let pipeline = TransactionPipeline::new(client, storage, &config, interrupt);
    let engine = EtlEngine::new(pipeline, RunOptions::from_config(&config));

    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ Exported {} rows from {} pages to {}",
                summary.rows,
                summary.pages,
                config.output_path().display()
            );
        }
        Err(e) if e.is_interrupt() => {
            tracing::info!("KeyboardInterrupt, stopping");
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            tracing::error!("❌ Export failed: {}", e.chain());
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
