use std::{process::ExitCode, sync::Arc};

use bambam_core::{config::Config, ports::Ledger, resources::StaticTexts};
use bambam_sqlite::SqliteLedger;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = bambam_core::logging::init("bambam") {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), bambam_core::Error> {
    let cfg = Arc::new(Config::load()?);
    let texts = Arc::new(StaticTexts::load(&cfg)?);

    let sqlite = SqliteLedger::connect(&cfg.db_path).await?;
    let ledger: Arc<dyn Ledger> = Arc::new(sqlite.clone());

    let res = bambam_telegram::router::run_polling(cfg, texts, ledger)
        .await
        .map_err(|e| bambam_core::Error::External(format!("telegram bot failed: {e}")));

    sqlite.close().await;
    res
}
