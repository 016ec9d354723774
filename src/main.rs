use clap::Parser;
use jsonl_harvest::adapters::prompt::{AutoConfirm, StdinConfirm};
use jsonl_harvest::core::{ConfigProvider, Confirm};
use jsonl_harvest::utils::{logger, validation::Validate};
use jsonl_harvest::{CliConfig, EtlEngine, LocalStorage, RunOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting jsonl-harvest");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let confirm: Box<dyn Confirm> = if config.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinConfirm)
    };
    let storage = LocalStorage::new(config.output_dir());
    let monitor_enabled = config.monitor;
    let mut engine = EtlEngine::new_with_monitoring(config, monitor_enabled);

    match engine.run(storage, confirm.as_ref()).await {
        Ok(RunOutcome::Completed(summary)) => {
            tracing::info!("✅ Finished with {} failed files", summary.failed.len());
        }
        Ok(RunOutcome::NothingToDo) | Ok(RunOutcome::Declined { .. }) => {}
        Err(e) => {
            tracing::error!(
                "❌ Run aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
