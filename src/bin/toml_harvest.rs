use clap::Parser;
use jsonl_harvest::adapters::prompt::{AutoConfirm, StdinConfirm};
use jsonl_harvest::core::{ConfigProvider, Confirm};
use jsonl_harvest::utils::{logger, validation::Validate};
use jsonl_harvest::{format_bytes, EtlEngine, LocalStorage, RunOutcome, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-harvest")]
#[command(about = "jsonl-harvest driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "harvest.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// List the files that would be converted and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_with_level(config.log_level(), args.verbose, args.log_json);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_dir());
    let mut engine = EtlEngine::new_with_monitoring(config, monitor_enabled);

    if args.dry_run {
        perform_dry_run(&engine, &storage).await?;
        return Ok(());
    }

    let confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinConfirm)
    };

    match engine.run(storage, confirm.as_ref()).await {
        Ok(RunOutcome::Completed(summary)) => {
            tracing::info!("✅ Finished with {} failed files", summary.failed.len());
        }
        Ok(_) => {}
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Listing: {}", config.listing_url());
    println!("  Downloads: {}<path>", config.download_base_url());
    println!("  Output: {}", config.output_dir());
    println!(
        "  Retries: {} attempts, {:?} apart",
        config.max_retries(),
        config.retry_delay()
    );
    println!("  Timeout: {:?}", config.request_timeout());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(
    engine: &EtlEngine<TomlConfig>,
    storage: &LocalStorage,
) -> anyhow::Result<()> {
    use jsonl_harvest::core::Storage;
    use jsonl_harvest::domain::model::output_file_name;

    let files = engine.discover().await?;
    println!("🔍 Dry run: {} files would be processed", files.len());

    for path in &files {
        let name = output_file_name(path);
        match storage.existing_size(&name).await? {
            Some(size) => println!("  ⏭️  {} (already converted, {})", path, format_bytes(size)),
            None => println!("  ⬇️  {} -> {}", path, storage.location(&name)),
        }
    }

    Ok(())
}
