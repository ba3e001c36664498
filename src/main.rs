use clap::Parser;
use dose_engine::adapters::build_catalog;
use dose_engine::utils::error::ErrorSeverity;
use dose_engine::utils::{logger, validation::Validate};
use dose_engine::{CliConfig, DoseEngine, DoseError, EngineSettings, TomlConfig};

fn exit_code(e: &DoseError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 4,      // 找不到藥品
        ErrorSeverity::Medium => 2,   // 藥品目錄暫時無法使用
        ErrorSeverity::High => 1,     // 參數或設定錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

fn fail(e: &DoseError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (可選)
    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 初始化日誌
    let verbose = cli.verbose || file_config.as_ref().is_some_and(|c| c.verbose_logging());
    if cli.json_logs || file_config.as_ref().is_some_and(|c| c.json_logging()) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting dose-calc");

    // 驗證配置
    if let Err(e) = cli.validate() {
        fail(&e);
    }

    let source = cli
        .catalog_source(file_config.as_ref())
        .unwrap_or_else(|e| fail(&e));
    tracing::debug!("Catalog source: {:?}", source);

    let catalog = build_catalog(&source).unwrap_or_else(|e| fail(&e));
    let settings = file_config
        .as_ref()
        .map(|c| c.engine_settings())
        .unwrap_or_else(EngineSettings::default);
    let engine = DoseEngine::with_settings(catalog, settings);

    let params = cli.patient_parameters();

    // 單一藥品：錯誤直接回報；多個藥品：略過失敗項目
    let output = if let [drug_id] = cli.drugs.as_slice() {
        match engine.calculate_drug_dose(drug_id, &params).await {
            Ok(Some(result)) => serde_json::to_string_pretty(&result)?,
            Ok(None) => {
                eprintln!("❌ No dose could be calculated for '{}'", drug_id);
                std::process::exit(2);
            }
            Err(e) => fail(&e),
        }
    } else {
        let results = engine.calculate_multiple_drug_doses(&cli.drugs, &params).await;
        if results.len() < cli.drugs.len() {
            tracing::warn!(
                "⚠️ {} of {} drugs produced no result",
                cli.drugs.len() - results.len(),
                cli.drugs.len()
            );
        }
        serde_json::to_string_pretty(&results)?
    };

    println!("{}", output);
    tracing::info!("✅ Dose calculation completed");

    Ok(())
}
