use clap::Parser;
use invoice_etl::config::cli::{Command, ProcessArgs};
use invoice_etl::config::env;
use invoice_etl::config::toml_config::TomlConfig;
use invoice_etl::core::export::render_summary;
use invoice_etl::core::pdf::{preview_text, PREVIEW_CHARS};
use invoice_etl::launcher::{self, runner::SystemRunner};
use invoice_etl::utils::{logger, validation::Validate};
use invoice_etl::{
    CliConfig, EtlEngine, GeminiClient, InvoiceError, InvoicePipeline, Launcher, LocalStorage,
};

fn report_error(context: &str, e: &InvoiceError) {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let file_config = match TomlConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error("Failed to load configuration", &e);
            std::process::exit(1);
        }
    };
    if let Err(e) = file_config.validate() {
        report_error("Configuration validation failed", &e);
        std::process::exit(1);
    }

    let code = match cli.command {
        Command::Launch(args) => {
            let settings = args.into_settings(&file_config);
            tracing::info!("Launching from {}", settings.app_dir.display());

            let api_key_set = launcher::api_key_in_env();
            let mut app_launcher =
                Launcher::new(settings, SystemRunner, std::io::stdout(), api_key_set);
            match tokio::task::spawn_blocking(move || app_launcher.run()).await? {
                Ok(code) => code,
                Err(e) => {
                    report_error("Launch failed", &e);
                    e.exit_code()
                }
            }
        }
        Command::Process(args) => run_process(args, &file_config).await,
        Command::Check => run_check(),
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn load_environment() {
    match std::env::current_dir() {
        Ok(dir) => {
            if let Err(e) = env::load_dotenv(&dir) {
                tracing::warn!("Ignoring unreadable .env: {}", e);
            }
        }
        Err(e) => tracing::warn!("Cannot determine working directory: {}", e),
    }
}

async fn run_process(args: ProcessArgs, file_config: &TomlConfig) -> i32 {
    load_environment();
    let config = args.into_config(file_config, env::resolve_api_key());

    if let Err(e) = config.validate() {
        report_error("Configuration validation failed", &e);
        return e.exit_code();
    }

    let client = match GeminiClient::new(&config.gemini) {
        Ok(client) => client,
        Err(e) => {
            report_error("Could not create Gemini client", &e);
            return e.exit_code();
        }
    };
    if !client.is_configured() {
        tracing::warn!("⚠️  GEMINI_API_KEY is not configured, analysis will fail");
    }

    let show_text = config.show_text;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = InvoicePipeline::new(storage, config, client);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            for doc in &report.result.analyzed {
                if show_text {
                    println!("----- {} -----", doc.document.file_name());
                    println!("{}", preview_text(&doc.document.text, PREVIEW_CHARS));
                }
                println!("{}", render_summary(doc));
            }

            let extracted = report.result.extracted_count();
            println!(
                "✅ Extracted {} of {} invoice(s)",
                extracted,
                report.result.analyzed.len()
            );
            println!("📁 Output saved to: {}", report.output_path);

            report.exit_code()
        }
        Err(e) => {
            report_error("Invoice processing failed", &e);
            e.exit_code()
        }
    }
}

fn run_check() -> i32 {
    load_environment();
    let check = env::SetupCheck::new(env::resolve_api_key().as_deref());
    for line in check.lines() {
        println!("{}", line);
    }
    check.exit_code()
}
