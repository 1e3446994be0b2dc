use clap::Parser;
use link_viewer::app::headless::{self, ViewerReport};
use link_viewer::core::FetchStatus;
use link_viewer::utils::{logger, validation::Validate};
use link_viewer::{CliConfig, OutputFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting link-viewer");

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    let report = match headless::run(&config, cli.start).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("❌ Viewer failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }

    if report.fetch == FetchStatus::Failed {
        std::process::exit(3);
    }
    Ok(())
}

fn print_text(report: &ViewerReport) {
    let Some(gallery) = &report.gallery else {
        println!("❌ Link list could not be fetched");
        return;
    };

    println!(
        "🖼️ {} images ({} loaded, {} failed)",
        gallery.total, gallery.loaded, gallery.failed
    );
    for (index, item) in gallery.items.iter().enumerate() {
        let mark = if item.loaded() {
            "✅"
        } else if item.failed() {
            "⚠️"
        } else {
            "⏳"
        };
        println!("{:>4} {} {}", index, mark, item.url);
    }

    if let Some(walk) = &report.walk {
        println!("👉 from {} swipe left: {:?}", walk.start, walk.forward);
        println!("👈 from {} swipe right: {:?}", walk.start, walk.backward);
    }
}
