use anyhow::Context;
use clap::Parser;
use prefab_pricing_sim::app::report::{format_brl, ReportPresenter};
use prefab_pricing_sim::config::toml_config::LogFormat;
use prefab_pricing_sim::utils::{logger, validation::validate_required_field, validation::Validate};
use prefab_pricing_sim::{
    Catalog, CliConfig, CsvCatalogSource, PricingEngine, SimError, Simulator, TomlConfig,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };
    config.apply_cli(&cli);

    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting prefab-pricing-sim");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let catalog_path = match validate_required_field("catalog.path", &config.catalog.path) {
        Ok(path) => path.clone(),
        Err(e) => fail(&e),
    };
    let delimiter = config.catalog_delimiter()?;

    let catalog = match Catalog::load(CsvCatalogSource::new(&catalog_path).with_delimiter(delimiter)) {
        Ok(catalog) => catalog,
        Err(e) => fail(&e),
    };

    if cli.list {
        let kits = catalog.find_kits(cli.search.as_deref());
        if kits.is_empty() {
            fail(&SimError::NoMatch {
                term: cli.search.clone().unwrap_or_default(),
            });
        }
        for kit in kits {
            println!("{:<12} {:<40} {}", kit.code, kit.description, format_brl(kit.list_price));
        }
        return Ok(());
    }

    let simulator = Simulator::new(catalog, PricingEngine::new(config.pricing.clone()))
        .with_limits(config.input.clone());
    let presenter = ReportPresenter::new(config);

    match simulator.run(&cli.to_request()) {
        Ok(report) => {
            tracing::info!(
                "✅ Simulated {} at {}% ({})",
                report.kit.code,
                report.discount_percent,
                report.payment_method
            );
            println!("{}", presenter.render(&report)?);
            if cli.share {
                println!();
                println!("🔗 {}", presenter.share_link(&report)?);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &SimError) -> ! {
    tracing::error!(
        "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}
