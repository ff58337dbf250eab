use apiprobe::cli::Cli;
use apiprobe::config::ProbeConfig;
use apiprobe::core::get_debug_logger;
use apiprobe::core::probe::{run_checks, suite_checks, IsahcApiClient, ProbeContext, Reporter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match main_impl().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}

async fn main_impl() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    // Configuration errors abort here, before any request is sent
    let config = ProbeConfig::load(&cli)?;

    if cli.print_config {
        config.print()?;
        return Ok(0);
    }

    let logger = get_debug_logger();
    logger.debug(
        "Main",
        "config_resolved",
        &format!(
            "base_url={} api_prefix={} timeout_ms={} suite={}",
            config.base_url, config.api_prefix, config.timeout_ms, config.suite
        ),
    );

    let client = match IsahcApiClient::new() {
        Ok(client) => client,
        Err(e) => {
            logger.error("Main", "client_init", &e.to_string());
            return Err(e.into());
        }
    };

    let mut reporter = Reporter::console(cli.quiet);
    reporter.banner(&config);
    if logger.is_enabled() {
        reporter.note(&format!("Debug log session: {}", logger.session_id()));
    }

    let checks = suite_checks(config.suite);
    let summary = {
        let mut ctx = ProbeContext::new(&client, &config, &logger, &mut reporter);
        run_checks(&checks, &mut ctx).await
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(summary.exit_code())
}
