use crate::ai::ai_model::JobContext;
use crate::ai::client::{AiClient, HttpAiClient};
use crate::browser::driver::PageDriver;
use crate::browser::session::BrowserSession;
use crate::classify::classifier::classify_all;
use crate::classify::classify_model::ClassifiedField;
use crate::cli::config::{build_settings, AppConfig};
use crate::dom::node::ExtractedPage;
use crate::engine::context::PassContext;
use crate::engine::pass::run_fill_pass;
use crate::profile::loader::load_profile;
use crate::report::console::format_console_report;
use crate::report::json::format_json_report;
use crate::trace::logger::TraceLogger;

// ============================================================================
// fill subcommand
// ============================================================================

/// Run a full fill pass. Returns whether the pass completed with zero
/// failed fields.
pub fn cmd_fill(
    url: &str,
    profile_source: &str,
    job_title: Option<&str>,
    employer: Option<&str>,
    format: &str,
    output: Option<&str>,
    no_ai: bool,
    no_screening: bool,
    no_screening_defaults: bool,
    undo_on_failure: bool,
    delay_ms: Option<u64>,
    trace_path: Option<&str>,
    config: &AppConfig,
    ai_endpoint: Option<&str>,
    ai_key: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let profile = load_profile(profile_source)?;

    let ai_client = build_ai_client(config, ai_endpoint, ai_key)?;
    let settings = build_settings(
        config,
        delay_ms,
        no_ai,
        no_screening,
        no_screening_defaults,
        ai_client.is_some(),
    );

    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let mut ctx = PassContext::new(settings, tracer);

    let job = JobContext {
        job_title: job_title.map(|s| s.to_string()),
        job_description: None,
        employer_name: employer.map(|s| s.to_string()),
    };

    if verbose > 0 {
        eprintln!("Filling {} ...", url);
    }

    let mut session = BrowserSession::launch(&config.browser.server_script)?;
    session.navigate(url)?;

    let mut outcome = run_fill_pass(
        &mut session,
        &profile,
        &job,
        ai_client.as_deref(),
        &mut ctx,
    )?;

    if undo_on_failure && !outcome.report.all_ok() {
        eprintln!(
            "{} field(s) failed; rolling back {} snapshot entries",
            outcome.report.failed,
            outcome.snapshot.len()
        );
        outcome.snapshot.restore(&mut session)?;
    }

    session.quit()?;

    let content = match format {
        "json" => format_json_report(&outcome.report),
        _ => format_console_report(&outcome.report),
    };
    match output {
        Some(path) => std::fs::write(path, &content)?,
        None => print!("{}", content),
    }

    Ok(outcome.report.all_ok())
}

// ============================================================================
// scan subcommand
// ============================================================================

/// Detect and classify without touching the page.
pub fn cmd_scan(
    url: &str,
    format: &str,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose > 0 {
        eprintln!("Scanning {} ...", url);
    }

    let mut session = BrowserSession::launch(&config.browser.server_script)?;
    session.navigate(url)?;
    let page = session.extract()?;
    session.quit()?;

    let handler = crate::platform::handler::active_handler(&page);
    let classified = classify_all(&handler.scan(&page));

    print_classified(&page, handler.name(), &classified, format);
    Ok(())
}

// ============================================================================
// classify subcommand (offline)
// ============================================================================

/// Classify fields from a previously extracted DOM payload. No browser,
/// no network: useful for regression-checking the classifier against
/// captured pages.
pub fn cmd_classify(input: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(input)?;
    let page: ExtractedPage = serde_json::from_str(&content)?;

    let handler = crate::platform::handler::active_handler(&page);
    let classified = classify_all(&handler.scan(&page));

    print_classified(&page, handler.name(), &classified, format);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn build_ai_client(
    config: &AppConfig,
    cli_endpoint: Option<&str>,
    cli_key: Option<&str>,
) -> Result<Option<Box<dyn AiClient>>, Box<dyn std::error::Error>> {
    let endpoint = cli_endpoint.or(config.ai.endpoint.as_deref());
    match endpoint {
        Some(endpoint) => {
            let key = cli_key.or(config.ai.api_key.as_deref());
            Ok(Some(Box::new(HttpAiClient::new(endpoint, key)?)))
        }
        None => Ok(None),
    }
}

fn print_classified(
    page: &ExtractedPage,
    platform: &str,
    classified: &[ClassifiedField],
    format: &str,
) {
    if format == "json" {
        match serde_json::to_string_pretty(classified) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize: {}", e),
        }
        return;
    }

    println!("{} — {} ({} fields, platform: {})", page.url, page.title, classified.len(), platform);
    for c in classified {
        println!(
            "  {:<28} {:>4.2}  {:?}  {}",
            c.identifier.as_key(),
            c.confidence,
            c.field.control,
            c.field.display_name()
        );
    }
}
