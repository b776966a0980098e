use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::session::DEFAULT_SERVER_SCRIPT;
use crate::engine::context::FillSettings;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "formpilot",
    version,
    about = "Browser-driven autofill engine for job-application forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// AI service endpoint
    #[arg(long, global = true)]
    pub ai_endpoint: Option<String>,

    /// AI service API key
    #[arg(long, global = true)]
    pub ai_key: Option<String>,

    /// Path to config file (default: formpilot.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full fill pass against an application page
    Fill {
        /// Application form URL
        #[arg(long)]
        url: String,

        /// Candidate profile: JSON file path or HTTP(S) URL
        #[arg(long)]
        profile: String,

        /// Job title context for AI classification
        #[arg(long)]
        job_title: Option<String>,

        /// Employer name context for AI classification
        #[arg(long)]
        employer: Option<String>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Skip the AI classification fallback
        #[arg(long, default_value_t = false)]
        no_ai: bool,

        /// Skip the screening-question pass
        #[arg(long, default_value_t = false)]
        no_screening: bool,

        /// Never default unanswered screening questions
        #[arg(long, default_value_t = false)]
        no_screening_defaults: bool,

        /// Roll the page back if any field failed
        #[arg(long, default_value_t = false)]
        undo_on_failure: bool,

        /// Inter-field delay override (ms)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// JSONL trace file path (tracing off when omitted)
        #[arg(long)]
        trace: Option<String>,
    },

    /// Detect and classify fields without mutating anything
    Scan {
        /// Application form URL
        #[arg(long)]
        url: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Classify fields from an extracted-DOM JSON file (no browser)
    Classify {
        /// Path to an extract payload JSON file
        #[arg(long)]
        input: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `formpilot.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default = "default_field_delay")]
    pub field_delay_ms: u64,

    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,

    #[serde(default = "default_attempts")]
    pub max_attempts: u8,

    #[serde(default = "default_review_confidence")]
    pub review_confidence: f32,

    #[serde(default = "default_true")]
    pub screening_defaults: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            field_delay_ms: 150,
            step_delay_ms: 60,
            max_attempts: 3,
            review_confidence: 0.55,
            screening_defaults: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: DEFAULT_SERVER_SCRIPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            enabled: true,
        }
    }
}

// Serde default helpers
fn default_field_delay() -> u64 { 150 }
fn default_step_delay() -> u64 { 60 }
fn default_attempts() -> u8 { 3 }
fn default_review_confidence() -> f32 { 0.55 }
fn default_true() -> bool { true }
fn default_server_script() -> String { DEFAULT_SERVER_SCRIPT.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing
/// or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("formpilot.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Settings builder (merge CLI args with config file)
// ============================================================================

pub fn build_settings(
    config: &AppConfig,
    delay_override: Option<u64>,
    no_ai: bool,
    no_screening: bool,
    no_screening_defaults: bool,
    ai_available: bool,
) -> FillSettings {
    FillSettings {
        field_delay_ms: delay_override.unwrap_or(config.fill.field_delay_ms),
        step_delay_ms: config.fill.step_delay_ms,
        max_attempts: config.fill.max_attempts,
        review_confidence: config.fill.review_confidence,
        screening_defaults: config.fill.screening_defaults && !no_screening_defaults,
        use_ai: ai_available && !no_ai && config.ai.enabled,
        run_screening: !no_screening,
        ..FillSettings::default()
    }
}
