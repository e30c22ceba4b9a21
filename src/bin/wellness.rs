//! Wellness CLI - Command-line interface for the wellness core
//!
//! Commands:
//! - activities: List the MET table
//! - calories: Estimate calories for one activity against a profile
//! - summary: Summarize the most recent week or month of logs
//! - dashboard: Render one page of the log history
//! - validate: Validate a log history file
//! - doctor: Diagnose configuration and input files

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wellness_core::encoder::{ReportEncoder, ReportKind};
use wellness_core::history::DEFAULT_PAGE_SIZE;
use wellness_core::types::{CalorieBurnReport, LogRecord, SummaryPeriod, SummaryReport};
use wellness_core::{
    CalorieBurnForm, LogRecordAdapter, UserProfile, WellnessError, WellnessProcessor,
    CORE_VERSION, MET_TABLE, PRODUCER_NAME,
};

/// Wellness - calorie estimates and log summaries for a wellness tracker
#[derive(Parser)]
#[command(name = "wellness")]
#[command(version = CORE_VERSION)]
#[command(about = "Estimate calorie burn and summarize wellness logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported activities and their MET coefficients
    Activities {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate calories burned by one activity
    Calories {
        /// Activity name (e.g., "Walking")
        #[arg(short, long)]
        activity: String,

        /// Duration in minutes
        #[arg(short, long)]
        duration: i64,

        /// Profile JSON file
        #[arg(long, env = "WELLNESS_PROFILE")]
        profile: Option<PathBuf>,

        /// Body weight in kg (overrides the profile)
        #[arg(long, env = "WELLNESS_WEIGHT_KG")]
        weight: Option<f64>,

        /// Daily calorie-burn goal in kcal (overrides the profile)
        #[arg(long, env = "WELLNESS_CALORIE_GOAL")]
        goal: Option<u32>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Summarize the most recent logs
    Summary {
        /// Log history file (use - for stdin)
        #[arg(short, long, env = "WELLNESS_LOGS")]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "auto")]
        input_format: InputFormat,

        /// Summary window
        #[arg(long, default_value = "week")]
        period: PeriodArg,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Render one page of the log history
    Dashboard {
        /// Log history file (use - for stdin)
        #[arg(short, long, env = "WELLNESS_LOGS")]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "auto")]
        input_format: InputFormat,

        /// Page number (out-of-range values show the last page)
        #[arg(long)]
        page: Option<String>,

        /// Show logs from this date (YYYY-MM-DD) first
        #[arg(long)]
        date: Option<String>,

        /// Logs per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Validate a log history file
    Validate {
        /// Log history file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "auto")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and input files
    Doctor {
        /// Check a profile file
        #[arg(long, env = "WELLNESS_PROFILE")]
        profile: Option<PathBuf>,

        /// Check a log history file
        #[arg(long, env = "WELLNESS_LOGS")]
        logs: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Detect from the first character
    Auto,
    /// Newline-delimited JSON (one log per line)
    Ndjson,
    /// JSON array of logs
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Compact JSON envelope
    Json,
    /// Pretty-printed JSON envelope
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    /// Most recent 7 logs
    Week,
    /// Most recent 30 logs
    Month,
}

impl From<PeriodArg> for SummaryPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Week => SummaryPeriod::Week,
            PeriodArg::Month => SummaryPeriod::Month,
        }
    }
}

fn main() -> ExitCode {
    // .env may set RUST_LOG, so it loads before the logger is built
    let dotenv_result = dotenv::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = dotenv_result {
        log::debug!("no .env loaded: {error}");
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WellnessCliError> {
    match cli.command {
        Commands::Activities { json } => cmd_activities(json),

        Commands::Calories {
            activity,
            duration,
            profile,
            weight,
            goal,
            output_format,
        } => cmd_calories(
            activity,
            duration,
            profile.as_deref(),
            weight,
            goal,
            &output_format,
        ),

        Commands::Summary {
            input,
            input_format,
            period,
            output_format,
        } => cmd_summary(&input, &input_format, period.into(), &output_format),

        Commands::Dashboard {
            input,
            input_format,
            page,
            date,
            page_size,
            output_format,
        } => cmd_dashboard(
            &input,
            &input_format,
            page.as_deref(),
            date.as_deref(),
            page_size,
            &output_format,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, &input_format, json),

        Commands::Doctor {
            profile,
            logs,
            json,
        } => cmd_doctor(profile.as_deref(), logs.as_deref(), json),
    }
}

fn cmd_activities(json: bool) -> Result<(), WellnessCliError> {
    if json {
        let rows: Vec<serde_json::Value> = MET_TABLE
            .iter()
            .map(|(activity, met)| serde_json::json!({ "activity_type": activity, "met": met }))
            .collect();
        let output = ReportEncoder::new().encode_to_json(ReportKind::Activities, &rows)?;
        println!("{}", output);
    } else {
        println!("Activity    MET");
        println!("--------    ---");
        for (activity, met) in MET_TABLE {
            println!("{:<10}  {:.1}", activity.as_str(), met);
        }
    }
    Ok(())
}

fn cmd_calories(
    activity: String,
    duration: i64,
    profile_path: Option<&Path>,
    weight: Option<f64>,
    goal: Option<u32>,
    output_format: &OutputFormat,
) -> Result<(), WellnessCliError> {
    let mut profile = match profile_path {
        Some(path) => UserProfile::from_json(&fs::read_to_string(path)?)?,
        None => UserProfile::default(),
    };
    if weight.is_some() {
        profile.weight_kg = weight;
    }
    if let Some(goal) = goal {
        profile.calorie_goal = goal;
    }

    let form = CalorieBurnForm {
        exercise_type: activity,
        duration,
    };
    let request = form.validate()?;

    let mut processor = WellnessProcessor::new();
    processor.set_profile(profile);
    let report = processor.calorie_burn(&request)?;

    match output_format {
        OutputFormat::Text => print_calorie_report(&report),
        _ => println!(
            "{}",
            format_envelope(ReportKind::CalorieBurn, &report, output_format)?
        ),
    }
    Ok(())
}

fn cmd_summary(
    input: &Path,
    input_format: &InputFormat,
    period: SummaryPeriod,
    output_format: &OutputFormat,
) -> Result<(), WellnessCliError> {
    let logs = read_logs(input, input_format)?;

    let mut processor = WellnessProcessor::new();
    for record in logs {
        processor.add_log(record)?;
    }
    let report = processor.summary(period);

    match output_format {
        OutputFormat::Text => print_summary_report(&report),
        _ => println!(
            "{}",
            format_envelope(ReportKind::Summary, &report, output_format)?
        ),
    }
    Ok(())
}

fn cmd_dashboard(
    input: &Path,
    input_format: &InputFormat,
    page: Option<&str>,
    date: Option<&str>,
    page_size: usize,
    output_format: &OutputFormat,
) -> Result<(), WellnessCliError> {
    let logs = read_logs(input, input_format)?;

    let mut processor = WellnessProcessor::with_page_size(page_size);
    for record in logs {
        processor.add_log(record)?;
    }
    let view = processor.dashboard(page, date);

    match output_format {
        OutputFormat::Text => {
            println!(
                "Page {} of {} ({} logs)",
                view.logs.number, view.logs.num_pages, view.logs.total_items
            );
            if !view.search_date.is_empty() {
                println!("Showing {} first", view.search_date);
            }
            println!();
            for record in &view.logs.items {
                print_log_line(record);
            }
        }
        _ => println!(
            "{}",
            format_envelope(ReportKind::Dashboard, &view, output_format)?
        ),
    }
    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: &InputFormat,
    json: bool,
) -> Result<(), WellnessCliError> {
    let logs = read_logs(input, input_format)?;
    let results = LogRecordAdapter::validate_records(&logs);

    let report = ValidationReport {
        total_logs: logs.len(),
        valid_logs: logs.len() - results.len(),
        invalid_logs: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                record_id: r.record_id,
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total logs:   {}", report.total_logs);
        println!("Valid logs:   {}", report.valid_logs);
        println!("Invalid logs: {}", report.invalid_logs);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                let id = err
                    .record_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("  - Log {} (index {}): {}", id, err.index, err.error);
            }
        }
    }

    if report.invalid_logs > 0 {
        Err(WellnessCliError::ValidationFailed(report.invalid_logs))
    } else {
        Ok(())
    }
}

fn cmd_doctor(
    profile: Option<&Path>,
    logs: Option<&Path>,
    json: bool,
) -> Result<(), WellnessCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "core_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Wellness core version {}", CORE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "met_table".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} activities in MET table", MET_TABLE.len()),
    });

    if let Some(path) = profile {
        checks.push(check_profile(path));
    }

    if let Some(path) = logs {
        checks.push(check_logs(path));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass log files with --input)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - will read it)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: CORE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wellness Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(WellnessCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_profile(path: &Path) -> DoctorCheck {
    let name = "profile".to_string();
    if !path.exists() {
        return DoctorCheck {
            name,
            status: CheckStatus::Warning,
            message: "Profile file does not exist".to_string(),
        };
    }

    match fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|content| {
        UserProfile::from_json(&content).map_err(|e| e.to_string())
    }) {
        Ok(profile) => match profile.usable_weight() {
            Some(weight) => DoctorCheck {
                name,
                status: CheckStatus::Ok,
                message: format!(
                    "Profile valid ({} kg, goal {} kcal)",
                    weight, profile.calorie_goal
                ),
            },
            None => DoctorCheck {
                name,
                status: CheckStatus::Warning,
                message: "Profile has no weight; calorie estimates will be refused".to_string(),
            },
        },
        Err(e) => DoctorCheck {
            name,
            status: CheckStatus::Error,
            message: format!("Invalid profile: {}", e),
        },
    }
}

fn check_logs(path: &Path) -> DoctorCheck {
    let name = "logs".to_string();
    if !path.exists() {
        return DoctorCheck {
            name,
            status: CheckStatus::Warning,
            message: "Log history file does not exist".to_string(),
        };
    }

    let mut processor = WellnessProcessor::new();
    match fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| processor.load_logs(&content).map_err(|e| e.to_string()))
    {
        Ok(count) => DoctorCheck {
            name,
            status: CheckStatus::Ok,
            message: format!("Log history valid ({} logs)", count),
        },
        Err(e) => DoctorCheck {
            name,
            status: CheckStatus::Error,
            message: format!("Invalid log history: {}", e),
        },
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, WellnessCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_logs(input: &Path, format: &InputFormat) -> Result<Vec<LogRecord>, WellnessCliError> {
    let data = read_input(input)?;
    let logs = match format {
        InputFormat::Auto => LogRecordAdapter::parse_auto(&data)?,
        InputFormat::Ndjson => LogRecordAdapter::parse_ndjson(&data)?,
        InputFormat::Json => LogRecordAdapter::parse_array(&data)?,
    };
    log::info!("read {} logs from {}", logs.len(), input.display());
    Ok(logs)
}

fn format_envelope<T: serde::Serialize>(
    kind: ReportKind,
    report: &T,
    format: &OutputFormat,
) -> Result<String, WellnessCliError> {
    let encoder = ReportEncoder::new();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(&encoder.encode(kind, report))?),
        _ => Ok(encoder.encode_to_json(kind, report)?),
    }
}

fn print_calorie_report(report: &CalorieBurnReport) {
    let result = &report.result;
    println!(
        "{} for {} min: {:.2} kcal",
        result.activity_type, result.duration_minutes, result.calories_kcal
    );
    if result.goal_kcal > 0 {
        println!(
            "Goal progress: {}% of {} kcal",
            result.progress_percent, result.goal_kcal
        );
    } else {
        println!("No daily goal set");
    }

    println!("\nSame duration, other activities:");
    for entry in &report.chart {
        println!("  {:<10}  {:>8.2} kcal", entry.activity_type.as_str(), entry.calories_kcal);
    }
}

fn print_summary_report(report: &SummaryReport) {
    let summary = &report.summary;
    println!(
        "Summary ({}, {} logs)",
        report.period.as_str(),
        report.record_count
    );
    println!("  Avg water:    {:.2} ml", summary.avg_water_ml);
    println!("  Avg sleep:    {:.1} h", summary.avg_sleep_hours);
    println!("  Avg exercise: {} min", summary.avg_exercise_duration_minutes);
    println!(
        "  Moods:        Happy {}, Neutral {}, Sad {}",
        summary.mood_counts.happy, summary.mood_counts.neutral, summary.mood_counts.sad
    );
}

fn print_log_line(record: &LogRecord) {
    let fmt_opt = |value: Option<f64>, unit: &str| {
        value
            .map(|v| format!("{v}{unit}"))
            .unwrap_or_else(|| "-".to_string())
    };
    let exercise = match (record.exercise_type, record.exercise_duration_minutes) {
        (Some(activity), Some(minutes)) => format!("{activity} {minutes}min"),
        (Some(activity), None) => activity.to_string(),
        (None, Some(minutes)) => format!("{minutes}min"),
        (None, None) => "-".to_string(),
    };
    println!(
        "  {}  water {:<10} sleep {:<6} exercise {:<16} mood {}",
        record.date,
        fmt_opt(record.water_intake_ml, "ml"),
        fmt_opt(record.sleep_hours, "h"),
        exercise,
        record.mood.as_ref().map(|m| m.as_str()).unwrap_or("-")
    );
}

// Error types

#[derive(Debug)]
enum WellnessCliError {
    Io(io::Error),
    Core(WellnessError),
    Json(serde_json::Error),
    Validation(wellness_core::ValidationError),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for WellnessCliError {
    fn from(e: io::Error) -> Self {
        WellnessCliError::Io(e)
    }
}

impl From<WellnessError> for WellnessCliError {
    fn from(e: WellnessError) -> Self {
        WellnessCliError::Core(e)
    }
}

impl From<serde_json::Error> for WellnessCliError {
    fn from(e: serde_json::Error) -> Self {
        WellnessCliError::Json(e)
    }
}

impl From<wellness_core::ValidationError> for WellnessCliError {
    fn from(e: wellness_core::ValidationError) -> Self {
        WellnessCliError::Validation(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WellnessCliError> for CliError {
    fn from(e: WellnessCliError) -> Self {
        match e {
            WellnessCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WellnessCliError::Core(WellnessError::WeightRequired) => CliError {
                code: "WEIGHT_REQUIRED".to_string(),
                message: WellnessError::WeightRequired.to_string(),
                hint: Some("Pass --weight or set weight_kg in the profile".to_string()),
            },
            WellnessCliError::Core(WellnessError::UnknownActivity(name)) => CliError {
                code: "UNKNOWN_ACTIVITY".to_string(),
                message: format!("Unknown activity: {}", name),
                hint: Some("Run 'wellness activities' for the supported list".to_string()),
            },
            WellnessCliError::Core(e) => CliError {
                code: "CORE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the log record schema".to_string()),
            },
            WellnessCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WellnessCliError::Validation(e) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the activity name and duration".to_string()),
            },
            WellnessCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} logs failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            WellnessCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_logs: usize,
    valid_logs: usize,
    invalid_logs: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    record_id: Option<i64>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
