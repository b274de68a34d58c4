use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use questplan::assistant::{AssistedScheduler, PlanSource, extract_user_rules};
use questplan::domain::{ScheduleRequest, ScheduledTask, UserPreferences};
use questplan::learning::{FeedbackEvent, learn};
use questplan::llm::{LlmClient, OpenAiClient};
use questplan::scheduler::{blocked_collisions, clock, schedule_request};
use questplan::storage::{FeedbackLog, PreferenceStore};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("questplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("questplan.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!("  Data directory: {}", config.storage.data_dir.display());
    }

    match &cli.command {
        Commands::Schedule { request, assist, json } => handle_schedule_command(request, *assist, *json, config).await,
        Commands::Feedback { submission } => handle_feedback_command(submission, config),
        Commands::Prefs { reset } => handle_prefs_command(*reset, config),
        Commands::Rules => handle_rules_command(config),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context(format!("Failed to parse {}", path.display()))
}

fn open_stores(config: &Config) -> Result<(PreferenceStore, FeedbackLog)> {
    let data_dir = &config.storage.data_dir;
    let prefs = PreferenceStore::new(data_dir).context("Failed to open preference store")?;
    let feedback = FeedbackLog::new(data_dir).context("Failed to open feedback log")?;
    Ok((prefs, feedback))
}

async fn handle_schedule_command(path: &Path, assist: bool, json: bool, config: &Config) -> Result<()> {
    let request: ScheduleRequest = read_json(path)?;
    let (store, feedback) = open_stores(config)?;
    let prefs = store.load().context("Failed to load preferences")?;
    info!(
        "Scheduling {} tasks for {} (assist: {})",
        request.tasks.len(),
        request.target_date,
        assist
    );

    let schedule = if assist {
        let history = feedback
            .recent(config.assistant.feedback_window)
            .context("Failed to read feedback history")?;
        let openai = OpenAiClient::from_env(config.llm.client_config()).map(Arc::new);
        let client = openai.clone().map(|c| c as Arc<dyn LlmClient>);
        let scheduler = AssistedScheduler::new(client).with_settings(config.assistant_settings());
        let plan = scheduler.plan(&request, &prefs, &history).await;
        if let Some(openai) = &openai {
            info!("LLM token usage: {}", openai.total_usage().total());
        }
        match &plan.source {
            PlanSource::Fallback(reason) if !json => {
                println!("{} {}", "Assistant unavailable, used deterministic plan:".yellow(), reason);
            }
            _ => {}
        }
        plan.schedule
    } else {
        schedule_request(&request, &prefs)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    print_schedule(&request, &schedule);
    Ok(())
}

fn print_schedule(request: &ScheduleRequest, schedule: &[ScheduledTask]) {
    let offset = request.timezone_offset_minutes;

    if schedule.is_empty() {
        println!("{}", "Nothing to schedule".yellow());
        return;
    }

    println!("{} {}", "Schedule for".green(), request.target_date);
    for slot in schedule {
        let (title, importance) = request
            .task(slot.task_id)
            .map(|t| (t.title.as_str(), t.importance.as_str()))
            .unwrap_or(("?", "?"));
        let day = if clock::is_local_date(slot.start_time, request.target_date, offset) {
            String::new()
        } else {
            format!(" ({})", clock::local_date(slot.start_time, offset)).dimmed().to_string()
        };
        println!(
            "  {}-{}{}  #{} {} {}",
            clock::format_local(slot.start_time, offset).cyan(),
            clock::format_local(slot.end_time, offset).cyan(),
            day,
            slot.task_id,
            title,
            format!("[{}]", importance).dimmed()
        );
    }

    for (task_id, label) in blocked_collisions(schedule, &request.blocked_intervals) {
        println!("  {} task #{} overlaps {}", "Warning:".yellow(), task_id, label);
    }
}

fn handle_feedback_command(path: &Path, config: &Config) -> Result<()> {
    let event: FeedbackEvent = read_json(path)?;
    let (store, feedback) = open_stores(config)?;
    let prefs = store.load().context("Failed to load preferences")?;
    info!("Learning from {} feedback", event.feedback_type);

    let delta = learn(&prefs, &event);
    if !delta.is_empty() {
        store
            .save(&delta.apply(&prefs))
            .context("Failed to save preferences")?;
    }
    feedback
        .append(&event.to_entry())
        .context("Failed to record feedback")?;

    println!("{} {}", "Recorded:".green(), event.feedback_type);
    if delta.is_empty() {
        println!("  No preference changes");
    } else {
        println!("{}", serde_json::to_string_pretty(&delta)?);
    }
    Ok(())
}

fn handle_prefs_command(reset: bool, config: &Config) -> Result<()> {
    let (store, _) = open_stores(config)?;
    if reset {
        store.reset().context("Failed to reset preferences")?;
        println!("{}", "Preferences reset to defaults".yellow());
    }

    let prefs = store.load().context("Failed to load preferences")?;
    print_preferences(&prefs);
    Ok(())
}

fn print_preferences(prefs: &UserPreferences) {
    println!("{}", "Preferences".green());
    println!(
        "  Working hours:       {:02}:00-{:02}:00",
        prefs.preferred_start_hour, prefs.preferred_end_hour
    );
    println!("  Break:               {} min", prefs.break_duration);
    println!("  High-priority time:  {}", prefs.high_priority_time_preference);
    println!(
        "  Feedback:            {} approved, {} corrected",
        prefs.total_approved, prefs.total_corrected
    );
    let w = &prefs.priority_weights;
    println!(
        "  Weights:             pareto {} / high {} / med-high {} / medium {} / med-low {} / low {}",
        w.pareto, w.high, w.med_high, w.medium, w.med_low, w.low
    );
}

fn handle_rules_command(config: &Config) -> Result<()> {
    let (_, feedback) = open_stores(config)?;
    let history = feedback
        .recent(config.assistant.feedback_window)
        .context("Failed to read feedback history")?;
    let rules = extract_user_rules(&history, config.assistant.max_rules, config.assistant.min_rule_len);

    if rules.is_empty() {
        println!("{}", "No user rules yet".yellow());
        return Ok(());
    }

    println!("{}", "User rules (most recent first)".green());
    for (i, rule) in rules.iter().enumerate() {
        println!("  {}. {}", i + 1, rule);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
