//! `nudge` - CLI for recurring desktop reminders
//!
//! This binary manages the reminder list and runs the foreground session
//! that delivers notifications when reminders come due.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use nudge::cli::render::{format_interval, format_timestamp, render_reminders};
use nudge::cli::{AddCommand, Cli, Command, ConfigCommand, ListCommand, RemoveCommand};
use nudge::{init_logging, Config, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Add(add_cmd) => handle_add(&config, &add_cmd),
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Remove(remove_cmd) => handle_remove(&config, &remove_cmd),
        Command::Run => handle_run(&config).await,
        Command::Check => handle_check(&config).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_session(config: &Config) -> anyhow::Result<Session> {
    Session::open(config)
        .with_context(|| format!("opening reminders at {}", config.database_path().display()))
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let mut session = open_session(config)?;

    let reminder = session
        .store_mut()
        .add(&cmd.to_draft(), &Local::now())
        .map_err(|e| {
            let context = e.user_hint().unwrap_or("saving reminder");
            anyhow::Error::new(e).context(context)
        })?;

    println!("Reminder added successfully!");
    println!("  Id:    {}", reminder.id);
    println!("  Next:  {}", format_timestamp(reminder.next_notification));
    println!("  Every: {}", format_interval(reminder.interval).trim_start_matches("every "));
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let session = open_session(config)?;
    println!("{}", render_reminders(session.store().reminders(), cmd.format)?);
    Ok(())
}

fn handle_remove(config: &Config, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let mut session = open_session(config)?;

    if session.store_mut().remove(&cmd.id).context("removing reminder")? {
        println!("Reminder deleted");
    } else {
        println!("No reminder with id {}", cmd.id);
    }
    Ok(())
}

async fn handle_run(config: &Config) -> anyhow::Result<()> {
    let mut session = open_session(config)?;

    println!(
        "Watching {} reminders, checking every {}s. Press Ctrl-C to stop.",
        session.store().len(),
        config.scheduler.check_interval_secs
    );

    let summary = session
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    println!(
        "Stopped after {} checks; {} reminders fired.",
        summary.ticks, summary.fired
    );
    Ok(())
}

async fn handle_check(config: &Config) -> anyhow::Result<()> {
    let mut session = open_session(config)?;
    let report = session.check_now().await.context("checking reminders")?;

    println!(
        "Checked {} reminders; {} due, {} shown.",
        report.scanned,
        report.fired.len(),
        report.shown
    );
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let session = open_session(config)?;
    let store = session.store();
    let stats = store.storage().stats()?;
    let updated_at = store.storage().updated_at(store.key())?;
    let next_due = store.reminders().iter().map(|r| r.next_notification).min();

    if json {
        let status = serde_json::json!({
            "database_path": store.storage().path(),
            "storage_key": store.key(),
            "reminders": store.len(),
            "next_due": next_due,
            "last_saved": updated_at.map(|t| t.to_rfc3339()),
            "storage_entries": stats.total_entries,
            "db_size_bytes": stats.db_size_bytes,
            "notification_backend": session.sink().backend_name(),
            "check_interval_secs": config.scheduler.check_interval_secs,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("nudge status");
        println!("------------");
        println!("Database:      {}", store.storage().path().display());
        println!("Storage key:   {}", store.key());
        println!("Reminders:     {}", store.len());
        println!(
            "Next due:      {}",
            next_due.map_or_else(|| "-".to_string(), format_timestamp)
        );
        println!(
            "Last saved:    {}",
            updated_at.map_or_else(|| "never".to_string(), |t| t.with_timezone(&Local).to_string())
        );
        println!("Entries:       {}", stats.total_entries);
        println!("Database size: {} bytes", stats.db_size_bytes);
        println!("Notifications: {}", session.sink().backend_name());
        println!("Check every:   {}s", config.scheduler.check_interval_secs);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!("  Key:             {}", config.storage.key);
                println!();
                println!("[Scheduler]");
                println!("  Check interval:  {}s", config.scheduler.check_interval_secs);
                println!();
                println!("[Notifications]");
                println!("  Backend:         {}", config.notifications.backend);
                println!("  Title:           {}", config.notifications.title);
                println!("  App name:        {}", config.notifications.app_name);
                println!("  Timeout (ms):    {}", config.notifications.timeout_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
