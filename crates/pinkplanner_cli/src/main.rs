//! Command-line entry point for a local planner file.
//!
//! # Responsibility
//! - Open the planner described by the global flags and run one command.
//! - Keep output line-oriented and deterministic for scripting.

use clap::{Parser, Subcommand};
use log::error;
use pinkplanner_core::projection::FormKind;
use pinkplanner_core::{
    LoggingConfig, Palette, PaletteSink, Planner, PlannerConfig, SystemClock, NO_CATEGORY_LABEL,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Debug, Parser)]
#[command(name = "pinkplanner")]
#[command(version, about = "PinkPlanner personal organizer", long_about = None)]
struct Cli {
    /// SQLite planner file; in-memory when omitted
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); needs --log-dir
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check core linkage
    Ping,
    /// Print the dashboard summary and today's agenda
    Dashboard,
    /// Add a task with default fields
    AddTask {
        /// Task title
        title: String,
    },
    /// Switch between the two themes and persist the choice
    ToggleTheme,
}

impl Cli {
    fn planner_config(&self) -> std::io::Result<PlannerConfig> {
        let logging = match &self.log_dir {
            Some(dir) => Some(LoggingConfig::new(
                self.log_level
                    .clone()
                    .unwrap_or_else(|| pinkplanner_core::default_log_level().to_string()),
                absolute(dir)?,
            )),
            None => None,
        };
        Ok(PlannerConfig {
            db_path: self.db.clone(),
            logging,
            ..PlannerConfig::default()
        })
    }
}

struct StdoutPalette;

impl PaletteSink for StdoutPalette {
    fn apply_palette(&mut self, palette: &Palette) {
        for (name, value) in palette.vars {
            println!("{name}: {value}");
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Commands::Ping = cli.command {
        println!("pinkplanner_core ping={}", pinkplanner_core::ping());
        println!("pinkplanner_core version={}", pinkplanner_core::core_version());
        return ExitCode::SUCCESS;
    }

    let config = match cli.planner_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: cannot resolve log directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut planner = match Planner::from_config(&config, Rc::new(SystemClock)) {
        Ok(planner) => planner,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Ping => {}
        Commands::Dashboard => print_dashboard(&planner),
        Commands::AddTask { title } => match planner.tasks().quick_add(&title) {
            Ok(task) => println!("added {} {}", task.id, task.title),
            Err(err) => {
                error!("event=cli_add_task module=cli status=error error={err}");
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        Commands::ToggleTheme => {
            let theme = planner.theme().toggle(&mut StdoutPalette);
            println!("theme={}", theme.as_str());
        }
    }

    if !planner.store().is_durable() {
        eprintln!("warning: changes were not saved to disk");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_dashboard<R: pinkplanner_core::StateRepository>(planner: &Planner<R>) {
    let dashboard = planner.dashboard();
    let summary = dashboard.summary();
    if let Some(today) = summary.today {
        println!("today={today}");
    }
    println!("tasks_due_today={}", summary.tasks_due_today);
    println!(
        "week_progress={}/{} ({}%)",
        summary.week.done, summary.week.total, summary.week.percent
    );
    println!("habits_completed_today={}", summary.habits_completed_today);
    for event in &summary.upcoming_events {
        println!("upcoming {} {}", event.date, event.title);
    }

    let today_panel = planner.today_panel();
    for title in &today_panel.panel().task_titles {
        println!("due_today {title}");
    }
    for title in &today_panel.panel().event_titles {
        println!("event_today {title}");
    }

    let options = planner.category_options(FormKind::Task);
    let names: Vec<&str> = options
        .options()
        .iter()
        .map(|option| option.name.as_str())
        .collect();
    if names.is_empty() {
        println!("categories={NO_CATEGORY_LABEL}");
    } else {
        println!("categories={}", names.join(", "));
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn log_level_without_log_dir_is_refused() {
        let err = Cli::try_parse_from(["pinkplanner", "--log-level", "debug", "ping"])
            .expect_err("--log-level alone must not parse");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn log_level_with_log_dir_reaches_the_config() {
        let cli = Cli::try_parse_from([
            "pinkplanner",
            "dashboard",
            "--log-dir",
            "/tmp/pinkplanner-logs",
            "--log-level",
            "debug",
        ])
        .expect("flags should parse");
        assert!(matches!(cli.command, Commands::Dashboard));

        let logging = cli
            .planner_config()
            .expect("absolute dir needs no cwd")
            .logging
            .expect("logging should be configured");
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.log_dir, Path::new("/tmp/pinkplanner-logs"));
    }

    #[test]
    fn logging_stays_off_without_flags() {
        let cli = Cli::try_parse_from(["pinkplanner", "ping"]).expect("ping should parse");
        assert!(cli.planner_config().expect("config").logging.is_none());
    }
}
