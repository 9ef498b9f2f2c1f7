//! focuskit CLI: productivity timers in the terminal

mod logging;

use clap::{Parser, Subcommand};
use focuskit_engine::{
    spawn_jsonl_recorder, Analytics, Config, CountdownDuration, CountdownTimer, LiveClock, Phase,
    PomodoroConfig, PomodoroTimer,
};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Pomodoro, stopwatch, countdown and focus mode in one terminal dashboard
#[derive(Parser)]
#[command(name = "focuskit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Initialize .focuskit/ directory and config
    Init,

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the current time, date and location
    Clock,

    /// Run a countdown without the TUI
    Countdown {
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=23))]
        hours: Option<u8>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=59))]
        minutes: Option<u8>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=59))]
        seconds: Option<u8>,

        /// Text shown when the countdown finishes
        #[arg(long)]
        label: Option<String>,
    },

    /// Run pomodoro sessions without the TUI
    Pomodoro {
        /// Work phase length in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        work: Option<u32>,

        /// Break phase length in minutes
        #[arg(long = "break", value_parser = clap::value_parser!(u32).range(1..))]
        break_minutes: Option<u32>,

        /// Work sessions to complete before exiting
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        sessions: u32,
    },
}

const FOCUSKIT_DIR: &str = ".focuskit";
const CONFIG_FILE: &str = "config.json";
const ANALYTICS_FILE: &str = "analytics.jsonl";

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let dir = Path::new(FOCUSKIT_DIR);

    let log_guard = if writes_state(&command) {
        let fallback = if matches!(command, Commands::Tui) {
            logging::Fallback::Silent
        } else {
            logging::Fallback::Stderr
        };
        logging::init(dir, fallback)
    } else {
        logging::init_stderr();
        None
    };

    let code = match run(command, dir) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    // Flush buffered log lines before exiting
    drop(log_guard);
    std::process::exit(code);
}

/// Commands that may create the focuskit directory, and so get a log file there.
fn writes_state(command: &Commands) -> bool {
    !matches!(command, Commands::Config { .. } | Commands::Clock)
}

fn run(command: Commands, dir: &Path) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Tui => {
            let config = Config::load_or_default(&dir.join(CONFIG_FILE))?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let (analytics, recorder) = start_analytics(&config, dir);
                let result = focuskit_tui::run_tui(&config, analytics).await;
                finish_analytics(recorder).await;
                result
            })
        }
        Commands::Init => cmd_init(dir, &mut io::stdout()),
        Commands::Config { json } => {
            let config = Config::load_or_default(&dir.join(CONFIG_FILE))?;
            print_config(&config, json, &mut io::stdout())
        }
        Commands::Clock => {
            print_clock(&LiveClock::now(), &mut io::stdout())?;
            Ok(())
        }
        Commands::Countdown {
            hours,
            minutes,
            seconds,
            label,
        } => {
            let config = Config::load_or_default(&dir.join(CONFIG_FILE))?;
            let duration = countdown_duration(&config, hours, minutes, seconds);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let (analytics, recorder) = start_analytics(&config, dir);
                let result = run_countdown(duration, label, analytics, &mut io::stdout()).await;
                finish_analytics(recorder).await;
                result
            })?;
            Ok(())
        }
        Commands::Pomodoro {
            work,
            break_minutes,
            sessions,
        } => {
            let config = Config::load_or_default(&dir.join(CONFIG_FILE))?;
            let pomodoro = PomodoroConfig {
                work_minutes: work.unwrap_or(config.pomodoro.work_minutes),
                break_minutes: break_minutes.unwrap_or(config.pomodoro.break_minutes),
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let (analytics, recorder) = start_analytics(&config, dir);
                let result =
                    run_pomodoro(&pomodoro, sessions, analytics, &mut io::stdout()).await;
                finish_analytics(recorder).await;
                result
            })?;
            Ok(())
        }
    }
}

fn cmd_init(dir: &Path, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        writeln!(out, "Config already exists at {}", config_path.display())?;
    } else {
        Config::default().save(&config_path)?;
        writeln!(out, "Created {}", config_path.display())?;
    }

    writeln!(out, "\nInitialization complete!")?;
    Ok(())
}

fn print_config(config: &Config, json: bool, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
        return Ok(());
    }

    let countdown = config.countdown;
    writeln!(out, "focuskit configuration\n")?;
    writeln!(
        out,
        "  Pomodoro:  {} min focus / {} min break",
        config.pomodoro.work_minutes, config.pomodoro.break_minutes
    )?;
    writeln!(
        out,
        "  Countdown: {:02}:{:02}:{:02}",
        countdown.hours, countdown.minutes, countdown.seconds
    )?;
    writeln!(out, "  Volume:    {}%", config.focus.volume)?;
    writeln!(out, "  Tick rate: {}ms", config.ui.tick_rate_ms)?;
    writeln!(
        out,
        "  Analytics: {}",
        if config.analytics.enabled {
            "enabled"
        } else {
            "disabled"
        }
    )?;
    Ok(())
}

fn print_clock(clock: &LiveClock, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", clock.time_text())?;
    writeln!(out, "{}", clock.date_text())?;
    writeln!(out, "Current time in {}", clock.location_text())
}

/// Flags override the configured duration; with no flags the config wins.
fn countdown_duration(
    config: &Config,
    hours: Option<u8>,
    minutes: Option<u8>,
    seconds: Option<u8>,
) -> CountdownDuration {
    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        return config.countdown;
    }
    CountdownDuration::new(
        hours.unwrap_or(0),
        minutes.unwrap_or(0),
        seconds.unwrap_or(0),
    )
}

/// Analytics handle for this process, plus the recorder task when enabled.
///
/// Must be called inside the runtime.
fn start_analytics(config: &Config, dir: &Path) -> (Analytics, Option<JoinHandle<()>>) {
    if !config.analytics.enabled {
        return (Analytics::disabled(), None);
    }
    let (analytics, rx) = Analytics::channel();
    let path = dir.join(ANALYTICS_FILE);
    info!(path = %path.display(), session = %analytics.session_id(), "recording analytics");
    (analytics, Some(spawn_jsonl_recorder(rx, path)))
}

/// Wait for the recorder to drain. Every `Analytics` handle must be dropped.
async fn finish_analytics(recorder: Option<JoinHandle<()>>) {
    if let Some(recorder) = recorder {
        if let Err(e) = recorder.await {
            warn!(error = %e, "analytics recorder stopped abnormally");
        }
    }
}

/// Count down on the real scheduler, printing the remaining time each second.
async fn run_countdown(
    duration: CountdownDuration,
    label: Option<String>,
    analytics: Analytics,
    out: &mut impl Write,
) -> io::Result<()> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut timer = CountdownTimer::new(duration, Some(tick_tx), analytics);
    if let Some(label) = label {
        timer.set_label(label);
    }

    timer.start();
    if !timer.is_running() {
        writeln!(out, "Nothing to count down: duration is zero")?;
        return Ok(());
    }

    if timer.label().is_empty() {
        writeln!(out, "{}", timer.display())?;
    } else {
        writeln!(out, "{}  {}", timer.display(), timer.label())?;
    }

    while let Some(tick) = tick_rx.recv().await {
        if !timer.handle_tick(&tick) {
            continue;
        }
        if timer.is_finished() {
            break;
        }
        writeln!(out, "{}", timer.display())?;
    }

    if timer.label().is_empty() {
        writeln!(out, "Time's up!")
    } else {
        writeln!(out, "Time's up! {}", timer.label())
    }
}

/// Run pomodoro phases until `sessions` work sessions have completed.
async fn run_pomodoro(
    config: &PomodoroConfig,
    sessions: u32,
    analytics: Analytics,
    out: &mut impl Write,
) -> io::Result<()> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut timer = PomodoroTimer::new(config, Some(tick_tx), analytics);

    writeln!(
        out,
        "{}: {} ({} min focus / {} min break)",
        timer.phase().label(),
        timer.display(),
        timer.work_minutes(),
        timer.break_minutes()
    )?;
    timer.toggle();

    while timer.completed_sessions() < sessions {
        let Some(tick) = tick_rx.recv().await else {
            break;
        };
        let phase = timer.phase();
        if !timer.handle_tick(&tick) {
            continue;
        }

        if timer.phase() != phase {
            match timer.phase() {
                Phase::Break => writeln!(
                    out,
                    "Session {} complete, take a break",
                    timer.completed_sessions()
                )?,
                Phase::Work => writeln!(out, "Break over, back to work")?,
            }
        } else if timer.remaining() % 60 == 0 {
            writeln!(out, "{}: {}", timer.phase().label(), timer.display())?;
        }
    }

    timer.stop();
    writeln!(out, "Completed {} session(s)", timer.completed_sessions())
}
