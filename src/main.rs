//! CLI `panelbus`
//!
//! Прогоняет сценарии сигналов панели через шину и проверяет шаблоны тем.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    ops::Range,
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use panelbus::{
    init_logging,
    pattern::{Capture, Match},
    DeliveryResult, LoggingHandle, MatchMode, Panel, Pattern, Settings, TopicMatcher,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Основная структура CLI аргументов
#[derive(Parser)]
#[command(name = "panelbus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Topic broadcast bus for panel controls", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Файл настроек (TOML, YAML или JSON)
    #[arg(short, long, env = "PANELBUS_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Включить подробный вывод (debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Подавить большинство логов (только warn/error)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Подкоманды CLI
#[derive(Subcommand)]
enum Commands {
    /// Прогнать JSON-lines сценарий сигналов через панель
    Replay {
        /// Файл сценария; без него читается stdin
        script: Option<PathBuf>,
        /// Имена элементов панели, которые печатают полученные сообщения
        #[arg(long = "control", value_name = "NAME")]
        controls: Vec<String>,
        /// Режим сопоставления вместо настроенного
        #[arg(long)]
        mode: Option<MatchMode>,
    },
    /// Сопоставить один шаблон с одной темой
    Match {
        pattern: String,
        topic: String,
        #[arg(long, default_value = "partial")]
        mode: MatchMode,
    },
}

/// Строка сценария: один сигнал панели.
#[derive(Debug, Deserialize)]
struct ScriptLine {
    key: String,
    #[serde(default)]
    data: Value,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    } else if cli.quiet {
        settings.logging.level = "warn".to_string();
    }
    let logging: LoggingHandle =
        init_logging(&settings.logging).context("failed to initialize logging")?;

    tracing::debug!(
        commit = env!("PANELBUS_GIT_COMMIT"),
        built = env!("PANELBUS_BUILD_TIME"),
        "panelbus starting"
    );

    let code = match cli.command {
        Commands::Replay {
            script,
            controls,
            mode,
        } => {
            if let Some(mode) = mode {
                settings.bus.match_mode = mode;
            }
            replay(settings, script, &controls)?;
            ExitCode::SUCCESS
        }
        Commands::Match {
            pattern,
            topic,
            mode,
        } => match_once(&pattern, &topic, mode)?,
    };

    logging.shutdown();
    Ok(code)
}

fn replay(
    settings: Settings,
    script: Option<PathBuf>,
    controls: &[String],
) -> Result<()> {
    let panel = Panel::new(settings.bus);
    for name in controls {
        let control = name.clone();
        panel.add_signal_control(
            name.as_str(),
            move |key: &str, data: &Value| -> DeliveryResult {
                let line = json!({ "control": control, "key": key, "data": data });
                writeln!(io::stdout().lock(), "{line}")?;
                Ok(())
            },
        );
    }

    let reader: Box<dyn BufRead> = match &script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let signal: ScriptLine = match serde_json::from_str(line) {
            Ok(signal) => signal,
            Err(err) => {
                tracing::warn!(line = line_no, error = %err, "Skipping malformed script line");
                continue;
            }
        };
        match panel.try_notify(&signal.key, &signal.data) {
            Ok(outcome) => tracing::debug!(line = line_no, ?outcome, "Signal handled"),
            Err(err) => tracing::warn!(line = line_no, error = %err, "Signal rejected"),
        }
    }

    let stats = panel.bus().stats();
    tracing::info!(
        subscriptions = panel.bus().len(),
        publishes = stats.publishes,
        deliveries = stats.deliveries,
        delivery_failures = stats.delivery_failures,
        pattern_errors = stats.pattern_errors,
        dropped_subscribers = stats.dropped_subscribers,
        "Replay finished"
    );
    Ok(())
}

fn match_once(
    pattern: &str,
    topic: &str,
    mode: MatchMode,
) -> Result<ExitCode> {
    let report = match mode {
        MatchMode::Glob => {
            let matcher = TopicMatcher::compile(pattern, mode)
                .with_context(|| format!("invalid pattern '{pattern}'"))?;
            json!({ "mode": mode, "matched": matcher.matches(topic)? })
        }
        MatchMode::Partial | MatchMode::Anchored => {
            let compiled =
                Pattern::new(pattern).with_context(|| format!("invalid pattern '{pattern}'"))?;
            let found = if mode == MatchMode::Anchored {
                compiled.find_full(topic)?
            } else {
                compiled.find(topic)?
            };
            match found {
                Some(found) => describe(topic, mode, &found),
                None => json!({ "mode": mode, "matched": false }),
            }
        }
    };

    println!("{report}");
    let matched = report["matched"].as_bool().unwrap_or(false);
    Ok(if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn describe(
    topic: &str,
    mode: MatchMode,
    found: &Match,
) -> Value {
    let text = |range: &Range<usize>| {
        String::from_utf8_lossy(&topic.as_bytes()[range.clone()]).into_owned()
    };
    let captures: Vec<Value> = found
        .captures
        .iter()
        .map(|capture| match capture {
            Capture::Span(range) => {
                json!({ "start": range.start, "end": range.end, "text": text(range) })
            }
            Capture::Position(at) => json!({ "position": at }),
        })
        .collect();
    json!({
        "mode": mode,
        "matched": true,
        "start": found.range.start,
        "end": found.range.end,
        "text": text(&found.range),
        "captures": captures,
    })
}
