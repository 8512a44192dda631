use anyhow::Result;
use colored::Colorize;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use tempo::prelude::*;
use tempo::{ENGINE_NAME, VERSION as LIB_VERSION};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", format!("  {} shell", ENGINE_NAME).cyan().bold());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );

    println!("{}", "-----------------------------------------------------------------------------------------------".dimmed());

    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";

    println!("{}", version_string);
    println!("{}", license_blurb.dimmed());

    println!("{}", "-----------------------------------------------------------------------------------------------".dimmed());
}

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Print(String),
    Exit,
}

/// Shell state: a registry on a clock that only moves on `advance`.
struct Shell {
    clock: ManualClock,
    tempo: TempoRegistry<ManualClock>,
    names: HashMap<TimerId, String>,
    style: Format,
}

impl Shell {
    fn new(config: &TempoConfig) -> Self {
        let clock = ManualClock::new();
        Self {
            tempo: TempoRegistry::from_config(clock.clone(), config),
            clock,
            names: HashMap::new(),
            style: config.default_format,
        }
    }

    fn id_for(&mut self, name: &str) -> TimerId {
        let id = TimerId::named(name);
        self.names.entry(id).or_insert_with(|| name.to_string());
        id
    }

    fn name_of(&self, id: TimerId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn execute(&mut self, args: &[&str]) -> Outcome {
        let Some(command) = args.first() else {
            return Outcome::Print(String::new());
        };
        let message = match *command {
            "every" => match (args.get(1), args.get(2)) {
                (Some(name), Some(period)) => {
                    let id = self.id_for(name);
                    let mut timer = self.tempo.periodic(id);
                    let fired = match raw_millis(period) {
                        Some(ms) => timer.tick(ms),
                        None => timer.tick_hms(period),
                    };
                    if fired {
                        format!("--> '{}' fired.", name)
                    } else {
                        format!("--> '{}' did not fire.", name)
                    }
                }
                _ => "Usage: every <NAME> <MS|HH:MM:SS>".to_string(),
            },
            "start" => match (args.get(1), args.get(2)) {
                (Some(name), Some(duration)) => {
                    let id = self.id_for(name);
                    let mut timer = self.tempo.one_shot(id);
                    match raw_millis(duration) {
                        Some(ms) => timer.start(ms),
                        None => timer.start_hms(duration),
                    }
                    self.describe(id)
                }
                _ => "Usage: start <NAME> <MS|HH:MM:SS>".to_string(),
            },
            "restart" | "cancel" => match args.get(1) {
                Some(name) => {
                    let id = self.id_for(name);
                    let mut timer = self.tempo.one_shot(id);
                    if *command == "restart" {
                        timer.restart();
                    } else {
                        timer.cancel();
                    }
                    self.describe(id)
                }
                None => format!("Usage: {} <NAME>", command),
            },
            "status" => match args.get(1) {
                Some(name) => {
                    let id = self.id_for(name);
                    match args.get(2).map(|style| style.parse::<Format>()) {
                        Some(Ok(style)) => {
                            let previous = std::mem::replace(&mut self.style, style);
                            let line = self.describe(id);
                            self.style = previous;
                            line
                        }
                        Some(Err(e)) => format!("Error: {}", e),
                        None => self.describe(id),
                    }
                }
                None => "Usage: status <NAME> [hms_ms|hms|ms|auto_short]".to_string(),
            },
            "advance" => match args.get(1) {
                Some(amount) => match raw_millis(amount).ok_or(()).or_else(|_| parse_strict(amount)) {
                    Ok(ms) => {
                        self.clock.advance(ms);
                        format!("--> Clock advanced by {} ms to {} ms.", ms, self.clock.now_ms())
                    }
                    Err(e) => format!("Error: '{}' is not a duration: {}", amount, e),
                },
                None => "Usage: advance <MS|HH:MM:SS>".to_string(),
            },
            "now" => format!("Clock: {} ms ({})", self.clock.now_ms(), render(self.clock.now_ms(), Format::HmsMs)),
            "list" => {
                let mut lines = vec![format!(
                    "Timers ({}/{}):",
                    self.tempo.len(),
                    self.tempo.capacity()
                )];
                for view in self.tempo.slots() {
                    lines.push(format!(
                        "  {:<16} {:<9} {:<8} duration {} anchor {}",
                        self.name_of(view.id),
                        view.kind.to_string(),
                        if view.active { "active" } else { "idle" },
                        render(view.duration, self.style),
                        view.anchor
                    ));
                }
                lines.join("\n")
            }
            "error" => match self.tempo.last_error() {
                Some(e) => format!("Last error: {} ({})", e.code(), e),
                None => "Last error: None".to_string(),
            },
            "help" => [
                "Available commands:",
                "  every <N> <D>        - Polls periodic timer N with period D.",
                "  start <N> <D>        - Starts one-shot N for duration D.",
                "  restart <N>          - Restarts an active one-shot with its duration.",
                "  cancel <N>           - Cancels one-shot N.",
                "  status <N> [F]       - Shows one-shot N, optionally in format F.",
                "  advance <D>          - Moves the clock forward by D.",
                "  now                  - Shows the clock.",
                "  list                 - Shows every allocated slot.",
                "  error                - Shows the last latched error.",
                "  exit                 - Quits the shell.",
                "Durations are raw milliseconds or strict HH:MM:SS.",
            ]
            .join("\n"),
            "exit" => return Outcome::Exit,
            _ => format!("Unknown command: '{}'. Type 'help'.", args.join(" ")),
        };
        Outcome::Print(message)
    }

    /// One-line summary of a one-shot timer.
    fn describe(&mut self, id: TimerId) -> String {
        let style = self.style;
        let name = self.name_of(id);
        let timer = self.tempo.one_shot(id);
        let state = if timer.is_running() {
            "running"
        } else if timer.is_done() {
            "done"
        } else {
            "idle"
        };
        format!(
            "--> '{}' {}: elapsed {}, remaining {}",
            name,
            state,
            timer.elapsed_text(style),
            timer.remaining_text(style)
        )
    }
}

/// A duration argument made only of digits is taken as milliseconds.
fn raw_millis(arg: &str) -> Option<u32> {
    if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
        arg.parse().ok()
    } else {
        None
    }
}

fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = TempoConfig::load(None)?;
    let mut shell = Shell::new(&config);

    let mut rl = Editor::new()?;
    let helper = MyHighlighter {};
    rl.set_helper(Some(helper));

    info!(
        "{} shell ready with {} slots on a manual clock.",
        ENGINE_NAME, config.capacity
    );
    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();
                match shell.execute(&args) {
                    Outcome::Print(message) if message.is_empty() => {}
                    Outcome::Print(message) => println!("{}", message),
                    Outcome::Exit => break,
                }
            }
            Err(_) => {
                println!("Exiting temposhell...");
                break;
            }
        }
    }

    Ok(())
}
