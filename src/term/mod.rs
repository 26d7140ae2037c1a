/*!
## Terminal Host

Loads a program from a file or URL, compiles it and drives the machine
from a plain loop. Ctrl-C stops the program between slices and stdin
feeds `INKEY$`.

*/

use crate::lang::{unescape_markup, Error};
use crate::mach::{compile, Console, Event, InputQueue, Runtime};
use crate::error;
use ansi_term::Style;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: qbasic [--list] [--markup] [--slice N] <file or url>";

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub source: String,
    /// Print the compiled program before running it.
    pub list: bool,
    /// Source is HTML-escaped text.
    pub markup: bool,
    /// Ops per slice.
    pub slice: usize,
}

impl Options {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Options, String> {
        let mut source = None;
        let mut list = false;
        let mut markup = false;
        let mut slice = 100_000;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" => list = true,
                "--markup" => markup = true,
                "--slice" => {
                    slice = match args.next().map(|s| s.parse::<usize>()) {
                        Some(Ok(n)) if n > 0 => n,
                        _ => return Err("--slice needs a positive number".to_string()),
                    }
                }
                s if s.starts_with("--") => return Err(format!("unknown option {}", s)),
                _ => {
                    if source.is_some() {
                        return Err(USAGE.to_string());
                    }
                    source = Some(arg);
                }
            }
        }
        match source {
            Some(source) => Ok(Options {
                source,
                list,
                markup,
                slice,
            }),
            None => Err(USAGE.to_string()),
        }
    }
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", e);
    }

    if let Err(error) = run(&options, interrupted) {
        eprintln!("{}", Style::new().bold().paint(error.to_string()));
        std::process::exit(1);
    }
}

fn run(options: &Options, interrupted: Arc<AtomicBool>) -> Result<(), Error> {
    let mut source = load(&options.source)?;
    if options.markup {
        source = unescape_markup(&source);
    }
    let program = compile(&source)?;
    info!(source = %options.source, ops = program.len(), "loaded");
    if options.list {
        print!("{}", program);
    }

    let keys = InputQueue::new();
    spawn_stdin(keys.clone());
    let mut runtime = Runtime::new(
        program,
        Box::new(Console::new(std::io::stdout())),
        Box::new(keys),
    );

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            runtime.interrupt();
        }
        match runtime.execute(options.slice) {
            Event::Running => {}
            Event::Yield => thread::yield_now(),
            Event::Sleep(delay) => thread::sleep(delay),
            Event::Stopped => return Ok(()),
            Event::Error(error) => return Err(error),
        }
    }
}

/// Each character typed becomes one key. Enter arrives as a carriage return.
fn spawn_stdin(keys: InputQueue) {
    thread::spawn(move || {
        let mut buf = [0; 1];
        let mut pending = vec![];
        let stdin = std::io::stdin();
        let mut stdin = stdin.lock();
        while let Ok(1) = stdin.read(&mut buf) {
            pending.push(buf[0]);
            if let Ok(s) = std::str::from_utf8(&pending) {
                for ch in s.chars() {
                    keys.push_key(if ch == '\n' { "\r".to_string() } else { ch.to_string() });
                }
                pending.clear();
            }
        }
        debug!("stdin closed");
    });
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn load(source: &str) -> Result<String, Error> {
    if is_url(source) {
        let response = reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .map_err(|e| error!(InternalError; e.to_string()))?;
        return response
            .text()
            .map_err(|e| error!(InternalError; e.to_string()));
    }
    std::fs::read_to_string(source).map_err(|e| error!(InternalError; format!("{}: {}", source, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_options() {
        let o = Options::parse(args("--list --slice 50 game.bas")).unwrap();
        assert_eq!(o.source, "game.bas");
        assert!(o.list);
        assert!(!o.markup);
        assert_eq!(o.slice, 50);
        assert_eq!(Options::parse(args("a.bas")).unwrap().slice, 100_000);
        assert!(Options::parse(args("--slice 0 a.bas")).is_err());
        assert!(Options::parse(args("--list")).is_err());
        assert!(Options::parse(args("--fast a.bas")).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load("/no/such/program.bas").is_err());
        assert!(is_url("https://example.com/x.bas"));
    }
}
