use std::cell::RefCell;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::Command;
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use qbrowse::config::Config;
use qbrowse::event::EventSource;
use qbrowse::path::Path;
use qbrowse::tui::editor::HostRequest;
use qbrowse::tui::{self, Launch};

fn main() -> Result<()> {
  let args: Vec<String> = std::env::args().skip(1).collect();

  let mut show_help = false;
  let mut show_version = false;
  let mut show_init = false;
  let mut keep_open = false;
  let mut file_arg: Option<String> = None;
  let mut path_arg: Option<String> = None;

  for arg in &args {
    match arg.as_str() {
      "--help" | "-h" => show_help = true,
      "--version" | "-V" => show_version = true,
      "--init" => show_init = true,
      "--keep" | "-k" => keep_open = true,
      a if a.starts_with("--file=") => file_arg = a.strip_prefix("--file=").map(str::to_string),
      a if !a.starts_with('-') => path_arg = Some(a.to_string()),
      _ => {
        eprintln!("qbrowse: unknown option '{arg}'");
        std::process::exit(1);
      }
    }
  }

  if show_help {
    println!(concat!(
      "qbrowse - quick-pick file browser\n",
      "\n",
      "Usage: qbrowse [options] [workspace]\n",
      "\n",
      "Options:\n",
      "  --file=PATH              Start next to PATH with it preselected\n",
      "  -k, --keep               Reopen the browser after the editor exits\n",
      "  --init                   Write the default config to ~/.config/qbrowse/\n",
      "  -h, --help               Print this help message\n",
      "  -V, --version            Print version\n",
      "\n",
      "If no workspace is given, the current directory is used.\n",
      "Set QBROWSE_LOG (e.g. QBROWSE_LOG=debug) to log to the cache directory.",
    ));
    return Ok(());
  }

  if show_version {
    println!("qbrowse {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  if show_init {
    let config_path = match Config::config_path() {
      Ok(p) => p,
      Err(e) => {
        eprintln!("qbrowse: {e}");
        std::process::exit(1);
      }
    };

    let write_config = if config_path.exists() {
      eprint!("{} already exists. Overwrite? [y/N] ", config_path.display());
      let mut answer = String::new();
      io::stdin().read_line(&mut answer).unwrap_or(0);
      answer.trim().eq_ignore_ascii_case("y")
    } else {
      true
    };

    if write_config {
      match Config::dump_default_config(&config_path) {
        Ok(()) => println!("{}", config_path.display()),
        Err(e) => {
          eprintln!("qbrowse: {e}");
          std::process::exit(1);
        }
      }
    }
    return Ok(());
  }

  init_logging();

  let (config, mut config_errors) = Config::load();

  let workspace = path_arg
    .map(PathBuf::from)
    .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
  let workspace = std::fs::canonicalize(workspace)?;
  let mut document = match file_arg {
    Some(file) => Some(std::fs::canonicalize(file)?),
    None => None,
  };

  let original_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let _ = restore_terminal();
    original_hook(info);
  }));

  let mut first = true;
  loop {
    setup_terminal()?;
    if !first {
      // Keys typed into the editor may still be queued.
      EventSource::drain();
    }
    first = false;

    let terminal = Rc::new(RefCell::new(Terminal::new(CrosstermBackend::new(io::stdout()))?));
    let launch = Launch {
      workspace: Some(Path::from_file_path(&workspace)),
      document: document.as_deref().map(Path::from_file_path),
    };
    let outbox = tui::run(terminal, &config, launch, std::mem::take(&mut config_errors));
    restore_terminal()?;
    let outbox = outbox?;

    let mut edited = None;
    for request in &outbox.requests {
      execute_request(request)?;
      if let HostRequest::Edit { path, .. } = request {
        edited = Some(path.clone());
      }
    }

    match edited {
      Some(path) if keep_open => document = Some(path),
      _ => break,
    }
  }

  Ok(())
}

/// Logs go to a file so they never draw over the TUI. Nothing is installed
/// unless `QBROWSE_LOG` is set.
fn init_logging() {
  let Ok(filter) = EnvFilter::try_from_env("QBROWSE_LOG") else {
    return;
  };
  let Some(dir) = dirs::cache_dir().map(|d| d.join("qbrowse")) else {
    return;
  };
  if std::fs::create_dir_all(&dir).is_err() {
    return;
  }
  let Ok(file) = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(dir.join("qbrowse.log"))
  else {
    return;
  };
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .try_init();
}

fn setup_terminal() -> Result<()> {
  enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen)?;
  Ok(())
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen)?;
  Ok(())
}

fn execute_request(request: &HostRequest) -> Result<()> {
  match request {
    HostRequest::Edit { path, line } => {
      let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
      let mut command = Command::new(&editor);
      if let Some(line) = line {
        command.arg(format!("+{line}"));
      }
      tracing::info!("running {editor} on {}", path.display());
      command.arg(path).status()?;
    }
    HostRequest::PrintFolder(path) => println!("{}", path.display()),
  }
  Ok(())
}
