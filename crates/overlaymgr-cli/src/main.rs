use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use overlaymgr_core::{OverlayInfo, OverlayState};
use overlaymgr_settings::{ChangeListener, OverlaySettings, SettingsChange, SettingsStore};

mod completion;
mod dispatch;
mod logging;
mod render;

use completion::write_completions_script;
use dispatch::run_cli;
use logging::{init_tracing, LoggingListener};
use render::{format_overlay_list_lines, render_status_line, resolve_output_style, OutputStyle};

const STATE_ROOT_ENV: &str = "OVERLAYMGR_STATE_ROOT";

#[derive(Parser, Debug)]
#[command(name = "overlaymgr")]
#[command(about = "Inspect and edit the ordered overlay registry", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    state_root: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = 0, allow_negative_numbers = true)]
    user: i32,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    List {
        #[arg(long)]
        json: bool,
    },
    Init {
        package: String,
        target: String,
        base_code_path: String,
    },
    Remove {
        package: String,
    },
    Enable {
        package: String,
    },
    Disable {
        package: String,
    },
    SetState {
        package: String,
        state: String,
        #[arg(long)]
        wait: bool,
    },
    SetUpgrading {
        package: String,
        #[arg(action = clap::ArgAction::Set)]
        upgrading: bool,
    },
    SetPriority {
        package: String,
        parent: String,
    },
    RemoveUser,
    Users,
    Dump,
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let style = resolve_output_style(io::IsTerminal::is_terminal(&io::stdout()));
    run_cli(cli, style, &mut out)
}

fn resolve_state_root(flag: Option<PathBuf>, env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root);
    }
    if let Some(root) = env_value.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    default_state_root()
}

fn default_state_root() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve overlay state root")?;
        return Ok(PathBuf::from(app_data).join("overlaymgr"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve overlay state root")?;
    Ok(PathBuf::from(home).join(".overlaymgr"))
}
