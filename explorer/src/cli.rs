//! CLI argument definitions

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use crate::editor::EditorFlavor;

#[derive(Parser, Debug)]
#[command(name = "vgexplorer")]
#[command(about = "File explorer panel that follows a running Vim/Neovim instance")]
#[command(after_help = "Panel mode reads commands from stdin and stops at EOF; \
run it from a terminal, not with stdin redirected from /dev/null.")]
pub struct Cli {
    /// Editor server name; also names this panel's control endpoint
    pub server_name: String,

    /// Drive Neovim through nvr instead of Vim
    #[arg(long, env = "VGEXPLORER_NEOVIM", value_parser = BoolishValueParser::new())]
    pub neovim: bool,

    /// Toggle the visibility of the running panel for SERVER_NAME and exit
    #[arg(long)]
    pub toggle: bool,

    /// Config file (default: <config dir>/vgexplorer/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn flavor(&self) -> EditorFlavor {
        if self.neovim {
            EditorFlavor::Neovim
        } else {
            EditorFlavor::Vim
        }
    }
}
