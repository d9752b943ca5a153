use std::path::PathBuf;

use clap::Parser;

use crate::config::{LogFormat, Overrides};

/// REST CRUD service for to-do items and users.
#[derive(Parser, Debug)]
#[command(name = "restful-sample", version, about, long_about = None)]
pub struct Cli {
    /// Extra TOML file layered over the discovered config files.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `server=trace,info`.
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Colourise console output.
    #[arg(long)]
    pub log_color: Option<bool>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            log_color: self.log_color,
        }
    }
}
