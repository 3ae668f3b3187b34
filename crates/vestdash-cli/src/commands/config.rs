//! Config command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::util::write_output;

/// Config as shown to the user, with passwords masked.
#[derive(Serialize)]
struct RedactedUser<'a> {
    username: &'a str,
    password: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    vests: &'a [i64],
}

#[derive(Serialize)]
struct RedactedConfig<'a> {
    api_url: &'a str,
    timeout: u64,
    recent_seconds: u64,
    no_color: bool,
    users: Vec<RedactedUser<'a>>,
}

impl<'a> From<&'a Config> for RedactedConfig<'a> {
    fn from(config: &'a Config) -> Self {
        Self {
            api_url: &config.api_url,
            timeout: config.timeout,
            recent_seconds: config.recent_seconds,
            no_color: config.no_color,
            users: config
                .users
                .iter()
                .map(|u| RedactedUser {
                    username: &u.username,
                    password: "********",
                    display_name: u.display_name.as_deref(),
                    vests: &u.vests,
                })
                .collect(),
        }
    }
}

fn show(config: &Config) -> Result<String> {
    toml::to_string_pretty(&RedactedConfig::from(config)).context("Failed to serialize config")
}

pub fn cmd_config(config: &Config, action: ConfigAction, output: Option<&PathBuf>) -> Result<()> {
    let path = Config::path();
    let content = match action {
        ConfigAction::Path => format!("{}\n", path.display()),
        ConfigAction::Show => {
            let mut content = format!("# {}\n", path.display());
            if !path.exists() {
                content.push_str("# (file not found, showing defaults)\n");
            }
            content.push_str(&show(config)?);
            content
        }
        ConfigAction::Init => {
            Config::init_at(&path)?;
            format!(
                "Wrote {}\nEdit the [[users]] entries before logging in.\n",
                path.display()
            )
        }
    };
    write_output(output, &content)?;
    Ok(())
}
