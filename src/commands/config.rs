use anyhow::Result;

use crate::cli::ConfigActions;
use crate::config::{Config, get_config_path};

pub fn run(config: &Config, action: &ConfigActions) -> Result<()> {
    match action {
        ConfigActions::Show => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        ConfigActions::Path => {
            println!("{}", get_config_path()?.display());
            Ok(())
        }
    }
}
