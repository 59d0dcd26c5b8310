use clap::Subcommand;
use workday_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Print the config file path
    Path,
    /// Set the default lunch offset in minutes
    SetOffset {
        /// Minutes worked before lunch (must be inside 1..=269)
        minutes: u32,
    },
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::SetOffset { minutes } => {
            workday_core::plan::validate_offset(chrono::Duration::minutes(i64::from(minutes)))?;
            let mut config = Config::load()?;
            config.alerts.default_lunch_offset_min = minutes;
            config.save()?;
            println!("ok");
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
