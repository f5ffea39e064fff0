use crate::cli::args::{ConfigAction, ConfigFormat};
use nested_params::Settings;

pub fn handle(action: ConfigAction, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::List { format } => handle_list(format, settings),
        ConfigAction::Show { key } => {
            println!("{}", settings.get(&key)?);
            Ok(())
        }
    }
}

fn handle_list(format: ConfigFormat, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        ConfigFormat::Toml => print!("{}", toml::to_string(settings)?),
        ConfigFormat::Text => {
            for (key, value) in settings.entries() {
                println!("{:<28} {}", key, value);
            }
            println!("\nUse 'config show KEY' for a single value");
        }
    }
    Ok(())
}
