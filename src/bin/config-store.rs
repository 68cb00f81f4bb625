use ajaxkit::config::settings::{Setting, SettingInfo};
use ajaxkit::config::storage::JsonStorageAdapter;
use ajaxkit::config::{config_store, config_store_write};
use anyhow::bail;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Inspects and edits the updater settings kept in a json file
#[derive(Debug, Parser)]
#[clap(name = "Config-Store", version = "0.1.0", author = "Ajaxkit")]
struct Cli {
    /// Json file the settings are read from and written to
    #[clap(short = 'f', long = "file", global = true, default_value = "settings.json")]
    file: String,

    #[clap(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Show a setting with its default and description
    Get { key: String },
    /// Store a new value, written as b:true, u:600, s:text and so on
    Set { key: String, value: String },
    /// Put a setting back to its default
    Reset { key: String },
    /// List the settings matching a wildcard pattern
    Ls {
        #[clap(default_value = "*")]
        pattern: String,
    },
}

fn lookup(key: &str) -> anyhow::Result<(SettingInfo, Setting)> {
    let store = config_store();
    match (store.get_info(key), store.get(key)) {
        (Some(info), Some(value)) => Ok((info, value)),
        _ => bail!("unknown setting: {key}"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new().with_level(LevelFilter::Warn).init()?;

    config_store_write().set_storage(Box::new(JsonStorageAdapter::open(&cli.file)?));

    match cli.action {
        Action::Get { key } => {
            let (info, value) = lookup(&key)?;
            println!("{key} = {value}");
            println!("  default: {}", info.default);
            println!("  {}", info.description);
        }
        Action::Set { key, value } => {
            let (info, _) = lookup(&key)?;
            let value: Setting = value.parse()?;
            if std::mem::discriminant(&value) != std::mem::discriminant(&info.default) {
                bail!("{key} expects a value like {}", info.default);
            }
            config_store().set(&key, value);
        }
        Action::Reset { key } => {
            let (info, _) = lookup(&key)?;
            config_store().set(&key, info.default);
        }
        Action::Ls { pattern } => {
            let store = config_store();
            let keys = store.find(&pattern);
            if keys.is_empty() {
                bail!("no settings match {pattern}");
            }
            for key in keys {
                if let Some(value) = store.get(&key) {
                    println!("{key:40} {value}");
                }
            }
        }
    }

    Ok(())
}
