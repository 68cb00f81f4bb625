use ajaxkit::config::config_store_write;
use ajaxkit::config::storage::JsonStorageAdapter;
use ajaxkit::prelude::*;
use anyhow::anyhow;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::sleep;
use url::Url;

/// Fetches a url or file into a scratch document and prints the document afterwards.
///
/// The scratch document is `<body><div id="content"></div></body>`.
#[derive(Debug, Parser)]
#[clap(name = "Page-Update", version = "0.1.0", author = "Ajaxkit")]
struct Cli {
    /// The url or file to fetch, relative to --base
    #[clap(required = true)]
    source: String,

    /// Node id or strategy#id to place the content at
    #[clap(short = 't', long = "target", default_value = "content")]
    target: String,

    /// Insertion strategy (inside, replace, before, after, top, bottom)
    #[clap(short = 'i', long = "insertion")]
    insertion: Option<String>,

    /// Effect to run on the target afterwards (blink, or a highlight colour)
    #[clap(short = 'e', long = "effect")]
    effect: Option<Effect>,

    /// Repeat the update every this many milliseconds
    #[clap(long = "every", conflicts_with = "effect")]
    every: Option<u64>,

    /// Number of periodic updates to wait for
    #[clap(short = 'n', long = "count", default_value_t = 3)]
    count: u32,

    /// Base url for relative sources, defaults to the current directory
    #[clap(short = 'b', long = "base")]
    base: Option<String>,

    /// Json settings file
    #[clap(short = 's', long = "settings")]
    settings: Option<String>,

    /// Enable debug logging
    #[clap(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.debug { LevelFilter::Debug } else { LevelFilter::Warn };
    SimpleLogger::new().with_level(level).init()?;

    if let Some(path) = &args.settings {
        config_store_write().set_storage(Box::new(JsonStorageAdapter::open(path)?));
    }

    let base = match &args.base {
        Some(base) => Url::parse(base)?,
        None => Url::from_directory_path(std::env::current_dir()?)
            .map_err(|()| anyhow!("current directory is not an absolute path"))?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    LocalSet::new().block_on(&runtime, run(args, base))
}

async fn run(args: Cli, base: Url) -> anyhow::Result<()> {
    let mut document = Document::new();
    let body = document.create_element(document.get_root(), "body", None)?;
    document.create_element(body, "div", Some("content"))?;

    let document = DocumentHandle::create(document);
    let updater = ContentUpdater::new(document.clone(), Rc::new(Fetcher::new(base)), WebTimers::new());
    let insertion = args.insertion.map(InsertionStrategy::from);

    let Some(every) = args.every else {
        let update = match args.effect {
            Some(effect) => updater.update_with_effect(&args.source, args.target.as_str(), insertion, effect)?,
            None => updater.update(&args.source, args.target.as_str(), insertion)?,
        };
        update.await?;

        println!("{}", document.get().write());
        return Ok(());
    };

    let id = updater.periodic_update(every, &args.source, args.target.as_str(), insertion)?;

    // Print halfway between two ticks, the fetch of a tick is usually done by then
    sleep(Duration::from_millis(every / 2)).await;
    for tick in 1..=args.count {
        sleep(Duration::from_millis(every)).await;
        println!("[{tick}] {}", document.get().write());
    }

    updater.cancel(id);
    Ok(())
}
