mod background;
mod config;
mod download;
mod error;
mod format;
mod http;
mod options;
mod origin;
mod retry;
mod storage;
mod waiter;

use std::{fs, process};

use config::{Configuration, Settings};
use format::{DurationFormat, ResolutionSummary};
use http::HttpTransport;
use options::Opt;
use origin::ComposedOrigin;
use retry::RetryLoop;
use storage::WallpaperCache;
use waiter::Waiter;

pub type Result<T, E = error::Error> = std::result::Result<T, E>;

fn main() {
    let opt = Opt::from_args();

    let mut logger = colog::default_builder();
    logger.filter(None, opt.log_level());
    logger.init();

    if let Err(e) = run(&opt) {
        eprintln!("Failed to set wallpaper: {}", e);
        process::exit(1);
    }
}

fn run(opt: &Opt) -> crate::Result<()> {
    let start_time = chrono::Local::now();

    let settings = Settings::resolve(opt, &Configuration::init())?;
    fs::create_dir_all(&settings.destination)?;

    let transport = HttpTransport::new(settings.timeout)?;
    let cache = WallpaperCache::new(
        &settings.destination,
        settings.base_name.as_str(),
        settings.store,
    );
    let mut origin = ComposedOrigin::from_kinds(&settings.origins, &settings.galleries);
    let waiter = Waiter::new(settings.backoff_step, settings.backoff_ceiling);

    let resolution = RetryLoop::new(
        &mut origin,
        &transport,
        &cache,
        waiter,
        settings.retries,
    )
    .run(&mut rand::thread_rng())?;

    let background = background::select(opt.dry_run, opt.command())?;
    log::info!(
        "applying {} with {}",
        resolution.file().path().display(),
        background.describe()
    );
    background.apply(resolution.file().path())?;

    let elapsed = chrono::Local::now().signed_duration_since(start_time);
    println!(
        "{}\n{} elapsed",
        ResolutionSummary(&resolution),
        elapsed.into_formatter()
    );

    Ok(())
}
