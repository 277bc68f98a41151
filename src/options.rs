use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::origin::OriginKind;

/// Downloads a random National Geographic photo and sets it as the desktop background.
///
/// Defaults for most options can be kept in ~/.ngwallpaper.conf as key=value lines
/// (destination, retries, timeout, store, origins, gallery).
#[derive(Debug, Parser)]
#[command(name = "ngwallpaper", version)]
pub struct Opt {
    /// Enable the "latest" wallpaper galleries.
    #[arg(long)]
    latest: bool,

    /// Enable the yearly wallpaper archive.
    #[arg(long)]
    archive: bool,

    /// Enable the miscellaneous photography galleries.
    #[arg(long, alias = "misc")]
    miscellaneous: bool,

    /// A directory for downloaded wallpapers.
    ///
    /// Defaults to the system temporary directory.
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Keep every downloaded photo.
    ///
    /// Stored photos are named after a hash of their url, so photos already on disk are not
    /// downloaded again. When every attempt fails, a stored photo is used instead.
    #[arg(short, long, overrides_with = "no_store")]
    store: bool,

    /// Overwrite a single file even if the configuration file enables store mode.
    #[arg(long, overrides_with = "store")]
    no_store: bool,

    /// Number of attempts before failing.
    #[arg(short, long)]
    retries: Option<usize>,

    /// Request timeout in seconds.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Apply the wallpaper by running this program with the file path as its last argument.
    #[arg(short, long)]
    command: Option<String>,

    /// Download a photo and print its path without changing the background.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Log more (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Opt {
    pub fn from_args() -> Self {
        Parser::parse()
    }

    /// Enabled origins, always in the order latest, archive, miscellaneous regardless of the
    /// order the flags were given in.
    pub fn origins(&self) -> Vec<OriginKind> {
        [
            (self.latest, OriginKind::Latest),
            (self.archive, OriginKind::Archive),
            (self.miscellaneous, OriginKind::Miscellaneous),
        ]
        .into_iter()
        .filter_map(|(enabled, kind)| enabled.then_some(kind))
        .collect()
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Store mode as set on the command line, if it was.
    pub fn store(&self) -> Option<bool> {
        match (self.store, self.no_store) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    pub fn retries(&self) -> Option<usize> {
        self.retries
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
