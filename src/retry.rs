use std::fmt::{self, Display};

use rand::{seq::SliceRandom, Rng};

use crate::{
    download::{Downloader, Outcome},
    error::Error,
    http::Transport,
    origin::ComposedOrigin,
    storage::{WallpaperCache, WallpaperFile},
    waiter::Waiter,
};

/// How a run ended up with a wallpaper.
#[derive(Debug)]
pub enum Resolution {
    /// A new photo, with the number of bytes downloaded.
    Downloaded(WallpaperFile, u64),
    /// The chosen photo had been stored by an earlier run.
    AlreadyPresent(WallpaperFile),
    /// Every attempt failed; this is a random photo from earlier runs.
    Fallback(WallpaperFile),
}

impl Resolution {
    pub fn file(&self) -> &WallpaperFile {
        match self {
            Resolution::Downloaded(file, _)
            | Resolution::AlreadyPresent(file)
            | Resolution::Fallback(file) => file,
        }
    }
}

/// Why a single attempt produced nothing.
#[derive(Debug)]
pub enum SoftFailure {
    NoPhoto,
    Rejected(Error),
    Download(Error),
}

impl Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftFailure::NoPhoto => f.write_str("no photo found"),
            SoftFailure::Rejected(e) => write!(f, "rejected: {}", e),
            SoftFailure::Download(e) => write!(f, "download failed: {}", e),
        }
    }
}

#[derive(Debug)]
enum State {
    /// Attempts left, this one included.
    Attempting(usize),
    Done(Resolution),
    FallbackToCache,
    HardFailure,
}

/// Asks for photos until one lands on disk or the attempt budget runs out.
pub struct RetryLoop<'a> {
    origin: &'a mut ComposedOrigin,
    transport: &'a dyn Transport,
    cache: &'a WallpaperCache,
    waiter: Waiter,
    budget: usize,
}

impl<'a> RetryLoop<'a> {
    pub fn new(
        origin: &'a mut ComposedOrigin,
        transport: &'a dyn Transport,
        cache: &'a WallpaperCache,
        waiter: Waiter,
        budget: usize,
    ) -> Self {
        Self {
            origin,
            transport,
            cache,
            waiter,
            budget,
        }
    }

    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> crate::Result<Resolution> {
        let mut state = State::Attempting(self.budget);

        loop {
            state = match state {
                State::Attempting(0) => State::FallbackToCache,
                State::Attempting(remaining) => {
                    let consumed = self.budget - remaining;
                    self.waiter.wait(consumed);

                    match self.attempt(rng) {
                        Ok(resolution) => State::Done(resolution),
                        Err(failure) => {
                            log::warn!(
                                "attempt {}/{} failed: {}",
                                consumed + 1,
                                self.budget,
                                failure
                            );
                            State::Attempting(remaining - 1)
                        }
                    }
                }
                State::FallbackToCache => match self.fallback(rng) {
                    Some(file) => State::Done(Resolution::Fallback(file)),
                    None => State::HardFailure,
                },
                State::Done(resolution) => return Ok(resolution),
                State::HardFailure => return Err(Error::Exhausted(self.budget)),
            };
        }
    }

    fn attempt<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Resolution, SoftFailure> {
        let photo = self
            .origin
            .photo(self.transport, rng)
            .ok_or(SoftFailure::NoPhoto)?;

        let downloader = Downloader::new(self.transport, self.cache);
        match downloader.download(&photo).map_err(SoftFailure::Download)? {
            Outcome::Saved(file, bytes) => {
                log::info!(
                    "downloaded {} ({}) from {}",
                    file.path().display(),
                    file.format().extension(),
                    photo.url()
                );
                Ok(Resolution::Downloaded(file, bytes))
            }
            Outcome::AlreadyPresent(file) => {
                log::info!("{} is already stored", photo.url());
                Ok(Resolution::AlreadyPresent(file))
            }
            Outcome::Rejected(e) => Err(SoftFailure::Rejected(e)),
        }
    }

    fn fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<WallpaperFile> {
        if !self.cache.is_store() {
            return None;
        }

        let stored = match self.cache.stored() {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!(
                    "unable to read {}: {}",
                    self.cache.directory().display(),
                    e
                );
                return None;
            }
        };

        let file = stored.choose(rng)?.clone();
        log::warn!("falling back to {}", file.path().display());
        Some(file)
    }
}
