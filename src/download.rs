use crate::{
    error::{Error, UnsupportedError},
    http::Transport,
    origin::PhotoDescriptor,
    storage::{ImageFormat, WallpaperCache, WallpaperFile},
};

/// What became of a photo handed to the [`Downloader`].
#[derive(Debug)]
pub enum Outcome {
    /// Freshly downloaded, along with the number of bytes written.
    Saved(WallpaperFile, u64),
    /// Stored by an earlier run; nothing was fetched.
    AlreadyPresent(WallpaperFile),
    /// Not an image type we can use; nothing was fetched.
    Rejected(Error),
}

pub struct Downloader<'a> {
    transport: &'a dyn Transport,
    cache: &'a WallpaperCache,
}

impl<'a> Downloader<'a> {
    pub fn new(transport: &'a dyn Transport, cache: &'a WallpaperCache) -> Self {
        Self { transport, cache }
    }

    /// Fetches the photo into the cache directory.
    ///
    /// Transport failures and non-200 responses come back as errors; everything that happens
    /// before the request is expressed through [`Outcome`].
    pub fn download(&self, photo: &PhotoDescriptor) -> crate::Result<Outcome> {
        let format = match ImageFormat::from_url(photo.url()) {
            Some(format) => format,
            None => {
                return Ok(Outcome::Rejected(Error::Unsupported(
                    UnsupportedError::Extension,
                    photo.url().into(),
                )))
            }
        };

        if let Some(existing) = self.cache.find_existing(photo.url()) {
            return Ok(Outcome::AlreadyPresent(existing));
        }

        let fetched = self.transport.get(photo.url())?.require_ok()?;
        let file = self.cache.save(photo, format, &fetched.body)?;
        Ok(Outcome::Saved(file, fetched.body.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{Downloader, Outcome};
    use crate::{
        error::Error, http::testing::FixtureTransport, origin::PhotoDescriptor,
        storage::WallpaperCache,
    };

    static INDEX: &str = "http://ngm.nationalgeographic.com/wallpaper/2013/06/";
    static IMAGE: &str = "http://ngm.nationalgeographic.com/wallpaper/img/1.jpg";

    #[test]
    fn unsupported_types_are_not_fetched() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = WallpaperCache::new(dir.path(), "ngwallpaper", false);
        let transport = FixtureTransport::new();
        let downloader = Downloader::new(&transport, &cache);

        for url in [
            "http://example.com/img/1.gif",
            "http://example.com/img/1.tiff",
            "http://example.com/img/1",
            "http://example.com/img/1.jpg/",
        ] {
            let outcome = downloader.download(&PhotoDescriptor::new(INDEX, url))?;
            assert!(matches!(outcome, Outcome::Rejected(_)), "{}", url);
        }

        assert!(transport.requests().is_empty());
        assert_eq!(0, fs::read_dir(dir.path())?.count());
        Ok(())
    }

    #[test]
    fn store_mode_skips_known_photos() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = WallpaperCache::new(dir.path(), "ngwallpaper", true);
        let transport = FixtureTransport::new().with(IMAGE, "jpeg bytes");
        let downloader = Downloader::new(&transport, &cache);
        let photo = PhotoDescriptor::new(INDEX, IMAGE);

        let first = match downloader.download(&photo)? {
            Outcome::Saved(file, 10) => file,
            other => panic!("unexpected outcome: {:?}", other),
        };
        let second = match downloader.download(&photo)? {
            Outcome::AlreadyPresent(file) => file,
            other => panic!("unexpected outcome: {:?}", other),
        };

        assert_eq!(first, second);
        assert_eq!(1, transport.request_count(IMAGE));
        Ok(())
    }

    #[test]
    fn plain_mode_downloads_every_time() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = WallpaperCache::new(dir.path(), "ngwallpaper", false);
        let transport = FixtureTransport::new().with(IMAGE, "jpeg bytes");
        let downloader = Downloader::new(&transport, &cache);
        let photo = PhotoDescriptor::new(INDEX, IMAGE);

        assert!(matches!(downloader.download(&photo)?, Outcome::Saved(..)));
        assert!(matches!(downloader.download(&photo)?, Outcome::Saved(..)));
        assert_eq!(2, transport.request_count(IMAGE));
        Ok(())
    }

    #[test]
    fn bad_status_writes_nothing() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let cache = WallpaperCache::new(dir.path(), "ngwallpaper", true);
        let transport = FixtureTransport::new().with_status(IMAGE, 404);
        let downloader = Downloader::new(&transport, &cache);

        let result = downloader.download(&PhotoDescriptor::new(INDEX, IMAGE));
        assert!(matches!(result, Err(Error::Status(404, _))));
        assert_eq!(0, fs::read_dir(dir.path())?.count());
        Ok(())
    }
}
