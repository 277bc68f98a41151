pub mod composed;
pub mod miscellaneous;
pub mod ngm;

use std::fmt::{self, Display};

use rand::{seq::SliceRandom, Rng};
use url::Url;

use crate::http::Transport;

pub use composed::ComposedOrigin;
pub use miscellaneous::MiscellaneousOrigin;
pub use ngm::GalleryIndexOrigin;

/// A photo picked by an origin: where it was found and where the image itself lives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhotoDescriptor {
    index: String,
    url: String,
}

impl PhotoDescriptor {
    pub fn new(index: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            url: url.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OriginKind {
    Latest,
    Archive,
    Miscellaneous,
}

impl OriginKind {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "latest" => Some(OriginKind::Latest),
            "archive" => Some(OriginKind::Archive),
            "miscellaneous" | "misc" => Some(OriginKind::Miscellaneous),
            _ => None,
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            OriginKind::Latest => "latest",
            OriginKind::Archive => "archive",
            OriginKind::Miscellaneous => "miscellaneous",
        }
    }
}

impl Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// A source of photos.
///
/// Each call to [`Origin::photo`] yields at most one candidate. Every failure along the way
/// (network, status, markup) collapses into `None`; the caller just tries again.
#[derive(Debug)]
pub enum Origin {
    GalleryIndex(GalleryIndexOrigin),
    Miscellaneous(MiscellaneousOrigin),
}

impl Origin {
    pub fn from_kind(kind: OriginKind, galleries: &[String]) -> Self {
        match kind {
            OriginKind::Latest => Origin::GalleryIndex(GalleryIndexOrigin::latest()),
            OriginKind::Archive => Origin::GalleryIndex(GalleryIndexOrigin::archive()),
            OriginKind::Miscellaneous => {
                Origin::Miscellaneous(MiscellaneousOrigin::new(galleries.to_vec()))
            }
        }
    }

    pub fn kind(&self) -> OriginKind {
        match self {
            Origin::GalleryIndex(origin) => origin.kind(),
            Origin::Miscellaneous(_) => OriginKind::Miscellaneous,
        }
    }

    pub fn photo<R: Rng + ?Sized>(
        &mut self,
        transport: &dyn Transport,
        rng: &mut R,
    ) -> Option<PhotoDescriptor> {
        let kind = self.kind();
        let result = match self {
            Origin::GalleryIndex(origin) => origin.try_photo(transport, rng),
            Origin::Miscellaneous(origin) => origin.try_photo(transport, rng),
        };

        match result {
            Ok(Some(photo)) => {
                log::debug!("{} origin picked {}", kind, photo.url());
                Some(photo)
            }
            Ok(None) => {
                log::debug!("{} origin found no photo", kind);
                None
            }
            Err(e) => {
                log::debug!("{} origin failed: {}", kind, e);
                None
            }
        }
    }
}

/// Index urls discovered by an origin, fetched at most once per run.
#[derive(Clone, Debug, Default)]
pub struct IndexCache {
    populated: bool,
    urls: Vec<String>,
}

impl IndexCache {
    /// Fills the cache unless that has already happened.
    ///
    /// A failing loader leaves the cache empty and unpopulated; an empty (but successful)
    /// load still counts.
    pub fn get_or_load(
        &mut self,
        load: impl FnOnce() -> crate::Result<Vec<String>>,
    ) -> crate::Result<&[String]> {
        if !self.populated {
            self.urls = load()?;
            self.populated = true;
        }
        Ok(&self.urls)
    }
}

/// Picks one item uniformly at random.
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    items.choose(rng)
}

/// Expands relative and protocol-relative links against the page they were found on.
pub(crate) fn absolute(base: &str, href: &str) -> crate::Result<String> {
    Ok(Url::parse(base)?.join(href.trim())?.into())
}
