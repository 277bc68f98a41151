// National Geographic magazine wallpapers.
//
// Both flavors start from an index page whose drop-down (<option> values) lists one entry per
// gallery. "latest" galleries are plain HTML pages; the archive lists one XML manifest per
// year/month instead.

use rand::Rng;
use regex::Regex;
use scraper::{Html, Selector};

use super::{absolute, pick, IndexCache, OriginKind, PhotoDescriptor};
use crate::{
    error::{Error, ExtractionFailure},
    http::Transport,
};

pub static NGM_ROOT: &str = "http://ngm.nationalgeographic.com";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Flavor {
    Latest,
    Archive,
}

impl Flavor {
    fn path(self) -> &'static str {
        match self {
            Flavor::Latest => "/wallpaper",
            Flavor::Archive => "/wallpaper/download",
        }
    }

    fn container(self) -> &'static str {
        match self {
            Flavor::Latest => "div#entries-wallpaper",
            Flavor::Archive => "div#gallery_middle_content",
        }
    }

    fn value_pattern(self) -> &'static str {
        match self {
            Flavor::Latest => r"^/wallpaper/\d{4}/",
            Flavor::Archive => r"^/wallpaper/\d{4}/.*\.xml$",
        }
    }
}

#[derive(Debug)]
pub struct GalleryIndexOrigin {
    flavor: Flavor,
    root: String,
    value_pattern: Regex,
    cache: IndexCache,
}

impl GalleryIndexOrigin {
    pub fn latest() -> Self {
        Self::new(Flavor::Latest, NGM_ROOT)
    }

    pub fn archive() -> Self {
        Self::new(Flavor::Archive, NGM_ROOT)
    }

    pub fn new(flavor: Flavor, root: impl Into<String>) -> Self {
        Self {
            flavor,
            root: root.into(),
            value_pattern: Regex::new(flavor.value_pattern()).unwrap(),
            cache: IndexCache::default(),
        }
    }

    pub fn kind(&self) -> OriginKind {
        match self.flavor {
            Flavor::Latest => OriginKind::Latest,
            Flavor::Archive => OriginKind::Archive,
        }
    }

    pub(super) fn try_photo<R: Rng + ?Sized>(
        &mut self,
        transport: &dyn Transport,
        rng: &mut R,
    ) -> crate::Result<Option<PhotoDescriptor>> {
        let flavor = self.flavor;
        let root = &self.root;
        let pattern = &self.value_pattern;

        let indices = self.cache.get_or_load(|| {
            let url = format!("{}{}", root, flavor.path());
            let content = transport.get_page(&url)?;
            let indices = extract_indices(&content, flavor.container(), pattern, root)
                .ok_or(Error::Extraction(ExtractionFailure::IndexLinks, url))?;
            log::info!("{} galleries listed at {}{}", indices.len(), root, flavor.path());
            Ok(indices)
        })?;

        let index = match pick(indices, rng) {
            Some(index) => index.clone(),
            None => return Ok(None),
        };

        let content = transport.get_page(&index)?;
        let urls = match flavor {
            Flavor::Latest => extract_gallery_images(&content, root)
                .ok_or_else(|| Error::Extraction(ExtractionFailure::ImageUrl, index.clone()))?,
            Flavor::Archive => extract_manifest_images(&content, root)?,
        };

        Ok(pick(&urls, rng).map(|url| PhotoDescriptor::new(&index, url)))
    }
}

/// Reads the gallery drop-down of an index page.
///
/// Returns `None` when the page has no such drop-down at all; a drop-down without any matching
/// option simply yields an empty list.
fn extract_indices(
    content: &str,
    container: &str,
    pattern: &Regex,
    root: &str,
) -> Option<Vec<String>> {
    let container = Selector::parse(container).unwrap();
    let option = Selector::parse("option").unwrap();
    let document = Html::parse_document(content);
    let container = document.select(&container).next()?;

    Some(
        container
            .select(&option)
            .filter_map(|option| option.value().attr("value"))
            .filter(|value| pattern.is_match(value))
            .filter_map(|value| absolute(root, value).ok())
            .collect(),
    )
}

fn extract_gallery_images(content: &str, root: &str) -> Option<Vec<String>> {
    let gallery = Selector::parse("div#gallery").unwrap();
    let anchor = Selector::parse(r#"a[target="_blank"]"#).unwrap();
    let image = Regex::new(r"^/wallpaper/img/").unwrap();
    let document = Html::parse_document(content);
    let gallery = document.select(&gallery).next()?;

    Some(
        gallery
            .select(&anchor)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| image.is_match(href))
            .filter_map(|href| absolute(root, href).ok())
            .collect(),
    )
}

/// Reads the image urls of a yearly archive manifest.
///
/// Each `<photo>` carries a `<wallpaper>` element. Older manifests put the url straight in
/// its text; newer ones nest one element per resolution, the largest last.
fn extract_manifest_images(content: &str, root: &str) -> crate::Result<Vec<String>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(content, options)?;

    Ok(document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("photo"))
        .filter_map(|photo| {
            let wallpaper = photo
                .children()
                .find(|node| node.has_tag_name("wallpaper"))?;
            let text = wallpaper.text().map(str::trim).unwrap_or_default();
            let url = if text.is_empty() {
                wallpaper
                    .children()
                    .filter(|node| node.is_element())
                    .last()?
                    .text()?
                    .trim()
            } else {
                text
            };

            if url.is_empty() {
                None
            } else {
                absolute(root, url).ok()
            }
        })
        .collect())
}
