// Galleries at photography.nationalgeographic.com
//
// A gallery page only links to per-photo pages; the image itself sits behind the "download"
// link of each photo page, so every photo costs two requests.

use nipper::Document;
use rand::Rng;

use super::{absolute, pick, PhotoDescriptor};
use crate::error::{Error, ExtractionFailure};
use crate::http::Transport;

pub static GALLERIES: &[&str] = &[
    "http://photography.nationalgeographic.com/photography/photos/animals-wallpapers/",
    "http://photography.nationalgeographic.com/photography/photos/best-pod-2012/",
    "http://photography.nationalgeographic.com/photography/photos/extreme-earth-wallpapers/",
    "http://photography.nationalgeographic.com/photography/photos/landscape-wallpapers/",
    "http://photography.nationalgeographic.com/photography/photos/ocean-wallpapers/",
    "http://photography.nationalgeographic.com/photography/photos/patterns-nature-wallpapers/",
    "http://photography.nationalgeographic.com/photography/photos/space-wallpapers/",
    "http://photography.nationalgeographic.com/photography/photos/underwater-wallpapers/",
];

#[derive(Clone, Debug)]
pub struct MiscellaneousOrigin {
    galleries: Vec<String>,
}

impl MiscellaneousOrigin {
    pub fn new(galleries: Vec<String>) -> Self {
        Self { galleries }
    }

    pub(super) fn try_photo<R: Rng + ?Sized>(
        &self,
        transport: &dyn Transport,
        rng: &mut R,
    ) -> crate::Result<Option<PhotoDescriptor>> {
        let gallery = match pick(&self.galleries, rng) {
            Some(gallery) => gallery,
            None => return Ok(None),
        };

        let links = extract_wallpaper_links(&transport.get_page(gallery)?);
        let link = match pick(&links, rng) {
            Some(link) => absolute(gallery, link)?,
            None => return Ok(None),
        };

        let href = extract_download_link(&transport.get_page(&link)?)
            .ok_or_else(|| Error::Extraction(ExtractionFailure::DownloadLink, link.clone()))?;

        Ok(Some(PhotoDescriptor::new(gallery, absolute(&link, &href)?)))
    }
}

fn extract_wallpaper_links(content: &str) -> Vec<String> {
    Document::from(content)
        .select("#search_results div.wallpaper_link a")
        .iter()
        .filter_map(|anchor| anchor.attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// The single download anchor of a photo page. Pages offering zero or several are rejected.
fn extract_download_link(content: &str) -> Option<String> {
    let document = Document::from(content);
    let anchors = document.select("div.download_link a");
    let mut hrefs = anchors
        .iter()
        .filter_map(|anchor| anchor.attr("href").map(|href| href.to_string()));

    match (hrefs.next(), hrefs.next()) {
        (Some(href), None) => Some(href),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::MiscellaneousOrigin;
    use crate::http::testing::FixtureTransport;

    static GALLERY: &str = include_str!("../../resource/miscellaneous/gallery.html");
    static PHOTO: &str = include_str!("../../resource/miscellaneous/photo.html");

    static GALLERY_URL: &str =
        "http://photography.nationalgeographic.com/photography/photos/ocean-wallpapers/";
    static PHOTO_URL: &str =
        "http://photography.nationalgeographic.com/photography/photos/ocean-wallpapers/humpback-whale/";

    #[test]
    fn extract_wallpaper_links() {
        let links = super::extract_wallpaper_links(GALLERY);
        assert_eq!(
            vec![
                "humpback-whale/",
                "/photography/photos/ocean-wallpapers/kelp-forest/",
                "http://photography.nationalgeographic.com/photography/photos/ocean-wallpapers/sea-turtle/",
            ],
            links
        );
    }

    #[test]
    fn extract_download_link() {
        assert_eq!(
            Some(String::from("//images.nationalgeographic.com/wpf/media-live/photos/000/123/cache/humpback-whale_12345_1600x1200.jpg")),
            super::extract_download_link(PHOTO)
        );
    }

    #[test]
    fn ambiguous_download_link_is_rejected() {
        let content = r#"<div class="download_link"><a href="/a.jpg">a</a><a href="/b.jpg">b</a></div>"#;
        assert_eq!(None, super::extract_download_link(content));
        assert_eq!(None, super::extract_download_link("<html></html>"));
    }

    #[test]
    fn photo_takes_two_requests() {
        let gallery = r#"<div id="search_results"><div class="wallpaper_link"><a href="humpback-whale/">Whale</a></div></div>"#;
        let transport = FixtureTransport::new()
            .with(GALLERY_URL, gallery)
            .with(PHOTO_URL, PHOTO);

        let origin = MiscellaneousOrigin::new(vec![GALLERY_URL.into()]);
        let mut rng = StdRng::seed_from_u64(5);
        let photo = origin.try_photo(&transport, &mut rng).unwrap().unwrap();

        assert_eq!(GALLERY_URL, photo.index());
        assert_eq!(
            "http://images.nationalgeographic.com/wpf/media-live/photos/000/123/cache/humpback-whale_12345_1600x1200.jpg",
            photo.url()
        );
        assert_eq!(vec![GALLERY_URL, PHOTO_URL], transport.requests());
    }

    #[test]
    fn failed_photo_page_is_an_error() {
        let gallery = r#"<div id="search_results"><div class="wallpaper_link"><a href="humpback-whale/">Whale</a></div></div>"#;
        let transport = FixtureTransport::new()
            .with(GALLERY_URL, gallery)
            .with_status(PHOTO_URL, 404);

        let origin = MiscellaneousOrigin::new(vec![GALLERY_URL.into()]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(origin.try_photo(&transport, &mut rng).is_err());
    }

    #[test]
    fn empty_gallery_yields_no_photo() {
        let transport =
            FixtureTransport::new().with(GALLERY_URL, r#"<div id="search_results"></div>"#);
        let origin = MiscellaneousOrigin::new(vec![GALLERY_URL.into()]);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(None, origin.try_photo(&transport, &mut rng).unwrap());
        assert_eq!(1, transport.requests().len());
    }

    #[test]
    fn no_galleries_yields_no_photo() {
        let transport = FixtureTransport::new();
        let origin = MiscellaneousOrigin::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(None, origin.try_photo(&transport, &mut rng).unwrap());
        assert!(transport.requests().is_empty());
    }
}
