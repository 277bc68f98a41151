use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use url::Url;

use crate::origin::PhotoDescriptor;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Jpg,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Jpg, ImageFormat::Jpeg, ImageFormat::Png];

    fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" => Some(ImageFormat::Jpg),
            "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// The format implied by the extension of a url's last path segment. Query strings and
    /// fragments don't count, and a path ending in `/` has no extension.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let segment = url.path_segments()?.last()?;
        if segment.is_empty() {
            return None;
        }

        let extension = Path::new(segment).extension()?.to_str()?;
        Self::from_extension(extension)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }
}

/// A wallpaper on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WallpaperFile {
    path: PathBuf,
    format: ImageFormat,
}

impl WallpaperFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

/// Names and keeps track of the wallpapers in the destination directory.
///
/// Outside of store mode every download replaces `<base>.<ext>`. In store mode each photo gets
/// its own `<base>-<sha1 of url>.<ext>`, which is how photos downloaded by earlier runs are
/// recognized.
#[derive(Clone, Debug)]
pub struct WallpaperCache {
    directory: PathBuf,
    base_name: String,
    store: bool,
}

impl WallpaperCache {
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>, store: bool) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            store,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn is_store(&self) -> bool {
        self.store
    }

    fn stem(&self, url: &str) -> String {
        if self.store {
            format!("{}-{}", self.base_name, cache_key(url))
        } else {
            self.base_name.clone()
        }
    }

    pub fn target(&self, url: &str, format: ImageFormat) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.stem(url), format.extension()))
    }

    fn sidecar(&self, url: &str) -> PathBuf {
        self.directory.join(format!("{}.txt", self.stem(url)))
    }

    /// A stored copy of this url under any supported extension.
    ///
    /// Always `None` outside of store mode; the shared file name says nothing about which photo
    /// it holds.
    pub fn find_existing(&self, url: &str) -> Option<WallpaperFile> {
        if !self.store {
            return None;
        }

        ImageFormat::ALL.into_iter().find_map(|format| {
            let path = self.target(url, format);
            path.is_file().then_some(WallpaperFile { path, format })
        })
    }

    /// Writes the image and its sidecar.
    ///
    /// The image is written to a temporary file next to its target and renamed into place, so a
    /// failed download never leaves a truncated wallpaper behind.
    pub fn save(
        &self,
        photo: &PhotoDescriptor,
        format: ImageFormat,
        bytes: &[u8],
    ) -> crate::Result<WallpaperFile> {
        let path = self.target(photo.url(), format);

        let mut file = NamedTempFile::new_in(&self.directory)?;
        file.write_all(bytes)?;
        file.persist(&path)?;

        fs::write(self.sidecar(photo.url()), sidecar_text(photo))?;

        Ok(WallpaperFile { path, format })
    }

    /// Wallpapers stored by earlier runs.
    pub fn stored(&self) -> crate::Result<Vec<WallpaperFile>> {
        let prefix = format!("{}-", self.base_name);
        let mut files: Vec<_> = fs::read_dir(&self.directory)?
            .filter_map(|entry| Some(entry.ok()?.path()))
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(&prefix))
                    .unwrap_or_default()
            })
            .filter_map(|path| {
                let format = ImageFormat::from_path(&path)?;
                Some(WallpaperFile { path, format })
            })
            .collect();

        // read_dir order is unspecified
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

pub fn cache_key(url: &str) -> String {
    sha1_smol::Sha1::from(url).digest().to_string()
}

fn sidecar_text(photo: &PhotoDescriptor) -> String {
    format!("{}\n{}\n", photo.index(), photo.url())
}
