use std::{env, fs, path::PathBuf, time::Duration};

use directories::UserDirs;

use crate::{error::Error, options::Opt, origin::OriginKind, Result};

pub static DEFAULT_BASE_NAME: &str = "ngwallpaper";
pub const DEFAULT_RETRIES: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);
pub const DEFAULT_BACKOFF_CEILING: Duration = Duration::from_secs(10);

/// Values read from `~/.ngwallpaper.conf`.
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    config: Vec<(Key, String)>,
}

impl Configuration {
    /// Reads the user's configuration file.
    ///
    /// Should there be no configuration file, a blank configuration is produced.
    pub fn init() -> Self {
        UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".ngwallpaper.conf"))
            .and_then(|conf| fs::read_to_string(conf).ok())
            .map(|text| Configuration::from_text(&text))
            .unwrap_or_default()
    }

    pub fn from_text(text: &str) -> Self {
        Configuration {
            config: read_config(text),
        }
    }

    /// The last value given for a key.
    pub fn get_config(&self, key: Key) -> Option<&str> {
        self.config
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value.as_ref())
    }

    /// Every value given for a repeatable key, in file order.
    pub fn get_all(&self, key: Key) -> impl Iterator<Item = &str> {
        self.config
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, value)| value.as_ref())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Destination,
    Gallery,
    Origins,
    Retries,
    Store,
    Timeout,
}

impl Key {
    fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "destination" => Some(Key::Destination),
            "gallery" => Some(Key::Gallery),
            "origins" => Some(Key::Origins),
            "retries" => Some(Key::Retries),
            "store" => Some(Key::Store),
            "timeout" => Some(Key::Timeout),
            _ => None,
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            Key::Destination => "destination",
            Key::Gallery => "gallery",
            Key::Origins => "origins",
            Key::Retries => "retries",
            Key::Store => "store",
            Key::Timeout => "timeout",
        }
    }
}

fn read_config(text: &str) -> Vec<(Key, String)> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            // Gallery urls carry their own '=' in query strings, so split once.
            let (key, value) = line.split_once('=')?;
            Key::from_identifier(key.trim()).map(|key| (key, value.trim().to_string()))
        })
        .collect()
}

/// Everything the wallpaper pipeline needs to know, resolved from the command line, the
/// configuration file and built-in defaults (in that order of precedence).
#[derive(Clone, Debug)]
pub struct Settings {
    pub timeout: Duration,
    pub destination: PathBuf,
    pub store: bool,
    pub retries: usize,
    pub origins: Vec<OriginKind>,
    pub galleries: Vec<String>,
    pub base_name: String,
    pub backoff_step: Duration,
    pub backoff_ceiling: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            timeout: DEFAULT_TIMEOUT,
            destination: env::temp_dir(),
            store: false,
            retries: DEFAULT_RETRIES,
            origins: Vec::new(),
            galleries: crate::origin::miscellaneous::GALLERIES
                .iter()
                .map(|&url| url.to_string())
                .collect(),
            base_name: DEFAULT_BASE_NAME.into(),
            backoff_step: DEFAULT_BACKOFF_STEP,
            backoff_ceiling: DEFAULT_BACKOFF_CEILING,
        }
    }
}

impl Settings {
    pub fn resolve(opt: &Opt, config: &Configuration) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(destination) = opt.destination().map(PathBuf::from).or_else(|| {
            config
                .get_config(Key::Destination)
                .map(|path| PathBuf::from(expand_home(path)))
        }) {
            settings.destination = destination;
        }

        if let Some(store) = opt.store() {
            settings.store = store;
        } else if let Some(value) = config.get_config(Key::Store) {
            settings.store = parse_flag(Key::Store, value)?;
        }

        if let Some(retries) = opt.retries() {
            settings.retries = retries;
        } else if let Some(value) = config.get_config(Key::Retries) {
            settings.retries = parse_number(Key::Retries, value)? as usize;
        }

        if let Some(secs) = opt.timeout() {
            settings.timeout = Duration::from_secs(secs);
        } else if let Some(value) = config.get_config(Key::Timeout) {
            settings.timeout = Duration::from_secs(parse_number(Key::Timeout, value)?);
        }

        settings.origins = opt.origins();
        if settings.origins.is_empty() {
            if let Some(value) = config.get_config(Key::Origins) {
                settings.origins = parse_origins(value)?;
            }
        }

        let galleries: Vec<_> = config.get_all(Key::Gallery).map(String::from).collect();
        if !galleries.is_empty() {
            settings.galleries = galleries;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.origins.is_empty() {
            return Err(Error::Configuration(
                Key::Origins,
                "no origin enabled (use --latest, --archive or --miscellaneous)".into(),
            ));
        }

        if self.retries == 0 {
            return Err(Error::Configuration(
                Key::Retries,
                "at least one attempt is required".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(Error::Configuration(
                Key::Timeout,
                "must be at least one second".into(),
            ));
        }

        Ok(())
    }
}

fn parse_number(key: Key, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::Configuration(key, format!("{:?} is not a number", value)))
}

fn parse_flag(key: Key, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::Configuration(
            key,
            format!("{:?} is not true or false", value),
        )),
    }
}

fn parse_origins(value: &str) -> Result<Vec<OriginKind>> {
    let mut origins = Vec::new();
    for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let kind = OriginKind::from_identifier(name).ok_or_else(|| {
            Error::Unsupported(crate::error::UnsupportedError::Origin, name.into())
        })?;
        if !origins.contains(&kind) {
            origins.push(kind);
        }
    }
    Ok(origins)
}

fn expand_home(path: &str) -> String {
    match path.strip_prefix("~/") {
        Some(rest) => UserDirs::new()
            .map(|dirs| dirs.home_dir().join(rest).to_string_lossy().into_owned())
            .unwrap_or_else(|| path.into()),
        None => path.into(),
    }
}
