use std::{path::Path, process::Command};

use crate::error::Error;

/// Something that turns a file into the desktop background.
pub trait Background {
    fn apply(&self, path: &Path) -> crate::Result<()>;

    /// How the background gets applied, for the log.
    fn describe(&self) -> String;
}

/// Picks how to apply the wallpaper: `--dry-run` beats `--command`, which beats the desktop.
pub fn select(dry_run: bool, command: Option<&str>) -> crate::Result<Box<dyn Background>> {
    if dry_run {
        return Ok(Box::new(DryRun));
    }

    match command {
        Some(command) => External::parse(command)
            .map(|external| Box::new(external) as Box<dyn Background>)
            .ok_or_else(|| Error::Background("empty command".into(), None)),
        None => Ok(Box::new(Desktop)),
    }
}

/// The platform's own wallpaper setting.
pub struct Desktop;

impl Background for Desktop {
    fn apply(&self, path: &Path) -> crate::Result<()> {
        let path = path
            .to_str()
            .ok_or_else(|| Error::Background(format!("{} is not utf-8", path.display()), None))?;

        wallpaper::set_from_path(path)
            .map_err(|e| Error::Background(format!("{}: {}", path, e), None))
    }

    fn describe(&self) -> String {
        "the desktop".into()
    }
}

/// Runs a user-supplied program with the wallpaper path as its last argument.
pub struct External {
    program: String,
    args: Vec<String>,
}

impl External {
    /// Splits a command line on whitespace; the first word names the program.
    pub fn parse(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(String::from);
        Some(Self {
            program: words.next()?,
            args: words.collect(),
        })
    }
}

impl Background for External {
    fn apply(&self, path: &Path) -> crate::Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|e| Error::Background(self.program.clone(), Some(Box::new(e))))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Background(
                format!("{} exited with {}", self.program, status),
                None,
            ))
        }
    }

    fn describe(&self) -> String {
        self.program.clone()
    }
}

/// Leaves the background alone.
pub struct DryRun;

impl Background for DryRun {
    fn apply(&self, _path: &Path) -> crate::Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "nothing (dry run)".into()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{select, Background, External};
    use crate::error::Error;

    #[test]
    fn parse_command() {
        let external = External::parse("feh --bg-fill").unwrap();
        assert_eq!("feh", external.program);
        assert_eq!(vec!["--bg-fill"], external.args);
        assert!(External::parse("   ").is_none());
    }

    #[test]
    fn dry_run_beats_command() -> crate::Result<()> {
        assert_eq!("nothing (dry run)", select(true, Some("feh --bg-fill"))?.describe());
        assert_eq!("feh", select(false, Some("feh --bg-fill"))?.describe());
        assert_eq!("the desktop", select(false, None)?.describe());
        assert!(matches!(select(false, Some("  ")), Err(Error::Background(..))));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn external_failure_is_reported() {
        let path = Path::new("/tmp/ngwallpaper.jpg");
        assert!(External::parse("true").unwrap().apply(path).is_ok());
        assert!(External::parse("false").unwrap().apply(path).is_err());
    }
}
