use std::fmt::{self, Display};

use chrono::Duration;
use fmtsize::{Conventional, FmtSize};

use crate::retry::Resolution;

pub trait DurationFormat {
    fn into_formatter(self) -> DurationFormatter;
}

impl DurationFormat for Duration {
    fn into_formatter(self) -> DurationFormatter {
        DurationFormatter(self)
    }
}

/// Short elapsed time: `4.2s` below a minute, `3m07s` above.
pub struct DurationFormatter(Duration);

impl Display for DurationFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.0;
        if elapsed.num_minutes() == 0 {
            let tenths = elapsed.num_milliseconds().max(0) / 100;
            write!(f, "{}.{}s", tenths / 10, tenths % 10)
        } else {
            write!(
                f,
                "{}m{:02}s",
                elapsed.num_minutes(),
                elapsed.num_seconds() % 60
            )
        }
    }
}

/// One line describing where the wallpaper came from.
pub struct ResolutionSummary<'a>(pub &'a Resolution);

impl Display for ResolutionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Resolution::Downloaded(file, bytes) => write!(
                f,
                "{} ({})",
                file.path().display(),
                (*bytes).fmt_size(Conventional)
            ),
            Resolution::AlreadyPresent(file) => {
                write!(f, "{} (already stored)", file.path().display())
            }
            Resolution::Fallback(file) => {
                write!(f, "{} (stored earlier; no new photo found)", file.path().display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::DurationFormatter;

    #[test]
    fn duration_format() {
        let duration = Duration::seconds(4) + Duration::milliseconds(270);
        assert_eq!("4.2s", DurationFormatter(duration).to_string());

        let duration = Duration::minutes(3) + Duration::seconds(7);
        assert_eq!("3m07s", DurationFormatter(duration).to_string());
    }
}
