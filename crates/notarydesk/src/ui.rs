//! Terminal side of the booking flow: toasts, checkout redirect, spinner.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use notarydesk_core::{Notice, NoticeLevel, Presenter};
use tracing::warn;
use url::Url;

use crate::output::Painter;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

/// Spinner on stderr; hidden in quiet mode or when stderr is not a TTY.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Prints notices to stderr and opens the checkout page.
///
/// Output is routed through the spinner so lines do not interleave with
/// its redraws.
pub struct TerminalPresenter {
    painter: Painter,
    quiet: bool,
    open_browser: bool,
    progress: ProgressBar,
}

impl TerminalPresenter {
    pub fn new(painter: Painter, quiet: bool, open_browser: bool, progress: ProgressBar) -> Self {
        Self {
            painter,
            quiet,
            open_browser,
            progress,
        }
    }

    fn line(&self, text: &str) {
        self.progress.suspend(|| eprintln!("{text}"));
    }
}

impl Presenter for TerminalPresenter {
    fn toast(&self, notice: Notice) {
        // Errors are shown even in quiet mode.
        if self.quiet && !notice.is_error() {
            return;
        }
        let title = match notice.level {
            NoticeLevel::Success => self.painter.success(&format!("✓ {}", notice.title)),
            NoticeLevel::Info => self.painter.info(&format!("ℹ {}", notice.title)),
            NoticeLevel::Error => self.painter.error(&format!("✗ {}", notice.title)),
        };
        self.line(&format!("{title}\n  {}", notice.message));
    }

    fn redirect(&self, url: &Url) {
        if !self.open_browser {
            return;
        }
        match open::that(url.as_str()) {
            Ok(()) => {
                if !self.quiet {
                    self.line(&self.painter.dim("Opened checkout in your browser."));
                }
            }
            Err(e) => {
                warn!(error = %e, "could not open browser");
                self.line(&format!("Continue to checkout: {url}"));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::ColorMode;

    fn quiet_presenter() -> TerminalPresenter {
        TerminalPresenter::new(Painter::new(&ColorMode::Never), true, false, ProgressBar::hidden())
    }

    #[test]
    fn redirect_without_browser_is_a_no_op() {
        let url = Url::parse("https://checkout.example.com/c/pay/cs_1").unwrap();
        quiet_presenter().redirect(&url);
    }

    #[test]
    fn quiet_toasts_do_not_panic() {
        let presenter = quiet_presenter();
        presenter.toast(Notice::success("Booking received", "ref ABCD1234"));
        presenter.toast(Notice::error("Booking failed", "try again"));
    }

    #[test]
    fn quiet_spinner_is_hidden() {
        assert!(spinner("Submitting booking...", true).is_hidden());
    }
}
