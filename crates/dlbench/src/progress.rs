use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;

const SPINNER_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

/// Spinner shown on stderr while one configuration runs.
///
/// Hidden when stderr is not a terminal. Cleared on drop, so an early
/// return never leaves a stale line behind.
pub struct TrialProgress {
    pb: ProgressBar,
}

impl TrialProgress {
    pub fn start(name: &str, iterations: u32) -> Self {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Some(style) = SPINNER_TEMPLATE.as_ref() {
            pb.set_style(style.clone());
        }
        pb.set_message(format!("{name} x{iterations}"));
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

impl Drop for TrialProgress {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
