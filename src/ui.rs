use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

/// How stage progress is drawn on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UiMode {
    /// Spinners when stderr is a terminal and stdout is not being piped.
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    pretty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, stderr_is_tty: bool, stdout_is_piped: bool) -> Self {
        let pretty = stderr_is_tty
            && match mode {
                UiMode::Pretty => true,
                UiMode::Auto => !stdout_is_piped,
                UiMode::Plain => false,
            };
        Self { pretty }
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        let spinner = if self.pretty {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            Some(spinner)
        } else {
            eprintln!("==> {}", name);
            None
        };
        StageGuard {
            name: name.to_string(),
            start: Instant::now(),
            spinner,
        }
    }
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl StageGuard {
    /// Running counters shown next to the spinner. No-op in plain mode.
    pub fn progress(&self, frames: u64, events: u64) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!(
                "{}… {} frames, {} gestures",
                self.name, frames, events
            ));
        }
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let message = format!("✔ {} ({})", self.name, format_duration(self.start.elapsed()));
        match &self.spinner {
            Some(spinner) => spinner.finish_with_message(message),
            None => eprintln!("{message}"),
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
