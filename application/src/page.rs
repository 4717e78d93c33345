//! HTML [`Page`] rendering.

use std::{sync::Arc, time};

use derive_more::Debug;
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use service::domain::{session, timer};

/// Renderer of the timer HTML page.
///
/// Rendering is pure: every time-relative value comes from the provided
/// [`timer::State`].
#[derive(Clone, Debug)]
pub struct Page {
    /// Registry of the compiled templates.
    #[debug(skip)]
    registry: Arc<Handlebars<'static>>,
}

impl Page {
    /// Name of the start form template.
    const START: &'static str = "start";

    /// Name of the countdown template.
    const COUNTDOWN: &'static str = "countdown";

    /// Compiles the templates into a new [`Page`].
    ///
    /// # Errors
    ///
    /// If any of the templates fails to compile.
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry
            .register_partial("head", include_str!("../templates/head.hbs"))?;
        registry.register_template_string(
            Self::START,
            include_str!("../templates/start.hbs"),
        )?;
        registry.register_template_string(
            Self::COUNTDOWN,
            include_str!("../templates/countdown.hbs"),
        )?;

        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    /// Renders the provided [`timer::State`] of the provided session as an
    /// HTML document.
    ///
    /// # Errors
    ///
    /// If the template engine fails to render.
    pub fn render(
        &self,
        state: &timer::State,
        session: &session::Id,
        durations: Durations<'_>,
    ) -> Result<String, RenderError> {
        let session = session.as_ref();

        match *state {
            timer::State::Absent => {
                self.render_start(session, false, durations)
            }
            timer::State::JustExpired => {
                self.render_start(session, true, durations)
            }
            timer::State::Active {
                remaining,
                expires_at,
                duration,
            } => self.registry.render(
                Self::COUNTDOWN,
                &CountdownView {
                    session,
                    expires_at: expires_at.unix_timestamp_millis(),
                    remaining: format_remaining(remaining),
                    total: duration.map(timer::Duration::as_millis),
                    progress: duration
                        .map_or(0, |total| progress(remaining, total)),
                },
            ),
        }
    }

    /// Renders the start form.
    fn render_start(
        &self,
        session: &str,
        completed: bool,
        Durations { options, selected }: Durations<'_>,
    ) -> Result<String, RenderError> {
        self.registry.render(
            Self::START,
            &StartView {
                session,
                completed,
                selected: selected.as_secs(),
                options: options
                    .iter()
                    .map(|&d| DurationOption {
                        secs: d.as_secs(),
                        label: label(d),
                        selected: d == selected,
                    })
                    .collect(),
            },
        )
    }
}

/// [`timer::Duration`]s to choose from when starting a timer.
#[derive(Clone, Copy, Debug)]
pub struct Durations<'a> {
    /// Offered [`timer::Duration`]s.
    ///
    /// No choice is rendered if empty.
    pub options: &'a [timer::Duration],

    /// Pre-selected [`timer::Duration`].
    pub selected: timer::Duration,
}

/// Data of the start form template.
#[derive(Debug, Serialize)]
struct StartView<'a> {
    session: &'a str,
    completed: bool,
    selected: u32,
    options: Vec<DurationOption>,
}

/// Single choice of the start form.
#[derive(Debug, Serialize)]
struct DurationOption {
    secs: u32,
    label: String,
    selected: bool,
}

/// Data of the countdown template.
#[derive(Debug, Serialize)]
struct CountdownView<'a> {
    session: &'a str,
    expires_at: i64,
    remaining: String,
    total: Option<i64>,
    progress: u8,
}

/// Formats the remaining time as `MM:SS`, or as `H:MM:SS` starting from one
/// hour.
///
/// Sub-second precision is floored.
#[must_use]
pub fn format_remaining(remaining: time::Duration) -> String {
    let secs = remaining.as_secs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Human-readable label of the provided [`timer::Duration`].
fn label(duration: timer::Duration) -> String {
    match duration.as_secs() {
        secs if secs % 3600 == 0 => format!("{} h", secs / 3600),
        secs if secs % 60 == 0 => format!("{} min", secs / 60),
        secs => format!("{secs} s"),
    }
}

/// Elapsed percentage of the `total` [`timer::Duration`], clamped to
/// `0..=100`.
fn progress(remaining: time::Duration, total: timer::Duration) -> u8 {
    let total = u128::from(total.as_secs()) * 1000;
    let elapsed = total.saturating_sub(remaining.as_millis());
    u8::try_from((elapsed * 100 / total).min(100)).unwrap_or(100)
}
