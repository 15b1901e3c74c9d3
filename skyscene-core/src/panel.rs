//! Render layer: the text and icon fields of the weather widget.

use serde::Serialize;
use tracing::error;

use crate::{
    model::{DayPhase, WeatherReport},
    provider::LookupError,
};

pub const NIGHT_SUFFIX: &str = " (夜)";
pub const NOT_FOUND_MESSAGE: &str = "都市名が見つかりませんでした";
pub const NETWORK_FAILURE_MESSAGE: &str = "エラー:天気を読み込めませんでした";

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconImage {
    pub src: String,
    pub alt: String,
}

/// Fields the widget displays. Each is only ever overwritten, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherPanel {
    pub location: String,
    pub temperature: String,
    pub description: String,
    pub icon: Option<IconImage>,
}

impl WeatherPanel {
    pub fn render_report(&mut self, report: &WeatherReport, phase: DayPhase) {
        self.location = report.location_name.clone();
        self.temperature = format_temperature(report.temperature_c);

        self.description = report.description.clone();
        if phase.is_night() {
            self.description.push_str(NIGHT_SUFFIX);
        }

        self.icon = Some(IconImage {
            src: icon_url(&report.icon_code),
            alt: report.description.clone(),
        });
    }

    /// Only the description changes on failure.
    pub fn render_error(&mut self, err: &LookupError) {
        match err {
            LookupError::NotFound => {
                self.description = NOT_FOUND_MESSAGE.to_string();
            }
            LookupError::NetworkFailure(reason) => {
                error!(%reason, "weather lookup failed");
                self.description = NETWORK_FAILURE_MESSAGE.to_string();
            }
        }
    }

    pub fn render(&mut self, outcome: &Result<WeatherReport, LookupError>, phase: DayPhase) {
        match outcome {
            Ok(report) => self.render_report(report, phase),
            Err(err) => self.render_error(err),
        }
    }
}

/// Rounds half up, so 2.5 shows as 3 and -2.5 as -2.
pub fn round_temperature(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{} ℃", round_temperature(celsius))
}

pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_URL_BASE}/{icon_code}@2x.png")
}
