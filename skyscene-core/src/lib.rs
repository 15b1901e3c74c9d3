//! Core library for the `skyscene` weather widget.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The OpenWeather client and its typed lookup errors
//! - The weather panel (render layer) and the animated background scene
//! - The controller that ties a lookup to both, discarding stale results
//! - HTML rendering of the widget
//!
//! It is used by `skyscene-cli`, but can also be embedded elsewhere.

pub mod config;
pub mod controller;
pub mod model;
pub mod page;
pub mod panel;
pub mod provider;
pub mod scene;

pub use config::Config;
pub use controller::{Controller, LookupOutcome, Trigger, Widget};
pub use model::{Clock, Condition, DayPhase, FixedClock, SystemClock, WeatherReport};
pub use panel::WeatherPanel;
pub use provider::{LookupError, WeatherSource, openweather::OpenWeatherClient};
pub use scene::{Scene, SceneGenerator};
