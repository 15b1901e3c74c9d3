//! Input controller: turns user triggers into lookups and applies their
//! results to the shared widget state.
//!
//! Lookups may overlap. Each one takes a ticket from a monotonic sequence
//! when it starts, and its result is applied only if no newer lookup was
//! issued in the meantime.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, instrument};

use crate::{
    model::{Clock, SystemClock, WeatherReport},
    panel::WeatherPanel,
    provider::{LookupError, WeatherSource},
    scene::{Scene, SceneGenerator},
};

pub const ENTER_KEY: &str = "Enter";

/// Everything the page displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Widget {
    pub panel: WeatherPanel,
    pub scene: Scene,
}

/// A user action that may start a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger<'a> {
    /// The search button.
    Click,
    /// A key pressed in the city field, named like `KeyboardEvent.key`.
    Key(&'a str),
}

impl Trigger<'_> {
    pub fn fires(&self) -> bool {
        match self {
            Trigger::Click => true,
            Trigger::Key(key) => *key == ENTER_KEY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The trigger didn't fire or the city field was empty.
    Ignored,
    /// The result was written to the widget.
    Applied { ticket: u64, result: Result<WeatherReport, LookupError> },
    /// A newer lookup was issued before this one finished; nothing was written.
    Stale { ticket: u64, latest: u64 },
}

impl LookupOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LookupOutcome::Applied { .. })
    }
}

#[derive(Debug)]
pub struct Controller<R = StdRng> {
    source: Arc<dyn WeatherSource>,
    clock: Arc<dyn Clock>,
    generator: Mutex<SceneGenerator<R>>,
    widget: Mutex<Widget>,
    sequence: AtomicU64,
}

impl Controller<StdRng> {
    /// Local wall clock and an OS-seeded random source.
    pub fn with_defaults(source: Arc<dyn WeatherSource>) -> Self {
        Self::new(source, Arc::new(SystemClock), StdRng::from_os_rng())
    }
}

impl<R: Rng + Send> Controller<R> {
    pub fn new(source: Arc<dyn WeatherSource>, clock: Arc<dyn Clock>, rng: R) -> Self {
        Self {
            source,
            clock,
            generator: Mutex::new(SceneGenerator::new(rng)),
            widget: Mutex::new(Widget::default()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Handle a trigger with the current contents of the city field.
    pub async fn handle(&self, trigger: Trigger<'_>, input: &str) -> LookupOutcome {
        if !trigger.fires() || input.is_empty() {
            return LookupOutcome::Ignored;
        }
        self.lookup(input).await
    }

    /// Look up `city` and apply the result if it is still the latest request.
    #[instrument(skip(self))]
    pub async fn lookup(&self, city: &str) -> LookupOutcome {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let phase = self.clock.day_phase();
        debug!(ticket, ?phase, "lookup started");

        let result = self.source.current_weather(city).await;

        let mut widget = self.widget.lock();
        let latest = self.sequence.load(Ordering::SeqCst);
        if latest != ticket {
            debug!(ticket, latest, "discarding stale lookup result");
            return LookupOutcome::Stale { ticket, latest };
        }

        let Widget { panel, scene } = &mut *widget;
        panel.render(&result, phase);
        if let Ok(report) = &result {
            self.generator.lock().update(scene, &report.condition, phase);
        }

        LookupOutcome::Applied { ticket, result }
    }

    pub fn snapshot(&self) -> Widget {
        self.widget.lock().clone()
    }

    /// Number of lookups issued so far.
    pub fn issued(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}
