//! Decorative background: four particle containers plus a page gradient.
//!
//! Every update starts from a blank scene, so nothing from a previous
//! condition survives. Particle parameters are drawn from the injected
//! random source; pass a seeded [`rand::rngs::StdRng`] for reproducible
//! output.

use rand::Rng;
use tracing::debug;

use crate::model::{Condition, DayPhase};

pub const CLEAR_DAY_BACKGROUND: &str = "linear-gradient(to bottom, #f7b733, #fc4a1a)";
pub const CLEAR_NIGHT_BACKGROUND: &str = "linear-gradient(to bottom, #232526, #414345)";
pub const CLOUDS_BACKGROUND: &str = "linear-gradient(to bottom, #bdc3c7, #2c3e50)";
pub const RAIN_BACKGROUND: &str = "linear-gradient(to bottom, #4b6cb7, #182848)";
pub const SNOW_BACKGROUND: &str = "linear-gradient(to bottom, #cfd9df, #a1c4fd)";
pub const THUNDER_BACKGROUND: &str = "linear-gradient(to bottom, #1e130c, #9a8478)";
pub const DEFAULT_BACKGROUND: &str = "linear-gradient(to bottom, #6dd5ed, #2193b0)";

pub const CLOUD_COUNT: usize = 12;
pub const RAIN_DROP_COUNT: usize = 50;
pub const SNOW_FLAKE_COUNT: usize = 50;
pub const THUNDER_DROP_COUNT: usize = 70;

/// Clouds with an index below this start drifting without delay.
const IMMEDIATE_CLOUDS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CloudLayer {
    Far,
    Near,
}

impl CloudLayer {
    pub fn z_index(self) -> u8 {
        match self {
            CloudLayer::Far => 0,
            CloudLayer::Near => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParticle {
    pub top_pct: f64,
    pub scale: f64,
    pub opacity: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub layer: CloudLayer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropParticle {
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlakeParticle {
    pub left_pct: f64,
    pub size_px: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Particle {
    SunRays,
    SunDisc,
    Cloud(CloudParticle),
    Drop(DropParticle),
    Flake(FlakeParticle),
}

impl Particle {
    /// Stylesheet class driving the particle's animation.
    pub fn css_class(&self) -> &'static str {
        match self {
            Particle::SunRays => "sun-rays",
            Particle::SunDisc => "sun",
            Particle::Cloud(_) => "cloud",
            Particle::Drop(_) => "drop",
            Particle::Flake(_) => "snow",
        }
    }

    /// Inline `style` attribute; empty for the fixed sun elements.
    pub fn inline_style(&self) -> String {
        match self {
            Particle::SunRays | Particle::SunDisc => String::new(),
            Particle::Cloud(c) => format!(
                "top: {:.2}%; transform: scale({:.3}); opacity: {:.3}; \
                 animation-duration: {:.2}s; animation-delay: {:.2}s; z-index: {};",
                c.top_pct,
                c.scale,
                c.opacity,
                c.duration_s,
                c.delay_s,
                c.layer.z_index(),
            ),
            Particle::Drop(d) => format!(
                "left: {:.2}%; animation-duration: {:.3}s; animation-delay: {:.3}s;",
                d.left_pct, d.duration_s, d.delay_s,
            ),
            Particle::Flake(f) => format!(
                "left: {:.2}%; width: {size:.2}px; height: {size:.2}px; \
                 animation-duration: {:.2}s; animation-delay: {:.2}s;",
                f.left_pct,
                f.duration_s,
                f.delay_s,
                size = f.size_px,
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub active: bool,
    pub children: Vec<Particle>,
}

impl Container {
    fn reset(&mut self) {
        self.active = false;
        self.children.clear();
    }
}

/// Identifies one of the four decorative containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Rain,
    Sun,
    Cloud,
    Thunder,
}

impl ContainerId {
    pub const ALL: [ContainerId; 4] =
        [ContainerId::Rain, ContainerId::Sun, ContainerId::Cloud, ContainerId::Thunder];

    /// Element id in the rendered page.
    pub fn element_id(self) -> &'static str {
        match self {
            ContainerId::Rain => "rain-container",
            ContainerId::Sun => "sun-container",
            ContainerId::Cloud => "cloud-container",
            ContainerId::Thunder => "thunder-container",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub night_mode: bool,
    pub background: Option<String>,
    pub rain: Container,
    pub sun: Container,
    pub cloud: Container,
    pub thunder: Container,
}

impl Scene {
    pub fn container(&self, id: ContainerId) -> &Container {
        match id {
            ContainerId::Rain => &self.rain,
            ContainerId::Sun => &self.sun,
            ContainerId::Cloud => &self.cloud,
            ContainerId::Thunder => &self.thunder,
        }
    }

    pub fn active_containers(&self) -> Vec<ContainerId> {
        ContainerId::ALL.into_iter().filter(|id| self.container(*id).active).collect()
    }

    pub fn particle_count(&self) -> usize {
        ContainerId::ALL.iter().map(|id| self.container(*id).children.len()).sum()
    }

    fn reset(&mut self) {
        self.night_mode = false;
        self.rain.reset();
        self.sun.reset();
        self.cloud.reset();
        self.thunder.reset();
        self.background = None;
    }
}

/// Builds scenes from a weather condition and day phase.
#[derive(Debug)]
pub struct SceneGenerator<R> {
    rng: R,
}

impl<R: Rng> SceneGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Replace `scene` with the decoration for `condition` at `phase`.
    pub fn update(&mut self, scene: &mut Scene, condition: &Condition, phase: DayPhase) {
        scene.reset();

        if phase.is_night() {
            scene.night_mode = true;
        }

        let background = match condition {
            Condition::Clear if phase.is_night() => CLEAR_NIGHT_BACKGROUND,
            Condition::Clear => {
                scene.sun.active = true;
                scene.sun.children = vec![Particle::SunRays, Particle::SunDisc];
                CLEAR_DAY_BACKGROUND
            }
            Condition::Clouds => {
                scene.cloud.active = true;
                scene.cloud.children =
                    (0..CLOUD_COUNT).map(|i| Particle::Cloud(self.cloud(i))).collect();
                CLOUDS_BACKGROUND
            }
            Condition::Rain => {
                scene.rain.active = true;
                scene.rain.children =
                    (0..RAIN_DROP_COUNT).map(|_| Particle::Drop(self.drop(0.5, 0.5))).collect();
                RAIN_BACKGROUND
            }
            Condition::Snow => {
                scene.rain.active = true;
                scene.rain.children =
                    (0..SNOW_FLAKE_COUNT).map(|_| Particle::Flake(self.flake())).collect();
                SNOW_BACKGROUND
            }
            Condition::Thunderstorm => {
                scene.thunder.active = true;
                scene.rain.active = true;
                scene.rain.children = (0..THUNDER_DROP_COUNT)
                    .map(|_| Particle::Drop(self.drop(0.3, 0.3)))
                    .collect();
                THUNDER_BACKGROUND
            }
            Condition::Other(_) => DEFAULT_BACKGROUND,
        };

        scene.background = Some(background.to_string());

        debug!(
            %condition,
            night = phase.is_night(),
            particles = scene.particle_count(),
            "scene updated"
        );
    }

    fn cloud(&mut self, index: usize) -> CloudParticle {
        let top_pct = self.rng.random_range(0.0..60.0);
        let layer = if self.rng.random_bool(0.5) { CloudLayer::Far } else { CloudLayer::Near };

        let scale = self.rng.random_range(0.4..0.8);
        let (opacity, duration_s) = match layer {
            CloudLayer::Far => (self.rng.random_range(0.2..0.4), self.rng.random_range(50.0..70.0)),
            CloudLayer::Near => {
                (self.rng.random_range(0.5..0.8), self.rng.random_range(25.0..40.0))
            }
        };

        let delay = self.rng.random_range(0.0..30.0);
        let delay_s = if index < IMMEDIATE_CLOUDS { 0.0 } else { delay };

        CloudParticle { top_pct, scale, opacity, duration_s, delay_s, layer }
    }

    /// Duration is drawn from `[min_duration, min_duration + spread)`.
    fn drop(&mut self, min_duration: f64, spread: f64) -> DropParticle {
        DropParticle {
            left_pct: self.rng.random_range(0.0..100.0),
            duration_s: self.rng.random_range(min_duration..min_duration + spread),
            delay_s: self.rng.random_range(0.0..2.0),
        }
    }

    fn flake(&mut self) -> FlakeParticle {
        FlakeParticle {
            left_pct: self.rng.random_range(0.0..100.0),
            size_px: self.rng.random_range(5.0..10.0),
            duration_s: self.rng.random_range(4.0..7.0),
            delay_s: self.rng.random_range(0.0..5.0),
        }
    }
}
