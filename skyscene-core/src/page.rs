//! Static HTML rendering of a [`Widget`].
//!
//! The document carries the stylesheet for the particle classes, so the
//! animations run when the file is opened in a browser.

use anyhow::{Context as _, Result};
use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    controller::Widget,
    panel::WeatherPanel,
    scene::{Container, ContainerId},
};

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>skyscene</title>
<style>{% raw %}
body { margin: 0; min-height: 100vh; font-family: sans-serif; color: #fff;
       overflow: hidden; transition: background 1s; }
body.night-mode::after { content: ""; position: fixed; inset: 0; pointer-events: none;
       background: rgba(10, 10, 40, 0.45); }
.card { position: relative; z-index: 10; max-width: 320px; margin: 10vh auto; padding: 24px;
        text-align: center; background: rgba(255, 255, 255, 0.15); border-radius: 16px; }
#temp { font-size: 3em; margin: 8px 0; }
.layer { position: fixed; inset: 0; pointer-events: none; display: none; overflow: hidden; }
.layer.active { display: block; }
.sun { position: absolute; top: 8%; right: 10%; width: 120px; height: 120px; border-radius: 50%;
       background: radial-gradient(circle, #fff7b0, #ffd000); box-shadow: 0 0 60px #ffd000; }
.sun-rays { position: absolute; top: calc(8% - 60px); right: calc(10% - 60px); width: 240px;
       height: 240px; border-radius: 50%; animation: spin 30s linear infinite;
       background: repeating-conic-gradient(rgba(255, 230, 120, 0.35) 0 10deg, transparent 10deg 30deg); }
.cloud { position: absolute; left: -300px; width: 260px; height: 80px; border-radius: 80px;
         background: #fff; animation-name: drift; animation-timing-function: linear;
         animation-iteration-count: infinite; }
.drop { position: absolute; top: -20px; width: 2px; height: 18px;
        background: rgba(200, 220, 255, 0.7); animation-name: fall;
        animation-timing-function: linear; animation-iteration-count: infinite; }
.snow { position: absolute; top: -10px; border-radius: 50%; background: #fff;
        animation-name: fall; animation-timing-function: linear;
        animation-iteration-count: infinite; }
#thunder-container.active { animation: flash 6s infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
@keyframes drift { to { left: 110%; } }
@keyframes fall { to { transform: translateY(110vh); } }
@keyframes flash { 0%, 92%, 96%, 100% { background: transparent; }
                   94%, 98% { background: rgba(255, 255, 255, 0.8); } }
{% endraw %}</style>
</head>
<body{% if night_mode %} class="night-mode"{% endif %}{% if background %} style="background: {{ background }}"{% endif %}>
{% for c in containers -%}
<div id="{{ c.id }}" class="layer{% if c.active %} active{% endif %}">
{% for p in c.particles -%}
<div class="{{ p.class }}"{% if p.style %} style="{{ p.style }}"{% endif %}></div>
{% endfor -%}
</div>
{% endfor -%}
<main class="card">
<h1 id="location">{{ panel.location }}</h1>
<p id="temp">{{ panel.temperature }}</p>
<p id="description">{{ panel.description }}</p>
{% if panel.icon -%}
<img id="weather-icon" src="{{ panel.icon.src }}" alt="{{ panel.icon.alt }}">
{% else -%}
<img id="weather-icon" alt="">
{% endif -%}
<input id="city-input" type="text" placeholder="都市名">
<button id="search-button">検索</button>
</main>
</body>
</html>
"#;

/// Flattened view of the widget handed to the template.
#[derive(Debug, Serialize)]
struct PageView<'a> {
    panel: &'a WeatherPanel,
    night_mode: bool,
    background: Option<&'a str>,
    containers: Vec<ContainerView>,
}

#[derive(Debug, Serialize)]
struct ContainerView {
    id: &'static str,
    active: bool,
    particles: Vec<ParticleView>,
}

#[derive(Debug, Serialize)]
struct ParticleView {
    class: &'static str,
    style: String,
}

impl ContainerView {
    fn new(id: ContainerId, container: &Container) -> Self {
        Self {
            id: id.element_id(),
            active: container.active,
            particles: container
                .children
                .iter()
                .map(|p| ParticleView { class: p.css_class(), style: p.inline_style() })
                .collect(),
        }
    }
}

/// Render the whole page for the current widget state. Text and attribute
/// values are HTML-escaped by the template engine.
pub fn render_page(widget: &Widget) -> Result<String> {
    let scene = &widget.scene;
    let view = PageView {
        panel: &widget.panel,
        night_mode: scene.night_mode,
        background: scene.background.as_deref(),
        containers: ContainerId::ALL
            .into_iter()
            .map(|id| ContainerView::new(id, scene.container(id)))
            .collect(),
    };

    let context = Context::from_serialize(&view).context("Failed to build page context")?;
    Tera::one_off(PAGE_TEMPLATE, &context, true).context("Failed to render page template")
}
