use chrono::Local;
use skyscene_core::{Widget, scene::ContainerId};

/// Plain-text rendering of the widget for the terminal.
pub fn summary(widget: &Widget) -> String {
    let panel = &widget.panel;
    let scene = &widget.scene;

    let mut out = format!("[{}]\n", Local::now().format("%H:%M:%S"));
    if !panel.location.is_empty() {
        out.push_str(&format!("{}  {}\n", panel.location, panel.temperature));
    }
    out.push_str(&format!("{}\n", panel.description));
    if let Some(icon) = &panel.icon {
        out.push_str(&format!("icon: {}\n", icon.src));
    }

    let active: Vec<&str> =
        scene.active_containers().into_iter().map(ContainerId::element_id).collect();
    let layers = if active.is_empty() { "none".to_string() } else { active.join(", ") };
    out.push_str(&format!(
        "scene: {layers} ({} particles){}\n",
        scene.particle_count(),
        if scene.night_mode { ", night" } else { "" },
    ));
    if let Some(bg) = &scene.background {
        out.push_str(&format!("background: {bg}\n"));
    }

    out
}
