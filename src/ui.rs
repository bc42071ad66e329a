use egui::Context;

use crate::controller::{Action, FrameLoop};
use crate::model::{Outcome, Projection};

/// Build the HUD for one frame.
pub fn build_ui(ctx: &Context, frame: &FrameLoop, fps: f32) {
    draw_crosshair(ctx);
    draw_status_window(ctx, frame, fps);
    draw_outcome_banner(ctx, frame.state.outcome());
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("crosshair")));
    let center = ctx.screen_rect().center();
    let size = 10.0;
    let stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    painter.line_segment([egui::pos2(center.x - size, center.y), egui::pos2(center.x + size, center.y)], stroke);
    painter.line_segment([egui::pos2(center.x, center.y - size), egui::pos2(center.x, center.y + size)], stroke);
}

/// Lines shown in the status window, top to bottom.
pub fn status_lines(frame: &FrameLoop, fps: f32) -> Vec<String> {
    let camera = &frame.camera;
    let state = &frame.state;
    let pos = camera.position;
    let projection = match state.projection() {
        Projection::Perspective => "perspective",
        Projection::Orthographic => "orthographic",
    };
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    vec![
        format!("FPS: {fps:.0}"),
        format!("Pos: x: {:.1} y: {:.1} z: {:.1}", pos.x, pos.y, pos.z),
        format!("Yaw: {:.1} Pitch: {:.1}", camera.yaw(), camera.pitch()),
        format!("Projection: {projection}"),
        format!("Holding lamp: {}", yes_no(state.lamp.held)),
        format!("Holding Sven: {}", yes_no(state.companion.held)),
        format!("Horror mode: {}", yes_no(state.horror_mode)),
        format!("Dark: {}", yes_no(state.is_dark)),
        format!(
            "Attenuation: linear {:.3} quadratic {:.4}",
            state.attenuation.linear, state.attenuation.quadratic
        ),
    ]
}

/// Human-readable key name for the controls list.
pub fn key_label(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        k if k.chars().count() == 1 => k.to_uppercase(),
        k => k.to_string(),
    }
}

fn draw_status_window(ctx: &Context, frame: &FrameLoop, fps: f32) {
    egui::Window::new("Status")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            for line in status_lines(frame, fps) {
                ui.label(egui::RichText::new(line).small());
            }
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            let bindings = frame.processor().bindings();
            for action in Action::ALL {
                let key = key_label(bindings.key_for(action));
                ui.label(egui::RichText::new(format!("{key} - {}", action.label())).small());
            }
            ui.label(egui::RichText::new("Mouse - Look (click to capture)").small());
        });
}

fn draw_outcome_banner(ctx: &Context, outcome: Outcome) {
    let (text, color) = match outcome {
        Outcome::Playing => return,
        Outcome::Lost => ("Caught! Press R to try again", egui::Color32::RED),
        Outcome::Won => ("Sven is safe! Press R to play again", egui::Color32::GREEN),
    };
    egui::Area::new(egui::Id::new("outcome_banner"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -32.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(text).size(28.0).color(color));
        });
}
