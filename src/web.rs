//! Browser host binding
//!
//! Exposes the controller to JavaScript. The page owns rendering, audio and
//! the question modal; it calls `tick` from `requestAnimationFrame` and
//! drains events as JSON once per frame.

use wasm_bindgen::prelude::*;

use crate::config::WorldConfig;
use crate::controller::{NullHost, SimulationController};

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One runner session driven from JavaScript
#[wasm_bindgen]
pub struct WebSession {
    controller: SimulationController,
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session from a JSON `WorldConfig` (missing fields default)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebSession, JsValue> {
        let config = WorldConfig::from_json(config_json).map_err(js_error)?;
        let controller = SimulationController::start(config, NullHost).map_err(js_error)?;
        Ok(Self { controller })
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.controller.tick(dt);
    }

    pub fn set_run_intent(&mut self, active: bool) {
        self.controller.set_run_intent(active);
    }

    pub fn request_jump(&mut self) {
        self.controller.request_jump();
    }

    pub fn set_avatar_enabled(&mut self, enabled: bool) {
        self.controller.set_avatar_enabled(enabled);
    }

    /// Returns the bonus applied; throws on protocol misuse
    pub fn report_answer(&mut self, answered_correctly: bool) -> Result<u32, JsValue> {
        self.controller
            .report_answer(answered_correctly)
            .map_err(js_error)
    }

    pub fn force_end(&mut self) -> bool {
        self.controller.force_end()
    }

    pub fn is_ended(&self) -> bool {
        self.controller.is_ended()
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.drain_events()).map_err(js_error)
    }

    /// Scoreboard as JSON
    pub fn scoreboard(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.scoreboard()).map_err(js_error)
    }

    /// Scoreboard as a single HUD line
    pub fn hud_text(&self) -> String {
        self.controller.scoreboard().to_string()
    }

    pub fn avatar_x(&self) -> f32 {
        self.controller.avatar().body.pos.x
    }

    pub fn avatar_y(&self) -> f32 {
        self.controller.avatar().body.pos.y
    }

    pub fn avatar_flickering(&self) -> bool {
        self.controller.avatar().is_flickering()
    }

    pub fn camera_x(&self) -> f32 {
        self.controller.camera().pos.x
    }

    pub fn camera_y(&self) -> f32 {
        self.controller.camera().pos.y
    }
}
