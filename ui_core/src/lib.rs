// ui_core: Spire Ascent Rust/WASM UI core.
// Tooltip timing, particle bursts, tutorial hints and combat previews. JS renders; state lives here.

mod combat_preview;
mod error;
mod onboarding;
mod particles;
mod storage;
mod timers;
mod tooltip;
mod tutorial;
mod types;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use combat_preview::{
    adjust_description, damage_breakdown, effective_block, effective_damage, preview_tone,
    AdjustedDescription, BlockInputs, CardStats, CombatPreview, CombatantStats, DamageBreakdown,
    DamageInputs, Memo, PreviewTone,
};
pub use error::UiError;
pub use onboarding::{OnboardingHint, OnboardingOverlay, WasmOnboarding, ONBOARDING_HINTS, SEEN_KEY};
pub use particles::{Direction, EffectKind, ParticleConfig, ParticleEmitter};
pub use storage::{JsStore, KeyValueStore, MemoryStore};
pub use timers::{TimerId, TimerQueue};
pub use tooltip::{compute_position, Tooltip, EDGE_OFFSET};
pub use tutorial::{
    GamePhase, TutorialSequencer, TutorialStep, WasmTutorial, DISMISSED_KEY, TUTORIAL_STEPS,
};
pub use types::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_tracing")]
    tracing_wasm::set_as_global_default();
}

/// Host clock (ms, as from `performance.now()`) to `Millis`.
fn host_millis(now_ms: f64) -> Millis {
    Millis::new(now_ms.max(0.0) as u64)
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct UiSnapshot<'a> {
    pub tooltip_visible: bool,
    pub tooltip: TooltipPosition,
    /// Translate fractions for the tooltip's placement, see [`Placement::anchor`].
    pub tooltip_anchor: (f64, f64),
    pub particles: &'a [Particle],
}

impl<'a> UiSnapshot<'a> {
    pub fn new(tooltip: &Tooltip, particles: &'a ParticleEmitter<StdRng>) -> Self {
        let position = tooltip.position();
        UiSnapshot {
            tooltip_visible: tooltip.visible(),
            tooltip: position,
            tooltip_anchor: position.placement.anchor(),
            particles: particles.particles(),
        }
    }
}

/// Main engine interface exposed to JavaScript: one tooltip plus the particle layer.
/// JSON in, JSON out, to keep JS↔WASM crossings cheap.
#[wasm_bindgen]
pub struct UiEngine {
    tooltip: Tooltip,
    particles: ParticleEmitter<StdRng>,
}

#[wasm_bindgen]
impl UiEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<UiEngine, JsValue> {
        let config = UiConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let seed = config
            .particles
            .seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);

        Ok(UiEngine {
            tooltip: Tooltip::new(config.tooltip),
            particles: ParticleEmitter::seeded(config.particles, seed),
        })
    }

    /// Schedule the tooltip for a measured trigger (`TriggerRegion` JSON).
    /// A missing trigger still shows the tooltip at its last position.
    pub fn show_tooltip(
        &mut self,
        now_ms: f64,
        trigger_json: Option<String>,
        placement: &str,
    ) -> Result<(), JsValue> {
        let trigger = trigger_json
            .map(|json| serde_json::from_str::<TriggerRegion>(&json))
            .transpose()
            .map_err(|e| js_error("Invalid trigger", e))?;
        self.tooltip
            .show(host_millis(now_ms), trigger, Placement::from_name(placement));
        Ok(())
    }

    pub fn hide_tooltip(&mut self, now_ms: f64) {
        self.tooltip.hide(host_millis(now_ms));
    }

    /// Burst a JSON array of `{type, x, y}` requests.
    pub fn emit_effects(&mut self, now_ms: f64, effects_json: &str) -> Result<(), JsValue> {
        let requests: Vec<EffectRequest> =
            serde_json::from_str(effects_json).map_err(|e| js_error("Invalid effects", e))?;
        self.particles.emit(host_millis(now_ms), &requests);
        Ok(())
    }

    /// Advance timers and return the frame snapshot as JSON.
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let now = host_millis(now_ms);
        self.tooltip.tick(now);
        self.particles.tick(now);
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        let snapshot = UiSnapshot::new(&self.tooltip, &self.particles);
        serde_json::to_string(&snapshot).map_err(|e| js_error("Serialization error", e))
    }

    /// Cancel every pending timer. Call on unmount.
    pub fn teardown(&mut self) {
        self.tooltip.teardown();
        self.particles.teardown();
    }
}

/// Input for a card preview.
#[derive(Debug, Clone, Deserialize)]
pub struct CardPreviewRequest {
    pub card: Option<CardStats>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub player: Option<CombatantStats>,
    #[serde(default)]
    pub target: Option<CombatantStats>,
}

/// Everything a card face and its tooltip show.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    pub damage: Option<i32>,
    pub block: Option<i32>,
    pub breakdown: Option<DamageBreakdown>,
    pub tone: PreviewTone,
    pub description: Option<AdjustedDescription>,
}

impl CardPreviewRequest {
    pub fn preview(&self) -> CardPreview {
        let card = self.card.as_ref();
        let player = self.player.as_ref();
        let target = self.target.as_ref();

        CardPreview {
            damage: effective_damage(card, player, target),
            block: effective_block(card, player),
            breakdown: damage_breakdown(card, player, target),
            tone: card.map_or(PreviewTone::Unchanged, |c| preview_tone(c, player, target)),
            description: card.zip(self.description.as_deref()).map(|(c, text)| {
                adjust_description(text, c, player, target)
            }),
        }
    }
}

/// Preview a card against live stats. JSON `CardPreviewRequest` in, `CardPreview` out.
#[wasm_bindgen]
pub fn preview_card(request_json: &str) -> Result<String, JsValue> {
    let request: CardPreviewRequest =
        serde_json::from_str(request_json).map_err(|e| js_error("Invalid preview request", e))?;
    serde_json::to_string(&request.preview()).map_err(|e| js_error("Serialization error", e))
}
