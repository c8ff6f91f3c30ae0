// Contextual tutorial hints: at most one hint at a time, chosen by phase and turn,
// never repeated once dismissed.

use serde::{Deserialize, Serialize};
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::error::UiError;
use crate::storage::{JsStore, KeyValueStore};

/// Storage key holding the dismissed step ids as a JSON array.
pub const DISMISSED_KEY: &str = "spireAscent_tutorialDone";

/// Game screen the collaborator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Combat,
    Map,
    RestSite,
    /// Any screen without hints (shop, event, rewards, ...).
    #[serde(other)]
    Other,
}

/// One static hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TutorialStep {
    pub id: &'static str,
    pub phase: GamePhase,
    pub turn: Option<u32>,
    pub message: &'static str,
    /// CSS selector of the element the hint points at.
    pub target: &'static str,
}

impl GamePhase {
    pub fn from_name(name: &str) -> Self {
        match name {
            "combat" => GamePhase::Combat,
            "map" => GamePhase::Map,
            "rest_site" => GamePhase::RestSite,
            _ => GamePhase::Other,
        }
    }
}

impl TutorialStep {
    fn applies(&self, phase: GamePhase, turn: u32) -> bool {
        self.phase == phase && self.turn.map_or(true, |t| t == turn)
    }
}

/// Hint steps in priority order.
pub static TUTORIAL_STEPS: [TutorialStep; 6] = [
    TutorialStep {
        id: "energy",
        phase: GamePhase::Combat,
        turn: Some(1),
        message: "This is your Energy. Cards cost energy to play. You get 3 each turn.",
        target: ".energy-display",
    },
    TutorialStep {
        id: "cards",
        phase: GamePhase::Combat,
        turn: Some(1),
        message: "These are your cards. Click a card to select it, then click an enemy to play it.",
        target: ".hand-area",
    },
    TutorialStep {
        id: "endTurn",
        phase: GamePhase::Combat,
        turn: Some(1),
        message: "When you're done playing cards, click End Turn. Enemies will then attack.",
        target: ".end-turn-btn",
    },
    TutorialStep {
        id: "block",
        phase: GamePhase::Combat,
        turn: Some(2),
        message: "Block absorbs damage. It resets at the start of your turn.",
        target: ".player-block",
    },
    TutorialStep {
        id: "map",
        phase: GamePhase::Map,
        turn: None,
        message: "Choose your path up the Spire. Each icon is a different encounter type.",
        target: ".map-container",
    },
    TutorialStep {
        id: "rest",
        phase: GamePhase::RestSite,
        turn: None,
        message: "At Rest Sites you can heal 30% of your max HP, or upgrade a card to make it stronger.",
        target: ".rest-options",
    },
];

/// Picks the current hint from phase, turn and the persisted dismissed list.
pub struct TutorialSequencer<S: KeyValueStore> {
    store: S,
    steps: &'static [TutorialStep],
    dismissed: Vec<String>,
    phase: Option<GamePhase>,
    turn: u32,
    current: Option<&'static TutorialStep>,
}

impl<S: KeyValueStore> TutorialSequencer<S> {
    pub fn new(store: S) -> Self {
        Self::with_steps(store, &TUTORIAL_STEPS)
    }

    pub fn with_steps(store: S, steps: &'static [TutorialStep]) -> Self {
        let dismissed = load_dismissed(&store);
        TutorialSequencer {
            store,
            steps,
            dismissed,
            phase: None,
            turn: 0,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&'static TutorialStep> {
        self.current
    }

    pub fn dismissed(&self) -> &[String] {
        &self.dismissed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report the collaborator's phase and turn; re-selects the hint.
    pub fn observe(&mut self, phase: GamePhase, turn: u32) -> Option<&'static TutorialStep> {
        self.phase = Some(phase);
        self.turn = turn;
        self.reevaluate();
        self.current
    }

    /// Dismiss the hint on screen. The in-memory set is updated even if
    /// persisting fails.
    pub fn dismiss_current(&mut self) -> Result<(), UiError> {
        let Some(step) = self.current.take() else {
            return Ok(());
        };
        self.dismissed.push(step.id.to_string());
        let result = self.persist();
        self.reevaluate();
        result
    }

    /// Mark every step dismissed in one write.
    pub fn dismiss_all(&mut self) -> Result<(), UiError> {
        self.dismissed = self.steps.iter().map(|s| s.id.to_string()).collect();
        self.current = None;
        self.persist()
    }

    fn reevaluate(&mut self) {
        let Some(phase) = self.phase else {
            self.current = None;
            return;
        };
        let turn = self.turn;
        let dismissed = &self.dismissed;
        self.current = self
            .steps
            .iter()
            .filter(|s| !dismissed.iter().any(|d| d == s.id))
            .find(|s| s.applies(phase, turn));
    }

    fn persist(&mut self) -> Result<(), UiError> {
        let json = serde_json::to_string(&self.dismissed)?;
        self.store.set(DISMISSED_KEY, &json).map_err(|err| {
            warn!(error = %err, "could not persist dismissed tutorial hints");
            err
        })
    }
}

/// Absent or unreadable data is an empty list.
fn load_dismissed<S: KeyValueStore>(store: &S) -> Vec<String> {
    let Some(raw) = store.get(DISMISSED_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Option<Vec<String>>>(&raw) {
        Ok(list) => list.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "corrupt dismissed tutorial list, starting fresh");
            Vec::new()
        }
    }
}

// ============================================================================
// WASM Bindings
// ============================================================================

/// Tutorial sequencer for JS, persisted through a `{ get, set }` store object.
#[wasm_bindgen]
pub struct WasmTutorial {
    inner: TutorialSequencer<JsStore>,
}

#[wasm_bindgen]
impl WasmTutorial {
    #[wasm_bindgen(constructor)]
    pub fn new(store: JsValue) -> WasmTutorial {
        WasmTutorial {
            inner: TutorialSequencer::new(JsStore::new(store)),
        }
    }

    /// Report phase and turn. Returns the current step as JSON, if any.
    pub fn observe(&mut self, phase: &str, turn: u32) -> Result<Option<String>, JsValue> {
        self.inner.observe(GamePhase::from_name(phase), turn);
        self.current()
    }

    pub fn current(&self) -> Result<Option<String>, JsValue> {
        self.inner
            .current()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn dismiss_current(&mut self) -> Result<(), JsValue> {
        self.inner
            .dismiss_current()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn dismiss_all(&mut self) -> Result<(), JsValue> {
        self.inner
            .dismiss_all()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
