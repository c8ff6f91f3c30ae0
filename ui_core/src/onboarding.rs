// First-run walkthrough: four hints, Next / Skip All, shown once per store.

use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::error::UiError;
use crate::storage::{JsStore, KeyValueStore};

/// Storage key for the "walkthrough seen" flag.
pub const SEEN_KEY: &str = "spireAscent_hasSeenTutorial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingHint {
    pub id: &'static str,
    pub text: &'static str,
    /// Replaces `text` on desktop when set.
    pub desktop_text: Option<&'static str>,
    /// Replaces `text` on touch devices when set.
    pub mobile_text: Option<&'static str>,
    pub target: &'static str,
    pub position: &'static str,
}

impl OnboardingHint {
    pub fn text_for(&self, is_mobile: bool) -> &'static str {
        let specific = if is_mobile {
            self.mobile_text
        } else {
            self.desktop_text
        };
        specific.unwrap_or(self.text)
    }
}

pub static ONBOARDING_HINTS: [OnboardingHint; 4] = [
    OnboardingHint {
        id: "play-cards",
        text: "Drag cards up to play them",
        desktop_text: Some("Drag cards up to play them"),
        mobile_text: Some("Tap a card, then tap again to play"),
        target: "hand",
        position: "above-hand",
    },
    OnboardingHint {
        id: "draw-pile",
        text: "You draw 5 cards each turn",
        desktop_text: None,
        mobile_text: None,
        target: "draw-pile",
        position: "above-controls",
    },
    OnboardingHint {
        id: "energy",
        text: "Energy limits how many cards you play",
        desktop_text: None,
        mobile_text: None,
        target: "energy",
        position: "above-controls",
    },
    OnboardingHint {
        id: "end-turn",
        text: "Click End Turn when done",
        desktop_text: None,
        mobile_text: None,
        target: "end-turn",
        position: "above-controls",
    },
];

pub struct OnboardingOverlay<S: KeyValueStore> {
    store: S,
    index: usize,
    done: bool,
}

impl<S: KeyValueStore> OnboardingOverlay<S> {
    pub fn new(store: S) -> Self {
        let done = store.get(SEEN_KEY).as_deref() == Some("true");
        OnboardingOverlay {
            store,
            index: 0,
            done,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.done
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&'static OnboardingHint> {
        if self.done {
            return None;
        }
        ONBOARDING_HINTS.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == ONBOARDING_HINTS.len()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_last() {
            "Got it!"
        } else {
            "Next"
        }
    }

    /// Advance; the last hint finishes the walkthrough.
    pub fn next(&mut self) -> Result<(), UiError> {
        if self.done {
            return Ok(());
        }
        if self.is_last() {
            self.finish()
        } else {
            self.index += 1;
            Ok(())
        }
    }

    pub fn skip(&mut self) -> Result<(), UiError> {
        if self.done {
            return Ok(());
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<(), UiError> {
        self.done = true;
        self.store.set(SEEN_KEY, "true").map_err(|err| {
            warn!(error = %err, "could not persist onboarding flag");
            err
        })
    }
}

/// First-run overlay for JS, persisted through a `{ get, set }` store object.
#[wasm_bindgen]
pub struct WasmOnboarding {
    inner: OnboardingOverlay<JsStore>,
    is_mobile: bool,
}

#[wasm_bindgen]
impl WasmOnboarding {
    #[wasm_bindgen(constructor)]
    pub fn new(store: JsValue, is_mobile: bool) -> WasmOnboarding {
        WasmOnboarding {
            inner: OnboardingOverlay::new(JsStore::new(store)),
            is_mobile,
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Hint text for the device, or `None` once finished.
    pub fn text(&self) -> Option<String> {
        self.inner
            .current()
            .map(|hint| hint.text_for(self.is_mobile).to_string())
    }

    pub fn position(&self) -> Option<String> {
        self.inner.current().map(|hint| hint.position.to_string())
    }

    pub fn index(&self) -> usize {
        self.inner.index()
    }

    pub fn button_label(&self) -> String {
        self.inner.button_label().to_string()
    }

    pub fn next(&mut self) -> Result<(), JsValue> {
        self.inner.next().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn skip(&mut self) -> Result<(), JsValue> {
        self.inner.skip().map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn walks_all_hints_then_persists() {
        let mut store = MemoryStore::new();
        let mut overlay = OnboardingOverlay::new(&mut store);
        let mut seen = Vec::new();
        while let Some(hint) = overlay.current() {
            seen.push(hint.id);
            overlay.next().unwrap();
        }
        assert_eq!(seen, vec!["play-cards", "draw-pile", "energy", "end-turn"]);
        drop(overlay);
        assert_eq!(store.get(SEEN_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn skip_finishes_immediately() {
        let mut overlay = OnboardingOverlay::new(MemoryStore::new());
        overlay.skip().unwrap();
        assert!(!overlay.is_active());
        assert!(overlay.current().is_none());
    }

    #[test]
    fn seen_store_starts_hidden() {
        let overlay = OnboardingOverlay::new(MemoryStore::new().with_entry(SEEN_KEY, "true"));
        assert!(!overlay.is_active());
    }

    #[test]
    fn label_and_device_text() {
        let mut overlay = OnboardingOverlay::new(MemoryStore::new());
        let first = overlay.current().unwrap();
        assert_eq!(first.text_for(true), "Tap a card, then tap again to play");
        assert_eq!(first.text_for(false), "Drag cards up to play them");
        assert_eq!(overlay.button_label(), "Next");

        for _ in 0..3 {
            overlay.next().unwrap();
        }
        assert_eq!(overlay.button_label(), "Got it!");
        assert_eq!(overlay.current().unwrap().text_for(true), "Click End Turn when done");
    }
}
