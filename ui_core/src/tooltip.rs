// Tooltip visibility and placement with debounced show/hide.
// One instance per tooltip. Teardown cancels everything and latches.

use tracing::trace;

use crate::timers::{TimerId, TimerQueue};
use crate::types::*;

/// Gap between the trigger edge and the overlay anchor.
pub const EDGE_OFFSET: f64 = 8.0;

#[derive(Debug, Clone)]
enum TooltipAction {
    Show {
        trigger: Option<TriggerRegion>,
        placement: Placement,
    },
    Hide,
}

/// Tooltip state machine: hidden, pending show, visible, pending hide.
#[derive(Debug, Clone)]
pub struct Tooltip {
    settings: TooltipSettings,
    visible: bool,
    position: TooltipPosition,
    timers: TimerQueue<TooltipAction>,
    show_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
    torn_down: bool,
}

impl Tooltip {
    pub fn new(settings: TooltipSettings) -> Self {
        Tooltip {
            settings,
            visible: false,
            position: TooltipPosition::default(),
            timers: TimerQueue::new(),
            show_timer: None,
            hide_timer: None,
            torn_down: false,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> TooltipPosition {
        self.position
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True while a show or hide is waiting on its delay.
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Request the tooltip for `trigger`. Already visible: reposition only.
    /// Otherwise (re)start the show delay; an earlier pending show is dropped.
    pub fn show(&mut self, now: Millis, trigger: Option<TriggerRegion>, placement: Placement) {
        if self.torn_down {
            return;
        }
        self.cancel_hide();

        if self.visible {
            self.update_position(trigger.as_ref(), placement);
            return;
        }

        self.cancel_show();
        let due = now.after(self.settings.show_delay_ms);
        trace!(due = due.as_u64(), placement = placement.as_str(), "tooltip show scheduled");
        self.show_timer = Some(self.timers.schedule(due, TooltipAction::Show { trigger, placement }));
    }

    /// Cancel a pending show and hide, immediately or after the hide delay.
    pub fn hide(&mut self, now: Millis) {
        if self.torn_down {
            return;
        }
        self.cancel_show();

        if self.settings.hide_delay_ms > 0 {
            self.cancel_hide();
            let due = now.after(self.settings.hide_delay_ms);
            self.hide_timer = Some(self.timers.schedule(due, TooltipAction::Hide));
        } else {
            self.visible = false;
        }
    }

    /// Recompute the anchor from a trigger box. A missing trigger is a no-op.
    pub fn update_position(&mut self, trigger: Option<&TriggerRegion>, placement: Placement) {
        if self.torn_down {
            return;
        }
        if let Some(trigger) = trigger {
            self.position = compute_position(trigger, placement);
        }
    }

    /// Fire every delay that has elapsed by `now`. Returns true if anything fired.
    pub fn tick(&mut self, now: Millis) -> bool {
        if self.torn_down {
            return false;
        }
        let fired = self.timers.drain_due(now);
        let changed = !fired.is_empty();

        for (id, action) in fired {
            match action {
                TooltipAction::Show { trigger, placement } => {
                    if self.show_timer == Some(id) {
                        self.show_timer = None;
                    }
                    self.update_position(trigger.as_ref(), placement);
                    self.visible = true;
                }
                TooltipAction::Hide => {
                    if self.hide_timer == Some(id) {
                        self.hide_timer = None;
                    }
                    self.visible = false;
                }
            }
        }

        changed
    }

    /// Cancel all pending work. Later calls do nothing.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.show_timer = None;
        self.hide_timer = None;
        self.torn_down = true;
    }

    fn cancel_show(&mut self) {
        if let Some(id) = self.show_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_hide(&mut self) {
        if let Some(id) = self.hide_timer.take() {
            self.timers.cancel(id);
        }
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new(TooltipSettings::default())
    }
}

/// Anchor point for an overlay on `placement` side of `trigger`, in page space.
pub fn compute_position(trigger: &TriggerRegion, placement: Placement) -> TooltipPosition {
    let rect = &trigger.rect;
    let scroll = &trigger.scroll;

    let (x, y) = match placement {
        Placement::Bottom => (
            rect.left + scroll.x + rect.width / 2.0,
            rect.bottom() + scroll.y + EDGE_OFFSET,
        ),
        Placement::Left => (
            rect.left + scroll.x - EDGE_OFFSET,
            rect.top + scroll.y + rect.height / 2.0,
        ),
        Placement::Right => (
            rect.right() + scroll.x + EDGE_OFFSET,
            rect.top + scroll.y + rect.height / 2.0,
        ),
        Placement::Top => (
            rect.left + scroll.x + rect.width / 2.0,
            rect.top + scroll.y - EDGE_OFFSET,
        ),
    };

    TooltipPosition { x, y, placement }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trigger() -> TriggerRegion {
        TriggerRegion::new(Rect::new(100.0, 200.0, 50.0, 20.0), ScrollOffset { x: 0.0, y: 30.0 })
    }

    #[test]
    fn show_waits_for_delay() {
        let mut tip = Tooltip::default();
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);

        tip.tick(Millis::new(179));
        assert!(!tip.visible());

        tip.tick(Millis::new(180));
        assert!(tip.visible());
        assert_eq!(tip.position().x, 125.0);
        assert_eq!(tip.position().y, 222.0);
    }

    #[test]
    fn hide_before_show_fires_keeps_hidden() {
        let mut tip = Tooltip::default();
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);
        tip.hide(Millis::new(100));

        tip.tick(Millis::new(10_000));
        assert!(!tip.visible());
        assert!(!tip.has_pending());
    }

    #[test]
    fn later_show_supersedes_pending_one() {
        let mut tip = Tooltip::default();
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);
        tip.show(Millis::new(100), Some(trigger()), Placement::Bottom);

        // The first deadline (180) must not fire.
        tip.tick(Millis::new(200));
        assert!(!tip.visible());

        tip.tick(Millis::new(280));
        assert!(tip.visible());
        assert_eq!(tip.position().placement, Placement::Bottom);
    }

    #[test]
    fn show_while_visible_only_repositions() {
        let mut tip = Tooltip::default();
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);
        tip.tick(Millis::new(180));

        tip.show(Millis::new(500), Some(trigger()), Placement::Right);
        assert!(!tip.has_pending());
        assert_eq!(tip.position().placement, Placement::Right);
        assert_eq!(tip.position().x, 158.0);
    }

    #[test]
    fn delayed_hide_is_cancelled_by_show() {
        let mut tip = Tooltip::new(TooltipSettings {
            show_delay_ms: 180,
            hide_delay_ms: 250,
        });
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);
        tip.tick(Millis::new(180));

        tip.hide(Millis::new(300));
        assert!(tip.visible());
        tip.show(Millis::new(400), Some(trigger()), Placement::Top);

        tip.tick(Millis::new(1_000));
        assert!(tip.visible());
    }

    #[test]
    fn delayed_hide_fires() {
        let mut tip = Tooltip::new(TooltipSettings {
            show_delay_ms: 0,
            hide_delay_ms: 50,
        });
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);
        tip.tick(Millis::new(0));
        assert!(tip.visible());

        tip.hide(Millis::new(10));
        tip.tick(Millis::new(59));
        assert!(tip.visible());
        tip.tick(Millis::new(60));
        assert!(!tip.visible());
    }

    #[test]
    fn missing_trigger_is_noop() {
        let mut tip = Tooltip::default();
        tip.update_position(Some(&trigger()), Placement::Left);
        let before = tip.position();

        tip.update_position(None, Placement::Right);
        assert_eq!(tip.position(), before);
    }

    #[test]
    fn teardown_cancels_pending_show() {
        let mut tip = Tooltip::default();
        tip.show(Millis::new(0), Some(trigger()), Placement::Top);
        tip.teardown();

        assert!(!tip.tick(Millis::new(1_000)));
        assert!(!tip.visible());

        tip.show(Millis::new(2_000), Some(trigger()), Placement::Top);
        tip.tick(Millis::new(5_000));
        assert!(!tip.visible());
    }

    #[test]
    fn anchors_match_placement() {
        assert_eq!(Placement::Top.anchor(), (-0.5, -1.0));
        assert_eq!(Placement::Right.anchor(), (0.0, -0.5));
    }

    proptest! {
        #[test]
        fn every_placement_offsets_eight_from_edge(
            left in -2_000.0f64..2_000.0,
            top in -2_000.0f64..2_000.0,
            width in 0.0f64..800.0,
            height in 0.0f64..800.0,
            sx in 0.0f64..5_000.0,
            sy in 0.0f64..5_000.0,
        ) {
            let trigger = TriggerRegion::new(
                Rect::new(left, top, width, height),
                ScrollOffset { x: sx, y: sy },
            );
            let eps = 1e-6;

            let p = compute_position(&trigger, Placement::Top);
            prop_assert!(((top + sy) - p.y - EDGE_OFFSET).abs() < eps);
            prop_assert!((p.x - (left + sx + width / 2.0)).abs() < eps);

            let p = compute_position(&trigger, Placement::Bottom);
            prop_assert!((p.y - (top + height + sy) - EDGE_OFFSET).abs() < eps);

            let p = compute_position(&trigger, Placement::Left);
            prop_assert!(((left + sx) - p.x - EDGE_OFFSET).abs() < eps);
            prop_assert!((p.y - (top + sy + height / 2.0)).abs() < eps);

            let p = compute_position(&trigger, Placement::Right);
            prop_assert!((p.x - (left + width + sx) - EDGE_OFFSET).abs() < eps);
        }
    }
}
