// Particle bursts for combat feedback (fire, poison, block, ...).
// Fire-and-forget: each batch shares one cleanup deadline. No cap on live particles.

use std::collections::HashSet;
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::timers::TimerQueue;
use crate::types::*;

/// Which way a burst travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    /// Evenly spaced around the circle.
    Radial,
}

/// Rendering recipe for one effect kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    pub count: usize,
    pub colors: &'static [&'static str],
    pub size: (f64, f64),
    pub lifetime_ms: u64,
    pub spread: f64,
    pub direction: Direction,
}

/// Named effect categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Fire,
    Poison,
    Block,
    Heal,
    Death,
    Power,
    Strength,
    Exhaust,
}

// Indexed by `EffectKind as usize`.
static CATALOG: [ParticleConfig; 8] = [
    ParticleConfig {
        count: 8,
        colors: &["#ff6b35", "#ff9f1c", "#ffba08"],
        size: (4.0, 8.0),
        lifetime_ms: 600,
        spread: 30.0,
        direction: Direction::Up,
    },
    ParticleConfig {
        count: 6,
        colors: &["#2ecc71", "#27ae60", "#1abc9c"],
        size: (3.0, 6.0),
        lifetime_ms: 800,
        spread: 20.0,
        direction: Direction::Down,
    },
    ParticleConfig {
        count: 5,
        colors: &["#3498db", "#2980b9", "#85c1e9"],
        size: (5.0, 10.0),
        lifetime_ms: 500,
        spread: 25.0,
        direction: Direction::Up,
    },
    ParticleConfig {
        count: 6,
        colors: &["#2ecc71", "#58d68d", "#82e0aa"],
        size: (4.0, 7.0),
        lifetime_ms: 700,
        spread: 20.0,
        direction: Direction::Up,
    },
    ParticleConfig {
        count: 12,
        colors: &["#e74c3c", "#c0392b", "#ff6b6b", "#333"],
        size: (5.0, 12.0),
        lifetime_ms: 800,
        spread: 50.0,
        direction: Direction::Radial,
    },
    ParticleConfig {
        count: 8,
        colors: &["#f39c12", "#f1c40f", "#ffd700"],
        size: (4.0, 8.0),
        lifetime_ms: 600,
        spread: 35.0,
        direction: Direction::Radial,
    },
    ParticleConfig {
        count: 6,
        colors: &["#e74c3c", "#c0392b", "#ff4757"],
        size: (4.0, 8.0),
        lifetime_ms: 500,
        spread: 20.0,
        direction: Direction::Up,
    },
    ParticleConfig {
        count: 8,
        colors: &["#95a5a6", "#7f8c8d", "#bdc3c7", "#ff6b35"],
        size: (3.0, 7.0),
        lifetime_ms: 700,
        spread: 30.0,
        direction: Direction::Up,
    },
];

impl EffectKind {
    pub const ALL: [EffectKind; 8] = [
        EffectKind::Fire,
        EffectKind::Poison,
        EffectKind::Block,
        EffectKind::Heal,
        EffectKind::Death,
        EffectKind::Power,
        EffectKind::Strength,
        EffectKind::Exhaust,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        EffectKind::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Fire => "fire",
            EffectKind::Poison => "poison",
            EffectKind::Block => "block",
            EffectKind::Heal => "heal",
            EffectKind::Death => "death",
            EffectKind::Power => "power",
            EffectKind::Strength => "strength",
            EffectKind::Exhaust => "exhaust",
        }
    }

    pub fn config(&self) -> &'static ParticleConfig {
        &CATALOG[*self as usize]
    }
}

/// Owns the live particle set and the per-batch cleanup deadlines.
pub struct ParticleEmitter<R: Rng = StdRng> {
    settings: ParticleSettings,
    rng: R,
    particles: Vec<Particle>,
    cleanup: TimerQueue<HashSet<String>>,
    next_batch: u64,
    torn_down: bool,
}

impl ParticleEmitter<StdRng> {
    /// Emitter with a reproducible random source.
    pub fn seeded(settings: ParticleSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleEmitter<R> {
    pub fn with_rng(settings: ParticleSettings, rng: R) -> Self {
        ParticleEmitter {
            settings,
            rng,
            particles: Vec::new(),
            cleanup: TimerQueue::new(),
            next_batch: 0,
            torn_down: false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn active_count(&self) -> usize {
        self.particles.len()
    }

    pub fn pending_batches(&self) -> usize {
        self.cleanup.len()
    }

    /// Burst every recognized request. Unknown kinds are skipped.
    /// Returns the batch's cleanup deadline, or `None` if nothing spawned.
    pub fn emit(&mut self, now: Millis, requests: &[EffectRequest]) -> Option<Millis> {
        if self.torn_down {
            return None;
        }

        self.next_batch += 1;
        let batch = self.next_batch;
        let mut spawned = Vec::new();

        for request in requests {
            let Some(kind) = EffectKind::from_name(&request.kind) else {
                debug!(kind = %request.kind, "unknown effect kind skipped");
                continue;
            };
            let config = kind.config();
            for i in 0..config.count {
                let id = format!("{}_{}_{}", kind.as_str(), batch, spawned.len());
                let particle = self.spawn(id, request, config, i);
                spawned.push(particle);
            }
        }

        let max_lifetime = spawned.iter().map(|p| p.lifetime_ms).max()?;
        let due = now.after(max_lifetime + self.settings.grace_ms);
        let ids = spawned.iter().map(|p| p.id.clone()).collect();
        self.cleanup.schedule(due, ids);

        trace!(batch, spawned = spawned.len(), "particle batch emitted");
        self.particles.extend(spawned);
        debug!(active = self.particles.len(), "live particles");
        Some(due)
    }

    /// Drop every batch whose deadline has passed. Returns how many particles went.
    pub fn tick(&mut self, now: Millis) -> usize {
        if self.torn_down {
            return 0;
        }
        let mut removed = 0;
        for (_, ids) in self.cleanup.drain_due(now) {
            let before = self.particles.len();
            self.particles.retain(|p| !ids.contains(&p.id));
            removed += before - self.particles.len();
        }
        removed
    }

    /// Drop everything. Later calls do nothing.
    pub fn teardown(&mut self) {
        self.cleanup.clear();
        self.particles.clear();
        self.torn_down = true;
    }

    fn spawn(
        &mut self,
        id: String,
        request: &EffectRequest,
        config: &ParticleConfig,
        index: usize,
    ) -> Particle {
        let (min, max) = config.size;
        let size = min + self.rng.gen::<f64>() * (max - min);
        let color = config.colors[self.rng.gen_range(0..config.colors.len())];

        let angle = match config.direction {
            Direction::Radial => 2.0 * PI * index as f64 / config.count as f64,
            Direction::Up => -PI / 2.0 + (self.rng.gen::<f64>() - 0.5) * 1.5,
            Direction::Down => PI / 2.0 + (self.rng.gen::<f64>() - 0.5) * 1.5,
        };
        let speed = config.spread + self.rng.gen::<f64>() * config.spread;

        let jitter = if self.settings.lifetime_jitter_ms > 0 {
            self.rng.gen_range(0..self.settings.lifetime_jitter_ms)
        } else {
            0
        };

        Particle {
            id,
            x: request.x,
            y: request.y,
            color: color.to_string(),
            size,
            lifetime_ms: config.lifetime_ms + jitter,
            dx: angle.cos() * speed,
            dy: angle.sin() * speed,
        }
    }
}
