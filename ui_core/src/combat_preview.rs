// Card damage/block previews from live combatant status.
// Modifier order is fixed: additive stat, then weak/frail, then vulnerable; floor after each multiply.

use serde::{Deserialize, Serialize};

const WEAK_FACTOR: f64 = 0.75;
const FRAIL_FACTOR: f64 = 0.75;
const VULNERABLE_FACTOR: f64 = 1.5;

/// Printed numbers on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardStats {
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub block: Option<i32>,
    #[serde(default)]
    pub strength_multiplier: Option<i32>,
    #[serde(default)]
    pub hits: Option<u32>,
}

impl CardStats {
    pub fn attack(damage: i32) -> Self {
        CardStats {
            damage: Some(damage),
            ..Default::default()
        }
    }

    pub fn skill(block: i32) -> Self {
        CardStats {
            block: Some(block),
            ..Default::default()
        }
    }

    /// Missing or zero multiplier counts as 1.
    fn strength_multiplier(&self) -> i32 {
        self.strength_multiplier.filter(|m| *m != 0).unwrap_or(1)
    }
}

/// Status stacks read from the game state. Never mutated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CombatantStats {
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub weak: i32,
    #[serde(default)]
    pub vulnerable: i32,
    #[serde(default)]
    pub dexterity: i32,
    #[serde(default)]
    pub frail: i32,
}

/// Exactly the fields the damage preview depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageInputs {
    pub base: Option<i32>,
    pub strength_multiplier: i32,
    /// `(strength, weak)`, `None` without a player.
    pub attacker: Option<(i32, i32)>,
    pub target_vulnerable: i32,
}

impl DamageInputs {
    pub fn from_parts(
        card: Option<&CardStats>,
        player: Option<&CombatantStats>,
        target: Option<&CombatantStats>,
    ) -> Self {
        DamageInputs {
            base: card.and_then(|c| c.damage),
            strength_multiplier: card.map_or(1, |c| c.strength_multiplier()),
            attacker: player.map(|p| (p.strength, p.weak)),
            target_vulnerable: target.map_or(0, |t| t.vulnerable),
        }
    }

    pub fn compute(&self) -> Option<i32> {
        let base = self.base?;
        let (strength, weak) = self.attacker?;

        let mut dmg = base.saturating_add(strength.saturating_mul(self.strength_multiplier));
        if weak > 0 {
            dmg = scale_floor(dmg, WEAK_FACTOR);
        }
        if self.target_vulnerable > 0 {
            dmg = scale_floor(dmg, VULNERABLE_FACTOR);
        }
        Some(dmg.max(0))
    }
}

/// Exactly the fields the block preview depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInputs {
    pub base: Option<i32>,
    /// `(dexterity, frail)`, `None` without a player.
    pub defender: Option<(i32, i32)>,
}

impl BlockInputs {
    pub fn from_parts(card: Option<&CardStats>, player: Option<&CombatantStats>) -> Self {
        BlockInputs {
            base: card.and_then(|c| c.block),
            defender: player.map(|p| (p.dexterity, p.frail)),
        }
    }

    pub fn compute(&self) -> Option<i32> {
        let base = self.base?;
        let (dexterity, frail) = self.defender?;

        let mut block = base.saturating_add(dexterity);
        if frail > 0 {
            block = scale_floor(block, FRAIL_FACTOR);
        }
        Some(block.max(0))
    }
}

/// Float-to-int `as` saturates, so huge products pin at `i32::MAX`.
fn scale_floor(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor).floor() as i32
}

/// Damage one hit of `card` would deal. `None` when card, damage or player is missing.
pub fn effective_damage(
    card: Option<&CardStats>,
    player: Option<&CombatantStats>,
    target: Option<&CombatantStats>,
) -> Option<i32> {
    DamageInputs::from_parts(card, player, target).compute()
}

/// Block `card` would grant. `None` when card, block or player is missing.
pub fn effective_block(card: Option<&CardStats>, player: Option<&CombatantStats>) -> Option<i32> {
    BlockInputs::from_parts(card, player).compute()
}

/// Tooltip breakdown for multi-hit attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageBreakdown {
    pub per_hit: i32,
    pub hits: u32,
    pub total: i32,
    pub has_vulnerable: bool,
}

pub fn damage_breakdown(
    card: Option<&CardStats>,
    player: Option<&CombatantStats>,
    target: Option<&CombatantStats>,
) -> Option<DamageBreakdown> {
    let per_hit = effective_damage(card, player, target)?;
    let hits = card.and_then(|c| c.hits).filter(|h| *h > 0).unwrap_or(1);
    Some(DamageBreakdown {
        per_hit,
        hits,
        total: per_hit.saturating_mul(i32::try_from(hits).unwrap_or(i32::MAX)),
        has_vulnerable: target.map_or(false, |t| t.vulnerable > 0),
    })
}

/// How the preview compares with the printed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewTone {
    Buffed,
    Nerfed,
    Unchanged,
}

impl PreviewTone {
    pub fn color(&self) -> &'static str {
        match self {
            PreviewTone::Buffed => "#88ff88",
            PreviewTone::Nerfed => "#ff8888",
            PreviewTone::Unchanged => "#ddd",
        }
    }
}

/// Damage decides first; block only if damage is unchanged or absent.
pub fn preview_tone(
    card: &CardStats,
    player: Option<&CombatantStats>,
    target: Option<&CombatantStats>,
) -> PreviewTone {
    let pairs = [
        (card.damage, effective_damage(Some(card), player, target)),
        (card.block, effective_block(Some(card), player)),
    ];
    for (base, adjusted) in pairs {
        if let (Some(base), Some(adjusted)) = (base, adjusted) {
            if adjusted > base {
                return PreviewTone::Buffed;
            }
            if adjusted < base {
                return PreviewTone::Nerfed;
            }
        }
    }
    PreviewTone::Unchanged
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedDescription {
    pub text: String,
    pub modified: bool,
}

/// Rewrite "Deal N damage" / "N damage" and "Gain N Block" with preview values.
pub fn adjust_description(
    description: &str,
    card: &CardStats,
    player: Option<&CombatantStats>,
    target: Option<&CombatantStats>,
) -> AdjustedDescription {
    let mut text = description.to_string();
    let mut modified = false;

    if player.is_none() {
        return AdjustedDescription { text, modified };
    }

    if let (Some(base), Some(adjusted)) = (card.damage, effective_damage(Some(card), player, target)) {
        if adjusted != base {
            modified = true;
            text = replace_first_amount(&text, "Deal ", base, " damage", adjusted);
            text = replace_first_amount(&text, "", base, " damage", adjusted);
        }
    }

    if let (Some(base), Some(adjusted)) = (card.block, effective_block(Some(card), player)) {
        if adjusted != base {
            modified = true;
            text = replace_first_amount(&text, "Gain ", base, " Block", adjusted);
        }
    }

    AdjustedDescription { text, modified }
}

/// Replace the first `{prefix}{from}{suffix}` whose number is not the tail of a longer number.
fn replace_first_amount(text: &str, prefix: &str, from: i32, suffix: &str, to: i32) -> String {
    let needle = format!("{prefix}{from}{suffix}");
    let hit = text.match_indices(&needle).find(|(at, _)| {
        !prefix.is_empty() || !text[..*at].ends_with(|c: char| c.is_ascii_digit())
    });
    match hit {
        Some((at, _)) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..at]);
            out.push_str(&format!("{prefix}{to}{suffix}"));
            out.push_str(&text[at + needle.len()..]);
            out
        }
        None => text.to_string(),
    }
}

/// Single-slot cache: recompute only when the key changes.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    last: Option<(K, V)>,
    computations: u64,
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Memo {
            last: None,
            computations: 0,
        }
    }

    pub fn get(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> V {
        if let Some((cached_key, value)) = &self.last {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute(&key);
        self.computations += 1;
        self.last = Some((key, value.clone()));
        value
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}

impl<K: PartialEq, V: Clone> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-card preview state held by a card view.
#[derive(Debug, Clone, Default)]
pub struct CombatPreview {
    damage: Memo<DamageInputs, Option<i32>>,
    block: Memo<BlockInputs, Option<i32>>,
}

impl CombatPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damage(
        &mut self,
        card: Option<&CardStats>,
        player: Option<&CombatantStats>,
        target: Option<&CombatantStats>,
    ) -> Option<i32> {
        self.damage
            .get(DamageInputs::from_parts(card, player, target), DamageInputs::compute)
    }

    pub fn block(&mut self, card: Option<&CardStats>, player: Option<&CombatantStats>) -> Option<i32> {
        self.block
            .get(BlockInputs::from_parts(card, player), BlockInputs::compute)
    }

    pub fn damage_computations(&self) -> u64 {
        self.damage.computations()
    }

    pub fn block_computations(&self) -> u64 {
        self.block.computations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player(strength: i32, weak: i32) -> CombatantStats {
        CombatantStats {
            strength,
            weak,
            ..Default::default()
        }
    }

    fn vulnerable(stacks: i32) -> CombatantStats {
        CombatantStats {
            vulnerable: stacks,
            ..Default::default()
        }
    }

    #[test]
    fn strength_then_weak() {
        let card = CardStats::attack(10);
        assert_eq!(effective_damage(Some(&card), Some(&player(2, 1)), None), Some(9));
    }

    #[test]
    fn vulnerable_applies_after_weak() {
        let card = CardStats::attack(10);
        // floor(10 * 0.75) = 7, floor(7 * 1.5) = 10
        assert_eq!(
            effective_damage(Some(&card), Some(&player(0, 1)), Some(&vulnerable(2))),
            Some(10)
        );
        assert_eq!(
            effective_damage(Some(&card), Some(&player(0, 0)), Some(&vulnerable(1))),
            Some(15)
        );
    }

    #[test]
    fn strength_multiplier_scales_strength_only() {
        let card = CardStats {
            damage: Some(14),
            strength_multiplier: Some(3),
            ..Default::default()
        };
        assert_eq!(effective_damage(Some(&card), Some(&player(2, 0)), None), Some(20));
    }

    #[test]
    fn negative_strength_clamps_to_zero() {
        let card = CardStats::attack(3);
        assert_eq!(effective_damage(Some(&card), Some(&player(-5, 1)), None), Some(0));
    }

    #[test]
    fn block_with_dexterity_and_frail() {
        let card = CardStats::skill(5);
        let stats = CombatantStats {
            dexterity: 3,
            frail: 1,
            ..Default::default()
        };
        assert_eq!(effective_block(Some(&card), Some(&stats)), Some(6));
    }

    #[test]
    fn missing_data_is_none_not_zero() {
        let attack = CardStats::attack(6);
        let skill = CardStats::skill(5);
        let stats = CombatantStats::default();

        assert_eq!(effective_damage(None, Some(&stats), None), None);
        assert_eq!(effective_damage(Some(&attack), None, None), None);
        assert_eq!(effective_damage(Some(&skill), Some(&stats), None), None);
        assert_eq!(effective_block(Some(&attack), Some(&stats)), None);
        assert_eq!(effective_block(Some(&skill), None), None);

        assert_eq!(effective_damage(Some(&CardStats::attack(0)), Some(&stats), None), Some(0));
    }

    #[test]
    fn memo_recomputes_only_on_tracked_change() {
        let mut preview = CombatPreview::new();
        let card = CardStats::attack(10);
        let mut stats = player(2, 1);

        assert_eq!(preview.damage(Some(&card), Some(&stats), None), Some(9));
        assert_eq!(preview.damage(Some(&card), Some(&stats), None), Some(9));
        assert_eq!(preview.damage_computations(), 1);

        // Dexterity does not feed damage.
        stats.dexterity = 4;
        preview.damage(Some(&card), Some(&stats), None);
        assert_eq!(preview.damage_computations(), 1);

        stats.weak = 0;
        assert_eq!(preview.damage(Some(&card), Some(&stats), None), Some(12));
        assert_eq!(preview.damage_computations(), 2);
    }

    #[test]
    fn block_memo_ignores_strength() {
        let mut preview = CombatPreview::new();
        let card = CardStats::skill(5);
        let mut stats = CombatantStats::default();
        preview.block(Some(&card), Some(&stats));
        stats.strength = 9;
        preview.block(Some(&card), Some(&stats));
        assert_eq!(preview.block_computations(), 1);
    }

    #[test]
    fn extreme_stats_saturate() {
        let card = CardStats {
            damage: Some(2_000_000_000),
            strength_multiplier: Some(3),
            ..Default::default()
        };
        let stats = player(1_000_000_000, 0);
        assert_eq!(effective_damage(Some(&card), Some(&stats), Some(&vulnerable(1))), Some(i32::MAX));
        assert_eq!(effective_damage(Some(&card), Some(&player(i32::MIN, 1)), None), Some(0));

        let block = CardStats::skill(i32::MAX);
        let stats = CombatantStats {
            dexterity: i32::MAX,
            ..Default::default()
        };
        assert_eq!(effective_block(Some(&block), Some(&stats)), Some(i32::MAX));
    }

    #[test]
    fn huge_hit_count_saturates_total() {
        let card = CardStats {
            damage: Some(2),
            hits: Some(u32::MAX),
            ..Default::default()
        };
        let b = damage_breakdown(Some(&card), Some(&player(0, 0)), None).unwrap();
        assert_eq!(b.hits, u32::MAX);
        assert_eq!(b.total, i32::MAX);
    }

    #[test]
    fn breakdown_multiplies_hits() {
        let card = CardStats {
            damage: Some(5),
            hits: Some(2),
            ..Default::default()
        };
        let b = damage_breakdown(Some(&card), Some(&player(1, 0)), Some(&vulnerable(1))).unwrap();
        assert_eq!(b.per_hit, 9);
        assert_eq!(b.hits, 2);
        assert_eq!(b.total, 18);
        assert!(b.has_vulnerable);
    }

    #[test]
    fn tone_follows_adjustment() {
        let card = CardStats::attack(6);
        assert_eq!(preview_tone(&card, Some(&player(2, 0)), None), PreviewTone::Buffed);
        assert_eq!(preview_tone(&card, Some(&player(0, 1)), None), PreviewTone::Nerfed);
        assert_eq!(preview_tone(&card, None, None), PreviewTone::Unchanged);
        assert_eq!(PreviewTone::Buffed.color(), "#88ff88");
    }

    #[test]
    fn description_rewrites_amounts() {
        let card = CardStats {
            damage: Some(6),
            block: Some(5),
            ..Default::default()
        };
        let stats = CombatantStats {
            strength: 2,
            dexterity: 1,
            ..Default::default()
        };
        let adjusted = adjust_description("Deal 6 damage. Gain 5 Block.", &card, Some(&stats), None);
        assert!(adjusted.modified);
        assert_eq!(adjusted.text, "Deal 8 damage. Gain 6 Block.");
    }

    #[test]
    fn description_skips_longer_numbers() {
        let card = CardStats::attack(6);
        let adjusted = adjust_description("Lose 16 damage worth, then 6 damage.", &card, Some(&player(1, 0)), None);
        assert_eq!(adjusted.text, "Lose 16 damage worth, then 7 damage.");
    }

    #[test]
    fn description_untouched_without_player() {
        let card = CardStats::attack(6);
        let adjusted = adjust_description("Deal 6 damage.", &card, None, None);
        assert!(!adjusted.modified);
        assert_eq!(adjusted.text, "Deal 6 damage.");
    }

    proptest! {
        #[test]
        fn damage_is_non_negative_and_idempotent(
            base in 0i32..100,
            strength in -20i32..20,
            weak in 0i32..3,
            vuln in 0i32..3,
        ) {
            let card = CardStats::attack(base);
            let stats = player(strength, weak);
            let target = vulnerable(vuln);
            let first = effective_damage(Some(&card), Some(&stats), Some(&target));
            let second = effective_damage(Some(&card), Some(&stats), Some(&target));
            prop_assert_eq!(first, second);
            prop_assert!(first.unwrap() >= 0);

            let mut preview = CombatPreview::new();
            prop_assert_eq!(preview.damage(Some(&card), Some(&stats), Some(&target)), first);
        }

        #[test]
        fn weak_never_raises_damage(base in 0i32..100, strength in 0i32..20) {
            let card = CardStats::attack(base);
            let plain = effective_damage(Some(&card), Some(&player(strength, 0)), None).unwrap();
            let weakened = effective_damage(Some(&card), Some(&player(strength, 1)), None).unwrap();
            prop_assert!(weakened <= plain);
        }
    }
}
