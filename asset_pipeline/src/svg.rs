// Parametric SVG templates for generated art.

use crate::catalog::{ArtCatalog, ArtSet, EnemyPortrait, OrbArt, StanceArt};

pub const ORB_SIZE: u32 = 128;
pub const STANCE_SIZE: u32 = 128;
pub const PORTRAIT_SIZE: u32 = 512;

/// Portrait parts are authored around this point.
const PORTRAIT_FOCUS: (u32, u32) = (256, 280);

/// One image to render: `<out>/<group>/<id>.webp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub group: &'static str,
    pub id: String,
    pub size: u32,
    pub svg: String,
}

pub fn orb_svg(orb: &OrbArt) -> String {
    let s = ORB_SIZE;
    format!(
        r##"<svg width="{s}" height="{s}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <radialGradient id="bg" cx="35%" cy="35%" r="55%">
      <stop offset="0%" stop-color="{c1}" />
      <stop offset="100%" stop-color="{c2}" />
    </radialGradient>
    <radialGradient id="highlight" cx="30%" cy="25%" r="30%">
      <stop offset="0%" stop-color="{accent}" stop-opacity="0.5" />
      <stop offset="100%" stop-color="{accent}" stop-opacity="0" />
    </radialGradient>
  </defs>
  <circle cx="64" cy="64" r="58" fill="url(#bg)" />
  <circle cx="64" cy="64" r="58" fill="url(#highlight)" />
  <circle cx="64" cy="64" r="58" fill="none" stroke="{c2}" stroke-width="3" opacity="0.5" />
  <text x="64" y="76" text-anchor="middle" font-size="36" fill="{accent}" opacity="0.8">{symbol}</text>
</svg>"##,
        c1 = orb.color1,
        c2 = orb.color2,
        accent = orb.accent,
        symbol = escape_text(&orb.symbol),
    )
}

pub fn stance_svg(stance: &StanceArt) -> String {
    let s = STANCE_SIZE;
    format!(
        r##"<svg width="{s}" height="{s}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <radialGradient id="bg" cx="50%" cy="50%" r="70%">
      <stop offset="0%" stop-color="{c1}" />
      <stop offset="100%" stop-color="{c2}" />
    </radialGradient>
    <radialGradient id="glow" cx="50%" cy="50%" r="40%">
      <stop offset="0%" stop-color="{glow}" stop-opacity="0.3" />
      <stop offset="100%" stop-color="{glow}" stop-opacity="0" />
    </radialGradient>
  </defs>
  <rect width="{s}" height="{s}" fill="url(#bg)" />
  <rect width="{s}" height="{s}" fill="url(#glow)" />
  {shapes}
</svg>"##,
        c1 = stance.color1,
        c2 = stance.color2,
        glow = stance.glow_color,
        shapes = stance.shapes.join("\n  "),
    )
}

pub fn enemy_portrait_svg(enemy: &EnemyPortrait) -> String {
    let s = PORTRAIT_SIZE;
    let (fx, fy) = PORTRAIT_FOCUS;
    format!(
        r##"<svg width="{s}" height="{s}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <radialGradient id="bg" cx="50%" cy="45%" r="70%">
      <stop offset="0%" stop-color="{c1}" />
      <stop offset="100%" stop-color="{c2}" />
    </radialGradient>
    <radialGradient id="glow" cx="50%" cy="40%" r="40%">
      <stop offset="0%" stop-color="{glow}" stop-opacity="0.2" />
      <stop offset="100%" stop-color="{glow}" stop-opacity="0" />
    </radialGradient>
    <radialGradient id="vignette" cx="50%" cy="50%" r="50%">
      <stop offset="55%" stop-color="black" stop-opacity="0" />
      <stop offset="100%" stop-color="black" stop-opacity="0.7" />
    </radialGradient>
    <filter id="softglow">
      <feGaussianBlur stdDeviation="2" />
    </filter>
  </defs>
  <rect width="{s}" height="{s}" fill="url(#bg)" />
  <rect width="{s}" height="{s}" fill="url(#glow)" />
  <g transform="translate({fx}, {fy})">
    {parts}
  </g>
  <rect width="{s}" height="{s}" fill="url(#vignette)" />
</svg>"##,
        c1 = enemy.color1,
        c2 = enemy.color2,
        glow = enemy.glow_color,
        parts = enemy.parts.join("\n    "),
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Expand the catalog into render jobs for `set`, in catalog order.
pub fn render_jobs(catalog: &ArtCatalog, set: ArtSet) -> Vec<RenderJob> {
    let mut jobs = Vec::new();
    if set.includes(ArtSet::Orbs) {
        jobs.extend(catalog.orbs.iter().map(|orb| RenderJob {
            group: "orbs",
            id: orb.id.clone(),
            size: ORB_SIZE,
            svg: orb_svg(orb),
        }));
    }
    if set.includes(ArtSet::Stances) {
        jobs.extend(catalog.stances.iter().map(|stance| RenderJob {
            group: "stances",
            id: stance.id.clone(),
            size: STANCE_SIZE,
            svg: stance_svg(stance),
        }));
    }
    if set.includes(ArtSet::Enemies) {
        jobs.extend(catalog.enemies.iter().map(|enemy| RenderJob {
            group: "enemies",
            id: enemy.id.clone(),
            size: PORTRAIT_SIZE,
            svg: enemy_portrait_svg(enemy),
        }));
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::art_catalog;

    fn orb() -> OrbArt {
        OrbArt {
            id: "frost".to_string(),
            color1: "#88ddff".to_string(),
            color2: "#2266aa".to_string(),
            accent: "#ffffff".to_string(),
            symbol: "❄".to_string(),
        }
    }

    #[test]
    fn orb_template_fills_colors() {
        let svg = orb_svg(&orb());
        assert!(svg.starts_with(r#"<svg width="128" height="128""#));
        assert!(svg.contains(r##"stop-color="#88ddff""##));
        assert!(svg.contains(r##"stroke="#2266aa""##));
        assert!(svg.contains(">❄</text>"));
        assert!(!svg.contains('{'));
    }

    #[test]
    fn glyph_is_escaped() {
        let mut risky = orb();
        risky.symbol = "<&>".to_string();
        assert!(orb_svg(&risky).contains(">&lt;&amp;&gt;</text>"));
    }

    #[test]
    fn portrait_parts_sit_in_focus_group() {
        let catalog = art_catalog().unwrap();
        let snecko = &catalog.enemies[0];
        let svg = enemy_portrait_svg(snecko);
        assert!(svg.contains(r#"<g transform="translate(256, 280)">"#));
        assert!(svg.contains(&snecko.parts[0]));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn stance_template_embeds_shapes() {
        let catalog = art_catalog().unwrap();
        let calm = &catalog.stances[0];
        let svg = stance_svg(calm);
        for shape in &calm.shapes {
            assert!(svg.contains(shape.as_str()));
        }
    }

    #[test]
    fn jobs_follow_selected_set() {
        let catalog = art_catalog().unwrap();
        assert_eq!(render_jobs(catalog, ArtSet::All).len(), catalog.len());

        let orbs = render_jobs(catalog, ArtSet::Orbs);
        assert_eq!(orbs.len(), 4);
        assert!(orbs.iter().all(|j| j.group == "orbs" && j.size == ORB_SIZE));

        let enemies = render_jobs(catalog, ArtSet::Enemies);
        assert!(enemies.iter().all(|j| j.size == PORTRAIT_SIZE));
    }
}
