//! Lays the text out as a row of particles.

use phosphor_core::{Vec2, Viewport};

use crate::particle::Particle;

/// One particle per `char`, left to right at one cell advance per glyph,
/// horizontally centered at the vertical middle of the viewport.
pub fn seed(text: &str, viewport: &Viewport) -> Vec<Particle> {
    let advance = viewport.metrics.width;
    let count = text.chars().count();
    let total_width = count as f32 * advance;
    let start_x = (viewport.width() - total_width) / 2.0;
    let y = viewport.height() / 2.0;

    text.chars()
        .enumerate()
        .map(|(i, glyph)| Particle::at_rest(glyph, Vec2::new(start_x + i as f32 * advance, y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphor_core::CellMetrics;
    use rstest::rstest;

    fn viewport(width_px: f32, height_px: f32) -> Viewport {
        // 10px font: cells are 6 x 10 px
        let metrics = CellMetrics::from_font_size(10.0);
        Viewport::new(
            (width_px / metrics.width).round() as u16,
            (height_px / metrics.height).round() as u16,
            metrics,
        )
    }

    #[rstest]
    #[case("AB", 2)]
    #[case("$ UNIX System V Release 4.0", 27)]
    #[case("héllo wörld", 11)]
    #[case("日本語", 3)]
    #[case("🦀✓", 2)]
    fn test_one_particle_per_char(#[case] text: &str, #[case] expected: usize) {
        let particles = seed(text, &viewport(800.0, 600.0));
        assert_eq!(particles.len(), expected);
        let glyphs: String = particles.iter().map(Particle::glyph).collect();
        assert_eq!(glyphs, text);
    }

    #[test]
    fn test_empty_text_has_no_particles() {
        assert!(seed("", &viewport(800.0, 600.0)).is_empty());
    }

    #[test]
    fn test_origins_step_evenly_on_one_row() {
        let vp = viewport(800.0, 600.0);
        let particles = seed("abcdef", &vp);
        let advance = vp.metrics.width;
        for pair in particles.windows(2) {
            let step = pair[1].origin().x - pair[0].origin().x;
            assert!((step - advance).abs() < 1e-3);
            assert_eq!(pair[1].origin().y, pair[0].origin().y);
        }
        assert!((particles[0].origin().y - vp.height() / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_run_is_centered() {
        let vp = viewport(800.0, 600.0);
        let particles = seed("centered", &vp);
        let total = particles.len() as f32 * vp.metrics.width;
        let expected = (vp.width() - total) / 2.0;
        assert!((particles[0].origin().x - expected).abs() < 1e-3);

        let last = particles.last().unwrap().origin().x + vp.metrics.width;
        let right_margin = vp.width() - last;
        assert!((right_margin - particles[0].origin().x).abs() < 1e-2);
    }

    #[rstest]
    #[case(10.0)]
    #[case(24.0)]
    fn test_resting_glyphs_fill_consecutive_cells(#[case] font_size_px: f32) {
        let metrics = CellMetrics::from_font_size(font_size_px);
        let text = "ABCDEFGH";
        for columns in 10..=300u16 {
            for n in 1..=text.len() {
                let vp = Viewport::new(columns, 24, metrics);
                let first = (columns - n as u16) / 2;
                for (i, p) in seed(&text[..n], &vp).iter().enumerate() {
                    assert_eq!(
                        metrics.cell_at(p.origin()),
                        Some((first + i as u16, 12)),
                        "{n} glyphs in {columns} columns, glyph {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_particles_start_at_rest() {
        for p in seed("rest", &viewport(800.0, 600.0)) {
            assert_eq!(p.position, p.origin());
            assert_eq!(p.velocity, Vec2::ZERO);
            assert_eq!(p.opacity, 1.0);
        }
    }

    #[test]
    fn test_text_wider_than_viewport_starts_offscreen() {
        let particles = seed(&"x".repeat(50), &viewport(60.0, 60.0));
        assert_eq!(particles.len(), 50);
        assert!(particles[0].origin().x < 0.0);
    }
}
