//! Celebration burst shown with the winners.

use rand::Rng;
use serde::Serialize;

pub const PARTICLE_COUNT: usize = 30;
pub const EMOJIS: [&str; 8] = ["🎉", "🎊", "⭐", "✨", "🎈", "🎁", "🌟", "💫"];

#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub id: usize,
    /// Percent of the viewport width.
    pub x: f32,
    /// Percent of the viewport height.
    pub y: f32,
    pub size: f32,
    /// Seconds before the particle starts floating.
    pub delay: f32,
    pub emoji: &'static str,
}

pub fn burst<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|id| Particle {
            id,
            x: rng.gen_range(0.0..100.0),
            y: rng.gen_range(0.0..100.0),
            size: rng.gen_range(20.0..50.0),
            delay: rng.gen_range(0.0..2.0),
            emoji: EMOJIS[rng.gen_range(0..EMOJIS.len())],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_stays_in_bounds() {
        let particles = burst(&mut StdRng::seed_from_u64(9), PARTICLE_COUNT);
        assert_eq!(particles.len(), PARTICLE_COUNT);
        for p in &particles {
            assert!((0.0..100.0).contains(&p.x) && (0.0..100.0).contains(&p.y));
            assert!((20.0..50.0).contains(&p.size));
            assert!((0.0..2.0).contains(&p.delay));
            assert!(EMOJIS.contains(&p.emoji));
        }
    }
}
