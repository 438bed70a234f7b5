//! Eased timing of glide steps
//!
//! Ease-in and ease-out are percentages (0..=100) shaping a cubic Bézier
//! through (0,0), (ease_in, 0), (1 - ease_out, 1), (1,1). The curve maps
//! elapsed time to glide progress; onsets invert it.

/// Bisection iterations; the parameter interval shrinks below 1e-15
const SOLVE_ITERATIONS: usize = 50;

/// Cubic Bézier time warp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ease {
    ease_in: f64,
    ease_out: f64,
}

impl Default for Ease {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Ease {
    /// Build from percentages; values outside 0..=100 are clamped
    pub fn new(ease_in: i32, ease_out: i32) -> Self {
        Self {
            ease_in: f64::from(ease_in.clamp(0, 100)) / 100.0,
            ease_out: f64::from(ease_out.clamp(0, 100)) / 100.0,
        }
    }

    pub fn is_linear(&self) -> bool {
        self.ease_in == 0.0 && self.ease_out == 0.0
    }

    fn x(&self, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * self.ease_in + 3.0 * u * t * t * (1.0 - self.ease_out) + t * t * t
    }

    fn y(t: f64) -> f64 {
        t * t * (3.0 - 2.0 * t)
    }

    /// Fraction of the duration elapsed when the glide reaches `progress`
    pub fn time_at(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        // y(t) is flat at both ends, bisection cannot reach them exactly
        if self.is_linear() || progress == 0.0 || progress == 1.0 {
            return progress;
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..SOLVE_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if Self::y(mid) < progress {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        self.x(0.5 * (lo + hi)).clamp(0.0, 1.0)
    }
}

/// One intermediate pitch of a glide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideEvent {
    /// Semitones from the start pitch
    pub offset: i32,
    /// Start time, in the same unit as the glide duration
    pub onset: f64,
}

/// Spreads resolved step offsets over the duration of the start note
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlideSchedule {
    pub ease: Ease,
}

impl GlideSchedule {
    pub fn new(ease_in: i32, ease_out: i32) -> Self {
        Self {
            ease: Ease::new(ease_in, ease_out),
        }
    }

    /// Onsets for `offsets`; the start pitch sounds at 0 and the end pitch at `duration`
    pub fn events(&self, offsets: &[i32], duration: f64) -> Vec<GlideEvent> {
        let slots = (offsets.len() + 1) as f64;
        offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| GlideEvent {
                offset,
                onset: self.ease.time_at((i + 1) as f64 / slots) * duration,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_linear_spacing() {
        let events = GlideSchedule::new(0, 0).events(&[1, 2, 3], 400.0);
        let onsets: Vec<f64> = events.iter().map(|e| e.onset).collect();
        assert_eq!(onsets, vec![100.0, 200.0, 300.0]);
        assert_eq!(events[2].offset, 3);
    }

    #[test]
    fn test_ease_values_are_clamped() {
        assert_eq!(Ease::new(-20, 250), Ease::new(0, 100));
    }

    #[test]
    fn test_ease_in_delays_first_steps() {
        let eased = GlideSchedule::new(80, 0).events(&[1, 2, 3], 1.0);
        let linear = GlideSchedule::new(0, 0).events(&[1, 2, 3], 1.0);
        assert!(eased[0].onset > linear[0].onset);
    }

    #[test]
    fn test_ease_out_hurries_first_steps() {
        let eased = GlideSchedule::new(0, 80).events(&[1, 2, 3], 1.0);
        assert!(eased[0].onset < 0.25);
    }

    #[test]
    fn test_onsets_are_monotonic_and_bounded() {
        let offsets: Vec<i32> = (1..12).collect();
        let events = GlideSchedule::new(60, 40).events(&offsets, 2.0);
        for pair in events.windows(2) {
            assert!(pair[0].onset <= pair[1].onset);
        }
        assert!(events.iter().all(|e| e.onset > 0.0 && e.onset < 2.0));
    }

    #[test]
    fn test_symmetric_ease_keeps_midpoint() {
        let ease = Ease::new(50, 50);
        assert!((ease.time_at(0.5) - 0.5).abs() < EPS);
        assert!(ease.time_at(0.0).abs() < EPS);
        assert!((ease.time_at(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_curve_ends_are_exact() {
        for (ease_in, ease_out) in [(50, 50), (100, 0), (0, 100), (30, 70), (100, 100)] {
            let ease = Ease::new(ease_in, ease_out);
            assert_eq!(ease.time_at(0.0), 0.0);
            assert_eq!(ease.time_at(1.0), 1.0);
            assert_eq!(ease.time_at(1.5), 1.0);
            assert_eq!(ease.time_at(-0.5), 0.0);
        }
    }

    #[test]
    fn test_no_steps_no_events() {
        assert!(GlideSchedule::default().events(&[], 1.0).is_empty());
    }
}
