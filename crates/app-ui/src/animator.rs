//! Progress animation primitives
//!
//! [`step`] is the per-frame easing the address connector uses to glide
//! between collapsed and expanded. [`SettleAnimation`] describes how the
//! drawer moves to a committed position; the host samples it per frame.

use crate::tokens::convergence::{FACTOR, SNAP};
use std::time::Duration;

/// Move `current` toward `target` by `factor` of the remaining distance
///
/// Returns `target` exactly once the distance is below the snap threshold, so
/// repeated stepping always terminates.
pub fn step(current: f32, target: f32, factor: f32) -> f32 {
    if (current - target).abs() < SNAP {
        target
    } else {
        current + (target - current) * factor
    }
}

/// One in-flight glide toward a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    current: f32,
    target: f32,
    factor: f32,
}

impl Convergence {
    /// Start gliding from `current` to `target` with the default factor
    pub fn new(current: f32, target: f32) -> Self {
        Self {
            current,
            target,
            factor: FACTOR,
        }
    }

    /// Use a different per-frame factor
    pub fn with_factor(mut self, factor: f32) -> Self {
        self.factor = factor;
        self
    }

    /// Value after the last frame
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Where the glide ends
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the target has been reached
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one frame and return the new value
    pub fn advance(&mut self) -> f32 {
        self.current = step(self.current, self.target, self.factor);
        self.current
    }
}

/// Timing curve of a settle animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Slow start and end
    EaseInOut,
    /// Critically damped spring launched with a velocity
    ///
    /// The velocity is in units of the total distance per second.
    Spring {
        /// Initial velocity
        initial_velocity: f32,
    },
}

/// How the drawer moves to a committed position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleAnimation {
    /// Total time
    pub duration: Duration,
    /// Timing curve
    pub curve: Curve,
}

impl SettleAnimation {
    /// An eased settle
    pub fn eased(duration: Duration) -> Self {
        Self {
            duration,
            curve: Curve::EaseInOut,
        }
    }

    /// A spring settle launched with `initial_velocity`
    pub fn spring(duration: Duration, initial_velocity: f32) -> Self {
        Self {
            duration,
            curve: Curve::Spring { initial_velocity },
        }
    }

    /// Completed fraction after `elapsed`; 0 at the start and 1 from the end on
    pub fn fraction_at(&self, elapsed: Duration) -> f32 {
        let total = self.duration.as_secs_f32();
        if total <= 0.0 || elapsed >= self.duration {
            return 1.0;
        }
        let t = elapsed.as_secs_f32();

        match self.curve {
            Curve::EaseInOut => {
                let x = t / total;
                x * x * (3.0 - 2.0 * x)
            }
            Curve::Spring { initial_velocity } => {
                let omega = 10.0 / total;
                let remaining = (1.0 + (omega - initial_velocity) * t) * (-omega * t).exp();
                1.0 - remaining
            }
        }
    }

    /// Value between `from` and `to` after `elapsed`
    pub fn interpolate(&self, from: f32, to: f32, elapsed: Duration) -> f32 {
        from + (to - from) * self.fraction_at(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_by_factor() {
        assert!((step(0.0, 1.0, 0.15) - 0.15).abs() < 1e-6);
        assert!((step(1.0, 0.0, 0.15) - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_step_snaps_below_threshold() {
        assert_eq!(step(0.995, 1.0, 0.15), 1.0);
        assert_eq!(step(0.005, 0.0, 0.15), 0.0);
        assert_eq!(step(1.0, 1.0, 0.15), 1.0);
        // Exactly at the threshold still steps
        assert!(step(0.5, 0.51, 0.15) < 0.51);
    }

    #[test]
    fn test_step_is_a_contraction() {
        let values = [-2.0f32, -0.3, 0.0, 0.25, 0.5, 0.99, 1.0, 3.0];
        for &current in &values {
            for &target in &values {
                let next = step(current, target, 0.15);
                assert!((next - target).abs() <= (current - target).abs());
            }
        }
    }

    #[test]
    fn test_convergence_terminates() {
        let mut glide = Convergence::new(0.0, 1.0);
        let mut frames = 0;
        while !glide.is_settled() {
            glide.advance();
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(frames, 30);
        assert_eq!(glide.current(), 1.0);
    }

    #[test]
    fn test_convergence_custom_factor() {
        let mut glide = Convergence::new(1.0, 0.0).with_factor(0.5);
        assert_eq!(glide.advance(), 0.5);
        assert_eq!(glide.target(), 0.0);
    }

    #[test]
    fn test_eased_fraction() {
        let anim = SettleAnimation::eased(Duration::from_millis(500));
        assert_eq!(anim.fraction_at(Duration::ZERO), 0.0);
        assert!((anim.fraction_at(Duration::from_millis(250)) - 0.5).abs() < 1e-6);
        assert_eq!(anim.fraction_at(Duration::from_millis(500)), 1.0);
        assert_eq!(anim.fraction_at(Duration::from_secs(2)), 1.0);
    }

    #[test]
    fn test_spring_fraction() {
        let anim = SettleAnimation::spring(Duration::from_millis(500), 0.0);
        assert!(anim.fraction_at(Duration::ZERO).abs() < 1e-6);

        let mut previous = 0.0;
        for ms in (0..500).step_by(25) {
            let f = anim.fraction_at(Duration::from_millis(ms));
            assert!(f >= previous);
            previous = f;
        }
        assert!(previous > 0.99);
        assert_eq!(anim.fraction_at(Duration::from_millis(500)), 1.0);
    }

    #[test]
    fn test_spring_velocity_speeds_up_start() {
        let still = SettleAnimation::spring(Duration::from_millis(500), 0.0);
        let flung = SettleAnimation::spring(Duration::from_millis(500), 3.0);
        let early = Duration::from_millis(20);
        assert!(flung.fraction_at(early) > still.fraction_at(early));
    }

    #[test]
    fn test_interpolate() {
        let anim = SettleAnimation::eased(Duration::from_millis(500));
        assert_eq!(anim.interpolate(600.0, 0.0, Duration::from_millis(500)), 0.0);
        assert_eq!(anim.interpolate(600.0, 0.0, Duration::ZERO), 600.0);
    }
}
