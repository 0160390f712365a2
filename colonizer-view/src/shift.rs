//! Eased vertical-shift animation for the collapse transition.

/// Duration of the collapse/expand transition, in seconds.
pub const SHIFT_DURATION: f64 = 0.8;

/// Cubic ease-in-out on `t` in `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Shift that keeps the collapsed band centred on the grown pattern.
///
/// The collapsed band is 35% of the viewport height; expanding returns to 0.
pub fn target_shift(collapsed: bool, full_height: f32) -> f32 {
    if collapsed {
        let shrunk_height = (full_height * 0.35).round();
        shrunk_height / 1.5 - full_height / 2.0
    } else {
        0.0
    }
}

/// Tween from the current shift to a target, sampled by wall-clock time.
#[derive(Clone, Copy, Debug)]
pub struct ShiftAnimation {
    from: f32,
    to: f32,
    started: f64,
    duration: f64,
}

impl ShiftAnimation {
    pub fn new(duration: f64) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            started: 0.0,
            duration,
        }
    }

    /// Shift at time `now`.
    pub fn value(&self, now: f64) -> f32 {
        let t = self.progress(now);
        self.from + (self.to - self.from) * ease_in_out_cubic(t)
    }

    /// Restarts the tween from wherever it is at `now` toward `target`.
    pub fn retarget(&mut self, target: f32, now: f64) {
        self.from = self.value(now);
        self.to = target;
        self.started = now;
    }

    pub fn is_settled(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "progress is clamped to [0, 1]"
        )]
        let t = ((now - self.started) / self.duration).clamp(0.0, 1.0) as f32;
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }

    #[test]
    fn target_shift_moves_up_when_collapsed() {
        assert_eq!(target_shift(false, 1000.0), 0.0);
        let shift = target_shift(true, 1000.0);
        assert!((shift - (350.0 / 1.5 - 500.0)).abs() < 1e-4);
        assert!(shift < 0.0);
    }

    #[test]
    fn animation_reaches_target_after_duration() {
        let mut anim = ShiftAnimation::new(SHIFT_DURATION);
        assert_eq!(anim.value(0.0), 0.0);

        anim.retarget(-100.0, 1.0);
        assert_eq!(anim.value(1.0), 0.0);
        assert!((anim.value(1.4) + 50.0).abs() < 1e-3);
        assert!(!anim.is_settled(1.4));
        assert_eq!(anim.value(2.0), -100.0);
        assert!(anim.is_settled(2.0));
    }

    #[test]
    fn retarget_mid_flight_starts_from_current_value() {
        let mut anim = ShiftAnimation::new(1.0);
        anim.retarget(-100.0, 0.0);
        let mid = anim.value(0.5);

        anim.retarget(0.0, 0.5);
        assert!((anim.value(0.5) - mid).abs() < 1e-4);
        assert_eq!(anim.value(1.5), 0.0);
    }
}
