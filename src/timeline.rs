use std::f64::consts::PI;


/// Scroll distance (CSS pixels) that maps to one unit of timeline progress
pub const SCROLL_HEIGHT_PX: f64 = 3000.0;

/// Blend weight pulling `current` toward `target` each frame
pub const RELAXATION_FACTOR: f64 = 0.02;


/// Normalized scroll progress driving the can rotation.
///
/// `target` follows the scroll position directly; `current` chases it with an
/// exponential relaxation so the rotation eases instead of snapping. Both are
/// unbounded since the page scroll offset is.
pub struct Timeline {
    current: f64,
    target: f64,
    scroll_height: f64,
}

impl Timeline {
    /// Starts the timeline at the given scroll offset (the page may load pre-scrolled)
    pub fn from_scroll(offset_px: f64) -> Self {
        let t = offset_px / SCROLL_HEIGHT_PX;
        Self {
            current: t,
            target: t,
            scroll_height: SCROLL_HEIGHT_PX,
        }
    }

    /// Retargets the timeline from a new scroll offset. No smoothing here,
    /// smoothing happens in [step](Self::step).
    pub fn set_scroll_offset(&mut self, offset_px: f64) {
        self.target = offset_px / self.scroll_height;
    }

    /// Relaxes `current` toward `target` by one frame and returns it
    pub fn step(&mut self) -> f64 {
        self.current += (self.target - self.current) * RELAXATION_FACTOR;
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    pub fn set_scroll_height(&mut self, px: f64) {
        self.scroll_height = px.max(1.0);
    }
}


/// Continuous spin around Y, one full turn per timeline unit
#[inline]
pub fn spin_angle(t: f64) -> f64 {
    2.0 * PI * t
}

/// Tilt around Z: a triangle wave folding back at the midpoint, so the can
/// leans over mid-scroll and stands upright again at both ends of [0, 1]
#[inline]
pub fn tilt_angle(t: f64) -> f64 {
    ((t - 0.5).abs() - 0.5).abs() * 1.5
}

/// X/Y/Z Euler angles for the model at timeline position `t`. Computed in
/// f64 like the timeline itself; narrowed only when handed to the renderer.
#[inline]
pub fn rotation(t: f64) -> (f64, f64, f64) {
    (0.0, spin_angle(t), tilt_angle(t))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn step_converges_monotonically() {
        let mut timeline = Timeline::from_scroll(0.0);
        timeline.set_scroll_offset(SCROLL_HEIGHT_PX); // target = 1

        let mut prev = timeline.current();
        for _ in 0..100 {
            let c = timeline.step();
            assert!(c > prev, "current must move toward target every step");
            assert!(c <= 1.0, "current must never overshoot the target");
            prev = c;
        }
        assert!(timeline.current() > 0.8);

        for _ in 0..900 {
            timeline.step();
        }
        assert!(timeline.current() > 0.999);
    }

    #[test]
    fn scroll_offset_maps_unclamped() {
        let mut timeline = Timeline::from_scroll(0.0);
        assert_eq!(timeline.target(), 0.0);

        timeline.set_scroll_offset(3000.0);
        assert_eq!(timeline.target(), 1.0);

        timeline.set_scroll_offset(6000.0);
        assert_eq!(timeline.target(), 2.0);
    }

    #[test]
    fn starts_at_the_initial_scroll_position() {
        let timeline = Timeline::from_scroll(1500.0);
        assert_eq!(timeline.current(), 0.5);
        assert_eq!(timeline.target(), 0.5);
    }

    #[test]
    fn scroll_height_is_adjustable() {
        let mut timeline = Timeline::from_scroll(0.0);
        timeline.set_scroll_height(1000.0);
        timeline.set_scroll_offset(500.0);
        assert_eq!(timeline.target(), 0.5);
    }

    #[test]
    fn spin_is_linear() {
        assert_eq!(spin_angle(0.0), 0.0);
        assert!((spin_angle(0.25) - FRAC_PI_2).abs() < 1e-12);
        assert!((spin_angle(1.0) - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn tilt_peaks_mid_scroll_and_returns_to_zero() {
        assert_eq!(tilt_angle(0.0), 0.0);
        assert_eq!(tilt_angle(0.5), 0.75);
        assert_eq!(tilt_angle(1.0), 0.0);
    }

    #[test]
    fn tilt_is_symmetric_about_the_midpoint() {
        for t in [0.1_f64, 0.25, 0.4] {
            assert!((tilt_angle(t) - tilt_angle(1.0 - t)).abs() < 1e-12);
        }
        assert_eq!(tilt_angle(0.25), 0.375);
    }

    #[test]
    fn rotation_never_uses_the_x_axis() {
        let (rx, ry, rz) = rotation(0.3);
        assert_eq!(rx, 0.0);
        assert_eq!(ry, spin_angle(0.3));
        assert_eq!(rz, tilt_angle(0.3));
    }
}
