/// Closed range `[min, max]` of `f32`.
///
/// Bounds the accepted `t` of an intersection query, and clamps color
/// channels before quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Everything, infinities included.
    pub const UNIVERSE: Interval = Interval::new(f32::NEG_INFINITY, f32::INFINITY);

    /// Valid range of a color channel.
    pub const UNIT: Interval = Interval::new(0.0, 1.0);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Inclusive at both ends; NaN is never contained.
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.min).min(self.max)
    }

    /// Same lower bound, new upper bound. Narrows a query to the closest hit
    /// found so far.
    #[inline]
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_range_bounds_are_inclusive() {
        let hit_range = Interval::new(0.001, 4.0);

        assert!(hit_range.contains(0.001));
        assert!(hit_range.contains(4.0));
        assert!(!hit_range.contains(0.0));
        assert!(!hit_range.contains(4.0001));
        assert!(!hit_range.contains(f32::NAN));
    }

    #[test]
    fn test_unit_clamps_color_channels() {
        assert_eq!(Interval::UNIT.clamp(-0.25), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.75), 0.75);
        assert_eq!(Interval::UNIT.clamp(3.0), 1.0);
    }

    #[test]
    fn test_narrowing_to_closest_hit() {
        let open = Interval::new(0.001, f32::INFINITY);
        let narrowed = open.with_max(2.5);

        assert_eq!(narrowed.min, 0.001);
        assert!(open.contains(7.0));
        assert!(!narrowed.contains(7.0));
    }

    #[test]
    fn test_universe_contains_infinities() {
        assert!(Interval::UNIVERSE.contains(f32::INFINITY));
        assert!(Interval::UNIVERSE.contains(-1e30));
    }
}
