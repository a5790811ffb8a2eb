use crate::Vec3;

/// Half-line `origin + t * direction`.
///
/// `direction` is not normalized. Camera rays, scattered rays and the `t`
/// reported by intersections all share that convention.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point reached after `t` direction lengths.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_walks_along_direction() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z);

        assert_eq!(ray.at(0.0), ray.origin());
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 1.0, -3.0));
        assert_eq!(ray.at(-1.0), Vec3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_t_is_scaled_by_direction_length() {
        let ray = Ray::new(Vec3::ONE, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.at(0.5), Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(ray.direction().length(), 4.0);
    }
}
