// Copyright 2020 @TwoCookingMice

use super::constants::{Vector3f, FLOAT_MIN, FLOAT_MAX};

#[derive(Debug, Clone, Copy)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(FLOAT_MAX, FLOAT_MAX, FLOAT_MAX),
               p_max: Vector3f::new(FLOAT_MIN, FLOAT_MIN, FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        let mut min = Vector3f::new(0.0, 0.0, 0.0);
        let mut max = Vector3f::new(0.0, 0.0, 0.0);
        for idx in 0..3 {
            min[idx] = p_min[idx].min(p_max[idx]);
            max[idx] = p_max[idx].max(p_min[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    pub fn center(&self) -> Vector3f {
        0.5f32 * self.p_min + 0.5f32 * self.p_max
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(p[idx]);
            self.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(other.p_min[idx]);
            self.p_max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
    }

    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn is_valid(&self) -> bool {
        let mut result = true;
        for idx in 0..3 {
            if self.p_min[idx] > self.p_max[idx] {
                result = false;
                break;
            }
        }

        result
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Vector3f;

    #[test]
    fn test_aabb_geometry() {
        let min = Vector3f::new(1.0, 7.0, 3.0);
        let max = Vector3f::new(4.0, 4.0, 4.0);
        let mut bbox: AABB = AABB::new(min, max);

        let center = bbox.center();
        assert!((center[0] - 2.5f32).abs() < 1e-6);
        assert!((center[1] - 5.5f32).abs() < 1e-6);
        assert!((center[2] - 3.5f32).abs() < 1e-6);

        bbox.expand_by_point(&Vector3f::new(-1.0, 5.0, 6.0));
        assert!((bbox.p_min[0] + 1.0f32).abs() < 1e-6);
        assert!((bbox.p_max[2] - 6.0f32).abs() < 1e-6);

        let mut bbox1: AABB = AABB::default();
        assert!(!bbox1.is_valid());
        bbox1.expand_by_aabb(&bbox);
        assert!(bbox1.is_valid());
        assert!((bbox1.diagonal() - bbox.diagonal()).norm() < 1e-6);
    }
}
