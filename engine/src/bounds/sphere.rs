use sourcerenderer_core::{Point3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    pub fn encloses(&self, other: &Sphere) -> bool {
        (self.center - other.center).length() + other.radius <= self.radius
    }

    /// Smallest sphere enclosing both `self` and `other`.
    pub fn union(&self, other: &Sphere) -> Sphere {
        let diff = other.center - self.center;
        let dist = diff.length();
        if dist + other.radius <= self.radius {
            return *self;
        }
        if dist + self.radius <= other.radius {
            return *other;
        }
        let new_radius = (dist + self.radius + other.radius) * 0.5;
        let dir = if dist > 1e-6 { diff / dist } else { Vec3::ZERO };
        let new_center = self.center + dir * (new_radius - self.radius);
        Sphere::new(new_center, new_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_encloses_both_spheres() {
        let a = Sphere::new(Point3::ZERO, 1.0);
        let b = Sphere::new(Point3::new(5.0, 0.0, 0.0), 1.0);
        let u = a.union(&b);
        assert!(u.encloses(&a));
        assert!(u.encloses(&b));
    }
}
