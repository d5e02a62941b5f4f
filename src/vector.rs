use serde::{Deserialize, Serialize};
use ultraviolet::DVec2;

/// 2D vector used for every position, velocity and force in the sandbox.
///
/// `+`, `-` and `*` produce new values; `+=` and `*=` mutate in place and are
/// what the per-tick hot paths (force accumulation, damping) use.
pub type Vector2D = DVec2;

/// Operations the sandbox needs on top of what `ultraviolet` provides.
pub trait Vector2DExt {
    /// Unit vector in the same direction, or the zero vector when `self` has zero length.
    fn normalized_or_zero(self) -> Self;
    /// Euclidean distance to `other`.
    fn distance_to(self, other: Self) -> f64;
    /// Squared distance to `other` (no square root).
    fn distance_sq_to(self, other: Self) -> f64;
    /// Plain `{x, y}` value for serialization.
    fn to_object(self) -> VectorObject;
    /// Inverse of [`Vector2DExt::to_object`].
    fn from_object(obj: VectorObject) -> Self;
}

impl Vector2DExt for Vector2D {
    #[inline]
    fn normalized_or_zero(self) -> Self {
        let mag = self.mag();
        if mag == 0.0 {
            return Vector2D::zero();
        }
        self / mag
    }

    #[inline]
    fn distance_to(self, other: Self) -> f64 {
        (self - other).mag()
    }

    #[inline]
    fn distance_sq_to(self, other: Self) -> f64 {
        (self - other).mag_sq()
    }

    fn to_object(self) -> VectorObject {
        VectorObject {
            x: self.x,
            y: self.y,
        }
    }

    fn from_object(obj: VectorObject) -> Self {
        Vector2D::new(obj.x, obj.y)
    }
}

/// Serializable `{x, y}` form of a [`Vector2D`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorObject {
    pub x: f64,
    pub y: f64,
}

impl From<Vector2D> for VectorObject {
    fn from(v: Vector2D) -> Self {
        v.to_object()
    }
}

impl From<VectorObject> for Vector2D {
    fn from(obj: VectorObject) -> Self {
        Vector2D::from_object(obj)
    }
}

/// Zero vector, usable as a serde default.
pub fn zero() -> Vector2D {
    Vector2D::zero()
}

/// Serde adapter: `#[serde(with = "crate::vector::object")]` stores a
/// [`Vector2D`] as `{ "x": .., "y": .. }`.
pub mod object {
    use super::{Vector2D, VectorObject};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vector2D, serializer: S) -> Result<S::Ok, S::Error> {
        VectorObject::from(*v).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector2D, D::Error> {
        VectorObject::deserialize(deserializer).map(Vector2D::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_zero_gives_zero() {
        let n = Vector2D::zero().normalized_or_zero();
        assert_eq!(n, Vector2D::zero());
        assert!(!n.x.is_nan() && !n.y.is_nan());
    }

    #[test]
    fn normalized_has_unit_length() {
        let n = Vector2D::new(3.0, -4.0).normalized_or_zero();
        assert!((n.mag() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
        assert!((n.y + 0.8).abs() < 1e-12);
    }

    #[test]
    fn distances() {
        let a = Vector2D::new(1.0, 1.0);
        let b = Vector2D::new(4.0, 5.0);
        assert_eq!(a.distance_sq_to(b), 25.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn in_place_ops_match_pure_ops() {
        let mut v = Vector2D::new(2.0, 3.0);
        let pure = (v + Vector2D::new(1.0, -1.0)) * 0.5;
        v += Vector2D::new(1.0, -1.0);
        v *= 0.5;
        assert_eq!(v, pure);
    }

    #[test]
    fn object_round_trip_is_exact() {
        let v = Vector2D::new(0.1 + 0.2, -1e-300);
        let json = serde_json::to_string(&v.to_object()).unwrap();
        let back: VectorObject = serde_json::from_str(&json).unwrap();
        assert_eq!(Vector2D::from_object(back), v);
    }
}
