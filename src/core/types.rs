use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::utils::allocator::BodyId;

/// One end of a joint: a simulated body or the immovable world frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BodyHandle {
    #[default]
    World,
    Dynamic(BodyId),
}

impl BodyHandle {
    pub fn body(self) -> Option<BodyId> {
        match self {
            BodyHandle::World => None,
            BodyHandle::Dynamic(id) => Some(id),
        }
    }

    pub fn is_world(self) -> bool {
        matches!(self, BodyHandle::World)
    }
}

impl From<BodyId> for BodyHandle {
    fn from(id: BodyId) -> Self {
        BodyHandle::Dynamic(id)
    }
}

/// Opaque, non-owning reference to a renderer-side node mirroring a body.
///
/// The solver only stores and hands it back; the renderer owns what it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Inverse mass and diagonal inverse inertia (body space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub inverse_mass: f32,
    pub inverse_inertia: Vec3,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            inverse_mass: 1.0,
            inverse_inertia: Vec3::ONE,
        }
    }
}

impl MassProperties {
    /// Infinite mass and inertia.
    pub const STATIC: MassProperties = MassProperties {
        inverse_mass: 0.0,
        inverse_inertia: Vec3::ZERO,
    };

    /// Solid box with full edge lengths `size`.
    pub fn solid_box(size: Vec3, density: f32) -> Result<Self> {
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(PhysicsError::DegenerateBox {
                x: size.x,
                y: size.y,
                z: size.z,
            });
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(PhysicsError::InvalidDensity(density));
        }

        let mass = size.x * size.y * size.z * density;
        let factor = mass / 12.0;
        let sq = size * size;
        Ok(Self {
            inverse_mass: 1.0 / mass,
            inverse_inertia: Vec3::new(
                1.0 / (factor * (sq.y + sq.z)),
                1.0 / (factor * (sq.z + sq.x)),
                1.0 / (factor * (sq.x + sq.y)),
            ),
        })
    }

    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0 && self.inverse_inertia == Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn unit_cube_mass_properties() {
        let props = MassProperties::solid_box(Vec3::ONE, 1.0).unwrap();
        assert_abs_diff_eq!(props.inverse_mass, 1.0, epsilon = 1e-6);
        // I = m (1 + 1) / 12 = 1/6
        assert_abs_diff_eq!(props.inverse_inertia.x, 6.0, epsilon = 1e-4);
        assert_abs_diff_eq!(props.inverse_inertia.y, 6.0, epsilon = 1e-4);
        assert_abs_diff_eq!(props.inverse_inertia.z, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn density_scales_inverse_mass() {
        let props = MassProperties::solid_box(Vec3::new(1.0, 2.0, 0.5), 4.0).unwrap();
        assert_abs_diff_eq!(props.inverse_mass, 0.25, epsilon = 1e-6);
        assert!(props.inverse_inertia.x < props.inverse_inertia.y);
    }

    #[test]
    fn degenerate_boxes_are_rejected() {
        assert!(matches!(
            MassProperties::solid_box(Vec3::new(1.0, 0.0, 1.0), 1.0),
            Err(PhysicsError::DegenerateBox { .. })
        ));
        assert!(matches!(
            MassProperties::solid_box(Vec3::new(1.0, f32::INFINITY, 1.0), 1.0),
            Err(PhysicsError::DegenerateBox { .. })
        ));
        assert!(matches!(
            MassProperties::solid_box(Vec3::ONE, -1.0),
            Err(PhysicsError::InvalidDensity(_))
        ));
    }

    #[test]
    fn static_properties_are_static() {
        assert!(MassProperties::STATIC.is_static());
        assert!(!MassProperties::default().is_static());
    }
}
