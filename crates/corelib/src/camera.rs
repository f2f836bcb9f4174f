use crate::{Mat4, Vec3};

/// Simple perspective camera (right-handed, depth in [0, 1]).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    pub const DEFAULT_FOV_Y_DEG: f32 = 45.0;
    pub const DEFAULT_Z_NEAR: f32 = 0.1;
    pub const DEFAULT_Z_FAR: f32 = 100.0;

    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// 45 degree camera at `eye`, Y up, aimed at the origin.
    pub fn looking_at_origin(eye: Vec3, aspect: f32) -> Self {
        Self::new_perspective(
            eye,
            Vec3::ZERO,
            Vec3::Y,
            Self::DEFAULT_FOV_Y_DEG.to_radians(),
            Self::DEFAULT_Z_NEAR,
            Self::DEFAULT_Z_FAR,
            aspect,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at_origin(Vec3::new(3.0, 2.0, 3.0), 800.0 / 600.0)
    }
}
