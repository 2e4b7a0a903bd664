//! Viewport, globe layout and perspective camera

use crate::Vec3;

/// Widths at or below this use the compact layout
pub const COMPACT_MAX_WIDTH: u32 = 768;

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport { width, height }
    }

    /// Width over height; a zero height is treated as one pixel
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn is_compact(&self) -> bool {
        self.width <= COMPACT_MAX_WIDTH
    }
}

/// Sphere parameters for the globe mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeLayout {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl GlobeLayout {
    /// Layout picked once, from the viewport at startup
    pub fn for_viewport(viewport: &Viewport) -> Self {
        GlobeLayout {
            radius: if viewport.is_compact() { 2.0 } else { 3.5 },
            width_segments: 64,
            height_segments: 64,
        }
    }
}

/// Camera configuration
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            fov_deg: 80.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(4.0, -2.0, 6.0),
            target: Vec3::ZERO,
        }
    }
}

/// Perspective camera that tracks the viewport
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    viewport: Viewport,
    /// Column-major projection matrix
    projection: [[f32; 4]; 4],
}

impl Camera {
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        let mut camera = Camera {
            config,
            viewport,
            projection: [[0.0; 4]; 4],
        };
        camera.update_projection();
        camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    pub fn projection(&self) -> &[[f32; 4]; 4] {
        &self.projection
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        self.config.target.sub(&self.config.position).normalize()
    }

    /// React to a viewport resize. Returns false when the size is unchanged.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.update_projection();
        true
    }

    fn update_projection(&mut self) {
        let cfg = &self.config;
        let f = 1.0 / (cfg.fov_deg.to_radians() / 2.0).tan();
        let range = cfg.near - cfg.far;

        self.projection = [
            [f / self.aspect(), 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (cfg.far + cfg.near) / range, -1.0],
            [0.0, 0.0, 2.0 * cfg.far * cfg.near / range, 0.0],
        ];
    }
}
