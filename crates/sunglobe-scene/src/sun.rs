//! Sun light model - turns the zone's hour of day into a light direction

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::Vec3;

/// Sun model configuration
#[derive(Clone, Debug)]
pub struct SunConfig {
    /// Observer longitude in degrees (east positive)
    pub longitude_deg: f64,
    /// Rotation speed multiplier applied to the hour angle
    pub speed_factor: f64,
    /// Phase offset aligning the day texture's seam, in radians
    pub phase_offset: f64,
    /// Orbit radius of the light before normalization
    pub orbit_radius: f64,
    /// Half-width of the twilight band in the terminator blend
    pub twilight: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        SunConfig {
            longitude_deg: -46.6,
            speed_factor: 1.3,
            phase_offset: FRAC_PI_2,
            orbit_radius: 10.0,
            twilight: 0.2,
        }
    }
}

/// Per-frame lighting uniforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunLight {
    /// Light angle around the globe's Y axis, radians
    pub angle: f64,
    /// Normalized directional light position
    pub position: Vec3,
    /// Shader `sunDirection` uniform (negated light position)
    pub direction: Vec3,
}

/// Sun model
#[derive(Debug, Clone, Default)]
pub struct SunModel {
    config: SunConfig,
}

impl SunModel {
    pub fn new(config: SunConfig) -> Self {
        SunModel { config }
    }

    pub fn config(&self) -> &SunConfig {
        &self.config
    }

    /// `angle = (hour/24)·2π·speed + (longitude/360)·2π + phase`
    pub fn angle(&self, fractional_hour: f64) -> f64 {
        let cfg = &self.config;
        let hour_angle = fractional_hour / 24.0 * TAU;
        let longitude_offset = cfg.longitude_deg / 360.0 * TAU;
        hour_angle * cfg.speed_factor + longitude_offset + cfg.phase_offset
    }

    /// Light uniforms for a fractional hour of day
    pub fn light(&self, fractional_hour: f64) -> SunLight {
        let angle = self.angle(fractional_hour);
        let r = self.config.orbit_radius;
        let position = Vec3::new((angle.cos() * r) as f32, 0.0, (angle.sin() * r) as f32).normalize();

        SunLight {
            angle,
            position,
            direction: position.negate(),
        }
    }

    /// Day texture weight for a surface normal, mirroring the terminator
    /// shader: `smoothstep(-t, t, dot(normal, sun_direction))`
    pub fn day_weight(&self, normal: &Vec3, sun_direction: &Vec3) -> f32 {
        let t = self.config.twilight;
        smoothstep(-t, t, normal.normalize().dot(sun_direction))
    }
}

/// GLSL `smoothstep`
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
