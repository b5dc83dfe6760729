//! Demo configuration.
//!
//! Everything the demo would otherwise hard-code lives in [`DemoConfig`].
//! The defaults reproduce the reference scene: a 1280x720 window, the quad at
//! the origin and the camera five units in front of it.

use cgmath::Deg;

use crate::math::Vector3;

#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub clear_color: wgpu::Color,
    pub fov_y: Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub camera_translate: Vector3,
    /// Radians added to the quad's y rotation every frame.
    pub rotate_speed: f32,
    pub vertex_shader: String,
    pub pixel_shader: String,
    pub texture: String,
    /// FIFO is vsync, i.e. a present interval of 1.
    pub present_mode: wgpu::PresentMode,
    /// Shader-resource slot of the overlay [`crate::flow::run`] installs.
    /// Custom overlays report their own slot.
    pub overlay_slot: u32,
    pub srv_heap_capacity: u32,
    /// Frame statistics are logged every this many frames; 0 disables them.
    pub stats_interval: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "CG2".to_string(),
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.25,
                b: 0.5,
                a: 1.0,
            },
            fov_y: Deg(45.0),
            near: 0.1,
            far: 100.0,
            camera_translate: Vector3::new(0.0, 0.0, -5.0),
            rotate_speed: 0.03,
            vertex_shader: "shaders/Object3d.VS.wgsl".to_string(),
            pixel_shader: "shaders/Object3d.PS.wgsl".to_string(),
            texture: "uvChecker.png".to_string(),
            present_mode: wgpu::PresentMode::Fifo,
            overlay_slot: 0,
            srv_heap_capacity: 128,
            stats_interval: 600,
        }
    }
}

impl DemoConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_clear_color(mut self, clear_color: wgpu::Color) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn with_fov_y(mut self, fov_y: Deg<f32>) -> Self {
        self.fov_y = fov_y;
        self
    }

    pub fn with_depth_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_camera_translate(mut self, translate: Vector3) -> Self {
        self.camera_translate = translate;
        self
    }

    pub fn with_rotate_speed(mut self, rotate_speed: f32) -> Self {
        self.rotate_speed = rotate_speed;
        self
    }

    pub fn with_shaders(mut self, vertex: impl Into<String>, pixel: impl Into<String>) -> Self {
        self.vertex_shader = vertex.into();
        self.pixel_shader = pixel.into();
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = texture.into();
        self
    }

    pub fn with_present_mode(mut self, present_mode: wgpu::PresentMode) -> Self {
        self.present_mode = present_mode;
        self
    }

    pub fn with_stats_interval(mut self, frames: u64) -> Self {
        self.stats_interval = frames;
        self
    }

    /// Slot reserved by the default overlay of [`crate::flow::run`].
    pub fn with_overlay_slot(mut self, slot: u32) -> Self {
        self.overlay_slot = slot;
        self
    }

    pub fn with_srv_heap_capacity(mut self, capacity: u32) -> Self {
        self.srv_heap_capacity = capacity;
        self
    }
}
