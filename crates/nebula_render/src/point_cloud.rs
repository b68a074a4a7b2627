//! GPU buffers for one particle population

use bytemuck::{Pod, Zeroable};
use nebula_core::GroupTransform;
use nebula_math::{mat4, Mat4, Rgb, Vec3};
use wgpu::util::DeviceExt;

/// Per-cloud uniforms, shared between the vertex and fragment stages
///
/// Layout must match `CloudUniforms` in `shaders/points.wgsl`:
/// two mat4x4 + two f32, padded to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CloudUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// World-space sprite diameter
    pub point_size: f32,
    /// Multiplied into the sprite alpha before additive blending
    pub opacity: f32,
    pub _padding: [f32; 2],
}

impl Default for CloudUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            model: mat4::IDENTITY,
            point_size: 0.05,
            opacity: 1.0,
            _padding: [0.0; 2],
        }
    }
}

/// Vertex and uniform buffers for one population
///
/// Positions are instanced: each particle is one instance expanded to a
/// screen-facing quad in the vertex shader. Colors never change after
/// creation; positions are re-uploaded when the simulation marks them
/// dirty.
pub struct PointCloud {
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
    point_size: f32,
    opacity: f32,
}

impl PointCloud {
    /// Create GPU buffers for a population
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        positions: &[Vec3],
        colors: &[Rgb],
        point_size: f32,
        opacity: f32,
    ) -> Self {
        debug_assert_eq!(positions.len(), colors.len());

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Position Buffer"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Color Buffer"),
            contents: bytemuck::cast_slice(colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms = CloudUniforms {
            point_size,
            opacity,
            ..CloudUniforms::default()
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cloud Bind Group"),
            layout: bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            position_buffer,
            color_buffer,
            uniform_buffer,
            bind_group,
            count: positions.len() as u32,
            point_size,
            opacity,
        }
    }

    /// Overwrite the position buffer with the latest simulation output
    ///
    /// The slice length must match the count this cloud was created with.
    pub fn upload_positions(&self, queue: &wgpu::Queue, positions: &[Vec3]) {
        debug_assert_eq!(positions.len() as u32, self.count);
        queue.write_buffer(&self.position_buffer, 0, bytemuck::cast_slice(positions));
    }

    /// Write the camera and group transform for this frame
    pub fn update_uniforms(&self, queue: &wgpu::Queue, view_proj: Mat4, transform: &GroupTransform) {
        let model = mat4::mul(
            mat4::translation(0.0, transform.y_offset, 0.0),
            mat4::mul(
                mat4::rotation_x(transform.rotation_x),
                mat4::rotation_y(transform.rotation_y),
            ),
        );
        let uniforms = CloudUniforms {
            view_proj,
            model,
            point_size: self.point_size,
            opacity: self.opacity,
            _padding: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Number of particles in this cloud
    pub fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn position_buffer(&self) -> &wgpu::Buffer {
        &self.position_buffer
    }

    pub(crate) fn color_buffer(&self) -> &wgpu::Buffer {
        &self.color_buffer
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_cloud_uniforms_size() {
        // 2 mat4 (128 bytes) + 2 f32 + 2 f32 padding = 144 bytes
        assert_eq!(size_of::<CloudUniforms>(), 144);
    }

    #[test]
    fn test_cloud_uniforms_alignment() {
        assert_eq!(std::mem::align_of::<CloudUniforms>(), 4);
    }

    #[test]
    fn test_vertex_types_are_tightly_packed() {
        assert_eq!(size_of::<Vec3>(), 12);
        assert_eq!(size_of::<Rgb>(), 12);
    }
}
