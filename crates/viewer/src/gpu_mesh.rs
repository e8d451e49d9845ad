use lustre_mesh::Mesh;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

pub trait BufferExt {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl BufferExt for Vertex {
    /// Positions and normals interleaved in a single buffer.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

pub fn vertices(mesh: &Mesh) -> Vec<Vertex> {
    mesh.positions()
        .iter()
        .zip(mesh.normals())
        .map(|(p, n)| Vertex {
            position: (*p).into(),
            normal: (*n).into(),
        })
        .collect()
}

/// A mesh uploaded to the GPU.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    count: u32,
    /// Lowest and highest y of the mesh in its own space.
    pub heights: (f32, f32),
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices(mesh)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let (index_buffer, count) = match mesh.indices() {
            Some(indices) => (
                Some(
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Index Buffer"),
                        contents: bytemuck::cast_slice(indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                ),
                indices.len() as u32,
            ),
            None => (None, mesh.vertex_count() as u32),
        };
        let heights = mesh
            .bounds()
            .map(|b| (b.min.y, b.max.y))
            .unwrap_or((0.0, 0.0));
        Self {
            vertex_buffer,
            index_buffer,
            count,
            heights,
        }
    }

    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.count, 0, 0..1);
            }
            None => render_pass.draw(0..self.count, 0..1),
        }
    }
}
