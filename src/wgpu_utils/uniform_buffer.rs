//! Typed uniform buffers
//!
//! Every draw owns one of these and rewrites it each frame, so writes whose
//! bytes match the last upload are dropped before they reach the queue.

use std::marker::PhantomData;

pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    uploaded: Vec<u8>,
    content: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Creates the buffer already holding `initial`.
    pub fn new(device: &wgpu::Device, label: &str, initial: &Content) -> Self {
        let bytes = bytemuck::bytes_of(initial);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: bytes.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        buffer.slice(..).get_mapped_range_mut().copy_from_slice(bytes);
        buffer.unmap();

        Self {
            buffer,
            uploaded: bytes.to_vec(),
            content: PhantomData,
        }
    }

    /// Uploads `content` unless it equals what the buffer already holds.
    /// Returns true if a write was queued.
    pub fn write(&mut self, queue: &wgpu::Queue, content: &Content) -> bool {
        let bytes = bytemuck::bytes_of(content);
        if !replace_if_changed(&mut self.uploaded, bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

fn replace_if_changed(uploaded: &mut Vec<u8>, bytes: &[u8]) -> bool {
    if uploaded.as_slice() == bytes {
        return false;
    }
    uploaded.clear();
    uploaded.extend_from_slice(bytes);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_are_not_rewritten() {
        let mut uploaded = bytemuck::bytes_of(&[1.0f32, 2.0]).to_vec();
        assert!(!replace_if_changed(&mut uploaded, bytemuck::bytes_of(&[1.0f32, 2.0])));
        assert!(replace_if_changed(&mut uploaded, bytemuck::bytes_of(&[1.0f32, 3.0])));
        assert_eq!(uploaded, bytemuck::bytes_of(&[1.0f32, 3.0]));
    }
}
