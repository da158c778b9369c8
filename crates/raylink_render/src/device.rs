//! Device Abstraction
//!
//! The translation layer never talks to a graphics API directly. It asks a
//! [`Device`] for buffers, images and views, and hands recorded
//! [`Command`]s back through [`Device::submit`].
//!
//! Every resource keeps a host-side copy of its contents. The bundled
//! [`HeadlessDevice`] works purely on those copies, which makes the whole
//! pipeline observable in tests. A hardware backend mirrors the same
//! resources into native objects when commands are submitted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use parking_lot::Mutex;
use raylink_core::errors::{ApiError, Result};

use crate::commands::Command;
use crate::format::TextureFormat;
use crate::picking::PixelRect;

/// Buffer sizes are rounded up to this many bytes.
pub const CACHE_LINE_SIZE: u64 = 64;

#[inline]
#[must_use]
pub fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const TRANSFER_SRC = 1 << 0;
        const TRANSFER_DST = 1 << 1;
        const STORAGE = 1 << 2;
        const VERTEX = 1 << 3;
        const INDEX = 1 << 4;
        const DEVICE_ADDRESS = 1 << 5;
        const ACCELERATION_STRUCTURE_INPUT = 1 << 6;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsage: u32 {
        const TRANSFER_SRC = 1 << 0;
        const TRANSFER_DST = 1 << 1;
        const SAMPLED = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLocation {
    /// Mappable from the CPU, used for staging.
    HostVisible,
    DeviceLocal,
}

#[derive(Debug, Clone)]
pub struct BufferDesc {
    pub label: &'static str,
    pub size: u64,
    pub usage: BufferUsage,
    pub location: MemoryLocation,
}

#[derive(Debug, Clone)]
pub struct ImageDesc {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: ImageUsage,
}

// ============================================================================
// Resources
// ============================================================================

pub struct Buffer {
    id: u64,
    desc: BufferDesc,
    memory: Mutex<Vec<u8>>,
}

impl Buffer {
    #[must_use]
    pub fn new(id: u64, desc: BufferDesc) -> Self {
        let len = usize::try_from(desc.size).unwrap_or(usize::MAX);
        Self {
            id,
            memory: Mutex::new(vec![0; len]),
            desc,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> u64 {
        self.desc.size
    }

    #[must_use]
    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    /// Writes through the host mapping. Only host-visible buffers are mappable.
    pub fn write(&self, offset: u64, bytes: &[u8]) -> Result<()> {
        if self.desc.location != MemoryLocation::HostVisible {
            return Err(ApiError::Backend(format!(
                "buffer '{}' is not host visible",
                self.desc.label
            )));
        }
        self.write_unchecked(offset, bytes)
    }

    pub(crate) fn write_unchecked(&self, offset: u64, bytes: &[u8]) -> Result<()> {
        let mut memory = self.memory.lock();
        let start = usize::try_from(offset).map_err(|_| out_of_range(self.desc.label))?;
        let end = start
            .checked_add(bytes.len())
            .filter(|end| *end <= memory.len())
            .ok_or_else(|| out_of_range(self.desc.label))?;
        memory[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Copies `len` bytes starting at `offset` out of the buffer.
    pub fn read(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let memory = self.memory.lock();
        let start = usize::try_from(offset).map_err(|_| out_of_range(self.desc.label))?;
        let len = usize::try_from(len).map_err(|_| out_of_range(self.desc.label))?;
        memory
            .get(start..start.saturating_add(len))
            .map(<[u8]>::to_vec)
            .ok_or_else(|| out_of_range(self.desc.label))
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id)
            .field("label", &self.desc.label)
            .field("size", &self.desc.size)
            .field("location", &self.desc.location)
            .finish()
    }
}

fn out_of_range(label: &str) -> ApiError {
    ApiError::Backend(format!("access out of range for '{label}'"))
}

/// A byte range within a buffer.
#[derive(Debug, Clone)]
pub struct BufferSlice {
    pub buffer: Arc<Buffer>,
    pub offset: u64,
    pub length: u64,
}

impl BufferSlice {
    #[must_use]
    pub fn whole(buffer: Arc<Buffer>) -> Self {
        let length = buffer.size();
        Self {
            buffer,
            offset: 0,
            length,
        }
    }

    #[must_use]
    pub fn sub(buffer: Arc<Buffer>, offset: u64, length: u64) -> Self {
        Self { buffer, offset, length }
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        self.buffer.read(self.offset, self.length)
    }
}

pub struct Image {
    id: u64,
    desc: ImageDesc,
    memory: Mutex<Vec<u8>>,
}

impl Image {
    #[must_use]
    pub fn new(id: u64, desc: ImageDesc) -> Self {
        Self {
            id,
            desc,
            memory: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    /// Host copy of the texel data uploaded so far.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.memory.lock().clone()
    }

    pub(crate) fn store(&self, bytes: Vec<u8>) {
        *self.memory.lock() = bytes;
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("label", &self.desc.label)
            .field("extent", &(self.desc.width, self.desc.height))
            .field("format", &self.desc.format)
            .finish()
    }
}

#[derive(Debug)]
pub struct ImageView {
    id: u64,
    image: Arc<Image>,
    format: TextureFormat,
}

impl ImageView {
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    #[must_use]
    pub fn format(&self) -> TextureFormat {
        self.format
    }
}

// ============================================================================
// Device
// ============================================================================

pub trait Device: Send + Sync {
    fn name(&self) -> &str;

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<Buffer>>;

    fn create_image(&self, desc: &ImageDesc) -> Result<Arc<Image>>;

    /// Creates a 2D, single-mip, identity-swizzled view of `image`.
    fn create_image_view(&self, image: &Arc<Image>) -> Result<Arc<ImageView>>;

    /// Executes recorded commands in order.
    fn submit(&self, commands: Vec<Command>) -> Result<()>;

    /// Returns the object-picking values visible in `region`.
    ///
    /// `drawn` holds the picking values of every instance committed this
    /// frame. Without a picking image the whole frame counts as visible.
    fn resolve_object_picking(&self, region: PixelRect, drawn: &[u32]) -> Vec<u32> {
        let _ = region;
        let mut values = drawn.to_vec();
        values.sort_unstable();
        values.dedup();
        values
    }
}

/// Device that keeps every resource in host memory.
pub struct HeadlessDevice {
    name: String,
    next_id: AtomicU64,
    submitted: AtomicU64,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new("headless")
    }
}

impl HeadlessDevice {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: AtomicU64::new(1),
            submitted: AtomicU64::new(0),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of commands executed so far.
    #[must_use]
    pub fn submitted_commands(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }
}

impl Device for HeadlessDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<Buffer>> {
        if desc.size == 0 {
            return Err(ApiError::Backend(format!("zero-sized buffer '{}'", desc.label)));
        }
        let mut desc = desc.clone();
        desc.size = align_up(desc.size, CACHE_LINE_SIZE);
        Ok(Arc::new(Buffer::new(self.allocate_id(), desc)))
    }

    fn create_image(&self, desc: &ImageDesc) -> Result<Arc<Image>> {
        if desc.format == TextureFormat::UNDEFINED {
            return Err(ApiError::Backend(format!("image '{}' has no format", desc.label)));
        }
        Ok(Arc::new(Image::new(self.allocate_id(), desc.clone())))
    }

    fn create_image_view(&self, image: &Arc<Image>) -> Result<Arc<ImageView>> {
        Ok(Arc::new(ImageView {
            id: self.allocate_id(),
            image: Arc::clone(image),
            format: image.desc().format,
        }))
    }

    fn submit(&self, commands: Vec<Command>) -> Result<()> {
        for command in commands {
            command.execute_on_host()?;
            self.submitted.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staging(device: &HeadlessDevice, size: u64) -> Arc<Buffer> {
        device
            .create_buffer(&BufferDesc {
                label: "test",
                size,
                usage: BufferUsage::TRANSFER_SRC,
                location: MemoryLocation::HostVisible,
            })
            .unwrap()
    }

    #[test]
    fn buffer_sizes_are_cache_line_aligned() {
        let device = HeadlessDevice::default();
        assert_eq!(staging(&device, 1).size(), 64);
        assert_eq!(staging(&device, 65).size(), 128);
    }

    #[test]
    fn writes_are_bounds_checked() {
        let device = HeadlessDevice::default();
        let buffer = staging(&device, 64);
        buffer.write(60, &[1, 2, 3, 4]).unwrap();
        assert!(buffer.write(62, &[1, 2, 3, 4]).is_err());
        assert_eq!(buffer.read(60, 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn device_local_buffers_are_not_mappable() {
        let device = HeadlessDevice::default();
        let buffer = device
            .create_buffer(&BufferDesc {
                label: "gpu",
                size: 16,
                usage: BufferUsage::STORAGE,
                location: MemoryLocation::DeviceLocal,
            })
            .unwrap();
        assert!(buffer.write(0, &[0]).is_err());
    }
}
