//! Recorded transfer commands.

use std::sync::Arc;

use raylink_core::errors::{ApiError, Result};

use crate::device::{BufferSlice, Image};

#[derive(Debug)]
pub enum Command {
    /// Copies `src` into `dst`. Both slices must have the same length.
    CopyBuffer { src: BufferSlice, dst: BufferSlice },
    /// Uploads tightly packed texels into mip 0 / layer 0 of `dst`.
    CopyBufferToImage {
        src: BufferSlice,
        dst: Arc<Image>,
        width: u32,
        height: u32,
    },
}

impl Command {
    /// Performs the command against the resources' host copies.
    pub fn execute_on_host(&self) -> Result<()> {
        match self {
            Command::CopyBuffer { src, dst } => {
                if src.length != dst.length {
                    return Err(ApiError::Backend(format!(
                        "copy size mismatch: {} -> {}",
                        src.length, dst.length
                    )));
                }
                let bytes = src.read()?;
                dst.buffer.write_unchecked(dst.offset, &bytes)
            }
            Command::CopyBufferToImage { src, dst, .. } => {
                dst.store(src.read()?);
                Ok(())
            }
        }
    }
}

/// Commands recorded on the render thread, flushed to the device in order.
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_buffer(&mut self, src: BufferSlice, dst: BufferSlice) {
        self.commands.push(Command::CopyBuffer { src, dst });
    }

    pub fn copy_buffer_to_image(&mut self, src: BufferSlice, dst: Arc<Image>, width: u32, height: u32) {
        self.commands.push(Command::CopyBufferToImage { src, dst, width, height });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}
