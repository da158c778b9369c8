//! Cameras submitted through `SetupCamera`.

use glam::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraType {
    #[default]
    Main,
    ViewModel,
    Sky,
}

impl CameraType {
    pub const COUNT: usize = 3;

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// View and projection of one camera, as the translation layer computed them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalCamera {
    pub camera_type: CameraType,
    pub world_to_view: Mat4,
    pub view_to_projection: Mat4,
}

impl ExternalCamera {
    #[must_use]
    pub fn view_to_world(&self) -> Mat4 {
        self.world_to_view.inverse()
    }
}

#[derive(Debug, Clone, Copy)]
struct CameraSlot {
    camera: ExternalCamera,
    frame_id: u64,
}

/// Latest camera per [`CameraType`].
#[derive(Debug, Default)]
pub struct CameraManager {
    slots: [Option<CameraSlot>; CameraType::COUNT],
}

impl CameraManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_external_camera(&mut self, camera: ExternalCamera, frame_id: u64) {
        self.slots[camera.camera_type.index()] = Some(CameraSlot { camera, frame_id });
    }

    #[must_use]
    pub fn get(&self, camera_type: CameraType) -> Option<&ExternalCamera> {
        self.slots[camera_type.index()].as_ref().map(|slot| &slot.camera)
    }

    /// Whether `camera_type` was set up during `frame_id`.
    #[must_use]
    pub fn is_valid(&self, camera_type: CameraType, frame_id: u64) -> bool {
        self.slots[camera_type.index()].is_some_and(|slot| slot.frame_id == frame_id)
    }

    pub fn clear(&mut self) {
        self.slots = [None; CameraType::COUNT];
    }
}
