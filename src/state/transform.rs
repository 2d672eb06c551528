// Authoritative scale/offset triple, previously spread over the camera struct.
use crate::model::TransformDescriptor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub fn reset(&mut self, min_scale: f64) {
        self.scale = min_scale;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Zero the offset when sitting at the minimum scale. Returns true if
    /// anything changed. Run after every write that can touch `scale`.
    pub fn enforce_rest(&mut self, min_scale: f64) -> bool {
        if self.scale == min_scale && (self.offset_x != 0.0 || self.offset_y != 0.0) {
            self.offset_x = 0.0;
            self.offset_y = 0.0;
            return true;
        }
        false
    }

    pub fn descriptor(&self) -> TransformDescriptor {
        TransformDescriptor {
            translate_x: self.offset_x,
            translate_y: self.offset_y,
            scale: self.scale,
        }
    }
}
