//! Frame data types and the pixel → world back-projection math.
//!
//! All geometry here uses the camera convention of +x right, +y down,
//! +z forward (into the scene). A [`CameraPose`] carries the captured
//! frame into world space.

// ---------------------------------------------------------------------------
// PixelPos / WorldPoint
// ---------------------------------------------------------------------------

/// A 2D coordinate in the source frame's pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 3D point in world space, used for placing labels in physical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// CameraImage
// ---------------------------------------------------------------------------

/// An RGBA8 camera frame captured alongside a depth map.
///
/// The pixel data is row-major, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CameraImage {
    /// Create an image, validating that `data` holds exactly
    /// `width × height` RGBA pixels.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// A solid-color image. Used by the synthetic frame source.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// DepthMap
// ---------------------------------------------------------------------------

/// Per-pixel depth samples in meters, row-major, same dimensions as the
/// camera image they were captured with.
///
/// A sample of `f32::NAN`, infinity, or a non-positive value means "no
/// depth data at that pixel" — the sensor could not produce a reading.
#[derive(Debug, Clone)]
pub struct DepthMap {
    pub width: u32,
    pub height: u32,
    pub samples: Vec<f32>,
}

impl DepthMap {
    /// A constant-depth map (a flat plane facing the camera).
    pub fn uniform(width: u32, height: u32, depth: f32) -> Self {
        Self {
            width,
            height,
            samples: vec![depth; (width as usize) * (height as usize)],
        }
    }

    /// Depth at the nearest pixel to `pos`, or `None` when the position
    /// is out of bounds or the sample is unusable.
    pub fn sample(&self, pos: PixelPos) -> Option<f32> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let x = pos.x.round() as u32;
        let y = pos.y.round() as u32;
        if x >= self.width || y >= self.height {
            return None;
        }
        let depth = self.samples[(y as usize) * (self.width as usize) + (x as usize)];
        if !depth.is_finite() || depth <= 0.0 {
            return None;
        }
        Some(depth)
    }
}

// ---------------------------------------------------------------------------
// CameraIntrinsics / CameraPose
// ---------------------------------------------------------------------------

/// Pinhole intrinsics of the capturing camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraIntrinsics {
    /// Focal length in pixels, x axis.
    pub fx: f32,
    /// Focal length in pixels, y axis.
    pub fy: f32,
    /// Principal point x (usually the image center).
    pub cx: f32,
    /// Principal point y.
    pub cy: f32,
}

impl CameraIntrinsics {
    /// Intrinsics with the principal point at the image center.
    pub fn centered(width: u32, height: u32, focal_px: f32) -> Self {
        Self {
            fx: focal_px,
            fy: focal_px,
            cx: width as f32 / 2.0,
            cy: height as f32 / 2.0,
        }
    }

    /// Back-project `pixel` at `depth` meters into camera space.
    pub fn back_project(&self, pixel: PixelPos, depth: f32) -> WorldPoint {
        WorldPoint {
            x: (pixel.x - self.cx) / self.fx * depth,
            y: (pixel.y - self.cy) / self.fy * depth,
            z: depth,
        }
    }
}

/// Rigid transform from camera space to world space at capture time.
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    /// Row-major 3×3 rotation matrix.
    pub rotation: [[f32; 3]; 3],
    /// Camera position in world space.
    pub position: [f32; 3],
}

impl CameraPose {
    /// Camera at the world origin looking down +z.
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            position: [0.0, 0.0, 0.0],
        }
    }

    /// Carry a camera-space point into world space.
    pub fn to_world(&self, p: WorldPoint) -> WorldPoint {
        let r = &self.rotation;
        WorldPoint {
            x: r[0][0] * p.x + r[0][1] * p.y + r[0][2] * p.z + self.position[0],
            y: r[1][0] * p.x + r[1][1] * p.y + r[1][2] * p.z + self.position[1],
            z: r[2][0] * p.x + r[2][1] * p.y + r[2][2] * p.z + self.position[2],
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::identity()
    }
}

// ---------------------------------------------------------------------------
// FrameSnapshot
// ---------------------------------------------------------------------------

/// Everything captured in one call to the frame source: the camera image,
/// the depth map, and the calibration needed to resolve pixels to world
/// positions later. Image and depth always come from the same instant so
/// resolution stays consistent with the image sent to the vision service.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub image: CameraImage,
    pub depth: DepthMap,
    pub intrinsics: CameraIntrinsics,
    pub pose: CameraPose,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
