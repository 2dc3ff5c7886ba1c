pub mod camera_utils;
pub mod perspective_camera;
pub mod trackball_controls;

// Re-export main types
pub use camera_utils::CameraUniform;
pub use perspective_camera::PerspectiveCamera;
pub use trackball_controls::TrackballControls;
