//! Stylized presentation of a single triangle mesh.
//!
//! The crate holds everything about the viewer that does not need a GPU: the
//! scene model, the appearance modes a click cycles through, the camera and
//! its orbit drivers, and [`ViewerState`], which ties them to input events.

mod appearance;
mod camera;
mod color;
mod config;
mod light;
mod load;
mod material;
mod orbit;
mod scene;
mod state;

pub use appearance::*;
pub use camera::*;
pub use color::*;
pub use config::*;
pub use light::*;
pub use load::*;
pub use material::*;
pub use orbit::*;
pub use scene::*;
pub use state::*;

pub use lustre_mesh as mesh;
