#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod config;
pub mod delaunay;
pub mod error;
pub mod geometry;
pub mod map_renderer;
pub mod raster;
pub mod relaxation;
pub mod rendering;
pub mod sampling;
pub mod terrain;

pub use app::ProceduralApp;
pub use config::{CanvasConfig, GenerationParameters};
pub use error::{MapError, Result};
pub use map_renderer::{GeneratedMap, MapCell, MapRenderer, RendererState};
