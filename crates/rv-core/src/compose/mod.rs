//! # Template Composition
//!
//! Static template data plus the renderer that fills it in. Nothing here does
//! I/O; the only non-determinism comes from the injected [`TemplatePicker`].
//!
//! [`TemplatePicker`]: crate::traits::TemplatePicker

pub mod picker;
pub mod renderer;
pub mod retrieval;
pub mod templates;
pub mod voices;

pub use picker::{FixedPicker, RandomPicker};
pub use renderer::Renderer;
pub use retrieval::CjkRunTokenizer;
pub use templates::{PoemTemplate, PoemTemplates};
