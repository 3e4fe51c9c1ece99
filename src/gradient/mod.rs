//! Card gradients
//!
//! Gives dynamically loaded cards (projects, events, team, gallery) a stable
//! colour: a key is hashed into a fixed preset table and resolved to either a
//! utility-class rendering or an inline CSS rendering.

pub mod picker;
pub mod presets;

pub use picker::{
    djb2, hash_to_index, GradientResolver, RenderSpec, Resolution, DJB2_SEED, FALLBACK_CSS,
};
pub use presets::{Gradient, GRADIENTS};
