//! Icon rendering for web app manifests: the icon table, safe-zone math,
//! resampling, compositing and PNG output. Knows nothing about paths or
//! console output; see the `pwa_icons` package for that.

mod error;
mod models;
mod render;

pub use error::{ErrorKind, IconError};
pub use models::*;
pub use render::{
    check_png_support, encode_png, generate_icon, load_source, maskable_inner_size,
    maskable_padding, render_spec, save_png,
};
