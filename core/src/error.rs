use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used by the top-level handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingDependency,
    MissingSource,
    Generation,
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("imaging support unavailable: {0}")]
    MissingDependency(String),

    #[error("source logo not found at {}", .0.display())]
    MissingSource(PathBuf),

    #[error("could not decode {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not encode {}", .name)]
    Encode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("could not write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render a {size}x{size} icon (maskable: {maskable})")]
    InvalidSize { size: u32, maskable: bool },

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("{0}")]
    Verification(String),
}

impl IconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IconError::MissingDependency(_) => ErrorKind::MissingDependency,
            IconError::MissingSource(_) => ErrorKind::MissingSource,
            _ => ErrorKind::Generation,
        }
    }

    /// Process exit status for this failure. Never 0.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::MissingSource => 1,
            ErrorKind::MissingDependency => 2,
            ErrorKind::Generation => 3,
        }
    }

    /// What the user should do about it.
    pub fn remediation(&self) -> String {
        match self {
            IconError::MissingDependency(_) => {
                "Rebuild with the `png` feature of the `image` crate enabled, or convert the logo to PNG.".to_string()
            }
            IconError::MissingSource(path) => format!(
                "Save the logo (at least {0}x{0} px, square) as {1}, or run `placeholder_logo` to create a temporary one.",
                crate::MIN_RECOMMENDED_SOURCE,
                path.display()
            ),
            IconError::Decode { .. } => {
                "Make sure the logo is a valid PNG, JPEG or WebP file.".to_string()
            }
            IconError::Io { .. } => {
                "Check that the output directory is writable and the disk is not full.".to_string()
            }
            IconError::InvalidColor(_) => {
                "Use a six digit hex color such as #1e4620.".to_string()
            }
            IconError::Encode { .. } | IconError::InvalidSize { .. } | IconError::Verification(_) => {
                "Icons written so far were kept; fix the problem above and run again.".to_string()
            }
        }
    }
}
