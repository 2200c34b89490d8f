use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("glTF decode error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("Skeleton has {count} bones, palette capacity is {max}")]
    TooManyBones { count: usize, max: usize },

    #[error("{0}")]
    Custom(String),
}

impl AssetError {
    pub fn custom(path: impl AsRef<Path>, message: impl AsRef<str>) -> Self {
        Self::Custom(format!(
            "{}: {}",
            path.as_ref().display(),
            message.as_ref()
        ))
    }
}
