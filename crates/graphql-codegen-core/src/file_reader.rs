use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ReadContentError {
    #[error("could not read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("`{}` is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },
}

impl ReadContentError {
    pub(crate) fn path(&self) -> &Path {
        match self {
            ReadContentError::Io { path, .. } | ReadContentError::NotUtf8 { path } => path,
        }
    }
}

/// Reads a whole file as UTF-8 text.
pub(crate) fn read_content(path: impl AsRef<Path>) -> Result<String, ReadContentError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ReadContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ReadContentError::NotUtf8 {
        path: path.to_path_buf(),
    })
}
