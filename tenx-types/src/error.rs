use std::fmt::Display;

/// Boxed error from the storage layer underneath a `ColumnStore`.
pub type StorageError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures reported by a `ColumnStore` and the block readers built on it.
#[derive(Debug)]
pub enum MatrixError {
    /// The backing arrays break the CSC invariants (lengths, `indptr` order, row bounds).
    Format(String),
    /// A requested row or column lies outside the matrix.
    Range(String),
    /// The storage layer failed to read. Not retried.
    Io(StorageError),
}

impl MatrixError {
    pub fn format(msg: impl Into<String>) -> Self {
        MatrixError::Format(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        MatrixError::Range(msg.into())
    }

    pub fn io(err: impl Into<StorageError>) -> Self {
        MatrixError::Io(err.into())
    }

    pub fn is_format(&self) -> bool {
        matches!(self, MatrixError::Format(_))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, MatrixError::Range(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, MatrixError::Io(_))
    }
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::Format(msg) => write!(f, "malformed sparse matrix: {msg}"),
            MatrixError::Range(msg) => write!(f, "index out of range: {msg}"),
            MatrixError::Io(err) => write!(f, "storage read failed: {err}"),
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatrixError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_kinds() {
        let e = MatrixError::range("column 3 >= ncol 3");
        assert!(e.is_range());
        assert!(!e.is_format());
        assert_eq!(e.to_string(), "index out of range: column 3 >= ncol 3");

        let io = MatrixError::io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert!(io.is_io());
        assert!(io.source().is_some());
        assert!(MatrixError::format("x").source().is_none());
    }
}
