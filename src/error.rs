use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A single element was taller than the writable area of an empty page.
    Layout { required: f32, available: f32 },
    /// Final document assembly rejected its inputs. Nothing was produced.
    Assembly(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Layout {
                required,
                available,
            } => write!(
                f,
                "element of height {required:.1}pt cannot fit a page ({available:.1}pt writable)"
            ),
            Error::Assembly(msg) => write!(f, "assembly failed: {msg}"),
            Error::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
