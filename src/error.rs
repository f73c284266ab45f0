use std::error;
use std::fmt;
use std::io;

//===========================================================================//

/// The ways in which reading, transforming, or writing an image can fail.
#[derive(Debug)]
pub enum Error {
    /// The input does not start with the PNG signature.
    BadSignature,
    /// A chunk (or the compressed pixel data) claims more bytes than remain.
    TruncatedInput(String),
    /// The image uses a filter method or filter type other than "none".
    UnsupportedFilter(u8),
    /// The image's color type has no defined channel count.
    UnsupportedColorType(u8),
    /// The image's bit depth can't be handled byte-wise.
    UnsupportedBitDepth(u8),
    /// A resize was requested with a width different from the height.
    UnsupportedShape {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
    /// An ICO file was requested for an image that isn't square.
    Shape {
        /// The image width.
        width: u32,
        /// The image height.
        height: u32,
    },
    /// An ICO file was requested for an image wider than ICO allows.
    Size {
        /// The image width.
        width: u32,
        /// The largest width an ICO entry can hold.
        max: u32,
    },
    /// The zlib stream inside the pixel data could not be inflated.
    Compression(io::Error),
    /// The caller passed data that is inconsistent with the image header.
    InvalidInput(String),
    /// Reading or writing a file failed.
    Io(io::Error),
}

/// A `Result` alias whose error type is [`Error`].
pub type Result<T> = ::std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BadSignature => write!(f, "Not a PNG file (bad signature)"),
            Error::TruncatedInput(ref msg) => {
                write!(f, "Truncated input: {}", msg)
            }
            Error::UnsupportedFilter(method) => {
                write!(f, "Unsupported PNG filter ({})", method)
            }
            Error::UnsupportedColorType(color_type) => {
                write!(f, "Unsupported PNG color type ({})", color_type)
            }
            Error::UnsupportedBitDepth(depth) => {
                write!(f, "Unsupported PNG bit depth ({})", depth)
            }
            Error::UnsupportedShape { width, height } => write!(
                f,
                "Unsupported resize target {}x{} \
                 (width and height must be equal)",
                width, height
            ),
            Error::Shape { width, height } => write!(
                f,
                "Image must be square for ICO (was {}x{})",
                width, height
            ),
            Error::Size { width, max } => write!(
                f,
                "Image too large for ICO (was {}, but max is {})",
                width, max
            ),
            Error::Compression(ref error) => {
                write!(f, "Malformed zlib data: {}", error)
            }
            Error::InvalidInput(ref msg) => write!(f, "{}", msg),
            Error::Io(ref error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Compression(ref error) | Error::Io(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

//===========================================================================//


//===========================================================================//
