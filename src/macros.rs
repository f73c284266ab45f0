//===========================================================================//

macro_rules! truncated_input {
    ($e:expr) => {
        return Err($crate::error::Error::TruncatedInput(($e).to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::TruncatedInput(
            format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_input {
    ($e:expr) => {
        return Err($crate::error::Error::InvalidInput(($e).to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::InvalidInput(
            format!($fmt, $($arg)+)))
    };
}

//===========================================================================//
