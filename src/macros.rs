//===========================================================================//

macro_rules! io_error {
    ($kind:ident, $e:expr) => {
        ::std::io::Error::new(::std::io::ErrorKind::$kind, $e)
    };
    ($kind:ident, $fmt:expr, $($arg:tt)+) => {
        ::std::io::Error::new(::std::io::ErrorKind::$kind,
                              format!($fmt, $($arg)+))
    };
}

macro_rules! invalid_data {
    ($($arg:tt)+) => {
        return Err(io_error!(InvalidData, $($arg)+))
    };
}

macro_rules! invalid_input {
    ($($arg:tt)+) => {
        return Err(io_error!(InvalidInput, $($arg)+))
    };
}

//===========================================================================//
