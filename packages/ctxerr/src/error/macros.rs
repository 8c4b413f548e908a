//! Macros for error creation and handling

/// Create an [`Error`](crate::Error) from a format string
///
/// ```
/// let e = ctxerr::err!("missing key {}", "user_id");
/// assert_eq!(e.message(), "missing key user_id");
/// ```
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// Return early with an error built by [`err!`]
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err($crate::err!($($arg)*))
    };
}

/// Return early with an error unless a condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}
