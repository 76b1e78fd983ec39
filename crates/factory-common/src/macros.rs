//! Convenience macros for error handling and propagation

/// Return early with [`DashError::InvalidInput`](crate::DashError::InvalidInput) unless `cond` holds
///
/// # Examples
///
/// ```rust
/// use factory_common::ensure_input;
/// use factory_common::Result;
///
/// fn first(values: &[f64]) -> Result<f64> {
///     ensure_input!(!values.is_empty(), "values must not be empty");
///     Ok(values[0])
/// }
///
/// assert!(first(&[]).unwrap_err().is_invalid_input());
/// ```
#[macro_export]
macro_rules! ensure_input {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::DashError::invalid_input($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::DashError::invalid_input(format!($fmt, $($arg)*)));
        }
    };
}
