use std::fmt;

/// Rejection of a `WxH` board address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteError {
    pub status: u16,
    pub message: &'static str,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl std::error::Error for RouteError {}

const BAD_DIMENSIONS: RouteError = RouteError {
    status: 400,
    message: "Try something like 20x20.",
};

/// Split a `WxH` segment such as `20x20` into numbers.
///
/// Only checks that both halves are finite numbers; fractional or
/// out-of-range sizes are left for [`whole_dimensions`] and the board
/// constructor to refuse.
///
/// [`whole_dimensions`]: crate::buffer::whole_dimensions
pub fn parse_dimensions(segment: &str) -> Result<(f64, f64), RouteError> {
    let (x, y) = segment
        .trim()
        .split_once(['x', 'X'])
        .ok_or(BAD_DIMENSIONS)?;
    let number = |part: &str| match part.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(BAD_DIMENSIONS),
    };
    Ok((number(x)?, number(y)?))
}
