use crate::parsers::ParseResult;

/// Checks on the outcome of a parser in tests.
#[cfg(test)]
pub trait Match<T> {
    /// The parser succeeded with `value` and consumed all of its input.
    fn is_exactly(&self, value: T) -> bool;

    /// The parser succeeded with `value`, possibly leaving input behind.
    fn is_value(&self, value: T) -> bool;
}

#[cfg(test)]
impl<T: PartialEq> Match<T> for ParseResult<'_, T> {
    fn is_exactly(&self, value: T) -> bool {
        match self {
            Ok((remaining, parsed)) => remaining.is_empty() && *parsed == value,
            Err(_) => false,
        }
    }

    fn is_value(&self, value: T) -> bool {
        match self {
            Ok((_, parsed)) => *parsed == value,
            Err(_) => false,
        }
    }
}

/// Unwraps the parsed value, ignoring the remaining input.
pub trait UnwrapValue<T> {
    fn unwrap_value(self) -> T;
}

impl<T> UnwrapValue<T> for ParseResult<'_, T> {
    fn unwrap_value(self) -> T {
        match self {
            Ok((_, value)) => value,
            Err(error) => panic!("parser failed: {:?}", error),
        }
    }
}
