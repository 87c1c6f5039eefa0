//! Result alias and the skip-this-item helper used by batch passes

use crate::error::FixpointError;

pub type Result<T> = std::result::Result<T, FixpointError>;

pub trait ResultExt<T> {
    /// `Ok(None)` for an error that only affects the current item; anything
    /// else is propagated
    fn recoverable(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Skipping item: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    #[test]
    fn test_recoverable_skips_item_errors_only() {
        let conflict: Result<u32> = Err(FixpointError::edit_conflict("r", Span::new(0, 2)));
        assert!(matches!(conflict.recoverable(), Ok(None)));

        let failure: Result<u32> = Err(FixpointError::predicate_failure("r", "boom"));
        assert!(matches!(failure.recoverable(), Ok(None)));

        let cancelled: Result<u32> = Err(FixpointError::Cancelled);
        assert!(matches!(cancelled.recoverable(), Err(FixpointError::Cancelled)));

        assert!(matches!(Ok::<_, FixpointError>(7).recoverable(), Ok(Some(7))));
    }
}
