mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use crate::errors::RequestError;

/// Explicit per-form validator: each form lists its field checks and the
/// collected failures surface as one validation error, evaluated before any
/// mutation runs.
pub(crate) struct FormCheck {
    errors: Vec<String>,
}

impl FormCheck {
    pub fn new() -> FormCheck {
        FormCheck { errors: Vec::new() }
    }

    /// The field must contain at least one non-whitespace character.
    pub fn require(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{}: this field is required", field));
        }
        self
    }

    pub fn check(mut self, field: &str, ok: bool, message: &str) -> Self {
        if !ok {
            self.errors.push(format!("{}: {}", field, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), RequestError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(RequestError::Validation(self.errors))
        }
    }
}
