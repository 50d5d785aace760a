use thiserror::Error;

/// Failures raised by the message-field type-coercion helpers.
///
/// These are the only fallible surface the hub exposes: routing, delivery
/// and subscription management never fail (they degrade silently per their
/// own contracts instead — see [`crate::subscriber`]).
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field {key:?} is missing")]
    Missing { key: String },

    #[error("field {key:?} holds a {found} value, expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
