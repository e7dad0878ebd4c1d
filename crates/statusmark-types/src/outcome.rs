// ABOUTME: Result of an interactive step that the user may abandon
// ABOUTME: Cancellation is an ordinary outcome, not an error

/// Resolution of a prompt or picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Committed(T),
    Cancelled,
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Committed(value),
            None => Outcome::Cancelled,
        }
    }
}
