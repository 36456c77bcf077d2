/// Lifecycle of a single generation call
///
/// `Idle -> Requesting -> Succeeded | Failed`. A new attempt starts over from
/// `Requesting`; nothing carries over from the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState<T> {
    Idle,
    Requesting,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for GenerationState<T> {
    fn default() -> Self {
        GenerationState::Idle
    }
}

impl<T> GenerationState<T> {
    pub fn begin(&mut self) {
        *self = GenerationState::Requesting;
    }

    pub fn succeed(&mut self, record: T) -> &T {
        *self = GenerationState::Succeeded(record);
        match self {
            GenerationState::Succeeded(record) => record,
            _ => unreachable!("state was just set to Succeeded"),
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = GenerationState::Failed(message.into());
    }

    pub fn reset(&mut self) {
        *self = GenerationState::Idle;
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self, GenerationState::Requesting)
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            GenerationState::Succeeded(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
