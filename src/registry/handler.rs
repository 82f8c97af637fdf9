use crate::model::ChangeEvent;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Failure of one handler invocation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// Receiver of change notifications for one topic.
///
/// The registry holds the handler only while its subscription is open and calls
/// `notify` once per delivered event, from the coordinator's loop. Implementations
/// should return quickly; anything slow (such as re-fetching the changed data)
/// belongs on a task of its own.
///
/// An error or a panic only affects the invocation that produced it.
pub trait ChangeHandler: Send + Sync + 'static {
    fn notify(&self, event: &ChangeEvent) -> Result<(), HandlerError>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Calls `handler`, turning a panic into [`HandlerError::Panicked`].
pub(crate) fn invoke(handler: &dyn ChangeHandler, event: &ChangeEvent) -> Result<(), HandlerError> {
    match catch_unwind(AssertUnwindSafe(|| handler.notify(event))) {
        Ok(result) => result,
        Err(panic) => Err(HandlerError::Panicked(panic_message(&*panic))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingHandler, PanickingHandler, RecordingHandler};
    use crate::model::Topic;
    use chrono::Utc;

    fn event() -> ChangeEvent {
        ChangeEvent::new(Topic::new("posts"), Utc::now())
    }

    #[test]
    fn invoke_passes_through_success() {
        let handler = RecordingHandler::new();
        assert_eq!(invoke(&handler, &event()), Ok(()));
        assert_eq!(handler.count(), 1);
    }

    #[test]
    fn invoke_passes_through_errors() {
        let handler = FailingHandler::new("stale cache");
        assert_eq!(
            invoke(&handler, &event()),
            Err(HandlerError::Failed("stale cache".into()))
        );
    }

    #[test]
    fn invoke_catches_panics() {
        let handler = PanickingHandler::new();
        let result = invoke(&handler, &event());
        assert!(matches!(result, Err(HandlerError::Panicked(msg)) if msg.contains("handler exploded")));
        assert_eq!(handler.attempts(), 1);
    }
}
