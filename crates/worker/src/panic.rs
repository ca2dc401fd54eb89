use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Extracts the message from a panic payload, if it carries one.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return Some((*msg).to_string());
	}
	payload.downcast_ref::<String>().cloned()
}

/// Runs `f`, turning a panic into its message.
pub(crate) fn catch<R>(f: impl FnOnce() -> R) -> Result<R, String> {
	panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()).unwrap_or_else(|| "non-string panic payload".to_string()))
}

#[cfg(test)]
#[path = "panic_tests.rs"]
mod tests;
