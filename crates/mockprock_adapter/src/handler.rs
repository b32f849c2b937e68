use std::future::Future;

use crate::error::Result;

/// Lifecycle callbacks a host exam-delivery framework drives.
///
/// The host calls one method at a time and awaits it before moving on;
/// `Ok(())` resolves the callback, `Err` rejects it.
pub trait ProctoringEventHandler {
    fn on_start_exam_attempt(&self) -> impl Future<Output = Result<()>> + Send;

    fn on_end_exam_attempt(&self) -> impl Future<Output = Result<()>> + Send;

    fn on_ping(&self) -> impl Future<Output = Result<()>> + Send;
}
