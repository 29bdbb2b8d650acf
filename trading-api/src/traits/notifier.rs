/// Outbound human notifications (chat, e-mail...).
///
/// Fire-and-forget: delivery failures are the implementor's problem and
/// never reach the pipeline.
pub trait Notifier: Send {
    fn notify(&self, title: &str, message: &str);
}
