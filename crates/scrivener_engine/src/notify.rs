use scrivener_logging::{scriv_info, scriv_warn};

/// Fire-and-forget user notifications (UI toasts in a real host).
/// Never affects control flow.
pub trait NotificationSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn success(&self, message: &str);
}

/// Routes notifications to the logging facade. Useful for headless embedders
/// and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn info(&self, message: &str) {
        scriv_info!("{message}");
    }

    fn warn(&self, message: &str) {
        scriv_warn!("{message}");
    }

    fn success(&self, message: &str) {
        scriv_info!("{message}");
    }
}
