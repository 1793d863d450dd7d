//! Optional logger handed to Oracle services.

use tracing::Level;

/// Logger an application may register; services work without one.
pub trait ServiceLogger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// [`ServiceLogger`] that forwards to `tracing` with a category field.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    category: &'static str,
}

impl TracingLogger {
    pub fn new(category: &'static str) -> Self {
        Self { category }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("servfor_di::oracle")
    }
}

impl ServiceLogger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        let category = self.category;
        if level == Level::ERROR {
            tracing::error!(category, "{message}");
        } else if level == Level::WARN {
            tracing::warn!(category, "{message}");
        } else if level == Level::INFO {
            tracing::info!(category, "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(category, "{message}");
        } else {
            tracing::trace!(category, "{message}");
        }
    }
}
