use crate::events::{Emitter, Notification};

/// Console sink for notifications, printing human or JSON output.
pub struct Console {
    notifications: Vec<Notification>,
    json_mode: bool,
}

impl Console {
    pub fn new(json_mode: bool) -> Self {
        Self {
            notifications: Vec::new(),
            json_mode,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Line printed for `notification`.
    pub fn format(&self, notification: &Notification) -> String {
        if self.json_mode {
            match serde_json::to_string(notification) {
                Ok(line) => return line,
                Err(e) => tracing::warn!(error = %e, "failed to encode notification"),
            }
        }
        match notification {
            Notification::ReportWritten { kind, dest } => {
                format!("{kind} report written to {}", dest.display())
            }
        }
    }
}

impl Emitter for Console {
    fn emit(&mut self, notification: Notification) {
        println!("{}", self.format(&notification));
        self.notifications.push(notification);
    }
}
