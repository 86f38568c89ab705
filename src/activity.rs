// ABOUTME: In-memory activity log and the transient "restart apps" banner.
// ABOUTME: Log lines are mirrored to tracing; the banner uses generations so stale timers are ignored.

/// Append-only list of human-readable outcome messages.
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    entries: Vec<String>,
}

impl ActivityLog {
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.entries.push(message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.entries.push(message);
    }

    #[allow(dead_code)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}

pub const BANNER_TEXT: &str = "Restart apps to apply";

/// Notice shown after a successful toggle, cleared by a timer.
#[derive(Debug, Default, Clone)]
pub struct Banner {
    visible: bool,
    generation: u64,
}

impl Banner {
    /// Show the banner and return the generation the expiry timer must quote.
    pub fn show(&mut self) -> u64 {
        self.generation += 1;
        self.visible = true;
        self.generation
    }

    /// Hide the banner unless it was shown again after `generation`.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.visible && generation == self.generation {
            self.visible = false;
            true
        } else {
            false
        }
    }

    #[allow(dead_code)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> Option<&'static str> {
        self.visible.then_some(BANNER_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_order() {
        let mut log = ActivityLog::default();
        log.info("Metal HUD enabled.");
        log.warn("Failed to toggle Metal HUD: boom");
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.last(), Some("Failed to toggle Metal HUD: boom"));
    }

    #[test]
    fn banner_expires_with_matching_generation() {
        let mut banner = Banner::default();
        assert!(banner.text().is_none());
        let generation = banner.show();
        assert_eq!(banner.text(), Some(BANNER_TEXT));
        assert!(banner.expire(generation));
        assert!(!banner.is_visible());
    }

    #[test]
    fn stale_expiry_does_not_hide_newer_banner() {
        let mut banner = Banner::default();
        let first = banner.show();
        let second = banner.show();
        assert!(!banner.expire(first));
        assert!(banner.is_visible());
        assert!(banner.expire(second));
    }

    #[test]
    fn expire_when_hidden_is_a_no_op() {
        let mut banner = Banner::default();
        assert!(!banner.expire(0));
    }
}
