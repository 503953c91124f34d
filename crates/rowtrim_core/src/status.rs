/// Colour hint for a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusColor {
    #[default]
    Neutral,
    Error,
}

/// The single status message currently published to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    pub message: String,
    pub visible: bool,
    pub color: StatusColor,
}

impl StatusLine {
    pub fn shown(message: impl Into<String>, color: StatusColor) -> Self {
        Self {
            message: message.into(),
            visible: true,
            color,
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn publish(&self, reporter: &dyn StatusReporter) {
        reporter.report(&self.message, self.visible, self.color);
    }
}

/// Presentation sink for status messages. The core never reads state back from it.
pub trait StatusReporter {
    /// Show `message` in `color`, or hide the current message when `visible` is false.
    fn report(&self, message: &str, visible: bool, color: StatusColor);
}
