//! Notification banner state.

use std::time::Duration;

use log::debug;

use crate::events::ClickEvent;

/// Default duration for notifications.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

/// Visual theme of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NotificationTheme {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Icon shown next to the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationIcon {
    InfoCircleFilled,
    CheckCircleFilled,
}

impl NotificationTheme {
    pub fn icon(self) -> NotificationIcon {
        match self {
            Self::Success => NotificationIcon::CheckCircleFilled,
            Self::Info | Self::Warning | Self::Error => NotificationIcon::InfoCircleFilled,
        }
    }

    /// Class suffix used by the host stylesheet.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// The close button was clicked.
    CloseBtnClick { e: Option<ClickEvent> },
    /// The display duration elapsed.
    DurationEnd,
}

/// A notification banner.
///
/// # Example
///
/// ```ignore
/// let mut n = Notification::success("Saved").content("All changes written");
/// n.run_duration().await;
/// assert_eq!(n.take_events(), vec![NotificationEvent::DurationEnd]);
/// ```
#[derive(Debug)]
pub struct Notification {
    pub theme: NotificationTheme,
    pub title: String,
    pub content: String,
    pub footer: Option<String>,
    /// Show the close button.
    pub close_btn: bool,
    /// How long to show the notification; zero keeps it until closed.
    pub duration: Duration,
    duration_ended: bool,
    events: Vec<NotificationEvent>,
}

impl Notification {
    pub fn new(theme: NotificationTheme, title: impl Into<String>) -> Self {
        Self {
            theme,
            title: title.into(),
            content: String::new(),
            footer: None,
            close_btn: false,
            duration: DEFAULT_NOTIFICATION_DURATION,
            duration_ended: false,
            events: Vec::new(),
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationTheme::Info, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationTheme::Success, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NotificationTheme::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationTheme::Error, title)
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn close_btn(mut self, close_btn: bool) -> Self {
        self.close_btn = close_btn;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn icon(&self) -> NotificationIcon {
        self.theme.icon()
    }

    pub fn is_sticky(&self) -> bool {
        self.duration.is_zero()
    }

    /// Handle a click on the close button.
    pub fn close(&mut self, e: Option<ClickEvent>) {
        self.events.push(NotificationEvent::CloseBtnClick { e });
    }

    /// Wait out the display duration and record `DurationEnd`.
    ///
    /// Returns immediately for sticky notifications and after the first run.
    pub async fn run_duration(&mut self) {
        if self.is_sticky() || self.duration_ended {
            return;
        }
        tokio::time::sleep(self.duration).await;
        self.duration_ended = true;
        debug!("Notification '{}': duration ended", self.title);
        self.events.push(NotificationEvent::DurationEnd);
    }

    pub fn take_events(&mut self) -> Vec<NotificationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl From<String> for Notification {
    fn from(title: String) -> Self {
        Notification::info(title)
    }
}

impl From<&str> for Notification {
    fn from(title: &str) -> Self {
        Notification::info(title)
    }
}
