//! Notification delivery for due reminders.
//!
//! A [`NotificationSink`] wraps one [`NotificationBackend`] and gates it
//! behind a permission that is requested once per session. Delivery is best
//! effort: a missing permission or a failing backend never surfaces as an
//! error to the scheduler.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{BackendKind, Config};
use crate::error::{Error, Result};

/// Whether notifications may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// Not requested yet.
    #[default]
    Default,
    /// Notifications may be shown.
    Granted,
    /// Notifications must not be shown.
    Denied,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The backend accepted the notification.
    Shown,
    /// Permission was not granted, so nothing was attempted.
    Suppressed,
    /// The backend failed; the message describes why.
    Failed(String),
}

/// A mechanism that can put a notification in front of the user.
#[async_trait::async_trait]
pub trait NotificationBackend: Send + Sync + std::fmt::Debug {
    /// The name of this backend (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Ask whether notifications may be shown.
    async fn request_permission(&self) -> Permission;

    /// Show one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the notification.
    async fn show(&self, title: &str, body: &str) -> Result<()>;
}

/// Native desktop notifications through `notify-rust`.
#[derive(Debug, Clone)]
pub struct DesktopBackend {
    app_name: String,
    timeout: Option<Duration>,
}

impl DesktopBackend {
    /// Create a desktop backend.
    #[must_use]
    pub fn new(app_name: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            app_name: app_name.into(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl NotificationBackend for DesktopBackend {
    fn name(&self) -> &'static str {
        "desktop"
    }

    async fn request_permission(&self) -> Permission {
        // Notification servers have no permission prompt
        Permission::Granted
    }

    async fn show(&self, title: &str, body: &str) -> Result<()> {
        let app_name = self.app_name.clone();
        let title = title.to_string();
        let body = body.to_string();
        let timeout = match self.timeout {
            Some(d) => notify_rust::Timeout::Milliseconds(
                u32::try_from(d.as_millis()).unwrap_or(u32::MAX),
            ),
            None => notify_rust::Timeout::Default,
        };

        // `show` blocks on the platform notification service
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&body)
                .timeout(timeout)
                .show()
                .map(|_| ())
                .map_err(|e| Error::notification("desktop", e.to_string()))
        })
        .await
        .map_err(|e| Error::internal(format!("notification task panicked: {e}")))?
    }
}

/// Writes notifications to the log instead of the desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBackend;

#[async_trait::async_trait]
impl NotificationBackend for LogBackend {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn show(&self, title: &str, body: &str) -> Result<()> {
        info!(title, body, "notification");
        Ok(())
    }
}

/// Refuses permission, so nothing is ever shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

#[async_trait::async_trait]
impl NotificationBackend for DisabledBackend {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    async fn show(&self, _title: &str, _body: &str) -> Result<()> {
        Ok(())
    }
}

/// Permission-gated front for a notification backend.
#[derive(Debug)]
pub struct NotificationSink {
    backend: Box<dyn NotificationBackend>,
    title: String,
    permission: Permission,
}

impl NotificationSink {
    /// Wrap `backend`, titling every notification with `title`.
    #[must_use]
    pub fn new(backend: Box<dyn NotificationBackend>, title: impl Into<String>) -> Self {
        Self {
            backend,
            title: title.into(),
            permission: Permission::Default,
        }
    }

    /// Build the sink selected by the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let backend: Box<dyn NotificationBackend> = match config.notifications.backend {
            BackendKind::Desktop => Box::new(DesktopBackend::new(
                config.notifications.app_name.clone(),
                config.notification_timeout(),
            )),
            BackendKind::Log => Box::new(LogBackend),
            BackendKind::None => Box::new(DisabledBackend),
        };
        Self::new(backend, config.notifications.title.clone())
    }

    /// Name of the wrapped backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// The recorded permission.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Ask the backend for permission, once.
    ///
    /// Later calls return the first answer without asking again.
    pub async fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Default {
            self.permission = self.backend.request_permission().await;
            debug!(
                "Notification permission for '{}': {}",
                self.backend.name(),
                self.permission
            );
        }
        self.permission
    }

    /// Try to show `message`.
    ///
    /// Never fails: without permission nothing happens, and backend errors
    /// are logged and reported as [`Delivery::Failed`].
    pub async fn deliver(&self, message: &str) -> Delivery {
        if self.permission != Permission::Granted {
            debug!("Notification suppressed (permission {})", self.permission);
            return Delivery::Suppressed;
        }

        match self.backend.show(&self.title, message).await {
            Ok(()) => Delivery::Shown,
            Err(e) => {
                warn!("Failed to show notification: {e}");
                Delivery::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Test doubles shared by the scheduler and session tests.

    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every notification instead of showing it.
    #[derive(Debug, Clone)]
    pub struct RecordingBackend {
        pub permission: Permission,
        pub fail: bool,
        pub shown: Arc<Mutex<Vec<(String, String)>>>,
        pub permission_requests: Arc<Mutex<usize>>,
    }

    impl RecordingBackend {
        pub fn granted() -> Self {
            Self::with_permission(Permission::Granted)
        }

        pub fn with_permission(permission: Permission) -> Self {
            Self {
                permission,
                fail: false,
                shown: Arc::new(Mutex::new(Vec::new())),
                permission_requests: Arc::new(Mutex::new(0)),
            }
        }

        pub fn shown(&self) -> Vec<(String, String)> {
            self.shown.lock().unwrap().clone()
        }

        pub fn requests(&self) -> usize {
            *self.permission_requests.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl NotificationBackend for RecordingBackend {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn request_permission(&self) -> Permission {
            *self.permission_requests.lock().unwrap() += 1;
            self.permission
        }

        async fn show(&self, title: &str, body: &str) -> Result<()> {
            if self.fail {
                return Err(Error::notification("recording", "simulated failure"));
            }
            self.shown
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }
}
