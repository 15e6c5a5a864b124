//! Session-boundary notifications.
//!
//! Presenting is gated on a permission. While the permission is undecided the
//! first notification opens a request that the user answers later from the
//! UI; everything notified in the meantime waits on that request. Nothing
//! here blocks the caller or the countdown.

use clap::ValueEnum;
use notify_rust::{Notification, Urgency};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[value(name = "allow")]
    #[serde(alias = "allow")]
    Granted,
    #[value(name = "deny")]
    #[serde(alias = "deny")]
    Denied,
    #[value(name = "ask")]
    #[serde(alias = "ask")]
    Undetermined,
}

pub trait NotificationSink {
    fn show(&self, title: &str, body: &str) -> Result<()>;
}

pub struct DesktopSink;

impl NotificationSink for DesktopSink {
    fn show(&self, title: &str, body: &str) -> Result<()> {
        Notification::new()
            .summary(title)
            .body(body)
            .appname("pomotask")
            .icon("alarm-clock")
            .urgency(Urgency::Critical)
            .show()
            .map(|_| ())
            .map_err(|e| Error::Notification(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Queued {
    title: String,
    body: String,
}

pub struct Notifier {
    sink: Box<dyn NotificationSink>,
    permission: Permission,
    /// Notifications waiting on an open permission request.
    pending: Option<Vec<Queued>>,
}

impl Notifier {
    pub fn new(sink: Box<dyn NotificationSink>, permission: Permission) -> Self {
        Self { sink, permission, pending: None }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn is_requesting_permission(&self) -> bool {
        self.pending.is_some()
    }

    pub fn notify(&mut self, title: &str, body: &str) {
        match self.permission {
            Permission::Granted => self.present(title, body),
            Permission::Denied => tracing::debug!(title, "notification dropped, permission denied"),
            Permission::Undetermined => {
                if self.pending.is_none() {
                    tracing::info!("requesting notification permission");
                }
                self.pending
                    .get_or_insert_with(Vec::new)
                    .push(Queued { title: title.into(), body: body.into() });
            }
        }
    }

    /// Answers the open permission request. Without one this does nothing.
    pub fn resolve_permission(&mut self, granted: bool) {
        let Some(queued) = self.pending.take() else {
            return;
        };
        self.permission = if granted { Permission::Granted } else { Permission::Denied };
        tracing::info!(granted, queued = queued.len(), "notification permission resolved");

        if granted {
            for q in queued {
                self.present(&q.title, &q.body);
            }
        }
    }

    fn present(&self, title: &str, body: &str) {
        if let Err(err) = self.sink.show(title, body) {
            tracing::warn!(%err, title, "notification not shown");
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records every presented notification.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub shown: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl NotificationSink for RecordingSink {
        fn show(&self, title: &str, body: &str) -> Result<()> {
            self.shown.borrow_mut().push((title.into(), body.into()));
            Ok(())
        }
    }

    pub struct FailingSink;

    impl NotificationSink for FailingSink {
        fn show(&self, _: &str, _: &str) -> Result<()> {
            Err(Error::Notification("no notification daemon".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn notifier(permission: Permission) -> (Notifier, RecordingSink) {
        let sink = RecordingSink::default();
        (Notifier::new(Box::new(sink.clone()), permission), sink)
    }

    #[test]
    fn granted_shows_immediately() {
        let (mut n, sink) = notifier(Permission::Granted);
        n.notify("Work session over", "Time for a break!");
        assert_eq!(sink.shown.borrow().len(), 1);
        assert!(!n.is_requesting_permission());
    }

    #[test]
    fn denied_drops_silently() {
        let (mut n, sink) = notifier(Permission::Denied);
        n.notify("t", "b");
        assert!(sink.shown.borrow().is_empty());
        assert!(!n.is_requesting_permission());
    }

    #[test]
    fn undetermined_waits_for_grant_then_flushes_in_order() {
        let (mut n, sink) = notifier(Permission::Undetermined);
        n.notify("first", "1");
        n.notify("second", "2");
        assert!(n.is_requesting_permission());
        assert!(sink.shown.borrow().is_empty());

        n.resolve_permission(true);
        assert_eq!(n.permission(), Permission::Granted);
        let titles: Vec<_> = sink.shown.borrow().iter().map(|(t, _)| t.clone()).collect();
        assert_eq!(titles, ["first", "second"]);

        n.notify("third", "3");
        assert_eq!(sink.shown.borrow().len(), 3);
    }

    #[test]
    fn undetermined_then_denied_drops_queue() {
        let (mut n, sink) = notifier(Permission::Undetermined);
        n.notify("t", "b");
        n.resolve_permission(false);
        assert_eq!(n.permission(), Permission::Denied);
        n.notify("t", "b");
        assert!(sink.shown.borrow().is_empty());
    }

    #[test]
    fn resolve_without_request_is_ignored() {
        let (mut n, _) = notifier(Permission::Undetermined);
        n.resolve_permission(true);
        assert_eq!(n.permission(), Permission::Undetermined);
    }

    #[test]
    fn sink_failure_is_swallowed() {
        let mut n = Notifier::new(Box::new(FailingSink), Permission::Granted);
        n.notify("t", "b");
    }
}
