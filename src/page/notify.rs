use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Effect;

pub const SLIDE_IN_AFTER: Duration = Duration::from_millis(100);
pub const DISMISS_AFTER: Duration = Duration::from_millis(5000);
pub const REMOVE_AFTER_SLIDE_OUT: Duration = Duration::from_millis(300);

const BASE_CSS: &str = "position: fixed; top: 20px; right: 20px; padding: 1rem 1.5rem; border-radius: 8px; \
color: white; font-weight: 500; z-index: 10000; transform: translateX(100%); transition: transform 0.3s ease; \
max-width: 300px; word-wrap: break-word;";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            NotificationKind::Success => "#28a745",
            NotificationKind::Error => "#dc3545",
            NotificationKind::Info => "#007bff",
        }
    }
}

/// A banner node for the host to create and append to the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub class_name: String,
    pub css: String,
}

impl Banner {
    pub fn selector(&self) -> String { banner_selector(self.id) }
}

pub fn banner_selector(id: u64) -> String {
    format!(r#".notification[data-notification-id="{id}"]"#)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    SlideIn(u64),
    SlideOut(u64),
    Remove(u64),
}

/// At most one banner on screen; timers for a replaced banner do nothing.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<u64>,
    next_id: u64,
}

impl Notifier {
    pub fn current(&self) -> Option<u64> { self.current }

    pub fn show(&mut self, message: &str, kind: NotificationKind) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(4);
        if let Some(old) = self.current.take() {
            effects.push(Effect::RemoveBanner { id: old });
        }
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(id);
        effects.push(Effect::ShowBanner(Banner {
            id,
            kind,
            message: message.to_string(),
            class_name: format!("notification notification-{}", kind.as_str()),
            css: format!("{BASE_CSS} background-color: {};", kind.background()),
        }));
        effects.push(Effect::Schedule { after: SLIDE_IN_AFTER, timer: Timer::SlideIn(id) });
        effects.push(Effect::Schedule { after: DISMISS_AFTER, timer: Timer::SlideOut(id) });
        effects
    }

    pub fn on_timer(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::SlideIn(id) if self.current == Some(id) => {
                vec![Effect::style(&banner_selector(id), "transform", "translateX(0)")]
            }
            Timer::SlideOut(id) if self.current == Some(id) => vec![
                Effect::style(&banner_selector(id), "transform", "translateX(100%)"),
                Effect::Schedule { after: REMOVE_AFTER_SLIDE_OUT, timer: Timer::Remove(id) },
            ],
            Timer::Remove(id) if self.current == Some(id) => {
                self.current = None;
                vec![Effect::RemoveBanner { id }]
            }
            _ => Vec::new(),
        }
    }
}
