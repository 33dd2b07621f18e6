//! Notifications
//!
//! Display-only notification feed for the navbar dropdown.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::document::escape_text;
use crate::format::relative_time;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Order,
    Stock,
    Revenue,
    System,
}

impl NotificationKind {
    /// Badge color classes of the icon bubble
    pub fn color_classes(&self) -> &'static str {
        match self {
            NotificationKind::Order => "bg-blue-100 text-blue-600",
            NotificationKind::Stock => "bg-yellow-100 text-yellow-600",
            NotificationKind::Revenue => "bg-green-100 text-green-600",
            NotificationKind::System => "bg-purple-100 text-purple-600",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Order => "fa-shopping-cart",
            NotificationKind::Stock => "fa-exclamation-triangle",
            NotificationKind::Revenue => "fa-chart-line",
            NotificationKind::System => "fa-cog",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub unread: bool,
}

impl Notification {
    pub fn time_label(&self, now: DateTime<Utc>) -> String {
        relative_time(self.created_at, now)
    }

    /// Markup for one row of `.notification-list`
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let dot = if self.unread {
            r#"<div class="notification-dot w-2 h-2 bg-red-500 rounded-full mt-2"></div>"#
        } else {
            ""
        };
        format!(
            r#"<div class="notification-item{unread}" data-id="{id}"><div class="flex items-start gap-3"><div class="notification-icon {color}"><i class="fas {icon}"></i></div><div class="flex-1"><p class="notification-title">{title}</p><p class="notification-message text-sm text-gray-600">{message}</p><p class="notification-time text-xs text-gray-500">{time}</p></div>{dot}</div></div>"#,
            unread = if self.unread { " unread" } else { "" },
            id = self.id,
            color = self.kind.color_classes(),
            icon = self.kind.icon(),
            title = escape_text(&self.title),
            message = escape_text(&self.message),
            time = self.time_label(now),
            dot = dot,
        )
    }
}

/// The in-memory feed
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items }
    }

    /// The three sample notifications, timestamped relative to `now`
    pub fn sample(now: DateTime<Utc>) -> Self {
        Self::new(vec![
            Notification {
                id: 1,
                kind: NotificationKind::Order,
                title: "Pesanan #0012 Selesai".to_string(),
                message: "Nasi Goreng Spesial telah selesai diproses".to_string(),
                created_at: now - Duration::minutes(2),
                unread: true,
            },
            Notification {
                id: 2,
                kind: NotificationKind::Stock,
                title: "Stok Menipis".to_string(),
                message: "Nasi Goreng tersisa 3 porsi".to_string(),
                created_at: now - Duration::hours(1),
                unread: true,
            },
            Notification {
                id: 3,
                kind: NotificationKind::Revenue,
                title: "Pendapatan Naik".to_string(),
                message: "+15% dari kemarin".to_string(),
                created_at: now - Duration::hours(3),
                unread: false,
            },
        ])
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| n.unread).count()
    }

    pub fn mark_all_read(&mut self) {
        for item in self.items.iter_mut() {
            item.unread = false;
        }
    }

    pub fn render(&self, now: DateTime<Utc>) -> String {
        self.items.iter().map(|n| n.render(now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_sample_feed_labels() {
        let feed = NotificationFeed::sample(now());
        let labels: Vec<_> = feed.items().iter().map(|n| n.time_label(now())).collect();
        assert_eq!(labels, vec!["2 menit lalu", "1 jam lalu", "3 jam lalu"]);
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn test_mark_all_read() {
        let mut feed = NotificationFeed::sample(now());
        feed.mark_all_read();
        assert_eq!(feed.unread_count(), 0);
        assert!(!feed.render(now()).contains("notification-dot"));
    }

    #[test]
    fn test_render_uses_kind_colors() {
        let feed = NotificationFeed::sample(now());
        let html = feed.items()[1].render(now());
        assert!(html.contains("bg-yellow-100 text-yellow-600"));
        assert!(html.contains("fa-exclamation-triangle"));
        assert!(html.contains("notification-item unread"));
    }
}
