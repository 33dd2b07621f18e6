//! UI events
//!
//! Clicks and input the dashboard reacts to. Textual form `name[:arg]`,
//! e.g. `refresh`, `role:kasir`, `hash:#menu`, `quick-action:addMenu`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::data::{ChartFilter, Role};

/// Dashboard quick-action buttons (`data-action` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickAction {
    AddMenu,
    ManageOrders,
    GenerateReport,
    ManageUsers,
}

impl QuickAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuickAction::AddMenu => "addMenu",
            QuickAction::ManageOrders => "manageOrders",
            QuickAction::GenerateReport => "generateReport",
            QuickAction::ManageUsers => "manageUsers",
        }
    }
}

impl FromStr for QuickAction {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addMenu" => Ok(QuickAction::AddMenu),
            "manageOrders" => Ok(QuickAction::ManageOrders),
            "generateReport" => Ok(QuickAction::GenerateReport),
            "manageUsers" => Ok(QuickAction::ManageUsers),
            other => Err(EventParseError::InvalidArgument {
                event: "quick-action".to_string(),
                reason: format!("unknown action {}", other),
            }),
        }
    }
}

/// A user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ToggleSidebar,
    ToggleUserMenu,
    ToggleNotifications,
    /// Click outside every dropdown and the sidebar
    OutsideClick,
    MarkAllRead,
    Logout { confirmed: bool },
    /// Click on a `.menu-item`, carrying its `href`
    MenuItem(String),
    HashChange(String),
    /// Fetch a page body on demand, then navigate to it
    LoadPage(String),
    RoleTab(Role),
    OrderTab(usize),
    QuickAction(QuickAction),
    Refresh,
    ChartFilter(ChartFilter),
    SearchInput(String),
    SearchClear,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::ToggleSidebar => "toggle-sidebar",
            UiEvent::ToggleUserMenu => "toggle-user-menu",
            UiEvent::ToggleNotifications => "toggle-notifications",
            UiEvent::OutsideClick => "outside-click",
            UiEvent::MarkAllRead => "mark-all-read",
            UiEvent::Logout { .. } => "logout",
            UiEvent::MenuItem(_) => "menu-item",
            UiEvent::HashChange(_) => "hash",
            UiEvent::LoadPage(_) => "load-page",
            UiEvent::RoleTab(_) => "role",
            UiEvent::OrderTab(_) => "order-tab",
            UiEvent::QuickAction(_) => "quick-action",
            UiEvent::Refresh => "refresh",
            UiEvent::ChartFilter(_) => "chart-filter",
            UiEvent::SearchInput(_) => "search",
            UiEvent::SearchClear => "search-clear",
        }
    }
}

impl fmt::Display for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiEvent::Logout { confirmed: true } => write!(f, "logout:confirm"),
            UiEvent::MenuItem(href) => write!(f, "menu-item:{}", href),
            UiEvent::HashChange(hash) => write!(f, "hash:{}", hash),
            UiEvent::LoadPage(page) => write!(f, "load-page:{}", page),
            UiEvent::RoleTab(role) => write!(f, "role:{}", role.tab_label().to_lowercase()),
            UiEvent::OrderTab(index) => write!(f, "order-tab:{}", index),
            UiEvent::QuickAction(action) => write!(f, "quick-action:{}", action.as_str()),
            UiEvent::ChartFilter(filter) => write!(f, "chart-filter:{}", filter),
            UiEvent::SearchInput(text) => write!(f, "search:{}", text),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventParseError {
    #[error("Unknown event: {0}")]
    Unknown(String),

    #[error("Event {0} needs an argument")]
    MissingArgument(String),

    #[error("Invalid argument for {event}: {reason}")]
    InvalidArgument { event: String, reason: String },
}

impl FromStr for UiEvent {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        let required = || arg.ok_or_else(|| EventParseError::MissingArgument(name.to_string()));
        let invalid = |reason: String| EventParseError::InvalidArgument {
            event: name.to_string(),
            reason,
        };

        match name {
            "toggle-sidebar" => Ok(UiEvent::ToggleSidebar),
            "toggle-user-menu" => Ok(UiEvent::ToggleUserMenu),
            "toggle-notifications" => Ok(UiEvent::ToggleNotifications),
            "outside-click" => Ok(UiEvent::OutsideClick),
            "mark-all-read" => Ok(UiEvent::MarkAllRead),
            "logout" => Ok(UiEvent::Logout {
                confirmed: matches!(arg, Some("confirm") | Some("yes")),
            }),
            "menu-item" => Ok(UiEvent::MenuItem(required()?.to_string())),
            "hash" => Ok(UiEvent::HashChange(arg.unwrap_or_default().to_string())),
            "load-page" => Ok(UiEvent::LoadPage(required()?.to_string())),
            "role" => required()?.parse().map(UiEvent::RoleTab).map_err(invalid),
            "order-tab" => required()?
                .parse()
                .map(UiEvent::OrderTab)
                .map_err(|e: std::num::ParseIntError| invalid(e.to_string())),
            "quick-action" => required()?.parse().map(UiEvent::QuickAction),
            "refresh" => Ok(UiEvent::Refresh),
            "chart-filter" => required()?.parse().map(UiEvent::ChartFilter).map_err(invalid),
            "search" => Ok(UiEvent::SearchInput(arg.unwrap_or_default().to_string())),
            "search-clear" => Ok(UiEvent::SearchClear),
            other => Err(EventParseError::Unknown(other.to_string())),
        }
    }
}
