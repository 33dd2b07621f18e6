//! Dashboard Components
//!
//! The widgets registered at boot. Each one keeps its session state in
//! the [`AppContext`](crate::app::AppContext) and touches the document
//! only through existence-checked operations.

mod dashboard;
mod navbar;
mod sidebar;

pub use dashboard::{DashboardComponent, StatCard, Tone, Trend};
pub use navbar::NavbarComponent;
pub use sidebar::SidebarComponent;

use crate::document::{Document, NodeId};
use crate::registry::Component;

const ACTIVE_TAB_CLASSES: [&str; 3] = ["active", "bg-primary", "text-white"];
const IDLE_TAB_CLASS: &str = "text-gray-600";

/// Components in boot order
pub fn default_components() -> Vec<(&'static str, Box<dyn Component>)> {
    vec![
        ("navbar", Box::new(NavbarComponent::new())),
        ("sidebar", Box::new(SidebarComponent::new())),
        ("dashboard", Box::new(DashboardComponent::new())),
    ]
}

/// Make `target` the only active tab among the elements with `class`
pub fn activate_tab(doc: &mut Document, class: &str, target: NodeId) -> bool {
    let tabs = doc.elements_by_class(class);
    if !tabs.contains(&target) {
        return false;
    }

    for tab in tabs {
        for active in ACTIVE_TAB_CLASSES {
            doc.remove_class(tab, active);
        }
        doc.add_class(tab, IDLE_TAB_CLASS);
    }
    for active in ACTIVE_TAB_CLASSES {
        doc.add_class(target, active);
    }
    doc.remove_class(target, IDLE_TAB_CLASS);
    true
}

/// Write `text` into every element carrying one of `classes`
pub(crate) fn fill_text(doc: &mut Document, classes: &[&str], text: &str) {
    for class in classes {
        for node in doc.elements_by_class(class) {
            doc.set_text(node, text);
        }
    }
}
