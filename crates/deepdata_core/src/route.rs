// SPDX-License-Identifier: MIT OR Apache-2.0
//! Routes, the navigator handle and the sidebar tree.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Icon glyphs shared by the sidebar and the command palette
pub mod icons {
    /// Dashboard / home
    pub const HOME: &str = "\u{1f3e0}";
    /// Data collection
    pub const DATABASE: &str = "\u{1f5c4}";
    /// Data processing
    pub const PROCESS: &str = "\u{2699}";
    /// Data analysis
    pub const CHART: &str = "\u{1f4c8}";
    /// AI assistant
    pub const ROBOT: &str = "\u{1f916}";
    /// Knowledge base
    pub const BOOK: &str = "\u{1f4d6}";
    /// Settings
    pub const SETTINGS: &str = "\u{1f527}";
    /// New project
    pub const FILE: &str = "\u{1f4c4}";
    /// Filter
    pub const FILTER: &str = "\u{1f50e}";
    /// Save
    pub const SAVE: &str = "\u{1f4be}";
    /// Refresh
    pub const REFRESH: &str = "\u{1f504}";
    /// Help / documentation
    pub const HELP: &str = "\u{2753}";
    /// Search
    pub const SEARCH: &str = "\u{1f50d}";
}

/// Pages reachable in the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Route {
    /// `/`
    Home,
    /// `/data-collect`
    DataCollect,
    /// `/data-process`
    DataProcess,
    /// `/data-analysis`
    DataAnalysis,
    /// `/ai-assistant`, shown at startup
    #[default]
    AiAssistant,
    /// `/knowledge-base`
    KnowledgeBase,
    /// `/settings`
    Settings,
}

impl Route {
    /// Every route
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::DataCollect,
        Route::DataProcess,
        Route::DataAnalysis,
        Route::AiAssistant,
        Route::KnowledgeBase,
        Route::Settings,
    ];

    /// Path identifier
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::DataCollect => "/data-collect",
            Route::DataProcess => "/data-process",
            Route::DataAnalysis => "/data-analysis",
            Route::AiAssistant => "/ai-assistant",
            Route::KnowledgeBase => "/knowledge-base",
            Route::Settings => "/settings",
        }
    }

    /// Translation key of the route's title
    pub fn label_key(self) -> &'static str {
        match self {
            Route::Home => "dashboard",
            Route::DataCollect => "dataCollect",
            Route::DataProcess => "dataProcess",
            Route::DataAnalysis => "dataAnalysis",
            Route::AiAssistant => "aiAssistant",
            Route::KnowledgeBase => "knowledgeBase",
            Route::Settings => "settings",
        }
    }

    /// Translation key of the route's description, for feature pages
    pub fn description_key(self) -> Option<&'static str> {
        match self {
            Route::DataCollect => Some("dataCollectDesc"),
            Route::DataProcess => Some("dataProcessDesc"),
            Route::DataAnalysis => Some("dataAnalysisDesc"),
            Route::AiAssistant => Some("aiAssistantDesc"),
            Route::KnowledgeBase => Some("knowledgeBaseDesc"),
            Route::Home | Route::Settings => None,
        }
    }

    /// Icon glyph
    pub fn icon(self) -> &'static str {
        match self {
            Route::Home => icons::HOME,
            Route::DataCollect => icons::DATABASE,
            Route::DataProcess => icons::PROCESS,
            Route::DataAnalysis => icons::CHART,
            Route::AiAssistant => icons::ROBOT,
            Route::KnowledgeBase => icons::BOOK,
            Route::Settings => icons::SETTINGS,
        }
    }
}

/// Shared handle to the current route.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Rc<Cell<Route>>,
}

impl Navigator {
    /// Navigator starting at `initial`
    pub fn new(initial: Route) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
        }
    }

    /// Current route
    pub fn current(&self) -> Route {
        self.current.get()
    }

    /// Go to `route`
    pub fn navigate(&self, route: Route) {
        let previous = self.current.replace(route);
        if previous != route {
            tracing::info!(from = previous.path(), to = route.path(), "Navigate");
        }
    }

    /// Whether `route` is the current route
    pub fn is_active(&self, route: Route) -> bool {
        self.current() == route
    }
}

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Target route
    pub route: Route,
    /// Translation key of the label
    pub label_key: &'static str,
    /// Icon glyph
    pub icon: &'static str,
    /// Nested entries, shown when the item is expanded
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// Leaf item for `route`
    pub fn leaf(route: Route) -> Self {
        Self {
            route,
            label_key: route.label_key(),
            icon: route.icon(),
            children: Vec::new(),
        }
    }

    /// Item with nested entries
    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }

    /// Whether this item or a descendant targets `route`
    pub fn contains(&self, route: Route) -> bool {
        self.route == route || self.children.iter().any(|child| child.contains(route))
    }

    /// The sidebar tree
    pub fn tree() -> Vec<NavItem> {
        [
            Route::Home,
            Route::DataCollect,
            Route::DataProcess,
            Route::DataAnalysis,
            Route::AiAssistant,
            Route::KnowledgeBase,
            Route::Settings,
        ]
        .into_iter()
        .map(NavItem::leaf)
        .collect()
    }

    /// Routes of a tree in display order, depth first
    pub fn routes(items: &[NavItem]) -> Vec<Route> {
        let mut routes = Vec::new();
        for item in items {
            routes.push(item.route);
            routes.extend(Self::routes(&item.children));
        }
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_unique() {
        let paths: std::collections::HashSet<_> = Route::ALL.iter().map(|route| route.path()).collect();
        assert_eq!(paths.len(), Route::ALL.len());
    }

    #[test]
    fn test_default_route_is_assistant() {
        assert_eq!(Route::default().path(), "/ai-assistant");
    }

    #[test]
    fn test_navigator_clones_share_route() {
        let navigator = Navigator::new(Route::Home);
        let sidebar = navigator.clone();

        navigator.navigate(Route::Settings);

        assert_eq!(sidebar.current(), Route::Settings);
        assert!(sidebar.is_active(Route::Settings));
        assert!(!sidebar.is_active(Route::Home));
    }

    #[test]
    fn test_tree_covers_every_route_once() {
        let routes = NavItem::routes(&NavItem::tree());
        assert_eq!(routes.len(), Route::ALL.len());
        for route in Route::ALL {
            assert!(routes.contains(&route));
        }
    }

    #[test]
    fn test_contains_searches_children() {
        let parent = NavItem::leaf(Route::Home).with_children(vec![NavItem::leaf(Route::DataCollect)]);
        assert!(parent.contains(Route::DataCollect));
        assert!(!parent.contains(Route::Settings));
        assert_eq!(NavItem::routes(std::slice::from_ref(&parent)), vec![Route::Home, Route::DataCollect]);
    }
}
