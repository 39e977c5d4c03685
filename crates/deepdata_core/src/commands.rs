// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command palette entries and their registry.

use crate::route::{icons, Navigator, Route};
use std::rc::Rc;

/// An actionable palette item
#[derive(Clone)]
pub struct CommandEntry {
    /// Unique identifier
    pub id: &'static str,
    /// Icon glyph
    pub icon: &'static str,
    /// Translation key of the label
    pub label_key: &'static str,
    /// Shortcut hint (display only)
    pub shortcut: Option<&'static str>,
    action: Rc<dyn Fn()>,
}

impl CommandEntry {
    /// Create an entry running `action` when selected
    pub fn new(id: &'static str, icon: &'static str, label_key: &'static str, action: impl Fn() + 'static) -> Self {
        Self {
            id,
            icon,
            label_key,
            shortcut: None,
            action: Rc::new(action),
        }
    }

    /// Add a shortcut hint
    pub fn with_shortcut(mut self, shortcut: &'static str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Run the action. The palette goes through [`crate::palette::run_command`].
    pub(crate) fn invoke(&self) {
        (self.action)();
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("id", &self.id)
            .field("label_key", &self.label_key)
            .field("shortcut", &self.shortcut)
            .finish_non_exhaustive()
    }
}

/// Entries shown under one heading
#[derive(Debug, Clone)]
pub struct CommandGroup {
    /// Translation key of the heading
    pub heading_key: &'static str,
    /// Entries in display order
    pub entries: Vec<CommandEntry>,
}

/// Group of entries left after filtering
#[derive(Debug, Clone)]
pub struct MatchedGroup<'a> {
    /// Translation key of the heading
    pub heading_key: &'static str,
    /// Matching entries, in registry order
    pub entries: Vec<&'a CommandEntry>,
}

/// Result of [`CommandRegistry::filter`]
#[derive(Debug, Clone, Default)]
pub struct CommandMatches<'a> {
    /// Non-empty groups, in registry order
    pub groups: Vec<MatchedGroup<'a>>,
}

impl<'a> CommandMatches<'a> {
    /// Total number of matching entries
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Matching entries in keyboard traversal order
    pub fn iter(&self) -> impl Iterator<Item = &'a CommandEntry> + '_ {
        self.groups.iter().flat_map(|group| group.entries.iter().copied())
    }

    /// Entry at a traversal index
    pub fn get(&self, index: usize) -> Option<&'a CommandEntry> {
        self.iter().nth(index)
    }
}

/// Ordered, grouped palette entries
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    groups: Vec<CommandGroup>,
}

impl CommandRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The shell's entries: navigation, actions and help
    pub fn build(navigator: &Navigator) -> Self {
        let navigate = |id: &'static str, route: Route, shortcut: &'static str| {
            let navigator = navigator.clone();
            CommandEntry::new(id, route.icon(), route.label_key(), move || navigator.navigate(route))
                .with_shortcut(shortcut)
        };

        let mut registry = Self::new();

        registry.register_group(CommandGroup {
            heading_key: "navigation",
            entries: vec![
                navigate("nav.data_collect", Route::DataCollect, "D C"),
                navigate("nav.data_process", Route::DataProcess, "D P"),
                navigate("nav.data_analysis", Route::DataAnalysis, "D A"),
                navigate("nav.ai_assistant", Route::AiAssistant, "A I"),
                navigate("nav.knowledge_base", Route::KnowledgeBase, "K B"),
                navigate("nav.settings", Route::Settings, "S T"),
            ],
        });

        registry.register_group(CommandGroup {
            heading_key: "actions",
            entries: vec![
                CommandEntry::new("action.new_project", icons::FILE, "newProject", || {
                    tracing::info!("New project");
                })
                .with_shortcut("N P"),
                CommandEntry::new("action.filter_data", icons::FILTER, "filterData", || {
                    tracing::info!("Filter data");
                })
                .with_shortcut("F D"),
                CommandEntry::new("action.save_workspace", icons::SAVE, "saveWorkspace", || {
                    tracing::info!("Save workspace");
                })
                .with_shortcut("⌘S"),
                CommandEntry::new("action.refresh_data", icons::REFRESH, "refreshData", || {
                    tracing::info!("Refresh data");
                })
                .with_shortcut("⌘R"),
            ],
        });

        registry.register_group(CommandGroup {
            heading_key: "help",
            entries: vec![CommandEntry::new("help.documentation", icons::HELP, "documentation", || {
                tracing::info!("Open documentation");
            })],
        });

        registry
    }

    /// Append a group
    pub fn register_group(&mut self, group: CommandGroup) {
        tracing::trace!(heading = group.heading_key, entries = group.entries.len(), "command group registered");
        self.groups.push(group);
    }

    /// All groups in order
    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// All entries in traversal order
    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry by id
    pub fn get(&self, id: &str) -> Option<&CommandEntry> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Entries whose resolved label contains `query`, ignoring case.
    ///
    /// `resolve` turns a label key into display text. Order is preserved and
    /// groups without matches are dropped. An empty query matches all.
    pub fn filter<F>(&self, query: &str, resolve: F) -> CommandMatches<'_>
    where
        F: Fn(&str) -> &str,
    {
        let needle = query.to_lowercase();

        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                let entries: Vec<&CommandEntry> = group
                    .entries
                    .iter()
                    .filter(|entry| needle.is_empty() || resolve(entry.label_key).to_lowercase().contains(&needle))
                    .collect();

                (!entries.is_empty()).then_some(MatchedGroup {
                    heading_key: group.heading_key,
                    entries,
                })
            })
            .collect();

        CommandMatches { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, Translator};
    use crate::route::NavItem;

    fn ids<'a>(matches: &CommandMatches<'a>) -> Vec<&'static str> {
        matches.iter().map(|entry| entry.id).collect()
    }

    #[test]
    fn test_build_groups_in_order() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let headings: Vec<_> = registry.groups().iter().map(|group| group.heading_key).collect();

        assert_eq!(headings, vec!["navigation", "actions", "help"]);
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.get("action.save_workspace").and_then(|e| e.shortcut), Some("⌘S"));
        assert_eq!(registry.get("help.documentation").and_then(|e| e.shortcut), None);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let translator = Translator::new(Language::En);
        let matches = registry.filter("", |key| translator.t(key));

        assert_eq!(matches.len(), registry.len());
        assert_eq!(ids(&matches), registry.entries().map(|e| e.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let translator = Translator::new(Language::En);
        let matches = registry.filter("DATA", |key| translator.t(key));

        assert_eq!(
            ids(&matches),
            vec![
                "nav.data_collect",
                "nav.data_process",
                "nav.data_analysis",
                "action.filter_data",
                "action.refresh_data",
            ]
        );
        let headings: Vec<_> = matches.groups.iter().map(|group| group.heading_key).collect();
        assert_eq!(headings, vec!["navigation", "actions"]);
    }

    #[test]
    fn test_filter_matches_exactly_the_containing_labels() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let translator = Translator::new(Language::En);

        for query in ["a", "Set", "work", "ion", "zzz"] {
            let matches = registry.filter(query, |key| translator.t(key));
            let expected: Vec<_> = registry
                .entries()
                .filter(|entry| translator.t(entry.label_key).to_lowercase().contains(&query.to_lowercase()))
                .map(|entry| entry.id)
                .collect();
            assert_eq!(ids(&matches), expected, "query {query:?}");
        }
    }

    #[test]
    fn test_filter_uses_resolved_labels() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let translator = Translator::new(Language::ZhCn);
        let matches = registry.filter("数据", |key| translator.t(key));

        assert!(ids(&matches).contains(&"action.refresh_data"));
        assert!(!ids(&matches).contains(&"help.documentation"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let matches = registry.filter("no such command", |key| key);
        assert!(matches.is_empty());
        assert_eq!(matches.get(0).map(|e| e.id), None);
    }

    #[test]
    fn test_navigation_entries_navigate() {
        let navigator = Navigator::new(Route::Home);
        let registry = CommandRegistry::build(&navigator);

        if let Some(entry) = registry.get("nav.knowledge_base") {
            entry.invoke();
        }
        assert_eq!(navigator.current(), Route::KnowledgeBase);
    }

    #[test]
    fn test_navigation_entries_mirror_sidebar() {
        let registry = CommandRegistry::build(&Navigator::new(Route::Home));
        let sidebar = NavItem::routes(&NavItem::tree());

        let navigation = &registry.groups()[0];
        for entry in &navigation.entries {
            let route = Route::ALL.into_iter().find(|route| route.label_key() == entry.label_key);
            assert!(route.is_some_and(|route| sidebar.contains(&route)), "{}", entry.id);
        }
    }
}
