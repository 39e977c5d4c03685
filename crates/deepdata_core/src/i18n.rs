// SPDX-License-Identifier: MIT OR Apache-2.0
//! Localization.
//!
//! Translations are static tables keyed by string ids. English and
//! Simplified Chinese are complete; Portuguese and Traditional Chinese carry
//! a handful of strings and fall back to Simplified Chinese for the rest.
//! An unknown key resolves to itself.

use crate::prefs::{PrefStore, LANGUAGE_KEY};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::OnceLock;

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// Simplified Chinese, the fallback language
    #[default]
    ZhCn,
    /// English
    En,
    /// Brazilian Portuguese
    PtBr,
    /// Traditional Chinese
    ZhTw,
}

impl Language {
    /// All languages in menu order
    pub const ALL: [Language; 4] = [Language::ZhCn, Language::En, Language::PtBr, Language::ZhTw];

    /// Code stored in preferences
    pub fn code(self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::En => "en",
            Language::PtBr => "pt-BR",
            Language::ZhTw => "zh-TW",
        }
    }

    /// Parse a stored code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|language| language.code() == code)
    }

    /// Name of the language in itself
    pub fn native_name(self) -> &'static str {
        match self {
            Language::ZhCn => "简体中文",
            Language::En => "English",
            Language::PtBr => "Português (Brasil)",
            Language::ZhTw => "繁體中文",
        }
    }

    /// Flag shown before the native name
    pub fn prefix(self) -> &'static str {
        match self {
            Language::ZhCn => "🇨🇳",
            Language::En => "🇺🇸",
            Language::PtBr => "🇧🇷",
            Language::ZhTw => "🇹🇼",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// key -> (en, zh-CN)
static TRANSLATIONS: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();

/// (language, key) -> text for the partially translated languages
static PARTIAL: OnceLock<HashMap<(Language, &'static str), &'static str>> = OnceLock::new();

fn init_translations() -> HashMap<&'static str, (&'static str, &'static str)> {
    let mut map = HashMap::new();

    // App
    map.insert("appName", ("DeepData", "DeepData"));
    map.insert("aiDataAssistant", ("AI Data Assistant", "AI 数据助手"));

    // Navigation
    map.insert("dashboard", ("Dashboard", "仪表盘"));
    map.insert("dataCollect", ("Data Collection", "数据采集"));
    map.insert("dataProcess", ("Data Processing", "数据处理"));
    map.insert("dataAnalysis", ("Data Analysis", "数据分析"));
    map.insert("aiAssistant", ("AI Assistant", "智能助手"));
    map.insert("knowledgeBase", ("Knowledge & insights", "知识与洞察"));
    map.insert("settings", ("Settings", "设置"));

    // Home page
    map.insert("welcomeMessage", ("Welcome to DeepData", "欢迎使用 DeepData"));
    map.insert(
        "dashboardDescription",
        (
            "Your intelligent data assistant, helping you collect, process, and analyze data efficiently.",
            "您的智能数据助手，帮助您高效地收集、处理和分析数据。",
        ),
    );
    map.insert("features", ("Core Features", "核心功能"));
    map.insert("explore", ("Explore", "立即探索"));
    map.insert("quickTips", ("Quick Tips", "快速提示"));
    map.insert(
        "quickTip1",
        ("Start by adding a data source in the Data Collection section.", "从数据采集部分添加数据源开始。"),
    );
    map.insert(
        "quickTip2",
        ("Use AI Assistant to help you analyze data through natural language.", "使用智能助手通过自然语言帮助您分析数据。"),
    );
    map.insert(
        "quickTip3",
        (
            "Save frequently used charts and insights to the Knowledge Base for future reference.",
            "将常用图表和见解保存到知识库，方便未来参考。",
        ),
    );

    // Feature descriptions
    map.insert(
        "dataCollectDesc",
        (
            "Connect to various data sources and collect data from files, APIs, databases and web pages.",
            "连接各种数据源，从文件、API、数据库和网页收集数据。",
        ),
    );
    map.insert(
        "dataProcessDesc",
        (
            "Clean, transform, merge and format your data for analysis and visualization.",
            "清洗、转换、合并和格式化数据，为分析和可视化做准备。",
        ),
    );
    map.insert(
        "dataAnalysisDesc",
        (
            "Visualize data patterns and gain insights through interactive charts and AI-powered analysis.",
            "通过交互式图表和 AI 驱动的分析来可视化数据模式并获取洞察力。",
        ),
    );
    map.insert(
        "aiAssistantDesc",
        (
            "Leverage AI models to assist with data tasks and answer your questions through natural language.",
            "利用 AI 模型协助完成数据任务，并通过自然语言回答您的问题。",
        ),
    );
    map.insert(
        "knowledgeBaseDesc",
        (
            "Store and manage your knowledge for easy retrieval and integration with AI assistants.",
            "存储和管理您的知识，以便于检索和与 AI 助手集成。",
        ),
    );

    // Command palette
    map.insert("commandPalettePlaceholder", ("Type a command or search...", "输入命令或搜索..."));
    map.insert("noResultsFound", ("No results found.", "未找到结果。"));
    map.insert("navigation", ("Navigation", "导航"));
    map.insert("actions", ("Actions", "操作"));
    map.insert("help", ("Help", "帮助"));
    map.insert("documentation", ("Documentation", "文档"));
    map.insert("newProject", ("New Project", "新建项目"));
    map.insert("filterData", ("Filter Data", "筛选数据"));
    map.insert("saveWorkspace", ("Save Workspace", "保存工作区"));
    map.insert("refreshData", ("Refresh Data", "刷新数据"));
    map.insert("searchPlaceholder", ("Search commands or features...", "搜索命令或功能..."));
    map.insert("openCommandPalette", ("Open command palette", "打开命令面板"));

    // Placeholder pages
    map.insert("pageUnderConstruction", ("Page under construction. Coming soon!", "页面正在建设中，敬请期待！"));

    // Data analysis canvas
    map.insert("canvas", ("Canvas", "画布"));
    map.insert("dataCreationSpace", ("Create interactive data stories", "创建交互式数据故事"));
    map.insert("dragAndDrop", ("Drag and drop elements here", "在此处拖放元素"));
    map.insert("addVisualization", ("Add Visualization", "添加可视化"));
    map.insert("addText", ("Add Text", "添加文本"));
    map.insert("addData", ("Add Data", "添加数据"));
    map.insert("addImage", ("Add Image", "添加图像"));
    map.insert("visualization", ("Visualization", "可视化"));
    map.insert("text", ("Text", "文本"));
    map.insert("data", ("Data", "数据"));
    map.insert("image", ("Image", "图像"));
    map.insert("chartElement", ("Chart element", "图表元素"));
    map.insert("textElement", ("Text element", "文本元素"));
    map.insert("dataElement", ("Data element", "数据元素"));
    map.insert("imageElement", ("Image element", "图像元素"));
    map.insert("textPlaceholder", ("Double-click to add text...", "双击添加文本内容..."));
    map.insert("importDataHint", ("Click to import data", "点击导入数据"));
    map.insert("addImageHint", ("Click to add an image", "点击添加图像"));
    map.insert("barChart", ("Bar chart", "柱状图"));
    map.insert("lineChart", ("Line chart", "折线图"));
    map.insert("pieChart", ("Pie chart", "饼图"));
    map.insert("gridLayout", ("Grid layout", "网格布局"));
    map.insert("rowsLayout", ("Rows layout", "行布局"));
    map.insert("columnsLayout", ("Columns layout", "列布局"));
    map.insert("freeLayout", ("Free layout", "自由布局"));
    map.insert("selectLayout", ("Select layout", "选择布局"));
    map.insert("gridView", ("Grid view", "网格视图"));
    map.insert("listView", ("List view", "列表视图"));
    map.insert("showGrid", ("Show grid", "显示网格"));
    map.insert("hideGrid", ("Hide grid", "隐藏网格"));
    map.insert("elements", ("elements", "个元素"));
    map.insert("removeElement", ("Remove element", "删除元素"));

    // Settings page
    map.insert("settingsDesc", ("Configure your DeepData application preferences", "配置您的 DeepData 应用程序首选项"));
    map.insert("appearance", ("Appearance", "外观"));
    map.insert("theme", ("Theme", "主题"));
    map.insert("themeDark", ("Dark", "深色"));
    map.insert("themeLight", ("Light", "浅色"));
    map.insert("language", ("Language", "语言"));
    map.insert("selectLanguage", ("Select Language", "选择语言"));
    map.insert("developer", ("Developer Options", "开发者选项"));
    map.insert("debugMode", ("Debug Mode", "调试模式"));
    map.insert(
        "debugModeDesc",
        ("Enable to display detailed debug information and logs", "开启后将显示详细调试信息和日志"),
    );
    map.insert("devTools", ("Developer Tools", "开发者工具"));

    // Window chrome
    map.insert("minimize", ("Minimize", "最小化"));
    map.insert("maximize", ("Maximize", "最大化"));
    map.insert("close", ("Close", "关闭"));
    map.insert("search", ("Search", "搜索"));

    map
}

fn init_partial() -> HashMap<(Language, &'static str), &'static str> {
    let mut map = HashMap::new();

    map.insert((Language::PtBr, "appName"), "DeepData");
    map.insert((Language::PtBr, "aiDataAssistant"), "Assistente de Dados IA");
    map.insert((Language::PtBr, "close"), "Fechar");

    map.insert((Language::ZhTw, "appName"), "DeepData");
    map.insert((Language::ZhTw, "aiDataAssistant"), "AI 數據助手");
    map.insert((Language::ZhTw, "close"), "關閉");

    map
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    let table = TRANSLATIONS.get_or_init(init_translations);
    match language {
        Language::En => table.get(key).map(|(en, _)| *en),
        Language::ZhCn => table.get(key).map(|(_, zh)| *zh),
        Language::PtBr | Language::ZhTw => PARTIAL.get_or_init(init_partial).get(&(language, key)).copied(),
    }
}

/// Resolves string ids in the selected language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    /// Translator for `language`
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Selected language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Translate `key`, falling back to Simplified Chinese and then to the
    /// key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        lookup(self.language, key)
            .or_else(|| lookup(Language::ZhCn, key))
            .unwrap_or(key)
    }
}

/// Persists the language selection under the `lang` key.
#[derive(Clone)]
pub struct LanguageStore {
    prefs: Rc<dyn PrefStore>,
}

impl LanguageStore {
    /// Store over `prefs`
    pub fn new(prefs: Rc<dyn PrefStore>) -> Self {
        Self { prefs }
    }

    /// Load the saved language. A missing key writes the default back.
    pub fn load(&self) -> Language {
        match self.prefs.get(LANGUAGE_KEY) {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                tracing::warn!(code = %code, "Unknown language code, using {}", Language::default());
                Language::default()
            }),
            Ok(None) => {
                let language = Language::default();
                self.save(language);
                language
            }
            Err(e) => {
                tracing::warn!("Failed to read language preference: {}", e);
                Language::default()
            }
        }
    }

    /// Save the selection. Failures are logged.
    pub fn save(&self, language: Language) {
        match self.prefs.set(LANGUAGE_KEY, language.code()) {
            Ok(()) => tracing::info!(language = language.code(), "Language set"),
            Err(e) => tracing::warn!("Failed to save language preference: {}", e),
        }
    }
}
