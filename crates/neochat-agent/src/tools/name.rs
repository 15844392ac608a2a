//! The closed set of tool identifiers.

use std::fmt;
use std::str::FromStr;

/// Every tool the registry can hold. The wire name is the snake_case form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolName {
    FetchWikipediaSummary,
    ExecutePython,
    BrowseWeb,
    SearchWeb,
    ParseOnlinePdf,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::FetchWikipediaSummary,
        ToolName::ExecutePython,
        ToolName::BrowseWeb,
        ToolName::SearchWeb,
        ToolName::ParseOnlinePdf,
    ];

    /// Name the model uses to call the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::FetchWikipediaSummary => "fetch_wikipedia_summary",
            ToolName::ExecutePython => "execute_python",
            ToolName::BrowseWeb => "browse_web",
            ToolName::SearchWeb => "search_web",
            ToolName::ParseOnlinePdf => "parse_online_pdf",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
