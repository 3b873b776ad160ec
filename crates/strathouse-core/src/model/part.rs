use serde::{Deserialize, Serialize};

use super::category::Category;

/// Literal stored when a part module does not declare an attribute
pub const DEFAULT_ATTRIBUTE: &str = "None";

/// Part - registered metadata for one strategy component
///
/// Parts are created in bulk by the scanner and deleted in bulk with their
/// house; they are never mutated individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Store-assigned row id (None until inserted)
    pub id: Option<i64>,

    /// Owning house, by name
    pub house_name: String,

    pub category: Category,

    /// Fully-qualified name `<house>.<category>.<entry>`
    pub name: String,

    pub author: String,

    pub version: String,

    pub doc: String,

    /// Where the component is loaded from
    pub module_locator: String,
}

impl Part {
    /// Summary shown by `part info`
    pub fn info(&self) -> PartInfo {
        PartInfo {
            name: self.name.clone(),
            author: self.author.clone(),
            version: self.version.clone(),
            doc: self.doc.clone(),
        }
    }
}

/// Part metadata without loading the component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartInfo {
    pub name: String,
    pub author: String,
    pub version: String,
    pub doc: String,
}

impl PartInfo {
    /// Render the boxed info table followed by the doc text
    pub fn render_table(&self) -> String {
        const RULE: &str = "+---------+------------------------------------------------";
        let mut out = String::new();
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("| name    |  {}\n", self.name));
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("| author  |  {}\n", self.author));
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("| version |  {}\n", self.version));
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&self.doc);
        out.push('\n');
        out
    }
}
