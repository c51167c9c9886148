//! Curated one-line summaries for well-known document names.

/// Known basenames (lowercase) and their summaries.
const KNOWN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("readme.md", "Project documentation and overview"),
    ("index.md", "Main index and table of contents"),
    ("demo.md", "Markdown formatting examples and syntax guide"),
    ("aliases.md", "Shell aliases and shortcuts"),
    ("functions.md", "Custom shell functions and utilities"),
    ("zshrc.md", "ZSH configuration and settings"),
    ("acemagic1.md", "Ubuntu server setup and configuration"),
    ("test.md", "Test file for markdown rendering"),
    ("example.md", "Sample markdown file with various elements"),
    ("guide.md", "User guide and instructions"),
    ("tutorial.md", "Step-by-step tutorial"),
    ("notes.md", "Personal notes and documentation"),
    ("cheatsheet.md", "Quick reference cheatsheet"),
];

/// Describe a document by its file name.
///
/// Lookup is case-insensitive; unknown names get
/// `"Markdown documentation: {filename}"` with the original casing.
pub fn describe(filename: &str) -> String {
    let lower = filename.to_lowercase();
    KNOWN_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, summary)| (*summary).to_string())
        .unwrap_or_else(|| format!("Markdown documentation: {filename}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(describe("README.md"), "Project documentation and overview");
        assert_eq!(describe("AceMagic1.md"), "Ubuntu server setup and configuration");
        assert_eq!(describe("CheatSheet.MD"), "Quick reference cheatsheet");
    }

    #[test]
    fn unknown_name_keeps_original_case() {
        assert_eq!(
            describe("Deploy-Notes.md"),
            "Markdown documentation: Deploy-Notes.md"
        );
    }

    #[test]
    fn empty_name_still_described() {
        assert_eq!(describe(""), "Markdown documentation: ");
    }
}
