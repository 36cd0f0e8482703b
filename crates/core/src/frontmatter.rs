use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Frontmatter keys mapped to JSON values.
pub type FrontmatterMap = Map<String, JsonValue>;

/// Errors emitted while splitting or parsing a document's metadata block.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing fence.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// A Markdown file split into its metadata and body.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Parsed frontmatter, empty when the file has none.
    pub frontmatter: FrontmatterMap,
    /// Markdown after the closing fence.
    pub body: String,
    /// 1-indexed line of the file where `body` begins.
    pub body_line: usize,
}

impl SourceDocument {
    /// Splits `content` into frontmatter and body.
    pub fn parse(path: impl AsRef<Path>, content: &str) -> Result<Self, FrontmatterError> {
        let split = split_frontmatter(content)?;
        let body = &content[split.body_start..];
        let body_line = content[..split.body_start].matches('\n').count() + 1;

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            frontmatter: split.data,
            body: body.to_string(),
            body_line,
        })
    }

    /// The `title` key when it is a string.
    pub fn title(&self) -> Option<&str> {
        frontmatter_str(&self.frontmatter, "title")
    }

    /// The `description` key when it is a string.
    pub fn description(&self) -> Option<&str> {
        frontmatter_str(&self.frontmatter, "description")
    }
}

/// Reads a string value from a frontmatter map.
pub fn frontmatter_str<'a>(map: &'a FrontmatterMap, key: &str) -> Option<&'a str> {
    map.get(key).and_then(JsonValue::as_str)
}

/// Result of [`split_frontmatter`].
#[derive(Debug)]
pub struct FrontmatterSplit {
    /// Parsed key/value pairs.
    pub data: FrontmatterMap,
    /// Byte offset inside the input where the Markdown body begins.
    pub body_start: usize,
}

/// Finds a leading `---` block and parses it as YAML.
///
/// A byte-order mark and blank lines may precede the opening fence. Input
/// that does not start with a fence yields an empty map and `body_start == 0`.
pub fn split_frontmatter(input: &str) -> Result<FrontmatterSplit, FrontmatterError> {
    let mut offset = 0;
    let mut lines = input.split_inclusive('\n');

    let opening = loop {
        match lines.next() {
            Some(line) if line.trim().is_empty() || line.trim() == "\u{feff}" => {
                offset += line.len();
            }
            Some(line) => break line,
            None => return Ok(empty_split()),
        }
    };

    if !is_fence(opening) {
        return Ok(empty_split());
    }
    offset += opening.len();
    let yaml_start = offset;

    for line in lines {
        if is_fence(line) {
            let data = parse_yaml(&input[yaml_start..offset])?;
            return Ok(FrontmatterSplit {
                data,
                body_start: offset + line.len(),
            });
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

fn empty_split() -> FrontmatterSplit {
    FrontmatterSplit {
        data: FrontmatterMap::new(),
        body_start: 0,
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_start_matches('\u{feff}').trim_end_matches(['\r', '\n']) == "---"
}

fn parse_yaml(block: &str) -> Result<FrontmatterMap, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(FrontmatterMap::new());
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    match serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))? {
        JsonValue::Null => Ok(FrontmatterMap::new()),
        JsonValue::Object(map) => Ok(map),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(input: &str) -> SourceDocument {
        SourceDocument::parse("docs/page.md", input).expect("frontmatter should parse")
    }

    #[test]
    fn document_without_frontmatter_keeps_whole_body() {
        let parsed = doc("# Title\nBody");
        assert!(parsed.frontmatter.is_empty());
        assert_eq!(parsed.body, "# Title\nBody");
        assert_eq!(parsed.body_line, 1);
    }

    #[test]
    fn title_description_and_custom_keys() {
        let parsed = doc(
            "---\ntitle: Getting Started\ndescription: First steps\ntags:\n  - intro\n---\n# Content\n",
        );
        assert_eq!(parsed.title(), Some("Getting Started"));
        assert_eq!(parsed.description(), Some("First steps"));
        assert_eq!(parsed.frontmatter["tags"], serde_json::json!(["intro"]));
        assert_eq!(parsed.body, "# Content\n");
        assert_eq!(parsed.body_line, 7);
    }

    #[test]
    fn non_string_title_is_ignored() {
        let parsed = doc("---\ntitle: 42\n---\nBody");
        assert_eq!(parsed.title(), None);
        assert_eq!(parsed.frontmatter["title"], serde_json::json!(42));
    }

    #[test]
    fn empty_block_and_crlf_fences() {
        let parsed = doc("---\r\n---\r\nBody");
        assert!(parsed.frontmatter.is_empty());
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn bom_and_leading_blank_lines() {
        let input = "\u{feff}\n   \n---\nfoo: bar\n---\nBody";
        let split = split_frontmatter(input).expect("split");
        assert_eq!(frontmatter_str(&split.data, "foo"), Some("bar"));
        assert_eq!(&input[split.body_start..], "Body");
    }

    #[test]
    fn thematic_break_later_in_document_is_not_frontmatter() {
        let parsed = doc("Intro\n\n---\n\nMore");
        assert!(parsed.frontmatter.is_empty());
        assert_eq!(parsed.body_line, 1);
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let err = split_frontmatter("---\ninvalid: [unterminated\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn errors_on_scalar_root() {
        let err = split_frontmatter("---\njust a string\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType), "{err:?}");
    }

    #[test]
    fn errors_on_unterminated_block() {
        let err = split_frontmatter("---\ntitle: test").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }
}
