use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde::Serialize;

pub const DEFAULT_DOC_FILE: &str = "pagosUnicosComponent.md";

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("'{0}' is not a plain file name")]
    InvalidFileName(String),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A fenced code block found in a documentation file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExample {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
}

/// True when `name` names a file directly inside a directory.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

pub fn read_documentation(docs_dir: &Path, filename: &str) -> Result<String, DocsError> {
    if !is_plain_file_name(filename) {
        return Err(DocsError::InvalidFileName(filename.to_string()));
    }
    let path = docs_dir.join(filename);
    fs::read_to_string(&path).map_err(|source| DocsError::Read { path, source })
}

/// Markdown files available in `docs_dir`, sorted by name.
pub fn list_documents(docs_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(docs_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.ends_with(".md") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Extract ```` ```html ```` blocks, then ```` ```javascript ```` blocks, each
/// in document order.
pub fn extract_code_examples(markdown: &str) -> Vec<CodeExample> {
    let mut examples = fenced_blocks(markdown, "html");
    examples.extend(fenced_blocks(markdown, "javascript"));
    examples
}

fn fenced_blocks(markdown: &str, lang: &str) -> Vec<CodeExample> {
    let opening = format!("```{lang}");
    let mut blocks = Vec::new();
    let mut rest = markdown;

    while let Some(start) = rest.find(&opening) {
        let body = &rest[start + opening.len()..];
        let Some(end) = body.find("```") else {
            break;
        };
        let code = &body[..end];
        let code = code.strip_prefix('\n').unwrap_or(code);
        blocks.push(CodeExample {
            kind: lang.to_string(),
            code: code.to_string(),
        });
        rest = &body[end + 3..];
    }

    blocks
}
