//! Fenced code extraction from bot replies.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Info string of a fenced block (`rust` in ```` ```rust ````).
    pub lang: Option<String>,
    pub code: String,
}

/// All code blocks in `text`, in document order.
pub fn code_blocks(text: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<CodeBlock> = None;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                current = Some(CodeBlock {
                    lang,
                    code: String::new(),
                });
            }
            Event::Text(t) => {
                if let Some(ref mut block) = current {
                    block.code.push_str(&t);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_blocks_with_language() {
        let text = "Here you go:\n\n```rust\nfn main() {}\n```\n\nAnd in Python:\n\n```python\nprint('hi')\n```\n";
        let blocks = code_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lang.as_deref(), Some("rust"));
        assert_eq!(blocks[0].code, "fn main() {}\n");
        assert_eq!(blocks[1].lang.as_deref(), Some("python"));
        assert_eq!(blocks[1].code, "print('hi')\n");
    }

    #[test]
    fn fence_without_language() {
        let blocks = code_blocks("```\nls -la\n```");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].lang.is_none());
        assert_eq!(blocks[0].code, "ls -la\n");
    }

    #[test]
    fn inline_code_is_not_a_block() {
        assert!(code_blocks("Use `cargo build` to compile.").is_empty());
    }
}
