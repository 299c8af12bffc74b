//! # Parsing Utils
//!
//! Extracts a typed [`Directive`] from raw inference output.
//!
//! Only two fenced blocks are recognised, ```` ```sql ```` and ```` ```bash ````. The
//! opener is the label immediately followed by a newline, and the block ends at the
//! first closing fence after it. `sql` is looked for first, so it wins whenever both
//! are present, wherever they appear in the text.

use crate::domain::types::Directive;

const FENCE: &str = "```";

pub const SQL_LABEL: &str = "sql";
pub const BASH_LABEL: &str = "bash";

/// Inner text of the first `label` block, untrimmed. `None` if there is no complete block.
pub fn fenced_block<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let opener = format!("{FENCE}{label}\n");
    let start = text.find(&opener)? + opener.len();
    let len = text[start..].find(FENCE)?;
    Some(&text[start..start + len])
}

pub fn parse_directive(reply: &str) -> Option<Directive> {
    if let Some(block) = fenced_block(reply, SQL_LABEL) {
        return Some(Directive::Sql {
            statement: block.trim().to_string(),
        });
    }

    if let Some(block) = fenced_block(reply, BASH_LABEL) {
        return Some(Directive::Shell {
            command: block.trim().to_string(),
        });
    }

    None
}
