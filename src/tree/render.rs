//! ASCII rendering for branch forests.

use uuid::Uuid;

use crate::models::BranchNode;
use crate::text::prepare::truncate_text;

const CURRENT: char = '●';
const OTHER: char = '○';
const MAX_QUESTION_CHARS: usize = 60;

/// Render a branch forest, one question per line, marking the current branch.
///
/// Example output:
/// ```text
/// ○ What is the capital?
/// ├── ○ How large is Paris?
/// │   └── ● When was it founded?
/// └── ○ What about Lyon?
/// ```
pub fn render_tree(nodes: &[BranchNode], current: Option<Uuid>) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(&mut output, node, current, "", true, true);
    }
    output
}

fn render_node(
    output: &mut String,
    node: &BranchNode,
    current: Option<Uuid>,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    let symbol = if current == Some(node.branch.id) {
        CURRENT
    } else {
        OTHER
    };

    if !is_root {
        output.push_str(prefix);
        output.push_str(if is_last { "└── " } else { "├── " });
    }
    output.push(symbol);
    output.push(' ');
    output.push_str(&truncate_text(
        node.branch.question.lines().next().unwrap_or_default(),
        MAX_QUESTION_CHARS,
    ));
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, current, &child_prefix, child_is_last, false);
    }
}
