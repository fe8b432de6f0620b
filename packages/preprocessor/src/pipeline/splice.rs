//! Script splicing
//!
//! Places glue fragments inside the component's instance script. The
//! insertions go through the same `CodeBuffer` as the markup edits, so they
//! compose with them and are checked for conflicts the same way.

use super::pass::ScriptAdditions;
use crate::ast::Template;
use crate::code_buffer::CodeBuffer;

/// Origin recorded for the edits made here.
pub const SCRIPT_SPLICE_ORIGIN: &str = "script-splice";

/// Queue the insertion of `additions` into `template`'s instance script.
///
/// `before` lands at the start of the script content and `after` at its end.
/// A component without an instance script gets a new one at the top of the
/// file. Empty additions leave the buffer untouched.
pub fn splice_script_additions(template: &Template, code: &mut CodeBuffer, additions: &ScriptAdditions) {
    if additions.is_empty() {
        return;
    }

    let previous_origin = code.origin().to_string();
    code.set_origin(SCRIPT_SPLICE_ORIGIN);

    match &template.instance {
        Some(script) => {
            if !additions.before.is_empty() {
                code.insert_after(script.content.start, format!("\n{}\n", additions.before.join("\n")));
            }
            if !additions.after.is_empty() {
                code.insert_after(script.content.end, format!("\n{}\n", additions.after.join("\n")));
            }
        }
        None => {
            let body: Vec<&str> = additions
                .before
                .iter()
                .chain(additions.after.iter())
                .map(String::as_str)
                .collect();
            code.insert_after(0, format!("<script>\n{}\n</script>\n", body.join("\n")));
        }
    }

    code.set_origin(previous_origin);
}
