use regex::{Captures, Regex};
use tracing::debug;

use super::io_error;
use crate::application::error::OperationError;
use crate::application::ports::Filesystem;
use crate::domain::{ExecutionContext, OperationResult, TextReplaceOperation};

pub fn execute_text_replace(
    op: &TextReplaceOperation,
    context: &ExecutionContext,
    fs: &dyn Filesystem,
) -> Result<OperationResult, OperationError> {
    let target = context.resolve_destination(&op.target);
    if !fs.exists(&target) {
        return Err(OperationError::TargetNotFound {
            target: op.target.clone(),
        });
    }

    let content = fs.read_to_string(&target).map_err(|e| io_error(&target, e))?;
    let updated = replace_text(&content, op)?;
    fs.write_file(&target, &updated)
        .map_err(|e| io_error(&target, e))?;

    debug!(target = %op.target, regex = op.is_regex, "replaced text");
    Ok(OperationResult::succeeded([op.target.as_str()]))
}

/// Replace every occurrence of the operation's pattern in `content`.
///
/// Regex replacements use the `String.prototype.replace` syntax manifests are
/// written in: `$1`..`$99`, `$<name>`, `$&`, `` $` ``, `$'` and `$$`. So `$1px`
/// is group 1 followed by `px`. Anything else after `$` is kept literally.
/// An empty literal pattern leaves the content unchanged.
pub fn replace_text(content: &str, op: &TextReplaceOperation) -> Result<String, OperationError> {
    if op.is_regex {
        let regex = Regex::new(&op.pattern).map_err(|e| OperationError::InvalidPattern {
            pattern: op.pattern.clone(),
            reason: e.to_string(),
        })?;
        let replaced = regex.replace_all(content, |caps: &Captures<'_>| {
            let mut out = String::with_capacity(op.replacement.len());
            expand_replacement(&regex, caps, content, &op.replacement, &mut out);
            out
        });
        return Ok(replaced.into_owned());
    }

    if op.pattern.is_empty() {
        return Ok(content.to_string());
    }
    Ok(content.replace(&op.pattern, &op.replacement))
}

/// Append `replacement` to `dst` with every `$` reference expanded for `caps`.
fn expand_replacement(
    regex: &Regex,
    caps: &Captures<'_>,
    haystack: &str,
    replacement: &str,
    dst: &mut String,
) {
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let group = |n: usize| caps.get(n).map_or("", |m| m.as_str());
    let bytes = replacement.as_bytes();

    let mut literal_start = 0;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let expansion: Option<(&str, usize)> = match bytes[i + 1] {
            b'$' => Some(("$", 2)),
            b'&' => Some((&haystack[whole.clone()], 2)),
            b'`' => Some((&haystack[..whole.start], 2)),
            b'\'' => Some((&haystack[whole.end..], 2)),
            d @ b'0'..=b'9' => {
                let one = usize::from(d - b'0');
                let two = bytes
                    .get(i + 2)
                    .filter(|b| b.is_ascii_digit())
                    .map(|b| one * 10 + usize::from(b - b'0'));
                match two {
                    Some(n) if n >= 1 && n < caps.len() => Some((group(n), 3)),
                    _ if one >= 1 && one < caps.len() => Some((group(one), 2)),
                    _ => None,
                }
            }
            b'<' if regex.capture_names().flatten().next().is_some() => {
                replacement[i + 2..].find('>').map(|end| {
                    let name = &replacement[i + 2..i + 2 + end];
                    (caps.name(name).map_or("", |m| m.as_str()), end + 3)
                })
            }
            _ => None,
        };

        match expansion {
            Some((text, consumed)) => {
                dst.push_str(&replacement[literal_start..i]);
                dst.push_str(text);
                i += consumed;
                literal_start = i;
            }
            None => i += 1,
        }
    }
    dst.push_str(&replacement[literal_start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_replaces_all_without_regex_meaning() {
        let op = TextReplaceOperation::new("f", "a.b", "X");
        assert_eq!(replace_text("a.b aXb a.b", &op).unwrap(), "X aXb X");
    }

    #[test]
    fn regex_replaces_all_with_backreferences() {
        let op = TextReplaceOperation::new("f", r"port: (\d+)", "port: $10").regex(true);
        assert_eq!(
            replace_text("port: 300\nport: 808", &op).unwrap(),
            "port: 3000\nport: 8080"
        );

        let swap = TextReplaceOperation::new("f", r"(\w+)@(\w+)", "$2 at $1").regex(true);
        assert_eq!(replace_text("me@home", &swap).unwrap(), "home at me");
    }

    #[test]
    fn group_reference_followed_by_letters() {
        let op = TextReplaceOperation::new("f", r"(\d+)", "$1px").regex(true);
        assert_eq!(replace_text("width: 10", &op).unwrap(), "width: 10px");
    }

    #[test]
    fn special_references_expand_like_string_replace() {
        let wrap = TextReplaceOperation::new("f", "b+", "[$&]").regex(true);
        assert_eq!(replace_text("abbc", &wrap).unwrap(), "a[bb]c");

        let dollars = TextReplaceOperation::new("f", "price", "$$5").regex(true);
        assert_eq!(replace_text("price", &dollars).unwrap(), "$5");

        let around = TextReplaceOperation::new("f", "-", "<$`|$'>").regex(true);
        assert_eq!(replace_text("a-b", &around).unwrap(), "a<a|b>b");

        let named = TextReplaceOperation::new("f", r"(?P<word>\w+)!", "$<word>?").regex(true);
        assert_eq!(replace_text("hi!", &named).unwrap(), "hi?");
    }

    #[test]
    fn unknown_references_stay_literal() {
        let op = TextReplaceOperation::new("f", "(a)", "$2 $0 ${1} $").regex(true);
        assert_eq!(replace_text("a", &op).unwrap(), "$2 $0 ${1} $");

        let unnamed = TextReplaceOperation::new("f", "(a)", "$<x>").regex(true);
        assert_eq!(replace_text("a", &unnamed).unwrap(), "$<x>");
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let op = TextReplaceOperation::new("f", "(unclosed", "x").regex(true);
        assert!(matches!(
            replace_text("abc", &op),
            Err(OperationError::InvalidPattern { ref pattern, .. }) if pattern == "(unclosed"
        ));
    }

    #[test]
    fn empty_literal_pattern_is_noop() {
        let op = TextReplaceOperation::new("f", "", "x");
        assert_eq!(replace_text("abc", &op).unwrap(), "abc");
    }
}
