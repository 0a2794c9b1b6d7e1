use std::ops::Range;

/// Replacement of one byte range of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
    /// Caller's handle for this edit, reported back on rejection.
    pub id: usize,
}

/// Apply all non-overlapping edits in one pass from the end of the file.
///
/// Returns the new content and the ids of rejected edits: those overlapping
/// an earlier-starting edit or not on character boundaries.
pub fn apply_edits(content: &str, mut edits: Vec<Edit>) -> (String, Vec<usize>) {
    edits.sort_by_key(|e| (e.span.start, e.span.end));

    let mut accepted: Vec<Edit> = Vec::with_capacity(edits.len());
    let mut rejected = Vec::new();
    for edit in edits {
        let in_bounds = edit.span.start <= edit.span.end
            && edit.span.end <= content.len()
            && content.is_char_boundary(edit.span.start)
            && content.is_char_boundary(edit.span.end);
        let overlaps = accepted
            .last()
            .is_some_and(|previous| edit.span.start < previous.span.end);

        if in_bounds && !overlaps {
            accepted.push(edit);
        } else {
            rejected.push(edit.id);
        }
    }

    let mut output = content.to_string();
    for edit in accepted.iter().rev() {
        output.replace_range(edit.span.clone(), &edit.replacement);
    }
    (output, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edit(id: usize, span: Range<usize>, replacement: &str) -> Edit {
        Edit {
            span,
            replacement: replacement.to_string(),
            id,
        }
    }

    #[test]
    fn test_apply_edits_in_any_order() {
        let content = "a = 'x'; b = 'y';";
        let (output, rejected) = apply_edits(
            content,
            vec![edit(1, 13..16, "t('B')"), edit(0, 4..7, "t('A')")],
        );
        assert_eq!(output, "a = t('A'); b = t('B');");
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_overlapping_edit_is_rejected() {
        let content = "<p>你好世界</p>";
        let (output, rejected) = apply_edits(
            content,
            vec![edit(0, 3..15, "{{ a }}"), edit(1, 9..15, "{{ b }}")],
        );
        assert_eq!(output, "<p>{{ a }}</p>");
        assert_eq!(rejected, vec![1]);
    }

    #[test]
    fn test_out_of_range_edit_is_rejected() {
        let (output, rejected) = apply_edits("abc", vec![edit(7, 2..10, "x")]);
        assert_eq!(output, "abc");
        assert_eq!(rejected, vec![7]);
    }
}
