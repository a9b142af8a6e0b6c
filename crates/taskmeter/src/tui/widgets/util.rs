use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

pub(super) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = UnicodeSegmentation::graphemes(input, true).count();
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        let truncated: String = UnicodeSegmentation::graphemes(input, true)
            .take(max_graphemes)
            .collect();
        return Cow::Owned(truncated);
    }

    let keep = max_graphemes - ELLIPSIS_GRAPHEMES;
    let mut truncated: String = UnicodeSegmentation::graphemes(input, true).take(keep).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

/// Fixed-width bar, `█` for the share of `target` reached and `░` for the rest.
pub(super) fn progress_bar(current: i64, target: i64, width: usize) -> String {
    let target = i128::from(target.max(1));
    let current = i128::from(current).clamp(0, target);
    let cells = i128::try_from(width).unwrap_or(i128::MAX);
    let filled = usize::try_from(current * cells / target).unwrap_or(width).min(width);

    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

pub(super) const fn completion_marker(complete: bool) -> &'static str {
    if complete { " ✓" } else { "" }
}
