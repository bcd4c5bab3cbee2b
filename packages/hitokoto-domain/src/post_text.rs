//! Turns a raw synopsis into the text that is actually posted.
//!
//! Lengths are counted in Unicode scalar values, the unit the feed's hard cap is expressed in.

use hitokoto_config::Post;

/// Separator placed between the synopsis and the reference URL.
pub const REFERENCE_SEPARATOR: &str = "\n\n";

/// Prefixes the greeting and applies the short-form rule.
///
/// When the greeting-prefixed text is longer than `short_form_threshold`, it is cut to
/// `hard_cap - len(ellipsis)` units and the ellipsis is appended, so the result never exceeds the
/// hard cap.
pub fn compose(summary: &str, rules: &Post) -> String {
	let text = format!("{}{}", rules.greeting, summary);

	if char_len(&text) <= rules.short_form_threshold {
		return text;
	}

	let keep = rules.hard_cap.saturating_sub(char_len(&rules.ellipsis));
	let mut out: String = text.chars().take(keep).collect();

	out.push_str(&rules.ellipsis);

	out
}

/// Appends the reference URL only if the result stays within `hard_cap`.
pub fn attach_reference(post_text: &str, reference_url: &str, hard_cap: usize) -> String {
	let total = char_len(post_text) + char_len(REFERENCE_SEPARATOR) + char_len(reference_url);

	if total > hard_cap {
		return post_text.to_string();
	}

	format!("{post_text}{REFERENCE_SEPARATOR}{reference_url}")
}

pub fn char_len(text: &str) -> usize {
	text.chars().count()
}
