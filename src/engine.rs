//! Truncation engine — a pure transform from one string value to its
//! emitted form.
//!
//! Lengths are counted in Unicode scalar values (`char`s), never bytes, so
//! a cut can not land inside a multi-byte UTF-8 sequence.  Grapheme
//! clusters are not considered: a combining mark may be separated from
//! its base character.

use std::borrow::Cow;

use crate::config::TruncationConfig;

impl TruncationConfig {
    /// Apply the truncation rule to `value`.
    ///
    /// - exempt: unchanged, whatever the length
    /// - at most `max_length` chars: unchanged (no ellipsis at exactly
    ///   `max_length`)
    /// - otherwise: the first `max_length - len(ellipsis)` chars followed
    ///   by the ellipsis, exactly `max_length` chars in total
    ///
    /// Unchanged values are returned borrowed.
    pub fn truncate<'a>(&self, value: &'a str, exempt: bool) -> Cow<'a, str> {
        if exempt || self.fits(value) {
            return Cow::Borrowed(value);
        }

        let keep = self.max_length - self.ellipsis_chars;
        // `value` has more than max_length >= keep chars, so the index exists.
        let cut = value
            .char_indices()
            .nth(keep)
            .map_or(value.len(), |(idx, _)| idx);

        let mut out = String::with_capacity(cut + self.ellipsis.len());
        out.push_str(&value[..cut]);
        out.push_str(&self.ellipsis);
        Cow::Owned(out)
    }

    /// Whether `value` is within `max_length` chars.
    pub fn fits(&self, value: &str) -> bool {
        // Byte length bounds char count from above.
        if value.len() <= self.max_length {
            return true;
        }
        value.char_indices().nth(self.max_length).is_none()
    }
}

/// Free-function form of [`TruncationConfig::truncate`].
pub fn truncate<'a>(value: &'a str, config: &TruncationConfig, exempt: bool) -> Cow<'a, str> {
    config.truncate(value, exempt)
}
