//! Centralized parsing for the structural id convention.
//!
//! Every content file is named after its position in the work:
//!
//! ```text
//! 01/00          volume 01, chapter 00
//! 01/02-00       volume 01, chapter 02, section 00
//! 01/02-00-05    volume 01, chapter 02, section 00, sub-section 05
//! ```
//!
//! The part before the first `/` is the volume. The rest is the section id,
//! a run of fixed-width zero-padded numeric tokens joined by `-`. Because the
//! tokens are fixed-width, plain string ordering of section ids is reading
//! order. Nothing here validates that: unpadded or variable-width tokens pass
//! through and simply sort wrong.
//!
//! All functions are pure string operations and never fail. Malformed ids
//! produce whatever the string splitting yields.

/// An id split into its volume and section parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedId<'a> {
    pub volume: &'a str,
    /// Empty for a bare volume id.
    pub section_id: &'a str,
}

impl<'a> ParsedId<'a> {
    /// Nesting depth: number of `-` separators in the section id.
    pub fn depth(&self) -> usize {
        section_depth(self.section_id)
    }

    /// Section id of the structural parent, if the id has one.
    pub fn parent_section_id(&self) -> Option<&'a str> {
        parent_section_id(self.section_id)
    }
}

/// Split an id at its first `/`.
///
/// - `"01/02-00-05"` → volume `"01"`, section `"02-00-05"`
/// - `"01"` → volume `"01"`, section `""`
/// - `"01/a/b"` → volume `"01"`, section `"a/b"`
pub fn parse_id(id: &str) -> ParsedId<'_> {
    match id.split_once('/') {
        Some((volume, section_id)) => ParsedId { volume, section_id },
        None => ParsedId {
            volume: id,
            section_id: "",
        },
    }
}

/// Number of `-` separators in a section id.
pub fn section_depth(section_id: &str) -> usize {
    section_id.matches('-').count()
}

/// Parent of a section id: everything before the last `-`.
///
/// `"02-00-05"` → `Some("02-00")`; `"02"` → `None`. Whether a node with that
/// section id actually exists is the caller's concern.
pub fn parent_section_id(section_id: &str) -> Option<&str> {
    section_id.rfind('-').map(|pos| &section_id[..pos])
}

/// Canonical page URL for an entry id.
///
/// Dashes in the section part become path separators and the result is
/// wrapped in slashes: `"v/a-b-c"` → `"/v/a/b/c/"`, `"v"` → `"/v/"`.
pub fn id_to_url(id: &str) -> String {
    let parsed = parse_id(id);
    if parsed.section_id.is_empty() {
        format!("/{}/", parsed.volume)
    } else {
        format!(
            "/{}/{}/",
            parsed.volume,
            parsed.section_id.replace('-', "/")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_splits_volume_and_section() {
        let p = parse_id("01/02-00-05");
        assert_eq!(p.volume, "01");
        assert_eq!(p.section_id, "02-00-05");
        assert_eq!(p.depth(), 2);
    }

    #[test]
    fn parse_id_bare_volume() {
        let p = parse_id("01");
        assert_eq!(p.volume, "01");
        assert_eq!(p.section_id, "");
        assert_eq!(p.depth(), 0);
        assert_eq!(p.parent_section_id(), None);
    }

    #[test]
    fn parse_id_splits_at_first_slash_only() {
        let p = parse_id("01/a/b");
        assert_eq!(p.volume, "01");
        assert_eq!(p.section_id, "a/b");
    }

    #[test]
    fn top_level_chapter_has_depth_zero() {
        assert_eq!(section_depth("02"), 0);
    }

    #[test]
    fn depth_counts_separators() {
        assert_eq!(section_depth("02-00"), 1);
        assert_eq!(section_depth("02-00-05-01"), 3);
    }

    #[test]
    fn parent_strips_last_token() {
        assert_eq!(parent_section_id("02-00-05"), Some("02-00"));
        assert_eq!(parent_section_id("02-00"), Some("02"));
    }

    #[test]
    fn chapter_has_no_parent() {
        assert_eq!(parent_section_id("02"), None);
        assert_eq!(parent_section_id(""), None);
    }

    #[test]
    fn parent_of_trailing_dash_is_prefix() {
        // Malformed but still a plain string operation
        assert_eq!(parent_section_id("02-"), Some("02"));
    }

    #[test]
    fn url_replaces_dashes_with_slashes() {
        assert_eq!(id_to_url("v/a-b-c"), "/v/a/b/c/");
        assert_eq!(id_to_url("01/02-00-05"), "/01/02/00/05/");
    }

    #[test]
    fn url_for_chapter() {
        assert_eq!(id_to_url("01/00"), "/01/00/");
    }

    #[test]
    fn url_for_bare_volume() {
        assert_eq!(id_to_url("v"), "/v/");
        assert_eq!(id_to_url("v/"), "/v/");
    }

    #[test]
    fn url_keeps_dashes_in_volume() {
        assert_eq!(id_to_url("vol-a/01-02"), "/vol-a/01/02/");
    }

    #[test]
    fn url_passes_unexpected_characters_through() {
        assert_eq!(id_to_url("01/ab c-d"), "/01/ab c/d/");
    }
}
