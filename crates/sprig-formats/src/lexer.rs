// ── TagPair ───────────────────────────────────────────────────────────────

/// One matched `<name>…</name>` pair, borrowed from the scanned source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPair<'s> {
    pub name: &'s str,
    /// Raw text between the open and close tags, untrimmed.
    pub inner: &'s str,
}

// ── TagScanner ────────────────────────────────────────────────────────────

/// Finds top-level tag pairs in source order.
///
/// An open tag `<name>` closes at the *nearest* following `</name>`. Only the
/// same name is considered, so differently named tags may nest freely. An
/// open tag without a matching close is skipped and scanning resumes one
/// character later. Text between pairs is ignored.
///
/// Same-named nesting is not balanced: in `<a><a>x</a></a>` the outer `<a>`
/// pairs with the first `</a>`, leaving `<a>x` as its inner text.
pub struct TagScanner<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> TagScanner<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    /// Returns `true` if `src` holds at least one complete tag pair.
    pub fn contains_pair(src: &str) -> bool {
        TagScanner::new(src).next().is_some()
    }

    /// Tries to match a pair whose open tag starts at byte `open` (a `<`).
    /// Returns the pair and the byte offset just past its close tag.
    fn match_at(&self, open: usize) -> Option<(TagPair<'s>, usize)> {
        let rest = &self.src[open + 1..];
        let name_len = rest
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map_or(rest.len(), |(i, _)| i);
        if name_len == 0 || !rest[name_len..].starts_with('>') {
            return None;
        }

        let name = &rest[..name_len];
        let body_start = open + 1 + name_len + 1;
        let close = format!("</{name}>");
        let body_len = self.src[body_start..].find(&close)?;
        let body_end = body_start + body_len;

        Some((
            TagPair { name, inner: &self.src[body_start..body_end] },
            body_end + close.len(),
        ))
    }
}

impl<'s> Iterator for TagScanner<'s> {
    type Item = TagPair<'s>;

    fn next(&mut self) -> Option<TagPair<'s>> {
        while let Some(rel) = self.src[self.pos..].find('<') {
            let open = self.pos + rel;
            match self.match_at(open) {
                Some((pair, end)) => {
                    self.pos = end;
                    return Some(pair);
                }
                // `<` is one byte, so `open + 1` stays on a char boundary.
                None => self.pos = open + 1,
            }
        }
        self.pos = self.src.len();
        None
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(src: &str) -> Vec<&str> {
        TagScanner::new(src).map(|p| p.name).collect()
    }

    #[test]
    fn finds_siblings_in_order() {
        assert_eq!(names("<a>1</a> junk <b>2</b><a>3</a>"), ["a", "b", "a"]);
    }

    #[test]
    fn inner_text_is_untrimmed() {
        let pair = TagScanner::new("<t>  hi \n</t>").next().unwrap();
        assert_eq!(pair.inner, "  hi \n");
    }

    #[test]
    fn nested_other_names_stay_inside() {
        let pairs: Vec<_> = TagScanner::new("<outer><x>1</x><y>2</y></outer>").collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].inner, "<x>1</x><y>2</y>");
    }

    #[test]
    fn unmatched_open_is_skipped() {
        assert_eq!(names("<lonely> <b>ok</b>"), ["b"]);
    }

    #[test]
    fn close_tags_and_bad_names_never_open() {
        assert!(!TagScanner::contains_pair("</a> <> <a b>x</a b> < a>x</ a>"));
    }

    #[test]
    fn same_name_pairs_with_nearest_close() {
        let pair = TagScanner::new("<a><a>x</a></a>").next().unwrap();
        assert_eq!(pair.inner, "<a>x");
    }

    #[test]
    fn underscores_digits_and_unicode_names() {
        assert_eq!(names("<s_1>a</s_1><ñame>b</ñame>"), ["s_1", "ñame"]);
    }

    #[test]
    fn empty_source_has_no_pairs() {
        assert!(!TagScanner::contains_pair(""));
        assert!(!TagScanner::contains_pair("plain text"));
    }
}
