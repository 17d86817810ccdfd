//! URL templates with positional `${}` placeholders.
//!
//! A template such as `getListApi/${id}?query=${}` is split once into literal
//! text and placeholder slots. Resolution never touches the parsed template:
//! each call builds a fresh `String`, so repeated or concurrent resolutions of
//! the same template cannot observe each other's substitutions.

use std::fmt;

/// Opening marker of a placeholder.
const OPEN: &str = "${";

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Placeholder slot. The name is documentation only.
    Placeholder(Option<String>),
}

/// A parsed URL template.
///
/// Placeholders are `${}` or `${identifier}` where the identifier consists of
/// ASCII letters, digits and `_`. Any other `${...` sequence is kept as
/// literal text. Placeholders bind strictly by position: the i-th placeholder
/// takes the i-th argument, whatever its name.
///
/// # Examples
///
/// ```
/// use restgen_core::UrlTemplate;
///
/// let template = UrlTemplate::parse("getListApi/${}?query=${}&test=${}");
/// assert_eq!(template.placeholder_count(), 3);
///
/// let url = template.resolve("", &[Some("10"), Some("0")]);
/// assert_eq!(url, "getListApi/10?query=0&test=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
    placeholders: usize,
}

impl UrlTemplate {
    /// Parse a template string.
    ///
    /// Parsing never fails: malformed markers are treated as literal text.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut placeholders = 0;
        let mut rest = template;

        while let Some(start) = rest.find(OPEN) {
            push_literal(&mut segments, &rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let Some(end) = after_open.find('}') else {
                // Unterminated marker: everything left is literal
                push_literal(&mut segments, &rest[start..]);
                rest = "";
                break;
            };

            let name = &after_open[..end];
            if is_identifier(name) {
                segments.push(Segment::Placeholder(
                    (!name.is_empty()).then(|| name.to_string()),
                ));
                placeholders += 1;
                rest = &after_open[end + 1..];
            } else {
                push_literal(&mut segments, OPEN);
                rest = after_open;
            }
        }
        push_literal(&mut segments, rest);

        Self {
            source: template.to_string(),
            segments,
            placeholders,
        }
    }

    /// The template text as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of placeholders, named or not.
    #[must_use]
    pub const fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// Placeholder names in order of appearance (`None` for `${}`).
    pub fn placeholder_names(&self) -> impl Iterator<Item = Option<&str>> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_deref()),
            Segment::Literal(_) => None,
        })
    }

    /// Build a URL from `prefix` and this template.
    ///
    /// The prefix is prepended verbatim and is never scanned for
    /// placeholders. The i-th placeholder is replaced by `args[i]`; a missing
    /// or `None` argument substitutes the empty string, leaving the
    /// surrounding literal text in place. Arguments past the placeholder
    /// count are ignored.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, prefix: &str, args: &[Option<S>]) -> String {
        let mut url = String::with_capacity(prefix.len() + self.source.len());
        url.push_str(prefix);

        let mut index = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Placeholder(_) => {
                    if let Some(Some(arg)) = args.get(index) {
                        url.push_str(arg.as_ref());
                    }
                    index += 1;
                }
            }
        }

        url
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for UrlTemplate {
    fn from(template: &str) -> Self {
        Self::parse(template)
    }
}

/// Parse `template` and resolve it in one step.
///
/// Convenience for callers that do not keep the parsed [`UrlTemplate`].
///
/// ```
/// let url = restgen_core::resolve(
///     "getListApi/${id}",
///     "http://endpoint.com/",
///     &[None::<&str>],
/// );
/// assert_eq!(url, "http://endpoint.com/getListApi/");
/// ```
#[must_use]
pub fn resolve<S: AsRef<str>>(template: &str, prefix: &str, args: &[Option<S>]) -> String {
    UrlTemplate::parse(template).resolve(prefix, args)
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

fn is_identifier(name: &str) -> bool {
    name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NONE: &[Option<&str>] = &[];

    #[test]
    fn no_placeholders_ignores_arguments() {
        let template = UrlTemplate::parse("getListApi");
        assert_eq!(template.placeholder_count(), 0);
        assert_eq!(
            template.resolve("http://endpoint.com/", &[Some("55"), Some("x")]),
            "http://endpoint.com/getListApi",
        );
    }

    #[test]
    fn substitutes_in_positional_order() {
        let template = UrlTemplate::parse("getListApi/${}?query=${}&test=${}");
        assert_eq!(
            template.resolve("http://endpoint.com/", &[Some("55"), Some("couch"), Some("foo")]),
            "http://endpoint.com/getListApi/55?query=couch&test=foo",
        );
    }

    #[test]
    fn named_and_unnamed_placeholders_are_interchangeable() {
        let named = UrlTemplate::parse("a/${second}/${first}");
        let unnamed = UrlTemplate::parse("a/${}/${}");
        let args = [Some("1"), Some("2")];
        assert_eq!(named.resolve("", &args), "a/1/2");
        assert_eq!(named.resolve("", &args), unnamed.resolve("", &args));
    }

    #[test]
    fn missing_argument_becomes_empty_string() {
        assert_eq!(
            resolve("getListApi/${id}", "http://endpoint.com/", NONE),
            "http://endpoint.com/getListApi/",
        );
        assert_eq!(
            resolve("getListApi/${}?query=${}&test=${}", "", &[Some("10"), Some("0")]),
            "getListApi/10?query=0&test=",
        );
    }

    #[test]
    fn explicit_none_in_the_middle_keeps_later_positions() {
        assert_eq!(
            resolve("${}/${}/${}", "", &[Some("a"), None, Some("c")]),
            "a//c",
        );
    }

    #[test]
    fn empty_string_argument_is_substituted_verbatim() {
        assert_eq!(resolve("q=${}&r=${}", "", &[Some(""), Some("x")]), "q=&r=x");
    }

    #[test]
    fn repeated_resolution_does_not_leak_substitutions() {
        let template = UrlTemplate::parse("getListApi/${}?query=${}&test=${}");
        let first = template.resolve("p/", &[Some("55"), Some("couch"), Some("foo")]);
        let second = template.resolve("p/", &[Some("55"), Some("couch2"), Some("foo2")]);
        assert_eq!(first, "p/getListApi/55?query=couch&test=foo");
        assert_eq!(second, "p/getListApi/55?query=couch2&test=foo2");
        assert_eq!(template.as_str(), "getListApi/${}?query=${}&test=${}");
    }

    #[test]
    fn prefix_is_not_scanned_for_placeholders() {
        assert_eq!(resolve("x/${}", "${}/", &[Some("1")]), "${}/x/1");
    }

    #[test]
    fn malformed_markers_stay_literal() {
        let template = UrlTemplate::parse("a/${not valid}/${}/${open");
        assert_eq!(template.placeholder_count(), 1);
        assert_eq!(template.resolve("", &[Some("1")]), "a/${not valid}/1/${open");
    }

    #[test]
    fn placeholder_names_are_reported() {
        let template = UrlTemplate::parse("u/${id}/${}/${page_2}");
        let names: Vec<Option<&str>> = template.placeholder_names().collect();
        assert_eq!(names, vec![Some("id"), None, Some("page_2")]);
    }

    #[test]
    fn adjacent_placeholders() {
        assert_eq!(resolve("${}${}", "", &[Some("a"), Some("b")]), "ab");
    }

    #[test]
    fn display_shows_declared_text() {
        assert_eq!(UrlTemplate::from("a/${id}").to_string(), "a/${id}");
    }
}
