//! Splits OBJ text into logical lines and tags each with its directive.

use std::borrow::Cow;

/// A directive keyed on the first token of a line, borrowing its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `v x y z [r g b]`
    Vertex(&'a str),
    /// `vn x y z`
    Normal(&'a str),
    /// `vt u [v]`
    TexCoord(&'a str),
    /// `f p[/uv][/n] ...`
    Face(&'a str),
    /// `l p[/uv] ...`
    Polyline(&'a str),
    /// `p p ...`
    PointSet(&'a str),
    /// `o name` or `g name`
    Object(&'a str),
    /// `usemtl name`
    UseMaterial(&'a str),
    /// `mtllib name ...`
    MaterialLibrary(&'a str),
    /// `usemap name`, recognized but unsupported
    UseMap(&'a str),
    /// `s 0|off|N`, `None` when the argument is missing
    Smoothing(Option<&'a str>),
    Unknown,
}

/// One logical line after continuation joining, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub number: usize,
    pub text: Cow<'a, str>,
}

impl<'a> LogicalLine<'a> {
    /// Text with leading whitespace removed.
    pub fn content(&self) -> &str {
        self.text.trim_start()
    }

    /// True for blank lines, comments, and lone NUL lines.
    pub fn is_skippable(&self) -> bool {
        let content = self.content();
        content.is_empty() || content.starts_with('#') || content == "\0"
    }
}

/// Iterator over logical lines.
///
/// `\r\n` terminators are accepted and a trailing backslash joins the next
/// physical line. Line numbers refer to the first physical line of each
/// logical line.
pub struct LogicalLines<'a> {
    physical: std::iter::Enumerate<std::str::Split<'a, char>>,
}

impl<'a> LogicalLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            physical: text.split('\n').enumerate(),
        }
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = LogicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, first) = self.physical.next()?;
        let first = strip_cr(first);

        let Some(head) = first.strip_suffix('\\') else {
            return Some(LogicalLine {
                number: index + 1,
                text: Cow::Borrowed(first),
            });
        };

        let mut joined = head.to_string();
        while let Some((_, next)) = self.physical.next() {
            let next = strip_cr(next);
            match next.strip_suffix('\\') {
                Some(more) => joined.push_str(more),
                None => {
                    joined.push_str(next);
                    break;
                }
            }
        }

        Some(LogicalLine {
            number: index + 1,
            text: Cow::Owned(joined),
        })
    }
}

/// Classifies a line whose leading whitespace is already stripped.
pub fn classify(content: &str) -> Directive<'_> {
    let (keyword, rest) = match content.find(char::is_whitespace) {
        Some(split) => (&content[..split], content[split..].trim()),
        None => (content, ""),
    };

    match keyword {
        "v" => Directive::Vertex(rest),
        "vn" => Directive::Normal(rest),
        "vt" => Directive::TexCoord(rest),
        "f" => Directive::Face(rest),
        "l" => Directive::Polyline(rest),
        "p" => Directive::PointSet(rest),
        "o" | "g" => Directive::Object(rest),
        "usemtl" if !rest.is_empty() => Directive::UseMaterial(rest),
        "mtllib" => Directive::MaterialLibrary(rest),
        "usemap" => Directive::UseMap(rest),
        "s" => Directive::Smoothing(rest.split_whitespace().next()),
        _ => Directive::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<(usize, String)> {
        LogicalLines::new(text)
            .filter(|line| !line.is_skippable())
            .map(|line| (line.number, line.content().to_string()))
            .collect()
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let lines = collect("v 1 2 3\r\n\r\n   # comment\r\nvn 0 1 0\r\n");
        assert_eq!(
            lines,
            vec![(1, "v 1 2 3".to_string()), (4, "vn 0 1 0".to_string())]
        );
    }

    #[test]
    fn test_continuation_joins_physical_lines() {
        let lines = collect("f 1 2 \\\n3 4\nv 0 0 0");
        assert_eq!(
            lines,
            vec![(1, "f 1 2 3 4".to_string()), (3, "v 0 0 0".to_string())]
        );
    }

    #[test]
    fn test_continuation_with_crlf() {
        let lines = collect("f 1 \\\r\n2 3\r\n");
        assert_eq!(lines, vec![(1, "f 1 2 3".to_string())]);
    }

    #[test]
    fn test_nul_line_is_skipped() {
        assert!(collect("\0\n").is_empty());
    }

    #[test]
    fn test_classify_keywords() {
        assert_eq!(classify("v 1 2 3"), Directive::Vertex("1 2 3"));
        assert_eq!(classify("vn 0 0 1"), Directive::Normal("0 0 1"));
        assert_eq!(classify("vt 0.5 0.5"), Directive::TexCoord("0.5 0.5"));
        assert_eq!(classify("f 1/1/1 2/2/2 3/3/3"), Directive::Face("1/1/1 2/2/2 3/3/3"));
        assert_eq!(classify("l 1 2"), Directive::Polyline("1 2"));
        assert_eq!(classify("p 1"), Directive::PointSet("1"));
        assert_eq!(classify("o  Cube "), Directive::Object("Cube"));
        assert_eq!(classify("g"), Directive::Object(""));
        assert_eq!(classify("usemtl Red Paint"), Directive::UseMaterial("Red Paint"));
        assert_eq!(classify("mtllib a.mtl"), Directive::MaterialLibrary("a.mtl"));
        assert_eq!(classify("usemap wood"), Directive::UseMap("wood"));
        assert_eq!(classify("s off"), Directive::Smoothing(Some("off")));
        assert_eq!(classify("s"), Directive::Smoothing(None));
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("vp 0.1 0.2"), Directive::Unknown);
        assert_eq!(classify("curv 0 1 2"), Directive::Unknown);
        assert_eq!(classify("object thing"), Directive::Unknown);
        assert_eq!(classify("usemtl"), Directive::Unknown);
        assert_eq!(classify("usemtl   "), Directive::Unknown);
    }
}
