//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile `/societe/{id}/documents` style patterns into segments
//! - Match a request path segment-by-segment, capturing parameters
//! - Render a backend pattern with captured parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A parameter matches exactly one non-empty segment
//! - No regex to guarantee O(n) matching

use std::fmt;

/// One segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// Parameters captured while matching, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathPattern {
    /// Compile a pattern. Segments written `{name}` are parameters.
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            segments,
            trailing_slash: pattern.len() > 1 && pattern.ends_with('/'),
        }
    }

    /// Number of literal segments. Used to rank overlapping patterns.
    pub fn specificity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Match `path`, returning captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Vec::new();
        let mut parts = split_segments(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(Params(params))
    }

    /// Render the pattern, substituting captured parameters.
    pub fn render(&self, params: &Params) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Param(name) => out.push_str(params.get(name).unwrap_or_default()),
            }
        }
        if out.is_empty() || self.trailing_slash {
            out.push('/');
        }
        out
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => write!(f, "/{}", lit)?,
                Segment::Param(name) => write!(f, "/{{{}}}", name)?,
            }
        }
        if self.segments.is_empty() || self.trailing_slash {
            f.write_str("/")?;
        }
        Ok(())
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// `path` equals `prefix` or sits below it on a segment boundary.
pub fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Whether `path` has a `.` or `..` segment, percent-encoded or not.
///
/// URL parsing resolves these, so such a path can climb out of the
/// upstream base path. `\` counts as a separator, as it does for http URLs.
pub fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_param_match() {
        let pattern = PathPattern::parse("/societe/{id}/documents");

        let params = pattern.matches("/societe/42/documents").unwrap();
        assert_eq!(params.get("id"), Some("42"));

        assert!(pattern.matches("/societe/42").is_none());
        assert!(pattern.matches("/societe/42/documents/extra").is_none());
        assert!(pattern.matches("/Societe/42/documents").is_none()); // Case sensitive
    }

    #[test]
    fn test_render_substitutes_params() {
        let public = PathPattern::parse("/task/collaborateur/{id}");
        let params = public.matches("/task/collaborateur/7").unwrap();
        assert_eq!(public.render(&params), "/task/collaborateur/7");
    }

    #[test]
    fn test_trailing_slash_is_kept_on_render() {
        let backend = PathPattern::parse("/societe/");
        assert_eq!(backend.render(&Params::default()), "/societe/");
        assert_eq!(backend.to_string(), "/societe/");
    }

    #[test]
    fn test_under_prefix_stops_at_segment_boundary() {
        assert!(under_prefix("/api", "/api"));
        assert!(under_prefix("/api/societe", "/api"));
        assert!(under_prefix("/_next/static/app.js", "/_next/"));
        assert!(!under_prefix("/apiary-login", "/api"));
        assert!(!under_prefix("/ap", "/api"));
    }

    #[test]
    fn test_dot_segments_detected() {
        assert!(has_dot_segment("/../../internal/admin"));
        assert!(has_dot_segment("/societe/./42"));
        assert!(has_dot_segment("/societe/%2E%2e/admin"));
        assert!(has_dot_segment("/societe/.%2e"));
        assert!(has_dot_segment("/societe\\..\\admin"));
        assert!(!has_dot_segment("/facture/9/lignes/3"));
        assert!(!has_dot_segment("/document/rapport.v2.pdf"));
        assert!(!has_dot_segment("/societe/..hidden"));
    }

    #[test]
    fn test_specificity_counts_literals() {
        assert_eq!(PathPattern::parse("/task/batch").specificity(), 2);
        assert_eq!(PathPattern::parse("/task/{id}").specificity(), 1);
        assert_eq!(PathPattern::parse("/task/{id}").to_string(), "/task/{id}");
    }
}
