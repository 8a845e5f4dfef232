use regex::Regex;

/// Paths that skip authentication entirely.
///
/// Patterns are regular expressions matched against the request path with its
/// leading slashes removed (`/health` is tested as `health`). A pattern only
/// has to match at the start of the path, not the whole of it.
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    patterns: Vec<Regex>,
}

impl ExemptPaths {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        self.patterns.iter().any(|re| re.is_match(path))
    }
}
