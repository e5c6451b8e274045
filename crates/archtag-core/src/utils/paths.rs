//! Wildcard matching for module specifiers, callees and names.

/// Checks if a module specifier matches a pattern.
///
/// Segments are separated by `/`. Supports wildcards:
/// - `*` inside a segment matches any run of characters
/// - `**` matches any number of segments
///
/// A pattern without wildcards also matches its subpaths, so `lodash`
/// matches `lodash/fp`.
///
/// # Examples
///
/// ```
/// use archtag_core::utils::paths::module_matches;
///
/// assert!(module_matches("lodash/fp", "lodash"));
/// assert!(module_matches("@aws-sdk/client-s3", "@aws-sdk/*"));
/// assert!(module_matches("src/infra/db/pool", "src/infra/**"));
/// assert!(!module_matches("lodash-es", "lodash"));
/// ```
#[must_use]
pub fn module_matches(module: &str, pattern: &str) -> bool {
    let module = module.trim();
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return false;
    }
    if !pattern.contains('*') {
        return module == pattern
            || module
                .strip_prefix(pattern)
                .is_some_and(|rest| rest.starts_with('/'));
    }

    let module_parts: Vec<&str> = module.split('/').collect();
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    match_parts(&module_parts, &pattern_parts)
}

/// Checks if a dotted callee matches a pattern.
///
/// Segments are separated by `.`, with the same wildcards as
/// [`module_matches`]. A bare name also matches a method of that name, so
/// `eval` matches `window.eval`.
#[must_use]
pub fn callee_matches(callee: &str, pattern: &str) -> bool {
    let callee = callee.trim();
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return false;
    }
    if !pattern.contains('.') && !pattern.contains('*') {
        return callee == pattern || last_segment(callee, '.') == pattern;
    }

    let callee_parts: Vec<&str> = callee.split('.').collect();
    let pattern_parts: Vec<&str> = pattern.split('.').collect();
    match_parts(&callee_parts, &pattern_parts)
}

/// Checks if a name matches a pattern where `*` matches any run of
/// characters (`*Service`, `use*`, `*Repo*`).
#[must_use]
pub fn name_matches(name: &str, pattern: &str) -> bool {
    wildcard(name.as_bytes(), pattern.trim().as_bytes())
}

fn match_parts(path: &[&str], pattern: &[&str]) -> bool {
    if pattern.is_empty() {
        return path.is_empty();
    }

    let (first_pattern, rest_pattern) = (pattern[0], &pattern[1..]);

    match first_pattern {
        "**" => (0..=path.len()).any(|i| match_parts(&path[i..], rest_pattern)),
        segment => {
            !path.is_empty()
                && wildcard(path[0].as_bytes(), segment.as_bytes())
                && match_parts(&path[1..], rest_pattern)
        }
    }
}

fn wildcard(text: &[u8], pattern: &[u8]) -> bool {
    // Iterative glob with single-star backtracking.
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}

/// Extracts the last segment of a separated path.
#[must_use]
pub fn last_segment(path: &str, separator: char) -> &str {
    path.rsplit(separator).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_literal_and_subpath() {
        assert!(module_matches("axios", "axios"));
        assert!(module_matches("lodash/fp/map", "lodash"));
        assert!(!module_matches("lodash-es", "lodash"));
        assert!(!module_matches("axios", ""));
    }

    #[test]
    fn module_wildcards() {
        assert!(module_matches("@nestjs/common", "@nestjs/*"));
        assert!(!module_matches("@nestjs/common/utils", "@nestjs/*"));
        assert!(module_matches("@nestjs/common/utils", "@nestjs/**"));
        assert!(module_matches("../infra/db", "**/infra/*"));
        assert!(module_matches("react-dom", "react-*"));
    }

    #[test]
    fn callee_matching() {
        assert!(callee_matches("eval", "eval"));
        assert!(callee_matches("window.eval", "eval"));
        assert!(callee_matches("console.log", "console.log"));
        assert!(callee_matches("console.warn", "console.*"));
        assert!(!callee_matches("logger.log", "console.*"));
        assert!(!callee_matches("evaluate", "eval"));
    }

    #[test]
    fn name_wildcards() {
        assert!(name_matches("UserService", "*Service"));
        assert!(name_matches("useAuth", "use*"));
        assert!(name_matches("OrderRepository", "*Repo*"));
        assert!(name_matches("Exact", "Exact"));
        assert!(!name_matches("UserController", "*Service"));
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("fs.readFileSync", '.'), "readFileSync");
        assert_eq!(last_segment("read", '.'), "read");
    }
}
