//! JSON Pointer fragments as used by `$ref`.

/// Split a pointer fragment into unescaped segments.
///
/// A leading `#/`, `#` or `/` is stripped first. The empty fragment yields
/// no segments (the document root). Escapes are applied per segment in the
/// order `~1` → `/`, `~0` → `~`, `%25` → `%`.
pub(crate) fn segments(fragment: &str) -> Vec<String> {
    let trimmed = fragment
        .strip_prefix("#/")
        .or_else(|| fragment.strip_prefix('#'))
        .unwrap_or(fragment);
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').map(unescape).collect()
}

fn unescape(segment: &str) -> String {
    segment
        .replace("~1", "/")
        .replace("~0", "~")
        .replace("%25", "%")
}

/// Escape one segment for use in an instance path.
pub(crate) fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_pointers_have_no_segments() {
        assert!(segments("").is_empty());
        assert!(segments("#").is_empty());
        assert!(segments("#/").is_empty());
    }

    #[test]
    fn strips_prefixes() {
        assert_eq!(segments("#/definitions/a"), vec!["definitions", "a"]);
        assert_eq!(segments("#definitions"), vec!["definitions"]);
        assert_eq!(segments("/integer"), vec!["integer"]);
        assert_eq!(segments("items/0"), vec!["items", "0"]);
    }

    #[test]
    fn applies_escapes_in_order() {
        assert_eq!(segments("#/definitions/tilde~0field"), vec!["definitions", "tilde~field"]);
        assert_eq!(segments("#/definitions/slash~1field"), vec!["definitions", "slash/field"]);
        assert_eq!(segments("#/definitions/percent%25field"), vec!["definitions", "percent%field"]);
        // "~01" is a literal "~1", not a slash.
        assert_eq!(segments("#/a/~01"), vec!["a", "~1"]);
    }

    #[test]
    fn escape_is_inverse_of_pointer_escapes() {
        assert_eq!(escape("a/b~c"), "a~1b~0c");
        assert_eq!(segments(&format!("#/x/{}", escape("a/b~c"))), vec!["x", "a/b~c"]);
    }
}
