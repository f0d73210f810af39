//! Canonicalization: a single-pass scanner that decides whether a path
//! needs normalizing at all, plus the lexical full-path routine used when
//! it does.
//!
//! Design:
//! - Most paths flowing through a build are already canonical. The scanner
//!   keeps that common case allocation-free; the full routine runs only on
//!   a positive scan.
//! - Only a segment that is exactly `.` or `..` counts as relative.
//!   Dot-prefixed names (`.git`, `.gitignore`, `...`) must never trigger,
//!   because downstream caches compare canonical paths as plain strings and
//!   a spurious rewrite would split cache entries.

use super::platform::PathPlatform;

/// Does `value` contain anything the full-path routine would change?
///
/// Triggers on:
/// - doubled separators (exempting the leading pair of a Windows UNC prefix),
/// - a separator followed by a lone `.` or `..` segment (ending in a
///   separator or end-of-string),
/// - any alternate-separator occurrence on dual-separator platforms.
pub(crate) fn needs_normalization(value: &str, platform: PathPlatform) -> bool {
    let bytes = value.as_bytes();
    let primary = platform.primary_separator() as u8;
    let alternate = platform.alternate_separator().map(|c| c as u8);
    let is_sep = |b: u8| b == primary || Some(b) == alternate;

    let mut prev_was_sep = false;
    for (i, &b) in bytes.iter().enumerate() {
        if !is_sep(b) {
            prev_was_sep = false;
            continue;
        }
        if Some(b) == alternate {
            return true;
        }
        // A UNC prefix starts with exactly two separators; the second one is
        // not a doubled separator.
        let unc_pair = platform == PathPlatform::Windows && i == 1;
        if prev_was_sep && !unc_pair {
            return true;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] == b'.' {
            j += 1;
        }
        let dots = j - (i + 1);
        if (dots == 1 || dots == 2) && (j == bytes.len() || is_sep(bytes[j])) {
            return true;
        }
        prev_was_sep = true;
    }
    false
}

/// The authoritative full-path routine: resolve `.`/`..` segments, collapse
/// redundant separators, convert alternate separators to the primary one.
///
/// Purely lexical: `..` pops the previous segment and never climbs above
/// the root; the file system is never consulted. A trailing separator on
/// the input is preserved.
pub(crate) fn normalize_full(value: &str, platform: PathPlatform) -> String {
    let primary = platform.primary_separator();
    let (root, rest, glue_first) = split_root(value, platform);

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split(|c| platform.is_separator(c)) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(value.len());
    out.push_str(&root);
    for (idx, segment) in segments.iter().enumerate() {
        if (idx > 0 || glue_first) && !out.ends_with(primary) {
            out.push(primary);
        }
        out.push_str(segment);
    }
    if value.ends_with(|c: char| platform.is_separator(c)) && !out.ends_with(primary) {
        out.push(primary);
    }
    out
}

/// Split off the root prefix, normalized to primary separators.
///
/// The third element says whether a separator must be inserted between the
/// root and the first segment (true only for UNC roots; drive-relative
/// `C:foo` keeps its shape with no separator after the colon).
fn split_root(value: &str, platform: PathPlatform) -> (String, &str, bool) {
    let primary = platform.primary_separator();
    let bytes = value.as_bytes();
    let is_sep = |b: u8| platform.is_separator(b as char);

    match platform {
        PathPlatform::Posix => {
            if bytes.first() == Some(&b'/') {
                ("/".to_string(), &value[1..], false)
            } else {
                (String::new(), value, false)
            }
        }
        PathPlatform::Windows => match bytes {
            [d, b':', s, ..] if d.is_ascii_alphabetic() && is_sep(*s) => {
                let mut root = String::with_capacity(3);
                root.push(*d as char);
                root.push(':');
                root.push(primary);
                (root, &value[3..], false)
            }
            [d, b':', ..] if d.is_ascii_alphabetic() => {
                let mut root = String::with_capacity(2);
                root.push(*d as char);
                root.push(':');
                (root, &value[2..], false)
            }
            [a, b, ..] if is_sep(*a) && is_sep(*b) => {
                // \\server\share is all root; segments start after the share.
                let mut end = 2;
                let mut components = 0;
                while components < 2 {
                    let start = end;
                    while end < bytes.len() && !is_sep(bytes[end]) {
                        end += 1;
                    }
                    if end > start {
                        components += 1;
                    }
                    if end >= bytes.len() || components == 2 {
                        break;
                    }
                    end += 1;
                }
                let mut root = String::with_capacity(end);
                root.push(primary);
                root.push(primary);
                for c in value[2..end].chars() {
                    if platform.is_separator(c) {
                        // Collapse stray separator runs inside the prefix.
                        if !root.ends_with(primary) {
                            root.push(primary);
                        }
                    } else {
                        root.push(c);
                    }
                }
                (root, &value[end..], true)
            }
            [s, ..] if is_sep(*s) => (primary.to_string(), &value[1..], false),
            _ => (String::new(), value, false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // The non-trigger set: dot-prefixed names are ordinary file names.
    #[rstest]
    #[case::git("/.git")]
    #[case::hidden("/.hidden")]
    #[case::nuget("/home/user/.nuget")]
    #[case::config("/work/.config")]
    #[case::gitignore("/foo/.gitignore")]
    #[case::three_dots("/...")]
    #[case::four_dots("/....")]
    #[case::dots_inside("/a/...x/b")]
    #[case::multi_dot_file("/out/lib.v1..dll")]
    #[case::plain("/work/proj/out")]
    #[case::trailing_separator("/work/proj/")]
    #[case::root("/")]
    fn posix_scanner_does_not_trigger(#[case] value: &str) {
        assert!(!needs_normalization(value, PathPlatform::Posix), "{value}");
    }

    #[rstest]
    #[case::git(r"C:\repo\.git")]
    #[case::hidden(r"C:\.hidden")]
    #[case::three_dots(r"C:\...")]
    #[case::unc_prefix(r"\\server\share\dir")]
    #[case::plain(r"C:\work\out")]
    #[case::drive_root(r"C:\")]
    fn windows_scanner_does_not_trigger(#[case] value: &str) {
        assert!(!needs_normalization(value, PathPlatform::Windows), "{value}");
    }

    #[rstest]
    #[case::dot_segment("/a/./b")]
    #[case::dotdot_segment("/a/../b")]
    #[case::trailing_dot("/a/.")]
    #[case::trailing_dotdot("/a/..")]
    #[case::leading_dot_segment("/./a")]
    #[case::leading_dotdot_segment("/../a")]
    #[case::doubled_separator("/a//b")]
    #[case::leading_double("//a/b")]
    #[case::triple("/a///b")]
    fn posix_scanner_triggers(#[case] value: &str) {
        assert!(needs_normalization(value, PathPlatform::Posix), "{value}");
    }

    #[rstest]
    #[case::dot_segment(r"C:\a\.\b")]
    #[case::dotdot_segment(r"C:\a\..\b")]
    #[case::trailing_dot(r"C:\a\.")]
    #[case::trailing_dotdot(r"C:\a\..")]
    #[case::doubled(r"C:\a\\b")]
    #[case::alternate_separator(r"C:\a/b")]
    #[case::all_alternate("C:/a/b")]
    #[case::unc_doubled_past_prefix(r"\\server\share\\x")]
    #[case::unc_dotdot(r"\\server\share\a\..\b")]
    fn windows_scanner_triggers(#[case] value: &str) {
        assert!(needs_normalization(value, PathPlatform::Windows), "{value}");
    }

    #[rstest]
    #[case::dot("/a/./b", "/a/b")]
    #[case::dotdot("/a/../b", "/b")]
    #[case::trailing_dot("/a/.", "/a")]
    #[case::trailing_dotdot("/a/b/..", "/a")]
    #[case::trailing_dotdot_to_root("/a/..", "/")]
    #[case::above_root("/../a", "/a")]
    #[case::above_root_repeated("/a/../../..", "/")]
    #[case::doubled("/a//b", "/a/b")]
    #[case::leading_double("//a", "/a")]
    #[case::trailing_separator_kept("/a/b/", "/a/b/")]
    #[case::dotdot_then_trailing("/a/b/../", "/a/")]
    #[case::mixed("/a/./b/../c//d", "/a/c/d")]
    fn posix_normalize(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(normalize_full(value, PathPlatform::Posix), expected);
    }

    #[rstest]
    #[case::dot(r"C:\a\.\b", r"C:\a\b")]
    #[case::dotdot(r"C:\a\..\b", r"C:\b")]
    #[case::trailing_dot(r"C:\a\.", r"C:\a")]
    #[case::above_root(r"C:\..\a", r"C:\a")]
    #[case::to_drive_root(r"C:\a\..", r"C:\")]
    #[case::doubled(r"C:\a\\b", r"C:\a\b")]
    #[case::alternate("C:/a/b", r"C:\a\b")]
    #[case::mixed_separators(r"C:\a/b\c", r"C:\a\b\c")]
    #[case::trailing_kept(r"C:\a\b\", r"C:\a\b\")]
    #[case::unc(r"\\server\share\a\..\b", r"\\server\share\b")]
    #[case::unc_alternate("//server/share/x", r"\\server\share\x")]
    #[case::unc_dotdot_stops_at_share(r"\\server\share\..", r"\\server\share")]
    #[case::unc_doubled(r"\\server\share\\x", r"\\server\share\x")]
    fn windows_normalize(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(normalize_full(value, PathPlatform::Windows), expected);
    }

    #[test]
    fn normalized_output_passes_the_scanner() {
        // Idempotence at the algorithm level: one pass reaches a fixed point.
        let inputs = [
            "/a/./b/../c//d",
            "/../a/",
            "/a/b/../../c",
        ];
        for input in inputs {
            let normalized = normalize_full(input, PathPlatform::Posix);
            assert!(
                !needs_normalization(&normalized, PathPlatform::Posix),
                "{input} -> {normalized}"
            );
        }

        let windows_inputs = [r"C:\a\.\b\..\c", "C:/a//b", r"\\server\share\a\..\b\"];
        for input in windows_inputs {
            let normalized = normalize_full(input, PathPlatform::Windows);
            assert!(
                !needs_normalization(&normalized, PathPlatform::Windows),
                "{input} -> {normalized}"
            );
        }
    }
}
