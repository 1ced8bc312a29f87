use std::io;
use std::path::{Path, PathBuf};
use zipscan::engine::{ContentMatcher, FilterList, NameMatcher, display_path};
use zipscan::pipeline::RecordSink;
use zipscan::{ExitStatus, MatchTarget, Record, RunSummary, ScanError, ScanOpts, StageOrder};

// --- display_path ---

#[test]
fn test_display_path_dot_root() {
    let root = Path::new(".");
    assert_eq!(
        display_path(Path::new("./sub/b.zip"), root),
        PathBuf::from("sub/b.zip")
    );
    assert_eq!(display_path(Path::new("."), root), PathBuf::from("."));
}

#[test]
fn test_display_path_relative_root_kept() {
    let root = Path::new("data");
    assert_eq!(
        display_path(Path::new("data/a.txt"), root),
        PathBuf::from("data/a.txt")
    );
}

// --- Record ---

#[test]
fn test_record_new_starts_unprocessed_and_unmatched() {
    let r = Record::new("d/a.txt", "a.txt", false);
    assert!(!r.processed);
    assert!(!r.is_match());
}

#[test]
fn test_member_record_path_and_name() {
    let r = Record::member(Path::new("/tmp/x/b.zip"), "docs/readme.md", false);
    assert_eq!(r.path, PathBuf::from("/tmp/x/b.zip@docs/readme.md"));
    assert_eq!(r.name, "docs/readme.md");
    assert!(r.processed);
}

#[test]
fn test_is_match_either_flag() {
    let mut r = Record::new("a", "a", false);
    r.found_content_match = true;
    assert!(r.is_match());
    let mut r = Record::new("a", "a", false);
    r.found_name_match = true;
    assert!(r.is_match());
}

// --- NameMatcher ---

#[test]
fn test_name_matcher_idempotent() {
    let m = NameMatcher::new(r"\.txt$", MatchTarget::Name).unwrap();
    let mut r = Record::new("d/a.txt", "a.txt", false);
    m.apply(&mut r);
    let once = r.clone();
    m.apply(&mut r);
    assert_eq!(r, once);
    assert!(r.found_name_match);
}

#[test]
fn test_name_matcher_never_clears_flag() {
    let m = NameMatcher::new("^nothing$", MatchTarget::Name).unwrap();
    let mut r = Record::new("a.txt", "a.txt", false);
    r.found_name_match = true;
    m.apply(&mut r);
    assert!(r.found_name_match);
}

#[test]
fn test_name_matcher_name_target_ignores_dirs_in_path() {
    let m = NameMatcher::new("secret", MatchTarget::Name).unwrap();
    let mut r = Record::new("secret/a.txt", "a.txt", false);
    m.apply(&mut r);
    assert!(!r.found_name_match);
}

#[test]
fn test_name_matcher_invalid_pattern() {
    let err = NameMatcher::new("a(b", MatchTarget::Name).unwrap_err();
    assert!(matches!(err, ScanError::InvalidPattern { ref pattern, .. } if pattern == "a(b"));
    assert!(err.is_config_error());
}

// --- ContentMatcher ---

#[test]
fn test_content_matcher_binary_bytes() {
    let m = ContentMatcher::new("needle", None).unwrap();
    let mut data = vec![0xff_u8, 0x00, 0xfe];
    data.extend_from_slice(b"needle");
    data.push(0x80);
    assert!(m.find_in_stream(&data[..]).unwrap());
}

#[test]
fn test_content_matcher_size_limit() {
    let m = ContentMatcher::new("x", Some(10)).unwrap();
    assert!(m.accepts_size(10));
    assert!(!m.accepts_size(11));
    assert!(ContentMatcher::new("x", None).unwrap().accepts_size(u64::MAX));
}

#[test]
fn test_content_matcher_refuses_stream_over_limit() {
    let m = ContentMatcher::new("hello", Some(8)).unwrap();
    assert!(m.find_in_stream(&b"hello"[..]).unwrap());
    assert!(m.find_in_stream(&b"12hello!"[..]).unwrap());
    let err = m.find_in_stream(&b"123456789 hello"[..]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::FileTooLarge);
}

#[test]
fn test_default_content_pattern_matches_only_empty() {
    let m = ContentMatcher::new(&ScanOpts::default().content_pattern, None).unwrap();
    assert!(m.find_in_stream(&b""[..]).unwrap());
    assert!(!m.find_in_stream(&b"text"[..]).unwrap());
}

// --- FilterList ---

#[test]
fn test_filter_list_empty_allows_all() {
    let f = FilterList::new(&[]).unwrap();
    assert!(f.is_empty());
    assert!(f.allows("anything"));
}

#[test]
fn test_filter_list_any_pattern() {
    let f = FilterList::new(&["*.zip".to_string(), "*.txt".to_string()]).unwrap();
    assert_eq!(f.len(), 2);
    assert!(f.allows("b.zip"));
    assert!(f.allows("a.txt"));
    assert!(!f.allows("c.log"));
}

#[test]
fn test_filter_list_skips_blank_entries() {
    let f = FilterList::new(&["".to_string()]).unwrap();
    assert!(f.is_empty());
}

#[test]
fn test_filter_list_star_does_not_cross_separator() {
    let f = FilterList::new(&["*.txt".to_string()]).unwrap();
    assert!(!f.allows("sub/a.txt"));
}

// --- Reporter ---

#[test]
fn test_reporter_prints_member_paths() {
    let mut reporter = zipscan::engine::Reporter::new(Vec::new());
    let mut member = Record::member(Path::new("b.zip"), "inner.txt", false);
    member.found_name_match = true;
    reporter.accept(member).unwrap();
    reporter.finish().unwrap();
    assert_eq!(
        String::from_utf8(reporter.into_inner()).unwrap(),
        "b.zip@inner.txt\n"
    );
}

// --- options and status ---

#[test]
fn test_scan_opts_defaults() {
    let opts = ScanOpts::default();
    assert_eq!(opts.root, PathBuf::from("."));
    assert_eq!(opts.name_pattern, ".*");
    assert_eq!(opts.content_pattern, "^$");
    assert!(!opts.content_search);
    assert!(opts.filters.is_empty());
    assert_eq!(opts.stage_order, StageOrder::ScanThenMatch);
    assert_eq!(opts.channel_cap, zipscan::pipeline::DEFAULT_CHANNEL_CAP);
    assert_eq!(
        opts.max_content_size,
        Some(zipscan::utils::ContentConsts::DEFAULT_MAX_CONTENT_SIZE)
    );
}

#[test]
fn test_exit_status_from_summary() {
    let mut summary = RunSummary::default();
    assert_eq!(ExitStatus::from(&summary), ExitStatus::NoMatches);
    summary.matches = 3;
    assert_eq!(ExitStatus::from(&summary), ExitStatus::Matched);
    summary.cancelled = true;
    assert_eq!(ExitStatus::from(&summary), ExitStatus::Failed);
    assert_eq!(ExitStatus::Matched.code(), 0);
    assert_eq!(ExitStatus::NoMatches.code(), 1);
    assert_eq!(ExitStatus::Failed.code(), 3);
}
