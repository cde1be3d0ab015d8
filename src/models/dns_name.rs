pub const MAX_NAME_LENGTH: usize = 253;
pub const MAX_LABEL_LENGTH: usize = 63;

/// Turns an arbitrary string into a name usable as a DNS hostname.
///
/// Lowercases and replaces anything outside `a-z`, `0-9`, `-` and `.` with a hyphen.
/// Every dot-separated label is capped at 63 characters with leading/trailing
/// hyphens stripped, and empty labels are dropped. The joined name is capped at 253
/// characters. Returns an empty string when nothing usable remains.
pub fn sanitize_dns_name(name: &str) -> String {
    let replaced: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();

    // Every remaining char is ASCII, so byte slicing below stays on char boundaries.
    let joined = replaced
        .split('.')
        .map(|label| {
            let label = label.trim_matches('-');
            label[..label.len().min(MAX_LABEL_LENGTH)].trim_end_matches('-')
        })
        .filter(|label| !label.is_empty())
        .collect::<Vec<&str>>()
        .join(".");

    joined[..joined.len().min(MAX_NAME_LENGTH)]
        .trim_end_matches(['-', '.'])
        .to_string()
}

#[test]
fn test_sanitize_replaces_invalid_characters() {
    assert_eq!(sanitize_dns_name("My VM_01!"), "my-vm-01");
}

#[test]
fn test_sanitize_keeps_label_separators() {
    assert_eq!(sanitize_dns_name("Web.Example.COM"), "web.example.com");
}

#[test]
fn test_sanitize_caps_total_length() {
    let input = "abcdefghi.".repeat(30);
    assert_eq!(input.len(), 300);

    let sanitized = sanitize_dns_name(&input);
    assert_eq!(sanitized.len(), MAX_NAME_LENGTH);
    assert!(sanitized.ends_with(".abc"));
}

#[test]
fn test_sanitize_caps_each_label() {
    let input = format!("{}.example.com", "a".repeat(70));
    assert_eq!(
        sanitize_dns_name(&input),
        format!("{}.example.com", "a".repeat(MAX_LABEL_LENGTH))
    );
}

#[test]
fn test_sanitize_can_produce_empty_name() {
    assert_eq!(sanitize_dns_name("__!!__"), "");
}

#[test]
fn test_sanitize_drops_empty_labels() {
    assert_eq!(sanitize_dns_name("-.web"), "web");
    assert_eq!(sanitize_dns_name(".web."), "web");
    assert_eq!(sanitize_dns_name("a..b"), "a.b");
    assert_eq!(sanitize_dns_name("..."), "");
    assert_eq!(sanitize_dns_name("app.-.db"), "app.db");
}

#[test]
fn test_sanitize_strips_hyphen_left_by_label_cap() {
    let input = format!("{}-x.com", "a".repeat(62));
    assert_eq!(sanitize_dns_name(&input), format!("{}.com", "a".repeat(62)));
}

#[test]
fn test_sanitize_strips_hyphen_left_by_total_cap() {
    let prefix = "abcdefghi.".repeat(24);
    let input = format!("{}{}-b", prefix, "a".repeat(12));

    let sanitized = sanitize_dns_name(&input);
    assert_eq!(sanitized, format!("{}{}", prefix, "a".repeat(12)));
    assert_eq!(sanitized.len(), MAX_NAME_LENGTH - 1);
}
