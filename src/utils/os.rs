use std::env;

/// Expands a leading `~/` to `$HOME`. Other paths are returned unchanged.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home_dir) = env::var_os("HOME") {
            return format!("{}/{}", home_dir.to_string_lossy(), rest);
        }
    }
    path.to_string()
}

#[test]
fn test_expand_tilde_leaves_plain_paths() {
    assert_eq!(expand_tilde("/etc/pvetool/config.yaml"), "/etc/pvetool/config.yaml");
    assert_eq!(expand_tilde("config~/x.yaml"), "config~/x.yaml");
}

#[test]
fn test_expand_tilde_uses_home() {
    if let Some(home_dir) = env::var_os("HOME") {
        assert_eq!(
            expand_tilde("~/pve.yaml"),
            format!("{}/pve.yaml", home_dir.to_string_lossy())
        );
    }
}
