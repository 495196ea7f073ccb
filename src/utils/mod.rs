//! Utility functions shared across kpaint
//!
//! Common helpers that don't fit in specialized modules.

pub mod color;

pub use color::{parse_hex_color, Rgba};

/// Expand a leading `~` to the user's home directory.
pub fn expand_path(path: &str) -> String {
    if !path.starts_with('~') {
        return path.to_string();
    }

    match dirs::home_dir().map(|p| p.to_string_lossy().to_string()) {
        Some(home) if path == "~" => home,
        Some(home) => format!("{}{}", home, &path[1..]),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_leaves_plain_paths() {
        assert_eq!(expand_path("/tmp/out"), "/tmp/out");
        assert_eq!(expand_path("rel/dir"), "rel/dir");
    }

    #[test]
    fn test_expand_path_home() {
        if let Some(home) = dirs::home_dir() {
            let home = home.to_string_lossy().to_string();
            assert_eq!(expand_path("~"), home);
            assert_eq!(expand_path("~/pics"), format!("{}/pics", home));
        }
    }
}
