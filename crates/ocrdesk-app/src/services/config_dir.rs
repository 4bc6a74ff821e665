// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration directory resolution.

use std::path::PathBuf;

/// Return the application config directory. Not created until something is
/// written there.
pub fn config_dir() -> PathBuf {
    config_base(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join("ocrdesk")
}

fn config_base(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // An empty XDG_CONFIG_HOME counts as unset.
    if let Some(xdg) = xdg.filter(|p| !p.as_os_str().is_empty()) {
        return xdg;
    }
    if let Some(home) = home {
        return home.join(".config");
    }
    // Last resort
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let base = config_base(Some("/xdg".into()), Some("/home/ada".into()));
        assert_eq!(base, PathBuf::from("/xdg"));
    }

    #[test]
    fn home_fallback() {
        assert_eq!(
            config_base(Some(PathBuf::new()), Some("/home/ada".into())),
            PathBuf::from("/home/ada/.config")
        );
        assert_eq!(
            config_base(None, Some("/home/ada".into())),
            PathBuf::from("/home/ada/.config")
        );
    }
}
