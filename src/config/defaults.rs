//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn home() -> String {
        "index.html".into()
    }

    pub fn fallback_title() -> String {
        "Untitled".into()
    }
}

// ============================================================================
// [fragments] Section Defaults
// ============================================================================

pub mod fragments {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "partials".into()
    }

    pub fn marker() -> String {
        "data-include".into()
    }

    pub fn loader_script() -> Option<String> {
        Some("assets/js/include-partials.js".into())
    }
}

// ============================================================================
// [regions] Section Defaults
// ============================================================================

pub mod regions {
    pub fn head() -> String {
        "head".into()
    }

    pub fn nav() -> String {
        "header".into()
    }

    pub fn main() -> String {
        "main".into()
    }

    pub fn footer() -> String {
        "footer".into()
    }
}

// ============================================================================
// [links] Section Defaults
// ============================================================================

pub mod links {
    pub fn legacy_prefix() -> String {
        "/pages/".into()
    }

    pub fn root_dirs() -> Vec<String> {
        vec!["forms/".into(), "assets/".into()]
    }

    pub fn parent_prefixes() -> Vec<String> {
        vec!["../assets/".into(), "../forms/".into(), "../index.html".into()]
    }

    pub mod artifact {
        pub fn pattern() -> String {
            r"\1.html".into()
        }

        pub fn fallback() -> String {
            "index.html".into()
        }
    }
}
