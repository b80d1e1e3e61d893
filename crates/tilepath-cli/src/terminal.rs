//! ANSI styling for the map overlay and result lines.

/// Escape sequences used by the text formatters.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";

    /// Reverse video tags for the endpoints on a rendered map.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Walls and expansion counts.
    pub const GRAY: &str = "\x1b[90m";
    /// Cells the search reached without using them.
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    /// Path cells.
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
}

/// Styling strings handed to the formatters; every field is empty when
/// color is off, so formatters never branch on it.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            yellow: "",
            red: "",
        }
    }

    /// Pick a palette from the `--no-color` flag and the process
    /// environment (`NO_COLOR`, `TERM`).
    #[must_use]
    pub fn resolve(no_color_flag: bool) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some();
        let term = std::env::var("TERM").ok();
        Self::for_terminal(no_color_flag || no_color_env, term.as_deref())
    }

    /// Palette for a terminal described by `term`, unless color is disabled.
    ///
    /// `TERM=dumb` (any case) disables color; a missing `TERM` does not.
    #[must_use]
    pub fn for_terminal(disabled: bool, term: Option<&str>) -> Self {
        let dumb = term.is_some_and(|term| term.eq_ignore_ascii_case("dumb"));
        if disabled || dumb {
            Self::plain()
        } else {
            Self::colored()
        }
    }
}

/// Render `value` with `,` between groups of three digits.
///
/// ```
/// # use tilepath_cli::terminal::group_thousands;
/// assert_eq!(group_thousands(720), "720");
/// assert_eq!(group_thousands(40_320), "40,320");
/// ```
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let lead = digits.len() % 3;
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (index + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
