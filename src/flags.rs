//! Ordered command-line flag sets.
//!
//! A [`FlagSet`] is rendered verbatim into a rule variable, so token order is
//! preserved and duplicates are kept.
//!
//! ```
//! use dolgen::flags::FlagSet;
//!
//! let flags: FlagSet = ["-O2", "-proc gekko", "-O2"].into_iter().collect();
//! assert_eq!(flags.render(), "-O2 -proc gekko -O2");
//! ```

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Ordered sequence of flag tokens for a single toolchain stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(Vec<String>);

impl FlagSet {
    /// Borrow the tokens in invocation order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Join the tokens with single spaces.
    #[must_use]
    pub fn render(&self) -> String {
        self.0.iter().join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "")]
    #[case(&["-nodefaults"], "-nodefaults")]
    #[case(&["-i include", "-i include"], "-i include -i include")]
    #[case(&["-pragma \"cats off\"", "-opt all"], "-pragma \"cats off\" -opt all")]
    fn render_preserves_order_and_duplicates(#[case] tokens: &[&str], #[case] expected: &str) {
        let flags: FlagSet = tokens.iter().copied().collect();
        assert_eq!(flags.render(), expected);
        assert_eq!(flags.tokens().len(), tokens.len());
    }

    #[test]
    fn deserialises_from_plain_list() {
        let flags: FlagSet = serde_json::from_str(r#"["-fp hard", "-mapunused"]"#)
            .expect("parse flag list");
        assert_eq!(flags.render(), "-fp hard -mapunused");
    }
}
