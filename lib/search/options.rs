use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroUsize, str::FromStr};

#[cfg(test)]
use proptest::prelude::*;

/// Configuration for the move tree [`Expander`](crate::search::Expander).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, default)]
pub struct Options {
    /// The number of threads to use while expanding.
    #[cfg_attr(test, strategy((1..=4usize).prop_filter_map("zero", NonZeroUsize::new)))]
    pub threads: NonZeroUsize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threads: NonZeroUsize::MIN,
        }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Options`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse expander configuration")]
pub struct ParseOptionsError(ron::de::SpannedError);

impl FromStr for Options {
    type Err = ParseOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_options_is_an_identity(o: Options) {
        assert_eq!(o.to_string().parse(), Ok(o));
    }

    #[test]
    fn omitted_fields_take_default_values() {
        assert_eq!("()".parse(), Ok(Options::default()));
    }

    #[test]
    fn threads_are_parsed_by_name() {
        assert_eq!(
            "(threads: 3)".parse::<Options>().map(|o| o.threads.get()),
            Ok(3)
        );
    }

    #[proptest]
    fn parsing_options_fails_for_unknown_fields(#[strategy("[a-z]{1,8}")] field: String) {
        prop_assume!(field != "threads");
        assert!(format!("({field}: 1)").parse::<Options>().is_err());
    }

    #[test]
    fn parsing_options_fails_for_zero_threads() {
        assert!("(threads: 0)".parse::<Options>().is_err());
    }
}
