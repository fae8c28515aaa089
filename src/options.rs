//! Values for the daemon's long-only command-line options.
//!
//! Codes start above the single-byte range so they never collide with short
//! option characters. Parsing is left to the daemon's own argument parser.
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// First value handed out to a long-only option.
pub const FIRST_OPTION_CODE: i32 = 257;

/// Long-only option identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[repr(i32)]
pub enum OptionCode {
    /// `--help`
    Help = FIRST_OPTION_CODE,
    /// `--fast-open`
    FastOpen,
    /// `--acl`
    Acl,
    /// `--mtu`
    Mtu,
    /// `--mptcp`
    Mptcp,
    /// `--plugin`
    Plugin,
    /// `--plugin-opts`
    PluginOpts,
    /// `--manager-address`
    ManagerAddress,
    /// `--executable`
    Executable,
}

impl OptionCode {
    /// Numeric value passed through the option parser.
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Option name without the leading dashes.
    pub fn long_name(self) -> &'static str {
        self.into()
    }

    /// Looks up the option carrying `value`.
    pub fn from_value(value: i32) -> Option<Self> {
        OptionCode::iter().find(|code| code.value() == value)
    }
}

impl TryFrom<i32> for OptionCode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        OptionCode::from_value(value).ok_or(value)
    }
}
