//! Reporting programs.

use std::fmt;
use std::str::FromStr;

use crate::error::ConverterError;

/// A reporting-program scope that may select alternate handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Program {
    /// Generic scope, applies to every program.
    #[default]
    All,
    /// Merit-based Incentive Payment System.
    Mips,
    /// Comprehensive Primary Care Plus.
    Cpcplus,
}

impl Program {
    /// Canonical upper-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Mips => "MIPS",
            Self::Cpcplus => "CPCPLUS",
        }
    }

    /// Name written into the `programName` output field.
    #[must_use]
    pub fn output_name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mips => "mips",
            Self::Cpcplus => "cpcPlus",
        }
    }
}

impl FromStr for Program {
    type Err = ConverterError;

    /// Parse a program name, case-insensitively.
    ///
    /// # Examples
    /// ```
    /// use qpp_converter::model::Program;
    ///
    /// assert_eq!("mips".parse::<Program>().unwrap(), Program::Mips);
    /// assert_eq!("CPC+".parse::<Program>().unwrap(), Program::Cpcplus);
    /// assert!("other".parse::<Program>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "MIPS" => Ok(Self::Mips),
            "CPCPLUS" | "CPC+" => Ok(Self::Cpcplus),
            _ => Err(ConverterError::InvalidProgram(s.to_string())),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
