//! ## larm-core::category
//! **Effect classes an event can belong to**
//!
//! Downstream consumers read categories differently (the enable/disable state
//! machine versus the HUD), but the engine treats every category the same way.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unknown alert category: {0}")]
pub struct UnknownCategory(pub String);

/// Effect class of an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Enable,
    PreEnable,
    NoEntry,
    Warning,
    UserDisable,
    SoftDisable,
    ImmediateDisable,
    Permanent,
    #[serde(rename = "resetVCruise")]
    ResetCruiseSetpoint,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Enable,
        Category::PreEnable,
        Category::NoEntry,
        Category::Warning,
        Category::UserDisable,
        Category::SoftDisable,
        Category::ImmediateDisable,
        Category::Permanent,
        Category::ResetCruiseSetpoint,
    ];

    /// Wire name, as carried in outbound records and alert type labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Enable => "enable",
            Category::PreEnable => "preEnable",
            Category::NoEntry => "noEntry",
            Category::Warning => "warning",
            Category::UserDisable => "userDisable",
            Category::SoftDisable => "softDisable",
            Category::ImmediateDisable => "immediateDisable",
            Category::Permanent => "permanent",
            Category::ResetCruiseSetpoint => "resetVCruise",
        }
    }

    pub const fn flag(self) -> CategoryFlags {
        match self {
            Category::Enable => CategoryFlags::ENABLE,
            Category::PreEnable => CategoryFlags::PRE_ENABLE,
            Category::NoEntry => CategoryFlags::NO_ENTRY,
            Category::Warning => CategoryFlags::WARNING,
            Category::UserDisable => CategoryFlags::USER_DISABLE,
            Category::SoftDisable => CategoryFlags::SOFT_DISABLE,
            Category::ImmediateDisable => CategoryFlags::IMMEDIATE_DISABLE,
            Category::Permanent => CategoryFlags::PERMANENT,
            Category::ResetCruiseSetpoint => CategoryFlags::RESET_CRUISE_SETPOINT,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

bitflags! {
    /// Set of categories, one bit per [`Category`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CategoryFlags: u16 {
        const ENABLE = 1 << 0;
        const PRE_ENABLE = 1 << 1;
        const NO_ENTRY = 1 << 2;
        const WARNING = 1 << 3;
        const USER_DISABLE = 1 << 4;
        const SOFT_DISABLE = 1 << 5;
        const IMMEDIATE_DISABLE = 1 << 6;
        const PERMANENT = 1 << 7;
        const RESET_CRUISE_SETPOINT = 1 << 8;
    }
}

impl CategoryFlags {
    #[inline]
    pub fn has(self, category: Category) -> bool {
        self.contains(category.flag())
    }

    /// Categories in the set, in [`Category::ALL`] order.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(move |c| self.has(*c))
    }
}

impl FromIterator<Category> for CategoryFlags {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CategoryFlags::empty(), |acc, c| acc | c.flag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_parse_back() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("disengage".parse::<Category>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let yaml = serde_yaml::to_string(&Category::ResetCruiseSetpoint).unwrap();
        assert_eq!(yaml.trim(), "resetVCruise");
        let parsed: Category = serde_yaml::from_str("softDisable").unwrap();
        assert_eq!(parsed, Category::SoftDisable);
    }

    #[test]
    fn flags_collect_and_iterate() {
        let flags: CategoryFlags = [Category::NoEntry, Category::SoftDisable]
            .into_iter()
            .collect();
        assert!(flags.has(Category::NoEntry));
        assert!(!flags.has(Category::Warning));
        assert_eq!(
            flags.categories().collect::<Vec<_>>(),
            vec![Category::NoEntry, Category::SoftDisable]
        );
    }
}
