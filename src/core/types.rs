use std::fmt;

use serde::{Deserialize, Serialize};

/// Selects the base allocation vector. Unrecognised input lands in `Other`
/// and is treated like `High`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
    Other(String),
}

impl RiskTolerance {
    pub fn as_str(&self) -> &str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
            RiskTolerance::Other(raw) => raw,
        }
    }
}

impl From<&str> for RiskTolerance {
    fn from(value: &str) -> Self {
        match value {
            "low" => RiskTolerance::Low,
            "medium" => RiskTolerance::Medium,
            "high" => RiskTolerance::High,
            other => RiskTolerance::Other(other.to_string()),
        }
    }
}

impl From<String> for RiskTolerance {
    fn from(value: String) -> Self {
        RiskTolerance::from(value.as_str())
    }
}

impl From<RiskTolerance> for String {
    fn from(value: RiskTolerance) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ShortTermGoal {
    EmergencyFund,
    Vacation,
    NewCar,
    Other(String),
}

impl ShortTermGoal {
    pub fn as_str(&self) -> &str {
        match self {
            ShortTermGoal::EmergencyFund => "emergency_fund",
            ShortTermGoal::Vacation => "vacation",
            ShortTermGoal::NewCar => "new_car",
            ShortTermGoal::Other(raw) => raw,
        }
    }
}

impl From<&str> for ShortTermGoal {
    fn from(value: &str) -> Self {
        match value {
            "emergency_fund" => ShortTermGoal::EmergencyFund,
            "vacation" => ShortTermGoal::Vacation,
            "new_car" => ShortTermGoal::NewCar,
            other => ShortTermGoal::Other(other.to_string()),
        }
    }
}

impl From<String> for ShortTermGoal {
    fn from(value: String) -> Self {
        ShortTermGoal::from(value.as_str())
    }
}

impl From<ShortTermGoal> for String {
    fn from(value: ShortTermGoal) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ShortTermGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum LongTermGoal {
    Retirement,
    BuyHouse,
    ChildrenEducation,
    Other(String),
}

impl LongTermGoal {
    pub fn as_str(&self) -> &str {
        match self {
            LongTermGoal::Retirement => "retirement",
            LongTermGoal::BuyHouse => "buy_house",
            LongTermGoal::ChildrenEducation => "children_education",
            LongTermGoal::Other(raw) => raw,
        }
    }
}

impl From<&str> for LongTermGoal {
    fn from(value: &str) -> Self {
        match value {
            "retirement" => LongTermGoal::Retirement,
            "buy_house" => LongTermGoal::BuyHouse,
            "children_education" => LongTermGoal::ChildrenEducation,
            other => LongTermGoal::Other(other.to_string()),
        }
    }
}

impl From<String> for LongTermGoal {
    fn from(value: String) -> Self {
        LongTermGoal::from(value.as_str())
    }
}

impl From<LongTermGoal> for String {
    fn from(value: LongTermGoal) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LongTermGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes the allocation is derived from. `income` and `savings` are
/// carried through but do not currently affect the result.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct UserProfile {
    pub age: i64,
    pub income: i64,
    pub savings: i64,
    pub risk_tolerance: RiskTolerance,
    pub short_term_goal: ShortTermGoal,
    pub long_term_goal: LongTermGoal,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Stocks,
    MutualFunds,
    Fd,
    Gold,
    Crypto,
    Ppf,
    Nps,
    Scss,
    Policies,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Stocks,
        Category::MutualFunds,
        Category::Fd,
        Category::Gold,
        Category::Crypto,
        Category::Ppf,
        Category::Nps,
        Category::Scss,
        Category::Policies,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Stocks => "stocks",
            Category::MutualFunds => "mutual_funds",
            Category::Fd => "fd",
            Category::Gold => "gold",
            Category::Crypto => "crypto",
            Category::Ppf => "ppf",
            Category::Nps => "nps",
            Category::Scss => "scss",
            Category::Policies => "policies",
        }
    }
}

/// Percentage weight per category. Values are floored at zero but are not
/// renormalized, so the total may differ from 100.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Allocation {
    pub stocks: u32,
    pub mutual_funds: u32,
    pub fd: u32,
    pub gold: u32,
    pub crypto: u32,
    pub ppf: u32,
    pub nps: u32,
    pub scss: u32,
    pub policies: u32,
}

impl Allocation {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Stocks => self.stocks,
            Category::MutualFunds => self.mutual_funds,
            Category::Fd => self.fd,
            Category::Gold => self.gold,
            Category::Crypto => self.crypto,
            Category::Ppf => self.ppf,
            Category::Nps => self.nps,
            Category::Scss => self.scss,
            Category::Policies => self.policies,
        }
    }

    pub fn total(&self) -> u32 {
        Category::ALL.iter().map(|&c| self.get(c)).sum()
    }
}
