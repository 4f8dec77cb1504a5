use crate::errors::AppError;
use crate::models::{Transaction, TransactionType};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Canned transactions offered by the simulator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Normal,
    Suspicious,
    Fraud,
    Edge,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Normal,
        Scenario::Suspicious,
        Scenario::Fraud,
        Scenario::Edge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::Suspicious => "suspicious",
            Scenario::Fraud => "fraud",
            Scenario::Edge => "edge",
        }
    }

    pub fn transaction(&self) -> Transaction {
        let (amount, balance, age, category, time, location, transaction_type) = match self {
            Scenario::Normal => (50.0, 2000.0, 35, "groceries", 14, "USA", TransactionType::Purchase),
            Scenario::Suspicious => (
                2500.0,
                3000.0,
                22,
                "electronics",
                23,
                "USA",
                TransactionType::Purchase,
            ),
            Scenario::Fraud => (
                5000.0,
                2000.0,
                19,
                "travel",
                3,
                "Nigeria",
                TransactionType::Withdrawal,
            ),
            Scenario::Edge => (1200.0, 1500.0, 45, "gaming", 21, "UK", TransactionType::Purchase),
        };

        Transaction {
            amount,
            balance,
            age,
            category: category.to_string(),
            time,
            location: location.to_string(),
            transaction_type,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .iter()
            .copied()
            .find(|sc| sc.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::NotFound(format!("Unknown scenario '{}'", s)))
    }
}

/// 12-hour clock label for an hour slider value, e.g. `14` -> `"2:00 PM"`.
pub fn format_hour(hour: u8) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:00 {}", display, period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario_names() {
        assert_eq!("fraud".parse::<Scenario>().unwrap(), Scenario::Fraud);
        assert_eq!(" Edge ".parse::<Scenario>().unwrap(), Scenario::Edge);
        assert!(matches!(
            "bogus".parse::<Scenario>(),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_presets_are_valid() {
        for scenario in Scenario::ALL {
            assert!(scenario.transaction().validate().is_ok(), "{}", scenario);
        }
    }

    #[test]
    fn test_format_hour() {
        assert_eq!(format_hour(0), "12:00 AM");
        assert_eq!(format_hour(3), "3:00 AM");
        assert_eq!(format_hour(12), "12:00 PM");
        assert_eq!(format_hour(14), "2:00 PM");
        assert_eq!(format_hour(23), "11:00 PM");
    }
}
