mod reader;

pub use reader::read_holidays;

use serde::{Deserialize, Deserializer};

/// One row of the holiday calendar. Blank date cells are read as `None`; year and name are kept
/// verbatim since they end up in rule names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Holiday {
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Yom Tov", default)]
    pub name: String,
    #[serde(rename = "Start of First Days", default, deserialize_with = "blank_as_none")]
    pub first_days: Option<String>,
    #[serde(
        rename = "Start of Last Day (After Chol Hamoed)",
        default,
        deserialize_with = "blank_as_none"
    )]
    pub last_day: Option<String>,
}

fn blank_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(de)?;
    Ok(opt.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()))
}

/// A rule to be created: its name and the unparsed date it fires on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTarget {
    pub name: String,
    pub date: String,
}

impl Holiday {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.year)
    }

    /// Holidays without a last day are a single span, so their rule carries no "First Days" suffix.
    pub fn first_days_target(&self) -> Option<RuleTarget> {
        let date = self.first_days.as_ref()?;

        let name = if self.last_day.is_some() {
            format!("{} First Days ({})", self.name, self.year)
        } else {
            self.label()
        };

        Some(RuleTarget {
            name,
            date: date.clone(),
        })
    }

    pub fn last_day_target(&self) -> Option<RuleTarget> {
        self.last_day.as_ref().map(|date| RuleTarget {
            name: format!("{} Last Day ({})", self.name, self.year),
            date: date.clone(),
        })
    }
}
