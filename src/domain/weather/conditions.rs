use std::fmt;

/// Condition group reported in `weather[0].main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    Other(String),
}

const CONDITION_NAMES: &[(&str, Condition)] = &[
    ("Clear", Condition::Clear),
    ("Clouds", Condition::Clouds),
    ("Rain", Condition::Rain),
    ("Drizzle", Condition::Drizzle),
    ("Thunderstorm", Condition::Thunderstorm),
    ("Snow", Condition::Snow),
    ("Mist", Condition::Mist),
    ("Smoke", Condition::Smoke),
    ("Haze", Condition::Haze),
    ("Dust", Condition::Dust),
    ("Fog", Condition::Fog),
    ("Sand", Condition::Sand),
    ("Ash", Condition::Ash),
    ("Squall", Condition::Squall),
    ("Tornado", Condition::Tornado),
];

impl Condition {
    /// Maps the service's label; anything unrecognized is kept verbatim.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        CONDITION_NAMES
            .iter()
            .find_map(|(name, condition)| (*name == value).then(|| condition.clone()))
            .unwrap_or_else(|| Self::Other(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Other(value) => value,
            known => CONDITION_NAMES
                .iter()
                .find_map(|(name, condition)| (condition == known).then_some(*name))
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Self::from_api(value)
    }
}
