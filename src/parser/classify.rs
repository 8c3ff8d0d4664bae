use crate::record::Topic;

/// Checked top to bottom; the first rule with a matching keyword wins.
const TOPIC_RULES: &[(Topic, &[&str])] = &[
    (Topic::Wind, &["wind"]),
    (Topic::Solar, &["solar"]),
    (Topic::Turbine, &["turbine"]),
    (
        Topic::Electricity,
        &["electricity", "circuit", "watt", "volt", "amp", "ohm"],
    ),
    (
        Topic::Renewable,
        &["renewable", "non-renewable", "nonrenewable"],
    ),
    (
        Topic::FossilFuels,
        &["fossil fuel", "coal", "oil", "natural gas"],
    ),
    (Topic::Climate, &["climate", "greenhouse", "pollutant", "co2"]),
    (Topic::Energy, &["energy"]),
];

/// Question formats that cannot be represented as four text options.
pub const SKIP_PHRASES: &[&str] = &[
    "diagram",
    "graph",
    "chart",
    "map",
    "picture",
    "draw an arrow",
    "in one sentence",
    "in two sentences",
    "what do the acronyms",
    "what is betz",
];

pub fn detect_topic(stem: &str) -> Topic {
    let lower = stem.to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

/// The first skip phrase found in the stem, if any.
pub fn skip_phrase(stem: &str) -> Option<&'static str> {
    let lower = stem.to_lowercase();
    SKIP_PHRASES.iter().copied().find(|p| lower.contains(p))
}
