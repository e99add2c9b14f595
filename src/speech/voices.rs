use serde::{Deserialize, Serialize};
use std::fmt;

/// Narrator voices offered by the speech service
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Voice {
    #[default]
    AlvaroEs,
    ElviraEs,
    TomasAr,
    ElenaAr,
    DaliaMx,
    AriaUs,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::AlvaroEs,
        Voice::ElviraEs,
        Voice::TomasAr,
        Voice::ElenaAr,
        Voice::DaliaMx,
        Voice::AriaUs,
    ];

    /// Identifier understood by the speech service.
    pub fn service_id(&self) -> &'static str {
        match self {
            Voice::AlvaroEs => "es-ES-AlvaroNeural",
            Voice::ElviraEs => "es-ES-ElviraNeural",
            Voice::TomasAr => "es-AR-TomasNeural",
            Voice::ElenaAr => "es-AR-ElenaNeural",
            Voice::DaliaMx => "es-MX-DaliaNeural",
            Voice::AriaUs => "en-US-AriaNeural",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Voice::AlvaroEs => "Álvaro (España)",
            Voice::ElviraEs => "Elvira (España)",
            Voice::TomasAr => "Tomás (Argentina)",
            Voice::ElenaAr => "Elena (Argentina)",
            Voice::DaliaMx => "Dalia (México)",
            Voice::AriaUs => "Aria (Inglés USA)",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_ids_are_unique() {
        let mut ids: Vec<_> = Voice::ALL.iter().map(|v| v.service_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Voice::ALL.len());
    }

    #[test]
    fn test_serde_names() {
        let voice: Voice = serde_json::from_str("\"tomas-ar\"").unwrap();
        assert_eq!(voice, Voice::TomasAr);
        assert_eq!(serde_json::to_string(&Voice::AriaUs).unwrap(), "\"aria-us\"");
    }
}
