use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResponse {
    pub prediction_result: PredictionResult,
    pub character_details: CharacterDetails,
    #[serde(default)]
    pub similar_characters: Vec<SimilarCharacter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub confidence: Confidence,
}

/// Confidence as sent by the service. It has no defined range or format, so it
/// is only ever displayed, never interpreted. Numbers keep their source digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Number(number) => write!(f, "{number}"),
            Confidence::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDetails {
    pub name: String,
    pub anime_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub about: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub streaming_platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCharacter {
    pub name: String,
    pub anime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let raw = r#"{
            "prediction_result": {"confidence": 0.93},
            "character_details": {
                "name": "Anya Forger", "anime_name": "Spy x Family",
                "image_url": null, "about": "A telepath.",
                "tags": ["pink hair", "green eyes"],
                "streaming_platforms": ["Crunchyroll"]
            },
            "similar_characters": [
                {"name": "Kanna Kamui", "anime": "Miss Kobayashi's Dragon Maid", "image_url": null}
            ]
        }"#;
        let response: RecognitionResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.character_details.name, "Anya Forger");
        assert_eq!(response.character_details.image_url, None);
        assert_eq!(response.similar_characters.len(), 1);
        assert_eq!(response.prediction_result.confidence.to_string(), "0.93");
    }

    #[test]
    fn absent_lists_default_to_empty() {
        let raw = r#"{
            "prediction_result": {"confidence": "97.5%"},
            "character_details": {"name": "Rem", "anime_name": "Re:Zero", "about": ""}
        }"#;
        let response: RecognitionResponse = serde_json::from_str(raw).expect("decode");
        assert!(response.similar_characters.is_empty());
        assert!(response.character_details.tags.is_empty());
        assert!(response.character_details.streaming_platforms.is_empty());
        assert_eq!(response.prediction_result.confidence.to_string(), "97.5%");
    }

    #[test]
    fn numeric_confidence_keeps_source_digits() {
        for digits in ["1e2", "95.50", "0.8731", "100"] {
            let raw = format!(r#"{{"confidence": {digits}}}"#);
            let result: PredictionResult = serde_json::from_str(&raw).expect("decode");
            assert!(matches!(result.confidence, Confidence::Number(_)));
            assert_eq!(result.confidence.to_string(), digits);
        }
    }

    #[test]
    fn rejects_payload_without_character_details() {
        let raw = r#"{"prediction_result": {"confidence": 1}}"#;
        assert!(serde_json::from_str::<RecognitionResponse>(raw).is_err());
    }
}
