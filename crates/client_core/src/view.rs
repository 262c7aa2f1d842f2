use shared::protocol::SimilarCharacter;

use crate::RecognitionResult;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x450";
pub const NO_STREAMING_NOTICE: &str = "Not available on major platforms.";
pub const NO_SIMILAR_NOTICE: &str = "No similar characters found.";
pub const NO_IMAGE_LABEL: &str = "No Image";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// Confidence exactly as the service sent it.
    pub confidence: String,
    pub character: CharacterView,
    pub similar: SimilarSection,
}

impl ResultView {
    pub fn confidence_label(&self) -> String {
        format!("Confidence: {}", self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterView {
    pub name: String,
    pub anime_name: String,
    pub image_url: String,
    pub about: String,
    pub tags: Vec<String>,
    pub streaming: StreamingSection,
}

impl CharacterView {
    pub fn subtitle(&self) -> String {
        format!("from {}", self.anime_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamingSection {
    Platforms(Vec<String>),
    Unavailable(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimilarSection {
    Characters(Vec<SimilarCard>),
    NoneFound(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarCard {
    pub name: String,
    pub anime: String,
    pub image: CardImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardImage {
    Url(String),
    Missing(&'static str),
}

pub fn compose(result: &RecognitionResult) -> ResultView {
    let details = &result.character_details;

    let streaming = if details.streaming_platforms.is_empty() {
        StreamingSection::Unavailable(NO_STREAMING_NOTICE)
    } else {
        StreamingSection::Platforms(details.streaming_platforms.clone())
    };

    let similar = if result.similar_characters.is_empty() {
        SimilarSection::NoneFound(NO_SIMILAR_NOTICE)
    } else {
        SimilarSection::Characters(result.similar_characters.iter().map(card).collect())
    };

    ResultView {
        confidence: result.prediction_result.confidence.to_string(),
        character: CharacterView {
            name: details.name.clone(),
            anime_name: details.anime_name.clone(),
            image_url: present(details.image_url.as_deref())
                .unwrap_or(PLACEHOLDER_IMAGE_URL)
                .to_string(),
            about: details.about.clone(),
            tags: details.tags.clone(),
            streaming,
        },
        similar,
    }
}

fn card(character: &SimilarCharacter) -> SimilarCard {
    SimilarCard {
        name: character.name.clone(),
        anime: character.anime.clone(),
        image: match present(character.image_url.as_deref()) {
            Some(url) => CardImage::Url(url.to_string()),
            None => CardImage::Missing(NO_IMAGE_LABEL),
        },
    }
}

// Empty URLs count as missing.
fn present(url: Option<&str>) -> Option<&str> {
    url.filter(|url| !url.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{CharacterDetails, Confidence, PredictionResult};

    fn result() -> RecognitionResult {
        RecognitionResult {
            prediction_result: PredictionResult {
                confidence: Confidence::Text("High".into()),
            },
            character_details: CharacterDetails {
                name: "Anya Forger".into(),
                anime_name: "Spy x Family".into(),
                image_url: Some("https://cdn.example/anya.jpg".into()),
                about: "A telepath.".into(),
                tags: vec!["pink hair".into(), "school uniform".into(), "pink hair".into()],
                streaming_platforms: vec!["Crunchyroll".into(), "Netflix".into()],
            },
            similar_characters: vec![
                SimilarCharacter {
                    name: "Kanna Kamui".into(),
                    anime: "Miss Kobayashi's Dragon Maid".into(),
                    image_url: Some("https://cdn.example/kanna.jpg".into()),
                },
                SimilarCharacter {
                    name: "Chiyo".into(),
                    anime: "Azumanga Daioh".into(),
                    image_url: None,
                },
            ],
        }
    }

    #[test]
    fn keeps_present_values() {
        let view = compose(&result());
        assert_eq!(view.confidence_label(), "Confidence: High");
        assert_eq!(view.character.subtitle(), "from Spy x Family");
        assert_eq!(view.character.image_url, "https://cdn.example/anya.jpg");
        assert_eq!(
            view.character.streaming,
            StreamingSection::Platforms(vec!["Crunchyroll".into(), "Netflix".into()])
        );
    }

    #[test]
    fn tags_keep_order_and_duplicates() {
        let view = compose(&result());
        assert_eq!(
            view.character.tags,
            vec!["pink hair", "school uniform", "pink hair"]
        );
    }

    #[test]
    fn missing_character_image_uses_placeholder() {
        let mut raw = result();
        raw.character_details.image_url = None;
        assert_eq!(compose(&raw).character.image_url, PLACEHOLDER_IMAGE_URL);

        raw.character_details.image_url = Some(String::new());
        assert_eq!(compose(&raw).character.image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn empty_streaming_list_uses_notice() {
        let mut raw = result();
        raw.character_details.streaming_platforms.clear();
        assert_eq!(
            compose(&raw).character.streaming,
            StreamingSection::Unavailable(NO_STREAMING_NOTICE)
        );
    }

    #[test]
    fn empty_similar_list_uses_notice() {
        let mut raw = result();
        raw.similar_characters.clear();
        assert_eq!(
            compose(&raw).similar,
            SimilarSection::NoneFound(NO_SIMILAR_NOTICE)
        );
    }

    #[test]
    fn similar_card_without_image_is_labelled() {
        let SimilarSection::Characters(cards) = compose(&result()).similar else {
            panic!("expected similar characters");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(
            cards[0].image,
            CardImage::Url("https://cdn.example/kanna.jpg".into())
        );
        assert_eq!(cards[1].image, CardImage::Missing(NO_IMAGE_LABEL));
    }

    #[test]
    fn numeric_confidence_is_rendered_verbatim() {
        let raw: RecognitionResult = serde_json::from_str(
            r#"{
                "prediction_result": {"confidence": 0.8731},
                "character_details": {"name": "Rem", "anime_name": "Re:Zero", "about": "Maid."}
            }"#,
        )
        .expect("decode");
        assert_eq!(compose(&raw).confidence, "0.8731");
    }

    #[test]
    fn exponent_and_trailing_zero_confidence_are_not_normalised() {
        for (digits, label) in [("1e2", "Confidence: 1e2"), ("95.50", "Confidence: 95.50")] {
            let raw: RecognitionResult = serde_json::from_str(&format!(
                r#"{{
                    "prediction_result": {{"confidence": {digits}}},
                    "character_details": {{"name": "Rem", "anime_name": "Re:Zero", "about": "Maid."}}
                }}"#
            ))
            .expect("decode");
            let view = compose(&raw);
            assert_eq!(view.confidence, digits);
            assert_eq!(view.confidence_label(), label);
        }
    }
}
