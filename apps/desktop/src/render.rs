use client_core::{
    view::{CardImage, SimilarSection, StreamingSection},
    Phase, ResultView, SubmissionSnapshot,
};

const PREVIEW_CHARS: usize = 48;

pub fn render_snapshot(snapshot: &SubmissionSnapshot, view: Option<&ResultView>) -> String {
    let mut out = String::new();
    match snapshot.phase {
        Phase::Idle => {
            out.push_str("Upload an image to identify a character and find similar ones.\n");
            out.push_str("Type `select <path>` to choose an image.\n");
        }
        Phase::Selected => {
            let file_name = snapshot.file_name.as_deref().unwrap_or_default();
            out.push_str(&format!("Selected: {file_name}\n"));
            if let Some(url) = snapshot.preview_url.as_deref() {
                out.push_str(&format!("Preview: {}\n", abbreviate(url)));
            }
            out.push_str("Type `submit` to recognize the character.\n");
        }
        Phase::Loading => out.push_str("Analyzing Image...\n"),
        Phase::Failure => {
            let message = snapshot.error_message.as_deref().unwrap_or_default();
            out.push_str(&format!("Error: {message}\n"));
            out.push_str("Type `reset` to try again.\n");
        }
        Phase::Success => {
            if let Some(view) = view {
                out.push_str(&render_view(view));
            }
            out.push_str("Type `reset` to recognize another character.\n");
        }
    }
    out
}

pub fn render_view(view: &ResultView) -> String {
    let character = &view.character;
    let tags = character
        .tags
        .iter()
        .map(|tag| format!("[{tag}]"))
        .collect::<Vec<_>>()
        .join(" ");
    let streaming = match &character.streaming {
        StreamingSection::Platforms(platforms) => platforms.join(", "),
        StreamingSection::Unavailable(notice) => notice.to_string(),
    };

    let mut lines = vec![
        character.name.clone(),
        character.subtitle(),
        view.confidence_label(),
        format!("Image: {}", character.image_url),
        format!("About: {}", character.about),
        format!("Appearance Tags: {tags}"),
        format!("Where to Watch: {streaming}"),
    ];

    match &view.similar {
        SimilarSection::Characters(cards) => {
            lines.push("Similar Characters:".to_string());
            lines.extend(cards.iter().map(|card| {
                let image = match &card.image {
                    CardImage::Url(url) => url.as_str(),
                    CardImage::Missing(label) => *label,
                };
                format!("  - {} ({}) {}", card.name, card.anime, image)
            }));
        }
        SimilarSection::NoneFound(notice) => lines.push(notice.to_string()),
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn abbreviate(url: &str) -> String {
    if url.chars().count() <= PREVIEW_CHARS {
        return url.to_string();
    }
    let head: String = url.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}
