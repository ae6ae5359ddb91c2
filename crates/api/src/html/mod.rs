//! Embedded static HTML served by the web UI.
//!
//! The page is kept as a `&'static str` so it ships inside the binary; only
//! the title, lead line and footer are filled in per deployment.

pub mod index;

use inference_engine::ClassLabels;

use crate::config::PresentationConfig;
use crate::presentation::{display_name, escape_html};

/// Render the single-page UI for the configured labels
pub fn render_index(presentation: &PresentationConfig, labels: &ClassLabels) -> String {
    let names: Vec<String> = labels
        .iter()
        .map(|label| {
            let style = presentation.style_for(label);
            format!(
                r#"<strong style="color: {}">{}</strong>"#,
                escape_html(&style.color),
                escape_html(&display_name(label))
            )
        })
        .collect();

    let lead = format!(
        "Upload a face photo or capture from webcam to detect {}",
        join_alternatives(&names)
    );

    index::INDEX_HTML
        .replace("{{TITLE}}", &escape_html(&presentation.title))
        .replace("{{LEAD}}", &lead)
        .replace("{{FOOTER}}", &escape_html(&presentation.footer))
}

/// "a or b", "a, b or c"
fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> ClassLabels {
        ClassLabels::new(vec!["agung".into(), "farhan".into()]).unwrap()
    }

    #[test]
    fn test_render_fills_placeholders() {
        let mut presentation = PresentationConfig::default();
        presentation.title = "Agung vs Farhan Face Detector".to_string();

        let page = render_index(&presentation, &labels());
        assert!(page.contains("<title>Agung vs Farhan Face Detector</title>"));
        assert!(page.contains("Agung</strong> or <strong"));
        assert!(page.contains("Farhan</strong>"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_capture_waits_for_camera_frames() {
        let page = render_index(&PresentationConfig::default(), &labels());
        assert!(page.contains("captureBtn.disabled = true"));
        assert!(page.contains("addEventListener('loadedmetadata'"));
        assert!(page.contains("Could not capture a photo"));
    }

    #[test]
    fn test_join_alternatives() {
        let items: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_alternatives(&items[..1]), "a");
        assert_eq!(join_alternatives(&items[..2]), "a or b");
        assert_eq!(join_alternatives(&items), "a, b or c");
    }
}
