use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::is_error_markdown;
use crate::media::MediaKind;
use crate::pipeline::Analysis;

const STYLE: &str = r#"
body { font-family: 'Roboto', sans-serif; background: linear-gradient(135deg, #f3f4f6, #e2e8f0); margin: 0; }
main { max-width: 1100px; margin: 0 auto; padding: 16px; }
header { text-align: center; }
header p { color: #666666; margin: 5px 0; }
.row { display: flex; gap: 20px; flex-wrap: wrap; }
.column { flex: 1; min-width: 320px; }
.card { background: #ffffff; border-radius: 6px; padding: 14px; box-shadow: 0 4px 10px rgba(0, 0, 0, 0.1); margin-bottom: 20px; }
.tabs input[type=radio] { display: none; }
.tabs label.tab { display: inline-block; padding: 8px 16px; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs input[type=radio]:checked + label.tab { border-bottom-color: #4f46e5; font-weight: bold; }
.pane { display: none; padding: 12px 0; }
#tab-image:checked ~ .pane-image, #tab-video:checked ~ .pane-video { display: block; }
textarea { width: 100%; box-sizing: border-box; }
button { border-radius: 8px; padding: 10px 20px; font-size: 16px; background: #4f46e5; color: #ffffff; border: none; cursor: pointer; }
button:hover { background-color: #4a90e2; }
pre.markdown { white-space: pre-wrap; font-family: inherit; margin: 5px 0; }
.error { color: #b91c1c; }
"#;

/// What the page shows
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Preferences to pre-fill
    pub preferences: &'a str,
    /// Results of the last analysis, if any
    pub analysis: Option<&'a Analysis>,
}

fn markdown_pane(title: &str, text: &str) -> String {
    let class = if is_error_markdown(text) {
        "markdown error"
    } else {
        "markdown"
    };
    format!(
        r#"<section class="card"><h2>{}</h2><pre class="{}">{}</pre></section>"#,
        encode_text(title),
        class,
        encode_text(text)
    )
}

fn regenerate_form(analysis: &Analysis, preferences: &str) -> String {
    if analysis.ingredients.trim().is_empty() || is_error_markdown(&analysis.ingredients) {
        return String::new();
    }
    format!(
        r#"<form class="card" method="post" action="/analyze" enctype="multipart/form-data">
<input type="hidden" name="ingredients" value="{}">
<label for="regen-preferences">Change preferences</label>
<textarea id="regen-preferences" name="preferences" rows="2">{}</textarea>
<button type="submit">Regenerate Recipe</button>
</form>"#,
        encode_double_quoted_attribute(&analysis.ingredients),
        encode_text(preferences)
    )
}

/// One form per tab, so a submission only ever carries that tab's file
fn upload_form(kind: MediaKind, preferences: &str) -> String {
    let (label, upload, accept) = match kind {
        MediaKind::Image => ("Image", "Upload an Image", "image/jpeg,image/png,image/gif,image/webp"),
        MediaKind::Video => (
            "Video",
            "Upload a Video",
            "video/mp4,video/quicktime,video/webm,video/x-matroska",
        ),
    };
    format!(
        r#"<form class="pane pane-{kind}" method="post" action="/analyze" enctype="multipart/form-data">
<label for="{kind}">{upload}</label><br>
<input type="file" id="{kind}" name="{kind}" accept="{accept}">
<label for="preferences-{kind}">Additional Ingredients or Preferences</label>
<textarea id="preferences-{kind}" name="preferences" rows="2" placeholder="Enter any additional ingredients or preferences (optional)">{preferences}</textarea>
<p><button type="submit">Analyze Uploaded {label}</button></p>
</form>"#,
        kind = kind.as_str(),
        label = label,
        upload = upload,
        accept = accept,
        preferences = encode_text(preferences),
    )
}

pub fn render_page(view: &PageView<'_>) -> String {
    let (ingredients, recipe, regenerate) = match view.analysis {
        Some(analysis) => (
            markdown_pane("Detected Ingredients", &analysis.ingredients),
            markdown_pane("Generated Recipe", &analysis.recipe),
            regenerate_form(analysis, view.preferences),
        ),
        None => (
            markdown_pane("Detected Ingredients", ""),
            markdown_pane("Generated Recipe", ""),
            String::new(),
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>FlavorAI</title>
<style>{style}</style>
</head>
<body>
<main>
<header>
<h1>&#127859; FlavorAI</h1>
<p>Snap it, upload it, and let AI do the cooking math!</p>
</header>
<div class="row">
<div class="column">
<div class="card tabs">
<input type="radio" name="tab" id="tab-image" checked><label class="tab" for="tab-image">&#128444;&#65039; Image</label>
<input type="radio" name="tab" id="tab-video"><label class="tab" for="tab-video">&#127909; Video</label>
{image_form}
{video_form}
</div>
{regenerate}
</div>
<div class="column">
{ingredients}
{recipe}
</div>
</div>
</main>
</body>
</html>
"#,
        style = STYLE,
        image_form = upload_form(MediaKind::Image, view.preferences),
        video_form = upload_form(MediaKind::Video, view.preferences),
        regenerate = regenerate,
        ingredients = ingredients,
        recipe = recipe,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_has_inputs() {
        let html = render_page(&PageView::default());
        assert!(html.contains(r#"name="image""#));
        assert!(html.contains(r#"name="video""#));
        assert!(html.contains(r#"name="preferences""#));
        assert!(html.contains("Detected Ingredients"));
        assert!(html.contains("Generated Recipe"));
        assert!(!html.contains("Regenerate Recipe"));
    }

    #[test]
    fn test_each_tab_posts_only_its_own_file() {
        let html = render_page(&PageView::default());
        let forms: Vec<&str> = html
            .split("<form")
            .skip(1)
            .map(|rest| rest.split("</form>").next().unwrap())
            .collect();

        assert_eq!(forms.len(), 2);
        for form in &forms {
            assert_eq!(form.matches(r#"type="file""#).count(), 1);
            assert!(form.contains(r#"name="preferences""#));
            assert!(!form.contains(r#"name="tab""#));
        }
        assert!(forms[0].contains(r#"name="image""#));
        assert!(forms[0].contains("Analyze Uploaded Image"));
        assert!(forms[1].contains(r#"name="video""#));
        assert!(forms[1].contains("Analyze Uploaded Video"));
    }

    #[test]
    fn test_results_are_escaped() {
        let analysis = Analysis {
            ingredients: "### Ingredients (detected from image)\n- <script>alert(1)</script>".to_string(),
            recipe: "**Salad** & dressing".to_string(),
        };
        let html = render_page(&PageView {
            preferences: "\"quoted\" <b>",
            analysis: Some(&analysis),
        });

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("**Salad** &amp; dressing"));
        assert!(html.contains("Regenerate Recipe"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_error_pane_has_no_regenerate_form() {
        let analysis = Analysis {
            ingredients: "### Error\nNo media provided".to_string(),
            recipe: String::new(),
        };
        let html = render_page(&PageView {
            preferences: "",
            analysis: Some(&analysis),
        });

        assert!(html.contains(r#"class="markdown error""#));
        assert!(!html.contains("Regenerate Recipe"));
    }
}
