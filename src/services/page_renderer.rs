use photo_restore::Mode;
use serde::Serialize;
use tera::{Context, Tera};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const INDEX_NAME: &str = "index.html";

/// One `<option>` of the mode selector.
#[derive(Debug, Serialize)]
struct ModeOption {
    tag: &'static str,
    label: &'static str,
    selected: bool,
}

/// What the page shows after a run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PageView {
    pub original_image: Option<String>,
    pub processed_image: Option<String>,
    /// The tag as submitted, even when it is not a known mode
    pub mode: Option<String>,
}

/// Renders the upload/result page with Tera.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_NAME, INDEX_TEMPLATE)?;
        tracing::info!(templates = tera.get_template_names().count(), "Page renderer initialized");
        Ok(Self { tera })
    }

    /// Render the page; `PageView::default()` gives the empty form.
    pub fn render(&self, view: &PageView) -> Result<String, tera::Error> {
        let selected = view.mode.as_deref().and_then(Mode::from_tag);
        let modes: Vec<ModeOption> = Mode::ALL
            .into_iter()
            .map(|m| ModeOption {
                tag: m.as_str(),
                label: m.label(),
                selected: Some(m) == selected,
            })
            .collect();

        let mut context = Context::new();
        context.insert("original_image", &view.original_image);
        context.insert("processed_image", &view.processed_image);
        context.insert("mode", &view.mode);
        context.insert("mode_label", &selected.map(Mode::label));
        context.insert("modes", &modes);
        self.tera.render(INDEX_NAME, &context)
    }
}
