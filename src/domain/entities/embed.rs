//! Embed and reply value types for command responses

/// Visual class of an embed. Confirmation/warning/error embeds get a
/// marker-prefixed title; info embeds keep their title bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedKind {
    Info,
    Confirmation,
    Warning,
    Error,
}

impl EmbedKind {
    fn marker(&self) -> Option<&'static str> {
        match self {
            EmbedKind::Info => None,
            EmbedKind::Confirmation => Some("\u{2705}"),
            EmbedKind::Warning => Some("\u{26a0}\u{fe0f}"),
            EmbedKind::Error => Some("\u{274c}"),
        }
    }

    fn default_title(&self) -> &'static str {
        match self {
            EmbedKind::Info => "",
            EmbedKind::Confirmation => "Done!",
            EmbedKind::Warning => "Warning!",
            EmbedKind::Error => "Error!",
        }
    }
}

/// A rich reply payload with default presets per kind.
#[derive(Debug, Clone)]
pub struct Embed {
    pub kind: EmbedKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl Embed {
    pub fn new(kind: EmbedKind) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            thumbnail_url: None,
            fields: Vec::new(),
        }
    }

    pub fn info() -> Self {
        Self::new(EmbedKind::Info)
    }

    pub fn confirmation(description: impl Into<String>) -> Self {
        Self::new(EmbedKind::Confirmation).with_description(description)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(EmbedKind::Error).with_description(description)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Title with the kind marker applied, falling back to the kind default.
    pub fn heading(&self) -> Option<String> {
        match self.kind.marker() {
            Some(marker) => {
                let title = self
                    .title
                    .as_deref()
                    .unwrap_or_else(|| self.kind.default_title());
                Some(format!("{}  {}", marker, title))
            }
            None => self.title.clone(),
        }
    }

    /// Flatten to plain text for adapters without rich embed support.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(heading) = self.heading() {
            out.push_str(&heading);
            out.push('\n');
        }
        if let Some(description) = &self.description {
            out.push_str(description);
            out.push('\n');
        }
        for (name, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", name, value));
        }
        if let Some(url) = &self.thumbnail_url {
            out.push_str(&format!("[thumbnail] {}\n", url));
        }
        out.trim_end().to_string()
    }
}

/// What a command handler produces.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Embed(Embed),
    File(std::path::PathBuf),
}

impl Reply {
    /// Render the reply as plain text.
    pub fn to_text(&self) -> String {
        match self {
            Reply::Text(s) => s.clone(),
            Reply::Embed(e) => e.to_text(),
            Reply::File(path) => format!("Saved: {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_embed_gets_marker_and_default_title() {
        let embed = Embed::error("something broke");
        let heading = embed.heading().unwrap();
        assert!(heading.contains("Error!"));
        assert!(heading.starts_with('\u{274c}'));
    }

    #[test]
    fn info_embed_keeps_bare_title() {
        let embed = Embed::info().with_title("Extensions (5)");
        assert_eq!(embed.heading().as_deref(), Some("Extensions (5)"));
    }

    #[test]
    fn to_text_includes_fields_in_order() {
        let text = Embed::info()
            .with_title("T")
            .with_description("d")
            .with_field("Link", "https://example.com")
            .to_text();
        assert_eq!(text, "T\nd\nLink: https://example.com");
    }
}
