//! Error types for loading scenes

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scene TOML: {message}")]
    Parse { message: String, span: Option<Span> },

    #[error("Unknown {kind} {id}")]
    UnknownReference {
        kind: &'static str,
        id: u32,
        span: Option<Span>,
    },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId {
        kind: &'static str,
        id: u32,
        span: Span,
    },

    #[error("Pitch {pitch} is outside 0..=127")]
    PitchOutOfRange { pitch: i32, span: Span },
}

impl From<toml::de::Error> for SceneError {
    fn from(err: toml::de::Error) -> Self {
        SceneError::Parse {
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

impl SceneError {
    pub fn span(&self) -> Option<Span> {
        match self {
            SceneError::Io(_) => None,
            SceneError::Parse { span, .. } | SceneError::UnknownReference { span, .. } => {
                span.clone()
            }
            SceneError::DuplicateId { span, .. } | SceneError::PitchOutOfRange { span, .. } => {
                Some(span.clone())
            }
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("{}: {}", filename, self);
        };

        let message = self.to_string();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, message),
        }
    }
}
