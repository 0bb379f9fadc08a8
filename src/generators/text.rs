//! Text label generator.
//!
//! A label's pixel size is only known once the tool has rendered it, so
//! padding needs two passes: render the bare label, measure it, then redraw
//! the same text onto a canvas grown by the padding.
//!
//! ```text
//! Initial ──convert──▶ FirstPassRendered ──(no padding)──────────────▶ FinalRendered
//!                             │
//!                          identify
//!                             ▼
//!                          Measured ──convert into same artifact──▶ FinalRendered
//! ```

use std::sync::Arc;

use super::{ArtifactMetadata, Generated};
use crate::error::GenerateError;
use crate::padding::PaddingBox;
use crate::ports::{Artifact, CommandArgs, CommandLine, ImageAttributes};
use crate::style::StyleOptions;

pub(crate) const NAME: &str = "text";

/// Directives at the end of the first-pass list that the second pass replaces:
/// `-background` and `label:`.
const LABEL_DIRECTIVES: usize = 2;

/// Render progress for one label.
#[derive(Debug)]
enum RenderState {
    Initial,
    FirstPassRendered(Artifact),
    Measured { artifact: Artifact, natural: ImageAttributes, padding: PaddingBox },
    FinalRendered(Artifact),
}

/// Produces a rendered text label, optionally padded.
pub struct Text {
    command_line: Arc<dyn CommandLine>,
}

impl Text {
    /// Create the generator.
    #[must_use]
    pub fn new(command_line: Arc<dyn CommandLine>) -> Self {
        Self { command_line }
    }

    /// Render `text` with loosely keyed options, as a host passes them.
    ///
    /// Option keys may use any of the hyphen, underscore or camelCase forms.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown key or bad value before
    /// anything is run, otherwise as [`Text::call`].
    pub async fn call_with_pairs<I, K, V>(
        &self,
        text: &str,
        pairs: I,
    ) -> Result<Generated, GenerateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let options = StyleOptions::from_pairs(pairs)?;
        self.call(text, &options).await
    }

    /// Render `text` as a label.
    ///
    /// When any padding option is present, even one resolving to zero on
    /// every side, the label is measured and redrawn onto a padded canvas.
    ///
    /// # Errors
    ///
    /// Returns a validation error for text the tool cannot take, or an
    /// execution error from either pass.
    #[tracing::instrument(skip(self, options), fields(options = %options))]
    pub async fn call(
        &self,
        text: &str,
        options: &StyleOptions,
    ) -> Result<Generated, GenerateError> {
        let escaped = escape_text(text)?;
        let format = options.format();
        let args = label_args(&escaped, options);
        let padding = options.resolve_padding();

        let mut state = RenderState::Initial;
        let artifact = loop {
            state = match state {
                RenderState::Initial => {
                    let artifact = self.command_line.convert(None, &args, Some(&format)).await?;
                    RenderState::FirstPassRendered(artifact)
                }
                RenderState::FirstPassRendered(artifact) => match padding {
                    None => RenderState::FinalRendered(artifact),
                    Some(padding) => {
                        let natural = self.command_line.identify(&artifact).await?;
                        tracing::debug!(?natural, "measured label");
                        RenderState::Measured { artifact, natural, padding }
                    }
                },
                RenderState::Measured { artifact, natural, padding } => {
                    let args =
                        padded_args(&args, &escaped, options.background(), padding, &natural);
                    let artifact = self.command_line.convert(Some(artifact), &args, None).await?;
                    RenderState::FinalRendered(artifact)
                }
                RenderState::FinalRendered(artifact) => break artifact,
            };
        };

        Ok((artifact, ArtifactMetadata::new(NAME, format)))
    }
}

/// Escape text for ImageMagick's label and annotate operands.
///
/// Backslashes and percent signs are doubled so they are not read as escape
/// sequences, and a leading `@` is escaped so the text is never read as a file
/// name.
///
/// # Errors
///
/// Returns a validation error for text containing a NUL byte, which cannot be
/// passed as a process argument.
pub fn escape_text(text: &str) -> Result<String, GenerateError> {
    if text.contains('\0') {
        return Err(GenerateError::InvalidArgument("Text must not contain NUL bytes".into()));
    }
    let mut escaped = String::with_capacity(text.len() + 2);
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '%' => escaped.push_str("%%"),
            '@' if i == 0 => escaped.push_str("\\@"),
            _ => escaped.push(c),
        }
    }
    Ok(escaped)
}

/// First-pass arguments: style settings, background, then the label itself.
#[must_use]
pub fn label_args(escaped: &str, options: &StyleOptions) -> CommandArgs {
    let mut args = CommandArgs::new();
    args.setting("-gravity", "NorthWest")
        .switch("-antialias")
        .setting("-pointsize", options.font_size().to_string());
    if let Some(font) = &options.font {
        args.setting("-font", font.as_str());
    }
    if let Some(family) = &options.font_family {
        args.setting("-family", family.as_str());
    }
    if let Some(color) = &options.color {
        args.setting("-fill", color.as_str());
    }
    if let Some(stroke) = &options.stroke_color {
        args.setting("-stroke", stroke.as_str());
    }
    if let Some(style) = options.font_style {
        args.setting("-style", style.as_str());
    }
    if let Some(stretch) = options.font_stretch {
        args.setting("-stretch", stretch.as_str());
    }
    if let Some(weight) = options.font_weight {
        args.setting("-weight", weight.as_arg());
    }
    args.setting("-background", options.background()).operand(format!("label:{escaped}"));
    args
}

/// Second-pass arguments: the first-pass style settings followed by a padded
/// canvas with the text annotated at the top-left padding offset.
#[must_use]
pub fn padded_args(
    first_pass: &CommandArgs,
    escaped: &str,
    background: &str,
    padding: PaddingBox,
    natural: &ImageAttributes,
) -> CommandArgs {
    let (width, height) = padding.outer_size(natural.width, natural.height);
    let mut args = first_pass.clone();
    args.drop_last(LABEL_DIRECTIVES)
        .setting("-size", format!("{width}x{height}"))
        .operand(format!("xc:{background}"))
        .setting("-annotate", format!("0x0+{}+{}", padding.left, padding.top))
        .operand(escaped);
    args
}
