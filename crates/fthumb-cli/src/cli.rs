//! CLI argument definitions using Clap v4
//!
//! `-h` belongs to `--height`, so clap's automatic help flag is disabled and
//! re-added as a long-only `--help`.
//!
//! `--size`, `--width` and `--height` are applied in command-line order, so
//! a later flag overrides an earlier one. Parse with [`Args::parse_ordered`]
//! or [`Args::try_parse_ordered`] to keep that order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{
    builder::NonEmptyStringValueParser, ArgAction, ArgMatches, CommandFactory, FromArgMatches,
    Parser,
};
use fthumb_core::{defaults, Color, RenderRequest};

/// Create a thumbnail image from the given font file
#[derive(Parser, Debug)]
#[command(name = "font-thumbnail")]
#[command(version, about, disable_help_flag = true)]
#[command(
    after_help = "If only width or height is specified, the given value is used for both dimensions."
)]
pub struct Args {
    /// Font file (.ttf, .otf, .ttc, .otc)
    #[arg(value_name = "FILE")]
    pub font_file: PathBuf,

    /// Single value in pixels used for image width and height [default: 256]
    #[arg(short = 's', long, value_name = "NUMBER", action = ArgAction::Append,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub size: Vec<u32>,

    /// Image width in pixels
    #[arg(short = 'w', long, value_name = "NUMBER", action = ArgAction::Append,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Vec<u32>,

    /// Image height in pixels
    #[arg(short = 'h', long, value_name = "NUMBER", action = ArgAction::Append,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Vec<u32>,

    /// Text to display
    #[arg(short = 't', long, value_name = "STRING", default_value = defaults::TEXT,
          value_parser = NonEmptyStringValueParser::new())]
    pub text: String,

    /// Output filename [default: font filename + ".png"]
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// URI of the font file, stored as the Thumb::URI attribute
    #[arg(short = 'u', long, value_name = "URI")]
    pub uri: Option<String>,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long = "face-index", default_value_t = 0)]
    pub face_index: u32,

    /// Text color (RRGGBB or RRGGBBAA)
    #[arg(short = 'c', long, value_name = "COLOR", default_value = "000000FF",
          value_parser = parse_color)]
    pub foreground: Color,

    /// Don't print a summary after writing the thumbnail
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Log every pipeline stage
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Dimension flags in the order they were given
    #[arg(skip)]
    dimensions: Vec<Dimension>,
}

/// One `--size`, `--width` or `--height` occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Size(u32),
    Width(u32),
    Height(u32),
}

impl Args {
    /// Parse the process arguments, exiting with a usage message on error
    pub fn parse_ordered() -> Self {
        Self::try_parse_ordered(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Parse `args`, recording where each dimension flag appeared
    pub fn try_parse_ordered<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command();
        let matches = command.try_get_matches_from_mut(args)?;
        let mut parsed = Self::from_arg_matches(&matches).map_err(|err| err.format(&mut command))?;
        parsed.dimensions = ordered_dimensions(&matches);
        Ok(parsed)
    }

    /// Apply defaults and produce the request the pipeline runs on
    pub fn resolve(&self) -> RenderRequest {
        let (width, height) = resolve_dimensions(&self.dimension_flags());
        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.font_file));

        RenderRequest {
            font_path: self.font_file.clone(),
            output_path,
            width,
            height,
            text: self.text.clone(),
            source_uri: self.uri.clone(),
            face_index: self.face_index,
            foreground: self.foreground,
        }
    }

    /// Dimension flags in command-line order
    ///
    /// Without recorded positions (plain [`Parser::parse`]) every `--size`
    /// comes first, then `--width`, then `--height`.
    fn dimension_flags(&self) -> Vec<Dimension> {
        if !self.dimensions.is_empty() {
            return self.dimensions.clone();
        }
        let sizes = self.size.iter().map(|&v| Dimension::Size(v));
        let widths = self.width.iter().map(|&v| Dimension::Width(v));
        let heights = self.height.iter().map(|&v| Dimension::Height(v));
        sizes.chain(widths).chain(heights).collect()
    }
}

fn ordered_dimensions(matches: &ArgMatches) -> Vec<Dimension> {
    let kinds: [(&str, fn(u32) -> Dimension); 3] = [
        ("size", Dimension::Size),
        ("width", Dimension::Width),
        ("height", Dimension::Height),
    ];

    let mut flags = Vec::new();
    for (id, kind) in kinds {
        let (Some(values), Some(indices)) = (matches.get_many::<u32>(id), matches.indices_of(id))
        else {
            continue;
        };
        flags.extend(indices.zip(values.copied().map(kind)));
    }
    flags.sort_by_key(|&(index, _)| index);
    flags.into_iter().map(|(_, flag)| flag).collect()
}

/// The last flag touching a dimension wins; a lone dimension is copied to the other
fn resolve_dimensions(flags: &[Dimension]) -> (u32, u32) {
    let (mut width, mut height) = (None, None);
    for flag in flags {
        match *flag {
            Dimension::Size(v) => {
                width = Some(v);
                height = Some(v);
            },
            Dimension::Width(v) => width = Some(v),
            Dimension::Height(v) => height = Some(v),
        }
    }

    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, w),
        (None, Some(h)) => (h, h),
        (None, None) => (defaults::SIZE, defaults::SIZE),
    }
}

/// The font path with `.png` appended, keeping the original extension
fn default_output(font_file: &Path) -> PathBuf {
    let mut path = font_file.as_os_str().to_owned();
    path.push(".png");
    PathBuf::from(path)
}

fn parse_color(color_str: &str) -> Result<Color, String> {
    let hex = color_str.trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err("Color must be in RRGGBB or RRGGBBAA format".into());
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid color: {color_str}"))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}
