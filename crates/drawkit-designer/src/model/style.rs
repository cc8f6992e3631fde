//! Style parameters carried by every shape.

use std::fmt;

use drawkit_core::Color;
use drawkit_settings::StyleDefaults;

use super::ShapeType;

/// Font used when a shape carries no font name.
pub const DEFAULT_FONT: &str = "Sans 12";

const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub text_color: Color,
    pub text_background: Color,
    /// Stroke width in canvas units.
    pub thickness: f64,
    /// Bevel radius for rectangles and triangles.
    pub corner_round: f64,
    /// Rotation in degrees for rectangles and ovals; opening half-angle at
    /// the apex for triangles.
    pub angle: f64,
    /// Double-headed arrows, right-angled triangles.
    pub orientation: bool,
    pub text: Option<String>,
    pub font_name: Option<String>,
}

impl StyleParams {
    /// Style for a new shape of `shape_type` built from the configured
    /// defaults.
    pub fn from_defaults(defaults: &StyleDefaults, shape_type: ShapeType) -> Self {
        let angle = match shape_type {
            ShapeType::Triangle => defaults.triangle_angle,
            _ => defaults.rotation,
        };
        let font_name = (shape_type == ShapeType::Text).then(|| defaults.font_name.clone());
        Self {
            stroke_color: defaults.stroke_color,
            fill_color: defaults.fill_color,
            text_color: defaults.text_color,
            text_background: defaults.text_background,
            thickness: defaults.thickness,
            corner_round: defaults.corner_round,
            angle,
            orientation: false,
            text: None,
            font_name,
        }
    }

    /// Effective font, falling back to [`DEFAULT_FONT`].
    pub fn font(&self) -> FontSpec {
        FontSpec::parse(self.font_name.as_deref().unwrap_or(DEFAULT_FONT))
    }

    pub fn get(&self, kind: ParamKind) -> StyleParam {
        match kind {
            ParamKind::StrokeColor => StyleParam::StrokeColor(self.stroke_color),
            ParamKind::FillColor => StyleParam::FillColor(self.fill_color),
            ParamKind::TextColor => StyleParam::TextColor(self.text_color),
            ParamKind::TextBackground => StyleParam::TextBackground(self.text_background),
            ParamKind::Thickness => StyleParam::Thickness(self.thickness),
            ParamKind::CornerRound => StyleParam::CornerRound(self.corner_round),
            ParamKind::Angle => StyleParam::Angle(self.angle),
            ParamKind::Orientation => StyleParam::Orientation(self.orientation),
            ParamKind::Text => StyleParam::Text(self.text.clone().unwrap_or_default()),
            ParamKind::FontName => StyleParam::FontName(self.font().to_string()),
        }
    }

    pub fn set(&mut self, param: StyleParam) {
        match param {
            StyleParam::StrokeColor(c) => self.stroke_color = c,
            StyleParam::FillColor(c) => self.fill_color = c,
            StyleParam::TextColor(c) => self.text_color = c,
            StyleParam::TextBackground(c) => self.text_background = c,
            StyleParam::Thickness(v) => self.thickness = v.max(0.0),
            StyleParam::CornerRound(v) => self.corner_round = v.max(0.0),
            StyleParam::Angle(v) => self.angle = v,
            StyleParam::Orientation(v) => self.orientation = v,
            StyleParam::Text(s) => self.text = Some(s),
            StyleParam::FontName(s) => self.font_name = Some(s),
        }
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.thickness *= factor;
        self.corner_round *= factor;
        // An unnamed font is the default one, so it is scaled too.
        let mut font = self.font();
        font.scale(factor);
        self.font_name = Some(font.to_string());
    }
}

impl Default for StyleParams {
    fn default() -> Self {
        Self::from_defaults(&StyleDefaults::default(), ShapeType::Line)
    }
}

/// A single style parameter with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleParam {
    StrokeColor(Color),
    FillColor(Color),
    TextColor(Color),
    TextBackground(Color),
    Thickness(f64),
    CornerRound(f64),
    Angle(f64),
    Orientation(bool),
    Text(String),
    FontName(String),
}

impl StyleParam {
    pub fn kind(&self) -> ParamKind {
        match self {
            StyleParam::StrokeColor(_) => ParamKind::StrokeColor,
            StyleParam::FillColor(_) => ParamKind::FillColor,
            StyleParam::TextColor(_) => ParamKind::TextColor,
            StyleParam::TextBackground(_) => ParamKind::TextBackground,
            StyleParam::Thickness(_) => ParamKind::Thickness,
            StyleParam::CornerRound(_) => ParamKind::CornerRound,
            StyleParam::Angle(_) => ParamKind::Angle,
            StyleParam::Orientation(_) => ParamKind::Orientation,
            StyleParam::Text(_) => ParamKind::Text,
            StyleParam::FontName(_) => ParamKind::FontName,
        }
    }
}

/// Which style parameter an edit touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    StrokeColor,
    FillColor,
    TextColor,
    TextBackground,
    Thickness,
    CornerRound,
    Angle,
    Orientation,
    Text,
    FontName,
}

/// A font name of the form `"Family Size"`, e.g. `"DejaVu Sans Bold 14"`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

impl FontSpec {
    /// Splits off a trailing size. Names without one get the default size.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        let (family, size) = match name.rsplit_once(' ') {
            Some((family, size)) => match size.parse::<f64>() {
                Ok(size) if size.is_finite() && size > 0.0 => (family.trim_end(), size),
                _ => (name, DEFAULT_FONT_SIZE),
            },
            None => match name.parse::<f64>() {
                Ok(size) if size.is_finite() && size > 0.0 => ("", size),
                _ => (name, DEFAULT_FONT_SIZE),
            },
        };
        let family = if family.is_empty() { "Sans" } else { family };
        Self {
            family: family.to_string(),
            size,
        }
    }

    /// Rescales the size, rounded to a whole unit and never below 1.
    pub fn scale(&mut self, factor: f64) {
        self.size = (self.size * factor).round().max(1.0);
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size.fract() == 0.0 {
            write!(f, "{} {:.0}", self.family, self.size)
        } else {
            write!(f, "{} {}", self.family, self.size)
        }
    }
}
