use crate::model::FieldColor;
use std::str::FromStr;

/// Value of a series used to pick its color in by-value schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesBy {
    Min,
    Max,
    #[default]
    Last,
}

impl SeriesBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SeriesBy::Min => "min",
            SeriesBy::Max => "max",
            SeriesBy::Last => "last",
        }
    }
}

impl FromStr for SeriesBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(SeriesBy::Min),
            "max" => Ok(SeriesBy::Max),
            "last" => Ok(SeriesBy::Last),
            other => Err(format!("unknown series reduction '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    GreenYellowRed,
    YellowRed,
    YellowBlue,
    RedYellowGreen,
    BlueYellowRed,
    BluePurple,
}

impl Palette {
    fn mode(self) -> &'static str {
        match self {
            Palette::GreenYellowRed => "continuous-GrYlRd",
            Palette::YellowRed => "continuous-YlRd",
            Palette::YellowBlue => "continuous-YlBl",
            Palette::RedYellowGreen => "continuous-RdYlGr",
            Palette::BlueYellowRed => "continuous-BlYlRd",
            Palette::BluePurple => "continuous-BlPu",
        }
    }
}

/// How series are colored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorScheme {
    /// Every series uses the same color.
    Fixed(String),
    PaletteClassic,
    /// Classic palette, colors derived from the series name.
    ClassicByName,
    /// Color of the threshold step matching the series value.
    Thresholds(SeriesBy),
    Continuous(Palette, SeriesBy),
    /// Shades of a single color.
    Shades(String, SeriesBy),
}

impl ColorScheme {
    pub(crate) fn to_field_color(&self) -> FieldColor {
        let (mode, fixed_color, series_by) = match self {
            ColorScheme::Fixed(color) => ("fixed", Some(color.clone()), None),
            ColorScheme::PaletteClassic => ("palette-classic", None, None),
            ColorScheme::ClassicByName => ("palette-classic-by-name", None, None),
            ColorScheme::Thresholds(by) => ("thresholds", None, Some(*by)),
            ColorScheme::Continuous(palette, by) => (palette.mode(), None, Some(*by)),
            ColorScheme::Shades(color, by) => ("shades", Some(color.clone()), Some(*by)),
        };

        FieldColor {
            mode: mode.to_string(),
            fixed_color,
            series_by: series_by.map(|by| by.as_str().to_string()),
        }
    }
}
