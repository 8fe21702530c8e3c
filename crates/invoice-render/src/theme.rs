//! Theme descriptors
//!
//! A `ThemeDescriptor` is pure data. It carries every color, coordinate,
//! font size, rate, and boilerplate string one visual style needs, so the
//! layout engine never branches on which theme it is rendering. Descriptors
//! round-trip through JSON, which is how external styles are shipped.
//!
//! All y coordinates are points from the top of the page unless a field name
//! says otherwise; x coordinates are points from the left. Fields named
//! `*_gap` or `*_offset` are relative to a flowing cursor or a region top.

use serde::{Deserialize, Serialize};

/// RGB color, serialized as a `#RRGGBB` hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Parse `#RGB` or `#RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        match digits.len() {
            3 => {
                let mut nibbles = digits.chars().map(|c| c.to_digit(16));
                let r = nibbles.next()?? as u8;
                let g = nibbles.next()?? as u8;
                let b = nibbles.next()?? as u8;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub(crate) fn to_color(self) -> pdf_canvas::Color {
        pdf_canvas::Color::from_rgb(self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s}")))
    }
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

impl HAlign {
    pub(crate) fn to_align(self) -> pdf_canvas::Align {
        match self {
            HAlign::Left => pdf_canvas::Align::Left,
            HAlign::Center => pdf_canvas::Align::Center,
            HAlign::Right => pdf_canvas::Align::Right,
        }
    }
}

/// A fully positioned single line of text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchoredText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub align: HAlign,
    pub size: f32,
    pub color: Rgb,
}

/// A filled and/or stroked rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub fill: Option<Rgb>,
    #[serde(default)]
    pub stroke: Option<Rgb>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    1.0
}

/// Vertical placement of a flowed block
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTop {
    /// Absolute y from the top of the page
    Fixed(f64),
    /// Offset below the previous block's end (may be negative)
    Below(f64),
}

/// Header band, title, and logo slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSpec {
    /// Full-width fill behind the title
    #[serde(default)]
    pub band: Option<Band>,
    pub title: AnchoredText,
    pub logo: LogoSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub height: f64,
    pub fill: Rgb,
}

/// Logo slot with its fallback text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoSpec {
    /// Path to the image asset; absence is not an error
    pub path: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Drawn instead of the image when the asset is missing or undecodable
    #[serde(default)]
    pub placeholder: Option<AnchoredText>,
}

/// Which record field an info row shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoValue {
    InvoiceNo,
    InvoiceDate,
    DueDate,
    /// Fixed Arabic text, e.g. a payment-method note
    Static(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoRow {
    pub label: String,
    pub value: InfoValue,
}

/// Label/value placement inside the info region
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoLayout {
    /// Label and value right-aligned at separate x anchors
    Columns { label_x: f64, value_x: f64 },
    /// One right-aligned string per row: "label value"
    Inline { x: f64 },
}

/// Invoice-info region: number, dates, optional static rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSpec {
    #[serde(default)]
    pub frame: Option<Frame>,
    pub rows: Vec<InfoRow>,
    pub layout: InfoLayout,
    /// Absolute y of the first row's baseline
    pub first_baseline: f64,
    pub row_step: f64,
    pub size: f32,
    pub label_color: Rgb,
    pub value_color: Rgb,
}

/// Optional decorated panel around both party blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSpec {
    pub y: f64,
    pub height: f64,
    pub stroke: Rgb,
    pub stroke_width: f64,
    /// Colored header bars across both columns
    pub bar_height: f64,
    pub bar_fill: Rgb,
    pub heading_size: f32,
    pub heading_color: Rgb,
    /// Baseline offset of the headings below the panel top
    pub heading_baseline: f64,
    pub sender_heading: String,
    pub client_heading: String,
}

/// One block of party lines (sender boilerplate or client info)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyBlock {
    pub top: BlockTop,
    /// Heading line drawn at the block top, one step above the lines
    #[serde(default)]
    pub heading: Option<BlockHeading>,
    pub x: f64,
    pub align: HAlign,
    pub step: f64,
    pub size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHeading {
    pub text: String,
    pub x: f64,
    pub align: HAlign,
}

/// Sender/client region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartiesSpec {
    #[serde(default)]
    pub panel: Option<PanelSpec>,
    pub sender_lines: Vec<String>,
    pub sender: PartyBlock,
    pub client: PartyBlock,
}

/// Which value a table column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnField {
    Description,
    Unit,
    Quantity,
    LineTotal,
    /// 1-based localized row number
    RowIndex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: ColumnField,
    pub label: String,
    pub x: f64,
    pub align: HAlign,
    /// Prefix prepended to the cell value, e.g. a currency label
    #[serde(default)]
    pub value_prefix: Option<String>,
}

/// Item table region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub top: BlockTop,
    pub x: f64,
    pub width: f64,
    pub header_height: f64,
    #[serde(default)]
    pub header_fill: Option<Rgb>,
    /// Header label baseline below the header top
    pub header_baseline: f64,
    pub header_size: f32,
    pub header_color: Rgb,
    pub columns: Vec<ColumnSpec>,
    pub row_step: f64,
    /// Row baseline below the header bottom, advancing by `row_step`
    pub first_row_baseline: f64,
    /// Two fills alternating by row parity
    #[serde(default)]
    pub banding: Option<[Rgb; 2]>,
    pub row_size: f32,
    pub row_color: Rgb,
}

/// Grand-total row, optionally with its own band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrandRow {
    pub label: String,
    /// Distinct fill behind the row (y relative to the totals region top)
    #[serde(default)]
    pub band: Option<Frame>,
    /// Baseline below the totals region top
    pub baseline: f64,
    pub label_x: f64,
    pub value_x: f64,
    pub size: f32,
    pub label_color: Rgb,
    pub value_color: Rgb,
    #[serde(default)]
    pub value_prefix: Option<String>,
}

/// Totals region: subtotal, discount, VAT, grand total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsSpec {
    /// Gap below the table's last row
    pub top_gap: f64,
    /// Surrounding box (y relative to the region top)
    #[serde(default)]
    pub frame: Option<Frame>,
    pub label_x: f64,
    pub value_x: f64,
    /// First row baseline below the region top
    pub first_baseline: f64,
    pub row_step: f64,
    pub size: f32,
    pub label_color: Rgb,
    pub value_color: Rgb,
    #[serde(default)]
    pub value_prefix: Option<String>,
    pub subtotal_label: String,
    pub discount_label: String,
    pub vat_label: String,
    pub grand: GrandRow,
    /// Region height for cursor advancement past the frame or rows
    pub height: f64,
}

/// Payment terms block, flowed below the totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsSpec {
    /// Gap below the totals region
    pub top_gap: f64,
    pub heading: String,
    pub heading_x: f64,
    pub heading_size: f32,
    pub lines: Vec<String>,
    pub line_x: f64,
    /// First line baseline below the heading baseline
    pub first_line_offset: f64,
    pub line_step: f64,
    pub line_size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividerSpec {
    /// Points from the BOTTOM of the page
    pub y_from_bottom: f64,
    pub color: Rgb,
    pub width: f64,
}

/// Fixed footer: optional divider and a centered closing line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterSpec {
    #[serde(default)]
    pub terms: Option<TermsSpec>,
    #[serde(default)]
    pub divider: Option<DividerSpec>,
    pub thank_you: String,
    /// Points from the BOTTOM of the page
    pub thank_you_from_bottom: f64,
    pub thank_you_size: f32,
    pub thank_you_color: Rgb,
    /// Flowed content reaching within this distance of the page bottom
    /// triggers a ContentOverflow warning
    pub reserve: f64,
}

/// One complete visual style
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub name: String,
    pub margin: f64,
    pub discount_rate: f64,
    pub vat_rate: f64,
    pub header: HeaderSpec,
    pub info: InfoSpec,
    pub parties: PartiesSpec,
    pub table: TableSpec,
    pub totals: TotalsSpec,
    pub footer: FooterSpec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hex_six_digit() {
        assert_eq!(Rgb::from_hex("#2E4057"), Some(Rgb::new(0x2E, 0x40, 0x57)));
        assert_eq!(Rgb::from_hex("#f8f9fa"), Some(Rgb::new(0xF8, 0xF9, 0xFA)));
    }

    #[test]
    fn test_hex_three_digit() {
        assert_eq!(Rgb::from_hex("#555"), Some(Rgb::new(0x55, 0x55, 0x55)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::WHITE));
    }

    #[test]
    fn test_hex_invalid() {
        assert_eq!(Rgb::from_hex("2E4057"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GGHHII"), None);
    }

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::new(0x1F, 0x48, 0x7E);
        assert_eq!(Rgb::from_hex(&c.to_hex()), Some(c));
    }

    #[test]
    fn test_color_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 145, 77)).unwrap();
        assert_eq!(json, "\"#FF914D\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(255, 145, 77));
    }
}
