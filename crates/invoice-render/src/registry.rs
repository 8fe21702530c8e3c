//! Theme registry and the three built-in company styles
//!
//! The built-in descriptors carry the geometry and boilerplate of the three
//! company invoice styles. Coordinates are points from the top-left of an
//! A4 page.

use crate::theme::{
    AnchoredText, Band, BlockHeading, BlockTop, ColumnField, ColumnSpec, DividerSpec, FooterSpec,
    Frame, GrandRow, HAlign, HeaderSpec, InfoLayout, InfoRow, InfoSpec, InfoValue, LogoSpec,
    PanelSpec, PartiesSpec, PartyBlock, Rgb, TableSpec, TermsSpec, ThemeDescriptor, TotalsSpec,
};
use crate::BuildError;
use std::collections::BTreeMap;

const PAGE_WIDTH: f64 = 595.28;
const MM: f64 = 72.0 / 25.4;

/// Maps theme identifiers to descriptors
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, ThemeDescriptor>,
}

impl ThemeRegistry {
    /// Registry pre-loaded with the three built-in styles
    pub fn with_builtin() -> Self {
        let mut registry = Self {
            themes: BTreeMap::new(),
        };
        registry.register(company1_classic());
        registry.register(company2_modern());
        registry.register(company3_professional());
        registry
    }

    /// Empty registry
    pub fn empty() -> Self {
        Self {
            themes: BTreeMap::new(),
        }
    }

    /// Add or replace a descriptor, keyed by its name
    pub fn register(&mut self, theme: ThemeDescriptor) {
        self.themes.insert(theme.name.clone(), theme);
    }

    /// Add a descriptor parsed from JSON
    pub fn register_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let theme: ThemeDescriptor = serde_json::from_str(json)?;
        self.register(theme);
        Ok(())
    }

    /// Look up a theme by identifier
    pub fn resolve(&self, theme_id: &str) -> Result<&ThemeDescriptor, BuildError> {
        self.themes
            .get(theme_id)
            .ok_or_else(|| BuildError::ThemeNotFound(theme_id.to_string()))
    }

    /// Registered theme identifiers, sorted
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Classic style: dark header band, boxed info, framed side-by-side party
/// panel, banded table with row numbers, boxed totals, payment terms
fn company1_classic() -> ThemeDescriptor {
    let margin = 20.0 * MM;
    let width = PAGE_WIDTH;
    let primary = Rgb::new(0x2E, 0x40, 0x57);
    let secondary = Rgb::new(0x04, 0x8A, 0x81);
    let light_gray = Rgb::new(0xF8, 0xF9, 0xFA);
    let lighter_gray = Rgb::new(0xF1, 0xF1, 0xF1);
    let dark_gray = Rgb::new(0x6C, 0x75, 0x7D);

    let col_w = (width - 2.0 * margin) / 2.0;
    let table_width = width - 2.0 * margin;
    let info_x = width - margin - 200.0;

    ThemeDescriptor {
        name: "Company 1 - Classic".to_string(),
        margin,
        discount_rate: 0.05,
        vat_rate: 0.15,
        header: HeaderSpec {
            band: Some(Band {
                height: 80.0,
                fill: primary,
            }),
            title: AnchoredText {
                text: "فــاتــورة".to_string(),
                x: width / 2.0,
                y: 45.0,
                align: HAlign::Center,
                size: 28.0,
                color: Rgb::WHITE,
            },
            logo: LogoSpec {
                path: "1.webp".to_string(),
                x: margin,
                y: 10.0,
                width: 50.0 * MM,
                height: 60.0,
                placeholder: Some(AnchoredText {
                    text: "[شعار الشركة]".to_string(),
                    x: width - margin,
                    y: 50.0,
                    align: HAlign::Right,
                    size: 12.0,
                    color: Rgb::WHITE,
                }),
            },
        },
        info: InfoSpec {
            frame: Some(Frame {
                x: info_x,
                y: 120.0,
                width: 200.0,
                height: 80.0,
                fill: Some(light_gray),
                stroke: Some(dark_gray),
                stroke_width: 1.0,
            }),
            rows: vec![
                InfoRow {
                    label: "رقم الفاتورة:".to_string(),
                    value: InfoValue::InvoiceNo,
                },
                InfoRow {
                    label: "التاريخ:".to_string(),
                    value: InfoValue::InvoiceDate,
                },
                InfoRow {
                    label: "تاريخ الاستحقاق:".to_string(),
                    value: InfoValue::DueDate,
                },
                InfoRow {
                    label: "طريقة الدفع:".to_string(),
                    value: InfoValue::Static("تحويل بنكي".to_string()),
                },
            ],
            layout: InfoLayout::Columns {
                label_x: info_x + 190.0,
                value_x: info_x + 90.0,
            },
            first_baseline: 140.0,
            row_step: 16.0,
            size: 12.0,
            label_color: dark_gray,
            value_color: Rgb::BLACK,
        },
        parties: PartiesSpec {
            panel: Some(PanelSpec {
                y: 240.0,
                height: 140.0,
                stroke: secondary,
                stroke_width: 2.0,
                bar_height: 25.0,
                bar_fill: secondary,
                heading_size: 14.0,
                heading_color: Rgb::WHITE,
                heading_baseline: 15.0,
                sender_heading: "معلومات المرسل".to_string(),
                client_heading: "معلومات العميل".to_string(),
            }),
            sender_lines: vec![
                "شركة التقنية العربية المحدودة".to_string(),
                "الرياض، المملكة العربية السعودية".to_string(),
                "ص.ب: ١٢٣٤٥".to_string(),
                "هاتف: +٩٦٦٩٢٠٠٠٩٧٢٢".to_string(),
                "البريد الإلكتروني: sales@ar-tech.com".to_string(),
                "الرقم الضريبي: ٣٠٠١٢٣٤٥٦٧٠٠٠٠٣".to_string(),
            ],
            sender: PartyBlock {
                top: BlockTop::Fixed(285.0),
                heading: None,
                x: margin + col_w / 2.0,
                align: HAlign::Center,
                step: 16.0,
                size: 11.0,
                color: Rgb::BLACK,
            },
            client: PartyBlock {
                top: BlockTop::Fixed(285.0),
                heading: None,
                x: margin + col_w * 1.5,
                align: HAlign::Center,
                step: 16.0,
                size: 11.0,
                color: Rgb::BLACK,
            },
        },
        table: TableSpec {
            top: BlockTop::Fixed(390.0),
            x: margin,
            width: table_width,
            header_height: 30.0,
            header_fill: Some(primary),
            header_baseline: 20.0,
            header_size: 12.0,
            header_color: Rgb::WHITE,
            columns: vec![
                ColumnSpec {
                    field: ColumnField::LineTotal,
                    label: "الإجمالي".to_string(),
                    x: margin + 30.0,
                    align: HAlign::Center,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::Quantity,
                    label: "الكمية".to_string(),
                    x: margin + 120.0,
                    align: HAlign::Center,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::Unit,
                    label: "الوحدة".to_string(),
                    x: margin + 200.0,
                    align: HAlign::Center,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::Description,
                    label: "الوصف".to_string(),
                    x: margin + 280.0,
                    align: HAlign::Left,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::RowIndex,
                    label: "م".to_string(),
                    x: margin + table_width - 30.0,
                    align: HAlign::Center,
                    value_prefix: None,
                },
            ],
            row_step: 25.0,
            first_row_baseline: 15.0,
            banding: Some([Rgb::WHITE, lighter_gray]),
            row_size: 11.0,
            row_color: Rgb::BLACK,
        },
        totals: TotalsSpec {
            top_gap: 40.0,
            frame: Some(Frame {
                x: margin,
                y: 0.0,
                width: 170.0,
                height: 100.0,
                fill: Some(Rgb::WHITE),
                stroke: Some(Rgb::BLACK),
                stroke_width: 1.0,
            }),
            label_x: margin + 150.0,
            value_x: margin + 20.0,
            first_baseline: 20.0,
            row_step: 20.0,
            size: 10.0,
            label_color: dark_gray,
            value_color: Rgb::BLACK,
            value_prefix: None,
            subtotal_label: "المجموع الفرعي:".to_string(),
            discount_label: "الخصم (٥٪):".to_string(),
            vat_label: "ضريبة القيمة المضافة (١٥٪):".to_string(),
            grand: GrandRow {
                label: "المجموع النهائي:".to_string(),
                band: Some(Frame {
                    x: margin,
                    y: 70.0,
                    width: 170.0,
                    height: 30.0,
                    fill: Some(secondary),
                    stroke: None,
                    stroke_width: 1.0,
                }),
                baseline: 92.0,
                label_x: margin + 150.0,
                value_x: margin + 20.0,
                size: 11.0,
                label_color: Rgb::WHITE,
                value_color: Rgb::WHITE,
                value_prefix: Some("ريال ".to_string()),
            },
            height: 100.0,
        },
        footer: FooterSpec {
            terms: Some(TermsSpec {
                top_gap: 40.0,
                heading: "شروط الدفع:".to_string(),
                heading_x: width - margin,
                heading_size: 11.0,
                lines: vec![
                    "• يُرجى الدفع خلال ١٤ يوماً من تاريخ الفاتورة".to_string(),
                    "• الدفع مقبول عبر التحويل البنكي أو الشيك المصدق".to_string(),
                    "• سيتم فرض غرامة تأخير بنسبة ٢٪ شهرياً على المدفوعات المتأخرة"
                        .to_string(),
                ],
                line_x: width - margin - 10.0,
                first_line_offset: 15.0,
                line_step: 12.0,
                line_size: 9.0,
                color: Rgb::BLACK,
            }),
            divider: Some(DividerSpec {
                y_from_bottom: 70.0,
                color: dark_gray,
                width: 1.0,
            }),
            thank_you: "شكراً لتعاملكم معنا".to_string(),
            thank_you_from_bottom: 50.0,
            thank_you_size: 12.0,
            thank_you_color: Rgb::BLACK,
            reserve: 80.0,
        },
    }
}

/// Modern style: tall blue header, orange table header, stacked party
/// blocks, inline totals with a currency prefix on every row
fn company2_modern() -> ThemeDescriptor {
    let margin = 20.0 * MM;
    let width = PAGE_WIDTH;
    let header_color = Rgb::new(0x1F, 0x48, 0x7E);
    let accent = Rgb::new(0xFF, 0x91, 0x4D);
    let gray = Rgb::new(0xE8, 0xE8, 0xE8);
    let dark = Rgb::new(0x55, 0x55, 0x55);

    ThemeDescriptor {
        name: "Company 2 - Modern".to_string(),
        margin,
        discount_rate: 0.10,
        vat_rate: 0.15,
        header: HeaderSpec {
            band: Some(Band {
                height: 100.0,
                fill: header_color,
            }),
            title: AnchoredText {
                text: "فــاتــورة ضريبية".to_string(),
                x: width / 2.0,
                y: 60.0,
                align: HAlign::Center,
                size: 30.0,
                color: Rgb::WHITE,
            },
            logo: LogoSpec {
                path: "company2_logo.webp".to_string(),
                x: margin,
                y: 15.0,
                width: 45.0 * MM,
                height: 70.0,
                placeholder: Some(AnchoredText {
                    text: "[شعار الشركة]".to_string(),
                    x: margin,
                    y: 50.0,
                    align: HAlign::Left,
                    size: 10.0,
                    color: Rgb::WHITE,
                }),
            },
        },
        info: InfoSpec {
            frame: Some(Frame {
                x: width - 200.0,
                y: 110.0,
                width: 180.0,
                height: 80.0,
                fill: Some(gray),
                stroke: None,
                stroke_width: 1.0,
            }),
            rows: vec![
                InfoRow {
                    label: "رقم:".to_string(),
                    value: InfoValue::InvoiceNo,
                },
                InfoRow {
                    label: "تاريخ:".to_string(),
                    value: InfoValue::InvoiceDate,
                },
                InfoRow {
                    label: "الاستحقاق:".to_string(),
                    value: InfoValue::DueDate,
                },
            ],
            layout: InfoLayout::Columns {
                label_x: width - 30.0,
                value_x: width - 120.0,
            },
            first_baseline: 130.0,
            row_step: 20.0,
            size: 12.0,
            label_color: dark,
            value_color: Rgb::BLACK,
        },
        parties: PartiesSpec {
            panel: None,
            sender_lines: vec![
                "شركة البرمجيات الحديثة".to_string(),
                "الخبر، المملكة العربية السعودية".to_string(),
                "الرقم الضريبي: ٣٠٠٩٨٧٦٥٤٣٢١".to_string(),
            ],
            sender: PartyBlock {
                top: BlockTop::Fixed(210.0),
                heading: None,
                x: margin,
                align: HAlign::Left,
                step: 18.0,
                size: 12.0,
                color: Rgb::BLACK,
            },
            client: PartyBlock {
                top: BlockTop::Fixed(240.0),
                heading: None,
                x: width - margin,
                align: HAlign::Right,
                step: 18.0,
                size: 12.0,
                color: Rgb::BLACK,
            },
        },
        table: TableSpec {
            top: BlockTop::Below(-5.0),
            x: margin,
            width: width - 2.0 * margin,
            header_height: 25.0,
            header_fill: Some(accent),
            header_baseline: 10.0,
            header_size: 12.0,
            header_color: Rgb::WHITE,
            columns: vec![
                ColumnSpec {
                    field: ColumnField::Description,
                    label: "الوصف".to_string(),
                    x: width - margin - 10.0,
                    align: HAlign::Right,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::Quantity,
                    label: "الكمية".to_string(),
                    x: width / 2.0,
                    align: HAlign::Center,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::LineTotal,
                    label: "المجموع".to_string(),
                    x: margin + 10.0,
                    align: HAlign::Left,
                    value_prefix: None,
                },
            ],
            row_step: 20.0,
            first_row_baseline: 15.0,
            banding: None,
            row_size: 11.0,
            row_color: Rgb::BLACK,
        },
        totals: TotalsSpec {
            top_gap: 45.0,
            frame: None,
            label_x: width - margin,
            value_x: margin + 10.0,
            first_baseline: 0.0,
            row_step: 20.0,
            size: 11.0,
            label_color: dark,
            value_color: Rgb::BLACK,
            value_prefix: Some("ريال ".to_string()),
            subtotal_label: "المجموع الفرعي:".to_string(),
            discount_label: "الخصم (١٠٪):".to_string(),
            vat_label: "ضريبة القيمة المضافة (١٥٪):".to_string(),
            grand: GrandRow {
                label: "المجموع النهائي:".to_string(),
                band: None,
                baseline: 60.0,
                label_x: width - margin,
                value_x: margin + 10.0,
                size: 11.0,
                label_color: dark,
                value_color: Rgb::BLACK,
                value_prefix: Some("ريال ".to_string()),
            },
            height: 80.0,
        },
        footer: FooterSpec {
            terms: None,
            divider: None,
            thank_you: "شكراً لتعاملكم معنا".to_string(),
            thank_you_from_bottom: 40.0,
            thank_you_size: 12.0,
            thank_you_color: Rgb::BLACK,
            reserve: 60.0,
        },
    }
}

/// Professional style: no header band, fully flowed layout, headed party
/// blocks, currency prefix in the table and totals
fn company3_professional() -> ThemeDescriptor {
    let margin = 25.0 * MM;
    let width = PAGE_WIDTH;
    let dark_blue = Rgb::new(0x1E, 0x3D, 0x58);
    let soft_gray = Rgb::new(0xF5, 0xF5, 0xF5);
    let strong_gray = Rgb::new(0x99, 0x99, 0x99);

    ThemeDescriptor {
        name: "Company 3 - Professional".to_string(),
        margin,
        discount_rate: 0.10,
        vat_rate: 0.15,
        header: HeaderSpec {
            band: None,
            title: AnchoredText {
                text: "فــاتــورة ضريبية".to_string(),
                x: width - margin,
                y: 40.0,
                align: HAlign::Right,
                size: 26.0,
                color: dark_blue,
            },
            logo: LogoSpec {
                path: "company3_logo.png".to_string(),
                x: margin,
                y: 10.0,
                width: 45.0 * MM,
                height: 25.0 * MM,
                placeholder: Some(AnchoredText {
                    text: "[شعار الشركة]".to_string(),
                    x: margin,
                    y: 40.0,
                    align: HAlign::Left,
                    size: 10.0,
                    color: dark_blue,
                }),
            },
        },
        info: InfoSpec {
            frame: None,
            rows: vec![
                InfoRow {
                    label: "رقم الفاتورة:".to_string(),
                    value: InfoValue::InvoiceNo,
                },
                InfoRow {
                    label: "تاريخ الإصدار:".to_string(),
                    value: InfoValue::InvoiceDate,
                },
                InfoRow {
                    label: "تاريخ الاستحقاق:".to_string(),
                    value: InfoValue::DueDate,
                },
            ],
            layout: InfoLayout::Inline {
                x: width - margin,
            },
            first_baseline: 90.0,
            row_step: 18.0,
            size: 12.0,
            label_color: Rgb::BLACK,
            value_color: Rgb::BLACK,
        },
        parties: PartiesSpec {
            panel: None,
            sender_lines: vec![
                "شركة حلول النظم المتقدمة".to_string(),
                "الدمام، المملكة العربية السعودية".to_string(),
                "الرقم الضريبي: ٣٠٠٣٣٢٢١١٤٤٥".to_string(),
            ],
            sender: PartyBlock {
                top: BlockTop::Below(15.0),
                heading: Some(BlockHeading {
                    text: "معلومات الشركة:".to_string(),
                    x: margin,
                    align: HAlign::Left,
                }),
                x: margin + 10.0,
                align: HAlign::Left,
                step: 18.0,
                size: 11.0,
                color: Rgb::BLACK,
            },
            client: PartyBlock {
                top: BlockTop::Below(10.0),
                heading: Some(BlockHeading {
                    text: "معلومات العميل:".to_string(),
                    x: width - margin,
                    align: HAlign::Right,
                }),
                x: width - margin - 10.0,
                align: HAlign::Right,
                step: 18.0,
                size: 11.0,
                color: Rgb::BLACK,
            },
        },
        table: TableSpec {
            top: BlockTop::Below(5.0),
            x: margin,
            width: width - 2.0 * margin,
            header_height: 25.0,
            header_fill: Some(soft_gray),
            header_baseline: 18.0,
            header_size: 12.0,
            header_color: Rgb::BLACK,
            columns: vec![
                ColumnSpec {
                    field: ColumnField::Description,
                    label: "الوصف".to_string(),
                    x: margin + 5.0,
                    align: HAlign::Left,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::Quantity,
                    label: "الكمية".to_string(),
                    x: width / 2.0,
                    align: HAlign::Center,
                    value_prefix: None,
                },
                ColumnSpec {
                    field: ColumnField::LineTotal,
                    label: "المجموع".to_string(),
                    x: width - margin - 5.0,
                    align: HAlign::Right,
                    value_prefix: Some("ريال ".to_string()),
                },
            ],
            row_step: 18.0,
            first_row_baseline: 25.0,
            banding: None,
            row_size: 11.0,
            row_color: Rgb::BLACK,
        },
        totals: TotalsSpec {
            top_gap: 55.0,
            frame: None,
            label_x: width - margin,
            value_x: margin + 10.0,
            first_baseline: 0.0,
            row_step: 18.0,
            size: 11.0,
            label_color: strong_gray,
            value_color: Rgb::BLACK,
            value_prefix: Some("ريال ".to_string()),
            subtotal_label: "المجموع الفرعي:".to_string(),
            discount_label: "الخصم (١٠٪):".to_string(),
            vat_label: "ضريبة القيمة المضافة (١٥٪):".to_string(),
            grand: GrandRow {
                label: "المجموع النهائي:".to_string(),
                band: None,
                baseline: 54.0,
                label_x: width - margin,
                value_x: margin + 10.0,
                size: 11.0,
                label_color: strong_gray,
                value_color: Rgb::BLACK,
                value_prefix: Some("ريال ".to_string()),
            },
            height: 72.0,
        },
        footer: FooterSpec {
            terms: None,
            divider: None,
            thank_you: "نشكركم على ثقتكم بنا".to_string(),
            thank_you_from_bottom: 50.0,
            thank_you_size: 12.0,
            thank_you_color: dark_blue,
            reserve: 60.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_ids() {
        let registry = ThemeRegistry::with_builtin();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(
            ids,
            vec![
                "Company 1 - Classic",
                "Company 2 - Modern",
                "Company 3 - Professional"
            ]
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ThemeRegistry::with_builtin();
        let err = registry.resolve("Company 9").unwrap_err();
        assert!(matches!(err, BuildError::ThemeNotFound(id) if id == "Company 9"));
    }

    #[test]
    fn test_classic_boilerplate_preserved() {
        let registry = ThemeRegistry::with_builtin();
        let theme = registry.resolve("Company 1 - Classic").unwrap();

        assert_eq!(theme.discount_rate, 0.05);
        assert_eq!(theme.vat_rate, 0.15);
        assert_eq!(theme.totals.discount_label, "الخصم (٥٪):");
        assert_eq!(
            theme.totals.vat_label,
            "ضريبة القيمة المضافة (١٥٪):"
        );
        assert_eq!(theme.parties.sender_lines.len(), 6);
        assert_eq!(theme.footer.thank_you, "شكراً لتعاملكم معنا");
        assert_eq!(theme.table.columns.len(), 5);
        assert_eq!(theme.table.row_step, 25.0);
        assert_eq!(theme.table.first_row_baseline, 15.0);
    }

    #[test]
    fn test_modern_and_professional_rates() {
        let registry = ThemeRegistry::with_builtin();
        for id in ["Company 2 - Modern", "Company 3 - Professional"] {
            let theme = registry.resolve(id).unwrap();
            assert_eq!(theme.discount_rate, 0.10);
            assert_eq!(theme.vat_rate, 0.15);
            assert_eq!(theme.table.columns.len(), 3);
        }
    }

    #[test]
    fn test_descriptor_json_round_trip() {
        let theme = company1_classic();
        let json = serde_json::to_string_pretty(&theme).unwrap();

        let mut registry = ThemeRegistry::empty();
        registry.register_json(&json).unwrap();
        let back = registry.resolve("Company 1 - Classic").unwrap();

        assert_eq!(back.margin, theme.margin);
        assert_eq!(back.table.columns.len(), theme.table.columns.len());
        assert_eq!(back.footer.thank_you, theme.footer.thank_you);
    }

    #[test]
    fn test_register_overrides_by_name() {
        let mut registry = ThemeRegistry::with_builtin();
        let mut theme = company1_classic();
        theme.discount_rate = 0.0;
        registry.register(theme);

        let resolved = registry.resolve("Company 1 - Classic").unwrap();
        assert_eq!(resolved.discount_rate, 0.0);
        assert_eq!(registry.ids().count(), 3);
    }
}
