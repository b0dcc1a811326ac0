//! Procurement quotations: typed rows, filter criteria, and sort fields.

use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    collate,
    data::{extract_year, parse_amount, parse_sheet_date},
    filter::{Criteria, Faceted, active},
    record::{Record, Tabular, extra_fields, present},
    sort::SortKey,
};

pub mod columns {
    pub const DATE_TIME: &str = "Fecha y hora";
    pub const DESCRIPTION: &str = "Descripción del Producto - Resumida";
    pub const PROVIDER: &str = "Nombre del Proveedor";
    pub const BRAND: &str = "Marca del Componente";
    pub const MODEL: &str = "Modelo del Componente";
    pub const COMPONENT_TYPE: &str = "Tipo de Componente";
    pub const MATERIAL: &str = "Material";
    pub const DIAMETER: &str = "Diámetro";
    pub const UNIT_PRICE: &str = "Precio Unitario Neto en CLP";
    pub const QUANTITY: &str = "Cantidad";
    pub const TOTAL_PRICE: &str = "Precio Total Neto en CLP";
    pub const LEAD_TIME: &str = "Plazo de entrega";
    pub const IMAGE_LINK: &str = "Link Imagen";
    pub const PDF_LINK: &str = "Link archivo PDF";
    pub const FILE_NAME: &str = "Nombre del archivo";
    pub const ITEM_TYPE: &str = "Tipo de item";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quotation {
    pub date_time: String,
    pub description: String,
    pub provider: String,
    pub brand: String,
    pub model: String,
    pub component_type: String,
    pub material: String,
    pub diameter: String,
    pub unit_price: String,
    pub quantity: String,
    pub total_price: String,
    pub lead_time: String,
    pub image_link: String,
    pub pdf_link: String,
    pub file_name: String,
    pub item_type: String,
    /// Columns the sheet carries beyond the expected set.
    pub extra: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Component,
    Service,
    Unknown,
}

impl Quotation {
    pub fn unit_price_value(&self) -> Option<Decimal> {
        parse_amount(&self.unit_price)
    }

    pub fn total_price_value(&self) -> Option<Decimal> {
        parse_amount(&self.total_price)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_sheet_date(&self.date_time)
    }

    pub fn year(&self) -> &str {
        extract_year(&self.date_time)
    }

    pub fn image_link(&self) -> Option<&str> {
        present(&self.image_link)
    }

    pub fn pdf_link(&self) -> Option<&str> {
        present(&self.pdf_link)
    }

    pub fn item_kind(&self) -> ItemKind {
        let lowered = self.item_type.trim().to_lowercase();
        if lowered.starts_with("componente") {
            ItemKind::Component
        } else if lowered.starts_with("servicio") {
            ItemKind::Service
        } else {
            ItemKind::Unknown
        }
    }

    fn fields(&self) -> [(&'static str, &str); 16] {
        [
            (columns::DATE_TIME, self.date_time.as_str()),
            (columns::DESCRIPTION, self.description.as_str()),
            (columns::PROVIDER, self.provider.as_str()),
            (columns::BRAND, self.brand.as_str()),
            (columns::MODEL, self.model.as_str()),
            (columns::COMPONENT_TYPE, self.component_type.as_str()),
            (columns::MATERIAL, self.material.as_str()),
            (columns::DIAMETER, self.diameter.as_str()),
            (columns::UNIT_PRICE, self.unit_price.as_str()),
            (columns::QUANTITY, self.quantity.as_str()),
            (columns::TOTAL_PRICE, self.total_price.as_str()),
            (columns::LEAD_TIME, self.lead_time.as_str()),
            (columns::IMAGE_LINK, self.image_link.as_str()),
            (columns::PDF_LINK, self.pdf_link.as_str()),
            (columns::FILE_NAME, self.file_name.as_str()),
            (columns::ITEM_TYPE, self.item_type.as_str()),
        ]
    }
}

impl Tabular for Quotation {
    const NAME: &'static str = "quotation";
    const HEADERS: &'static [&'static str] = &[
        columns::DATE_TIME,
        columns::DESCRIPTION,
        columns::PROVIDER,
        columns::BRAND,
        columns::MODEL,
        columns::COMPONENT_TYPE,
        columns::MATERIAL,
        columns::DIAMETER,
        columns::UNIT_PRICE,
        columns::QUANTITY,
        columns::TOTAL_PRICE,
        columns::LEAD_TIME,
        columns::IMAGE_LINK,
        columns::PDF_LINK,
        columns::FILE_NAME,
        columns::ITEM_TYPE,
    ];

    fn from_record(record: &Record) -> Self {
        let field = |name: &str| record.get_or_empty(name).to_string();
        Quotation {
            date_time: field(columns::DATE_TIME),
            description: field(columns::DESCRIPTION),
            provider: field(columns::PROVIDER),
            brand: field(columns::BRAND),
            model: field(columns::MODEL),
            component_type: field(columns::COMPONENT_TYPE),
            material: field(columns::MATERIAL),
            diameter: field(columns::DIAMETER),
            unit_price: field(columns::UNIT_PRICE),
            quantity: field(columns::QUANTITY),
            total_price: field(columns::TOTAL_PRICE),
            lead_time: field(columns::LEAD_TIME),
            image_link: field(columns::IMAGE_LINK),
            pdf_link: field(columns::PDF_LINK),
            file_name: field(columns::FILE_NAME),
            item_type: field(columns::ITEM_TYPE),
            extra: extra_fields(record, Self::HEADERS),
        }
    }

    fn to_record(&self) -> Record {
        let mut record = Record::from_pairs(self.fields());
        for (name, value) in self.extra.iter() {
            record.insert(name, value);
        }
        record
    }

    fn search_text(&self) -> String {
        self.fields()
            .iter()
            .map(|(_, value)| *value)
            .chain(self.extra.values())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum QuotationDimension {
    Provider,
    Brand,
    ComponentType,
    ItemType,
    Model,
    Diameter,
    Material,
    Year,
}

impl QuotationDimension {
    pub const ALL: [QuotationDimension; 8] = [
        QuotationDimension::Provider,
        QuotationDimension::Brand,
        QuotationDimension::ComponentType,
        QuotationDimension::ItemType,
        QuotationDimension::Model,
        QuotationDimension::Diameter,
        QuotationDimension::Material,
        QuotationDimension::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuotationDimension::Provider => "provider",
            QuotationDimension::Brand => "brand",
            QuotationDimension::ComponentType => "component-type",
            QuotationDimension::ItemType => "item-type",
            QuotationDimension::Model => "model",
            QuotationDimension::Diameter => "diameter",
            QuotationDimension::Material => "material",
            QuotationDimension::Year => "year",
        }
    }
}

impl fmt::Display for QuotationDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Faceted for Quotation {
    type Dimension = QuotationDimension;

    fn dimensions() -> &'static [QuotationDimension] {
        &QuotationDimension::ALL
    }

    fn dimension_value(&self, dimension: QuotationDimension) -> Cow<'_, str> {
        Cow::Borrowed(match dimension {
            QuotationDimension::Provider => self.provider.as_str(),
            QuotationDimension::Brand => self.brand.as_str(),
            QuotationDimension::ComponentType => self.component_type.as_str(),
            QuotationDimension::ItemType => self.item_type.as_str(),
            QuotationDimension::Model => self.model.as_str(),
            QuotationDimension::Diameter => self.diameter.as_str(),
            QuotationDimension::Material => self.material.as_str(),
            QuotationDimension::Year => self.year(),
        })
    }

    fn search_text(&self) -> String {
        Tabular::search_text(self)
    }
}

/// Inclusive unit-price bounds, written `min-max` or `min+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl FromStr for PriceRange {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let parse_bound = |raw: &str| {
            parse_amount(raw).ok_or_else(|| anyhow!("Invalid price bound '{raw}' in '{value}'"))
        };
        if let Some(open) = trimmed.strip_suffix('+') {
            return Ok(PriceRange {
                min: parse_bound(open)?,
                max: None,
            });
        }
        let Some((min, max)) = trimmed.split_once('-') else {
            bail!("Price range '{value}' must look like 'min-max' or 'min+'");
        };
        let (min, max) = (parse_bound(min)?, parse_bound(max)?);
        if min > max {
            bail!("Price range '{value}' has its minimum above its maximum");
        }
        Ok(PriceRange {
            min,
            max: Some(max),
        })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationCriteria {
    pub search: Option<String>,
    pub provider: Option<String>,
    pub brand: Option<String>,
    pub component_type: Option<String>,
    pub item_type: Option<String>,
    pub model: Option<String>,
    pub diameter: Option<String>,
    pub material: Option<String>,
    pub year: Option<String>,
    pub price_range: Option<PriceRange>,
}

impl QuotationCriteria {
    pub fn with(mut self, dimension: QuotationDimension, value: impl Into<String>) -> Self {
        *self.slot_mut(dimension) = Some(value.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn get(&self, dimension: QuotationDimension) -> Option<&str> {
        active(self.slot(dimension))
    }

    fn slot(&self, dimension: QuotationDimension) -> &Option<String> {
        match dimension {
            QuotationDimension::Provider => &self.provider,
            QuotationDimension::Brand => &self.brand,
            QuotationDimension::ComponentType => &self.component_type,
            QuotationDimension::ItemType => &self.item_type,
            QuotationDimension::Model => &self.model,
            QuotationDimension::Diameter => &self.diameter,
            QuotationDimension::Material => &self.material,
            QuotationDimension::Year => &self.year,
        }
    }

    fn slot_mut(&mut self, dimension: QuotationDimension) -> &mut Option<String> {
        match dimension {
            QuotationDimension::Provider => &mut self.provider,
            QuotationDimension::Brand => &mut self.brand,
            QuotationDimension::ComponentType => &mut self.component_type,
            QuotationDimension::ItemType => &mut self.item_type,
            QuotationDimension::Model => &mut self.model,
            QuotationDimension::Diameter => &mut self.diameter,
            QuotationDimension::Material => &mut self.material,
            QuotationDimension::Year => &mut self.year,
        }
    }
}

impl Criteria for QuotationCriteria {
    type Item = Quotation;

    fn search(&self) -> Option<&str> {
        active(&self.search)
    }

    fn selections(&self) -> Vec<(QuotationDimension, &str)> {
        QuotationDimension::ALL
            .iter()
            .filter_map(|dimension| self.get(*dimension).map(|value| (*dimension, value)))
            .collect()
    }

    fn matches_ranges(&self, item: &Quotation) -> bool {
        match &self.price_range {
            Some(range) => item
                .unit_price_value()
                .is_some_and(|price| range.contains(price)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationSortField {
    Price,
    Alphabetical,
    Date,
}

impl FromStr for QuotationSortField {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "price" | "precio" => Ok(QuotationSortField::Price),
            "alphabetical" | "alfabetico" | "name" => Ok(QuotationSortField::Alphabetical),
            "fecha" | "date" => Ok(QuotationSortField::Date),
            other => Err(anyhow!(
                "Unknown quotation sort field '{other}' (expected price, alphabetical, or fecha)"
            )),
        }
    }
}

impl SortKey<Quotation> for QuotationSortField {
    fn compare(&self, a: &Quotation, b: &Quotation) -> Ordering {
        match self {
            QuotationSortField::Price => a.unit_price_value().cmp(&b.unit_price_value()),
            QuotationSortField::Alphabetical => collate::compare(&a.description, &b.description),
            QuotationSortField::Date => a.date().cmp(&b.date()),
        }
    }
}

/// Built-in rows shown when the published sheet cannot be reached.
pub fn sample_quotations() -> Vec<Quotation> {
    let row = |date_time: &str,
               description: &str,
               provider: &str,
               brand: &str,
               model: &str,
               component_type: &str,
               material: &str,
               diameter: &str,
               prices: (&str, &str, &str),
               lead_time: &str,
               item_type: &str| Quotation {
        date_time: date_time.to_string(),
        description: description.to_string(),
        provider: provider.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        component_type: component_type.to_string(),
        material: material.to_string(),
        diameter: diameter.to_string(),
        unit_price: prices.0.to_string(),
        quantity: prices.1.to_string(),
        total_price: prices.2.to_string(),
        lead_time: lead_time.to_string(),
        item_type: item_type.to_string(),
        ..Quotation::default()
    };
    vec![
        row(
            "08-01-2025 10:15",
            "Rodamiento rígido de bolas para bomba centrífuga",
            "Rodamientos del Sur Ltda.",
            "SKF",
            "6205-2RS",
            "Rodamiento",
            "Acero cromado",
            "52 mm",
            ("18500", "4", "74000"),
            "3 días hábiles",
            "Componente",
        ),
        row(
            "21-01-2025 16:40",
            "Válvula de bola bridada para línea de agua",
            "Hidráulica Andina SpA",
            "Genebre",
            "2528",
            "Válvula",
            "Acero inoxidable",
            "2\"",
            ("96400", "2", "192800"),
            "1 semana",
            "Componente",
        ),
        row(
            "03-12-2024 09:05",
            "Motor trifásico para cinta transportadora",
            "Electro Industrial Norte",
            "WEG",
            "W22 5.5 kW",
            "Motor eléctrico",
            "No aplica",
            "No aplica",
            ("612000", "1", "612000"),
            "15 días",
            "Componente",
        ),
        row(
            "17-12-2024 11:30",
            "Alineamiento láser de ejes y balanceo dinámico",
            "Servicios Mecánicos Integrales",
            "No aplica",
            "No aplica",
            "Mantención",
            "No aplica",
            "No aplica",
            ("240000", "1", "240000"),
            "A coordinar",
            "Servicio",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotation(provider: &str, price: &str, date_time: &str) -> Quotation {
        Quotation {
            provider: provider.to_string(),
            unit_price: price.to_string(),
            date_time: date_time.to_string(),
            ..Quotation::default()
        }
    }

    #[test]
    fn from_record_defaults_missing_fields_and_keeps_extras() {
        let record = Record::from_pairs([
            (columns::PROVIDER, "ACME"),
            (columns::UNIT_PRICE, "1000"),
            ("Observación interna", "urgente"),
        ]);
        let parsed = Quotation::from_record(&record);
        assert_eq!(parsed.provider, "ACME");
        assert_eq!(parsed.brand, "");
        assert_eq!(parsed.extra.get("Observación interna"), Some("urgente"));

        let back = parsed.to_record();
        assert_eq!(back.len(), Quotation::HEADERS.len() + 1);
        assert_eq!(back.get(columns::UNIT_PRICE), Some("1000"));
        assert!(Tabular::search_text(&parsed).contains("urgente"));
    }

    #[test]
    fn price_range_parses_closed_and_open_forms() {
        let closed: PriceRange = "10000-50000".parse().unwrap();
        assert!(closed.contains(Decimal::from(10_000)));
        assert!(closed.contains(Decimal::from(50_000)));
        assert!(!closed.contains(Decimal::from(50_001)));

        let open: PriceRange = "500000+".parse().unwrap();
        assert!(open.contains(Decimal::from(900_000)));
        assert!(!open.contains(Decimal::from(499_999)));
        assert_eq!(open.to_string(), "500000+");

        assert!("abc-10".parse::<PriceRange>().is_err());
        assert!("50-10".parse::<PriceRange>().is_err());
        assert!("100".parse::<PriceRange>().is_err());
    }

    #[test]
    fn unparseable_price_fails_price_range() {
        let criteria = QuotationCriteria::default().with_price_range("0-100".parse().unwrap());
        assert!(criteria.matches_ranges(&quotation("a", "50", "")));
        assert!(!criteria.matches_ranges(&quotation("a", "N/A", "")));
    }

    #[test]
    fn year_dimension_is_derived_from_date_time() {
        let q = quotation("a", "1", "05-06-2024 10:00");
        assert_eq!(q.dimension_value(QuotationDimension::Year), "2024");
    }

    #[test]
    fn blank_selections_impose_nothing() {
        let criteria = QuotationCriteria::default()
            .with(QuotationDimension::Brand, "  ")
            .with_search("");
        assert!(criteria.selections().is_empty());
        assert_eq!(criteria.search(), None);
    }

    #[test]
    fn price_sort_puts_unparseable_first() {
        let cheap = quotation("a", "10", "");
        let broken = quotation("b", "n/a", "");
        assert_eq!(
            QuotationSortField::Price.compare(&broken, &cheap),
            Ordering::Less
        );
    }

    #[test]
    fn item_kind_reads_discriminator() {
        let mut q = Quotation::default();
        q.item_type = "Servicio".into();
        assert_eq!(q.item_kind(), ItemKind::Service);
        q.item_type = "Componente".into();
        assert_eq!(q.item_kind(), ItemKind::Component);
        q.item_type = String::new();
        assert_eq!(q.item_kind(), ItemKind::Unknown);
    }

    #[test]
    fn sample_data_is_never_empty_and_priced() {
        let sample = sample_quotations();
        assert!(!sample.is_empty());
        assert!(sample.iter().all(|q| q.unit_price_value().is_some()));
    }
}
