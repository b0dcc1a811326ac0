//! Maintenance events: typed rows, status and priority enums, filter criteria,
//! and sort fields.

use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    collate,
    data::{parse_amount, parse_sheet_date},
    filter::{Criteria, Faceted, active},
    record::{Record, Tabular, extra_fields},
    sort::SortKey,
};

pub mod columns {
    pub const DATE: &str = "Fecha";
    pub const TIME: &str = "Hora";
    pub const EVENT_TYPE: &str = "Tipo de evento";
    pub const LOCATION: &str = "Ubicación";
    pub const PROBLEM: &str = "Descripción del problema";
    pub const RESPONSIBLE: &str = "Responsable";
    pub const STATUS: &str = "Estado";
    pub const PRIORITY: &str = "Prioridad";
    pub const ESTIMATED_HOURS: &str = "Tiempo estimado (horas)";
    pub const ACTUAL_HOURS: &str = "Tiempo real (horas)";
    pub const SOLUTION: &str = "Descripción de la solución";
    pub const MATERIALS: &str = "Materiales utilizados";
    pub const ESTIMATED_COST: &str = "Costo estimado";
    pub const ACTUAL_COST: &str = "Costo real";
    pub const OBSERVATIONS: &str = "Observaciones";
    pub const BEFORE_MEDIA: [&str; 3] = [
        "Registro evento 1",
        "Registro evento 2",
        "Registro evento 3",
    ];
    pub const AFTER_MEDIA: [&str; 3] = [
        "Registro solución 1",
        "Registro solución 2",
        "Registro solución 3",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pendiente",
            Status::InProgress => "En Progreso",
            Status::Completed => "Completado",
        }
    }

    /// Exact label match; anything else is its own, unrecognized group.
    pub fn from_label(value: &str) -> Option<Status> {
        Status::ALL
            .into_iter()
            .find(|status| status.label() == value.trim())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Baja",
            Priority::Medium => "Media",
            Priority::High => "Alta",
            Priority::Critical => "Crítica",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }

    pub fn from_label(value: &str) -> Option<Priority> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.label() == value.trim())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordinal rank of a raw priority cell; unrecognized values rank 0.
pub fn priority_rank(value: &str) -> u8 {
    Priority::from_label(value).map_or(0, Priority::rank)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceEvent {
    pub date: String,
    pub time: String,
    pub event_type: String,
    pub location: String,
    pub problem: String,
    pub responsible: String,
    pub status: String,
    pub priority: String,
    pub estimated_hours: String,
    pub actual_hours: String,
    pub solution: String,
    pub materials: String,
    pub estimated_cost: String,
    pub actual_cost: String,
    pub observations: String,
    pub before_media: [String; 3],
    pub after_media: [String; 3],
    pub extra: Record,
}

impl MaintenanceEvent {
    pub fn event_date(&self) -> Option<NaiveDate> {
        parse_sheet_date(&self.date)
    }

    pub fn status_value(&self) -> Option<Status> {
        Status::from_label(&self.status)
    }

    pub fn priority_value(&self) -> Option<Priority> {
        Priority::from_label(&self.priority)
    }

    pub fn actual_hours_value(&self) -> Option<Decimal> {
        parse_amount(&self.actual_hours)
    }

    /// Actual cost when it parses to a nonzero amount, otherwise the estimate,
    /// otherwise zero.
    pub fn effective_cost(&self) -> Decimal {
        parse_amount(&self.actual_cost)
            .filter(|cost| !cost.is_zero())
            .or_else(|| parse_amount(&self.estimated_cost))
            .unwrap_or(Decimal::ZERO)
    }

    fn fields(&self) -> [(&'static str, &str); 21] {
        [
            (columns::DATE, self.date.as_str()),
            (columns::TIME, self.time.as_str()),
            (columns::EVENT_TYPE, self.event_type.as_str()),
            (columns::LOCATION, self.location.as_str()),
            (columns::PROBLEM, self.problem.as_str()),
            (columns::RESPONSIBLE, self.responsible.as_str()),
            (columns::STATUS, self.status.as_str()),
            (columns::PRIORITY, self.priority.as_str()),
            (columns::ESTIMATED_HOURS, self.estimated_hours.as_str()),
            (columns::ACTUAL_HOURS, self.actual_hours.as_str()),
            (columns::SOLUTION, self.solution.as_str()),
            (columns::MATERIALS, self.materials.as_str()),
            (columns::ESTIMATED_COST, self.estimated_cost.as_str()),
            (columns::ACTUAL_COST, self.actual_cost.as_str()),
            (columns::OBSERVATIONS, self.observations.as_str()),
            (columns::BEFORE_MEDIA[0], self.before_media[0].as_str()),
            (columns::BEFORE_MEDIA[1], self.before_media[1].as_str()),
            (columns::BEFORE_MEDIA[2], self.before_media[2].as_str()),
            (columns::AFTER_MEDIA[0], self.after_media[0].as_str()),
            (columns::AFTER_MEDIA[1], self.after_media[1].as_str()),
            (columns::AFTER_MEDIA[2], self.after_media[2].as_str()),
        ]
    }
}

impl Tabular for MaintenanceEvent {
    const NAME: &'static str = "event";
    const HEADERS: &'static [&'static str] = &[
        columns::DATE,
        columns::TIME,
        columns::EVENT_TYPE,
        columns::LOCATION,
        columns::PROBLEM,
        columns::RESPONSIBLE,
        columns::STATUS,
        columns::PRIORITY,
        columns::ESTIMATED_HOURS,
        columns::ACTUAL_HOURS,
        columns::SOLUTION,
        columns::MATERIALS,
        columns::ESTIMATED_COST,
        columns::ACTUAL_COST,
        columns::OBSERVATIONS,
        columns::BEFORE_MEDIA[0],
        columns::BEFORE_MEDIA[1],
        columns::BEFORE_MEDIA[2],
        columns::AFTER_MEDIA[0],
        columns::AFTER_MEDIA[1],
        columns::AFTER_MEDIA[2],
    ];

    fn from_record(record: &Record) -> Self {
        let field = |name: &str| record.get_or_empty(name).to_string();
        MaintenanceEvent {
            date: field(columns::DATE),
            time: field(columns::TIME),
            event_type: field(columns::EVENT_TYPE),
            location: field(columns::LOCATION),
            problem: field(columns::PROBLEM),
            responsible: field(columns::RESPONSIBLE),
            status: field(columns::STATUS),
            priority: field(columns::PRIORITY),
            estimated_hours: field(columns::ESTIMATED_HOURS),
            actual_hours: field(columns::ACTUAL_HOURS),
            solution: field(columns::SOLUTION),
            materials: field(columns::MATERIALS),
            estimated_cost: field(columns::ESTIMATED_COST),
            actual_cost: field(columns::ACTUAL_COST),
            observations: field(columns::OBSERVATIONS),
            before_media: columns::BEFORE_MEDIA.map(field),
            after_media: columns::AFTER_MEDIA.map(field),
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
pub enum EventDimension {
    EventType,
    Location,
    Responsible,
    Status,
    Priority,
}

impl EventDimension {
    pub const ALL: [EventDimension; 5] = [
        EventDimension::EventType,
        EventDimension::Location,
        EventDimension::Responsible,
        EventDimension::Status,
        EventDimension::Priority,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventDimension::EventType => "event-type",
            EventDimension::Location => "location",
            EventDimension::Responsible => "responsible",
            EventDimension::Status => "status",
            EventDimension::Priority => "priority",
        }
    }
}

impl fmt::Display for EventDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Faceted for MaintenanceEvent {
    type Dimension = EventDimension;

    fn dimensions() -> &'static [EventDimension] {
        &EventDimension::ALL
    }

    fn dimension_value(&self, dimension: EventDimension) -> Cow<'_, str> {
        Cow::Borrowed(match dimension {
            EventDimension::EventType => self.event_type.as_str(),
            EventDimension::Location => self.location.as_str(),
            EventDimension::Responsible => self.responsible.as_str(),
            EventDimension::Status => self.status.as_str(),
            EventDimension::Priority => self.priority.as_str(),
        })
    }

    fn search_text(&self) -> String {
        Tabular::search_text(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCriteria {
    pub search: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub responsible: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Inclusive lower bound on the event date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date.
    pub date_to: Option<NaiveDate>,
}

impl EventCriteria {
    pub fn with(mut self, dimension: EventDimension, value: impl Into<String>) -> Self {
        *self.slot_mut(dimension) = Some(value.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn get(&self, dimension: EventDimension) -> Option<&str> {
        active(self.slot(dimension))
    }

    fn slot(&self, dimension: EventDimension) -> &Option<String> {
        match dimension {
            EventDimension::EventType => &self.event_type,
            EventDimension::Location => &self.location,
            EventDimension::Responsible => &self.responsible,
            EventDimension::Status => &self.status,
            EventDimension::Priority => &self.priority,
        }
    }

    fn slot_mut(&mut self, dimension: EventDimension) -> &mut Option<String> {
        match dimension {
            EventDimension::EventType => &mut self.event_type,
            EventDimension::Location => &mut self.location,
            EventDimension::Responsible => &mut self.responsible,
            EventDimension::Status => &mut self.status,
            EventDimension::Priority => &mut self.priority,
        }
    }
}

impl Criteria for EventCriteria {
    type Item = MaintenanceEvent;

    fn search(&self) -> Option<&str> {
        active(&self.search)
    }

    fn selections(&self) -> Vec<(EventDimension, &str)> {
        EventDimension::ALL
            .iter()
            .filter_map(|dimension| self.get(*dimension).map(|value| (*dimension, value)))
            .collect()
    }

    fn matches_ranges(&self, item: &MaintenanceEvent) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        let Some(date) = item.event_date() else {
            return false;
        };
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortField {
    Date,
    Priority,
    Status,
    EventType,
}

impl FromStr for EventSortField {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fecha" | "date" => Ok(EventSortField::Date),
            "prioridad" | "priority" => Ok(EventSortField::Priority),
            "estado" | "status" => Ok(EventSortField::Status),
            "tipo" | "type" => Ok(EventSortField::EventType),
            other => Err(anyhow!(
                "Unknown event sort field '{other}' (expected fecha, prioridad, estado, or tipo)"
            )),
        }
    }
}

impl SortKey<MaintenanceEvent> for EventSortField {
    fn compare(&self, a: &MaintenanceEvent, b: &MaintenanceEvent) -> Ordering {
        match self {
            EventSortField::Date => a.event_date().cmp(&b.event_date()),
            EventSortField::Priority => priority_rank(&a.priority).cmp(&priority_rank(&b.priority)),
            EventSortField::Status => collate::compare(&a.status, &b.status),
            EventSortField::EventType => collate::compare(&a.event_type, &b.event_type),
        }
    }
}

/// Built-in rows shown when the published sheet cannot be reached.
pub fn sample_events() -> Vec<MaintenanceEvent> {
    vec![
        MaintenanceEvent {
            date: "06-02-2025".into(),
            time: "08:45".into(),
            event_type: "Orden de Trabajo".into(),
            location: "Sala de Bombas - Sector Norte".into(),
            problem: "Vibración excesiva en bomba de recirculación".into(),
            responsible: "Andrea Fuentes".into(),
            status: Status::Completed.label().into(),
            priority: Priority::High.label().into(),
            estimated_hours: "5".into(),
            actual_hours: "4.5".into(),
            solution: "Cambio de rodamientos y alineamiento del acople".into(),
            materials: "Rodamientos 6205, grasa de litio".into(),
            estimated_cost: "180000".into(),
            actual_cost: "164500".into(),
            observations: "Se agenda medición de vibraciones en 30 días.".into(),
            before_media: [
                "https://drive.google.com/file/d/1pB0mbaVibracion01/view?usp=sharing".into(),
                String::new(),
                String::new(),
            ],
            after_media: [
                "https://drive.google.com/open?id=1pB0mbaSolucion01".into(),
                String::new(),
                String::new(),
            ],
            extra: Record::new(),
        },
        MaintenanceEvent {
            date: "11-02-2025".into(),
            time: "13:20".into(),
            event_type: "Tarjeta de Seguridad".into(),
            location: "Bodega de Insumos".into(),
            problem: "Extintor con presión bajo el rango operativo".into(),
            responsible: "Rodrigo Salinas".into(),
            status: Status::InProgress.label().into(),
            priority: Priority::Critical.label().into(),
            estimated_hours: "2".into(),
            actual_hours: "0".into(),
            solution: "Recarga y certificación del equipo".into(),
            materials: "No aplica".into(),
            estimated_cost: "45000".into(),
            actual_cost: "0".into(),
            observations: "Extintor de respaldo instalado mientras tanto.".into(),
            before_media: [
                "https://drive.google.com/file/d/1ExtintorPresion02/view".into(),
                String::new(),
                String::new(),
            ],
            after_media: Default::default(),
            extra: Record::new(),
        },
        MaintenanceEvent {
            date: "19-02-2025".into(),
            time: "10:00".into(),
            event_type: "Tarjeta de Mantenimiento".into(),
            location: "Taller Eléctrico".into(),
            problem: "Luminarias intermitentes en banco de pruebas".into(),
            responsible: "Camila Ortega".into(),
            status: Status::Pending.label().into(),
            priority: Priority::Low.label().into(),
            estimated_hours: "3".into(),
            actual_hours: "0".into(),
            solution: "Reemplazo de balastos y revisión de circuito".into(),
            materials: String::new(),
            estimated_cost: "60000".into(),
            actual_cost: "0".into(),
            observations: "Pendiente de compra de balastos.".into(),
            before_media: Default::default(),
            after_media: Default::default(),
            extra: Record::new(),
        },
    ]
}
