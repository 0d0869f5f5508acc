//! CSV sheet export for spreadsheet analysis
//!
//! Renders the three workbook sheets the audit front-end exports: raw
//! events, user profiles, subject profiles. Column headers keep the source
//! system's Spanish labels and dates are display-formatted as
//! `DD/MM/YYYY HH:MM:SS`. Nothing is computed here beyond formatting; each
//! sheet is a field-by-field projection of the report.

use crate::record::{LookupEvent, LookupKind};
use crate::report::AuditReport;
use crate::subject_stats::SubjectProfile;
use crate::user_stats::UserProfile;

const EVENTS_HEADER: &[&str] = &[
    "Fecha",
    "ID Usuario",
    "Legajo",
    "DNI Usuario",
    "Nombre Usuario",
    "DNI Consultado",
    "Apellido",
    "Nombre",
    "Tipo",
];

const USERS_HEADER: &[&str] = &[
    "ID Usuario",
    "Legajo",
    "DNI",
    "Nombre",
    "Nivel de Sospecha (%)",
    "Total Consultas",
    "Consultas Propias",
    "Consultas Ajenas",
    "Consultas Desconocidas",
    "Personas Consultadas",
    "Días de Actividad",
    "Promedio Consultas por Día",
    "Primera Consulta",
    "Última Consulta",
    "Porcentaje Consultas Ajenas (%)",
];

const SUBJECTS_HEADER: &[&str] = &[
    "DNI",
    "Apellido",
    "Nombre",
    "Nivel de Exposición (%)",
    "Total Accesos",
    "Accesos Propios",
    "Accesos por Otros",
    "Usuarios Distintos",
    "Primer Acceso",
    "Último Acceso",
    "Porcentaje Accesos Ajenos (%)",
];

/// All three sheets of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSheets {
    pub events: String,
    pub users: String,
    pub subjects: String,
}

impl CsvSheets {
    pub fn from_report(report: &AuditReport) -> Self {
        Self {
            events: events_sheet(&report.events),
            users: users_sheet(&report.users),
            subjects: subjects_sheet(&report.subjects),
        }
    }
}

/// Raw events sheet, one row per lookup, newest first like the input.
pub fn events_sheet(events: &[LookupEvent]) -> String {
    let rows = events.iter().map(|e| {
        vec![
            e.timestamp.display(),
            e.actor_id.clone(),
            e.actor_badge_number.clone(),
            e.actor_national_id.clone(),
            e.actor_name.clone(),
            e.subject_national_id.clone(),
            e.subject_last_name.clone(),
            e.subject_first_name.clone(),
            kind_label(e.kind()).to_string(),
        ]
    });
    render_sheet(EVENTS_HEADER, rows)
}

/// User profiles sheet, suspicion order preserved.
pub fn users_sheet(users: &[UserProfile]) -> String {
    let rows = users.iter().map(|u| {
        vec![
            u.actor_id.clone(),
            u.actor_badge_number.clone(),
            u.actor_national_id.clone(),
            u.actor_name.clone(),
            u.suspicion_score.to_string(),
            u.total.to_string(),
            u.self_lookups.to_string(),
            u.other_lookups.to_string(),
            u.unknown_lookups.to_string(),
            u.distinct_subjects.len().to_string(),
            u.active_days.to_string(),
            format!("{:.1}", u.avg_per_active_day),
            u.first_seen.display(),
            u.last_seen.display(),
            format!("{:.1}", u.other_pct),
        ]
    });
    render_sheet(USERS_HEADER, rows)
}

/// Subject profiles sheet, exposure order preserved.
pub fn subjects_sheet(subjects: &[SubjectProfile]) -> String {
    let rows = subjects.iter().map(|s| {
        vec![
            s.national_id.clone(),
            s.last_name.clone(),
            s.first_name.clone(),
            s.exposure_score.to_string(),
            s.total_accesses.to_string(),
            s.self_accesses.to_string(),
            s.other_accesses.to_string(),
            s.distinct_actors.len().to_string(),
            s.first_access.display(),
            s.last_access.display(),
            format!("{:.1}", s.other_access_pct),
        ]
    });
    render_sheet(SUBJECTS_HEADER, rows)
}

fn kind_label(kind: LookupKind) -> &'static str {
    match kind {
        LookupKind::Unknown => "Desconocido",
        LookupKind::SelfLookup => "Propio",
        LookupKind::ThirdParty => "Ajeno",
    }
}

fn render_sheet(header: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut output = String::new();

    output.push_str(&header.join(","));
    output.push('\n');

    for row in rows {
        let escaped: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        output.push_str(&escaped.join(","));
        output.push('\n');
    }

    output
}

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Pkusuario: 1 - Legajo: 100 - DNI: 111 - Nombre: Ana\n\
        DNI: 111 - Apellido: Gomez - Nombre: Ana - Fecha: 01/02/2024 10:00:00\n\
        DNI: 222 - Apellido: Perez - Nombre: Luis - Fecha: 02/02/2024 11:00:00\n\
        DNI: 999 - Apellido: Desconocido - Nombre: Desconocido - Fecha: 03/02/2024 09:00:00\n\
        ---";

    fn report() -> AuditReport {
        AuditReport::from_text(SAMPLE)
    }

    #[test]
    fn test_events_sheet_header() {
        let sheet = events_sheet(&report().events);
        assert!(sheet.starts_with(
            "Fecha,ID Usuario,Legajo,DNI Usuario,Nombre Usuario,DNI Consultado,Apellido,Nombre,Tipo\n"
        ));
    }

    #[test]
    fn test_events_sheet_rows_and_labels() {
        let sheet = events_sheet(&report().events);
        assert!(sheet.contains("01/02/2024 10:00:00,1,100,111,Ana,111,Gomez,Ana,Propio"));
        assert!(sheet.contains("02/02/2024 11:00:00,1,100,111,Ana,222,Perez,Luis,Ajeno"));
        assert!(sheet.contains(",Desconocido\n"));
    }

    #[test]
    fn test_events_sheet_row_count() {
        let sheet = events_sheet(&report().events);
        assert_eq!(sheet.lines().count(), 4); // header + 3 events
    }

    #[test]
    fn test_users_sheet_projection() {
        let sheet = users_sheet(&report().users);
        assert!(sheet.starts_with("ID Usuario,Legajo,DNI,Nombre,Nivel de Sospecha (%)"));
        // Ana: 3 consultas, 1 propia, 1 ajena, 1 desconocida, 1 persona
        let row = sheet.lines().nth(1).unwrap();
        assert!(row.starts_with("1,100,111,Ana,"));
        assert!(row.contains(",3,1,1,1,1,"));
    }

    #[test]
    fn test_users_sheet_display_dates() {
        let sheet = users_sheet(&report().users);
        assert!(sheet.contains("01/02/2024 10:00:00"));
        assert!(sheet.contains("03/02/2024 09:00:00"));
    }

    #[test]
    fn test_subjects_sheet_projection() {
        let sheet = subjects_sheet(&report().subjects);
        assert!(sheet.starts_with("DNI,Apellido,Nombre,Nivel de Exposición (%)"));
        // Unknown 999 never appears
        assert!(!sheet.contains("999"));
    }

    #[test]
    fn test_percentages_have_one_decimal() {
        let sheet = users_sheet(&report().users);
        assert!(sheet.trim_end().ends_with("33.3"));
    }

    #[test]
    fn test_escape_field_plain() {
        assert_eq!(escape_field("hola"), "hola");
    }

    #[test]
    fn test_escape_field_with_comma() {
        assert_eq!(escape_field("Perez, Luis"), "\"Perez, Luis\"");
    }

    #[test]
    fn test_escape_field_with_quote() {
        assert_eq!(escape_field("el \"Flaco\""), "\"el \"\"Flaco\"\"\"");
    }

    #[test]
    fn test_sheets_from_report() {
        let sheets = CsvSheets::from_report(&report());
        assert!(sheets.events.contains("Fecha"));
        assert!(sheets.users.contains("Nivel de Sospecha"));
        assert!(sheets.subjects.contains("Nivel de Exposición"));
    }

    #[test]
    fn test_empty_report_yields_header_only_sheets() {
        let sheets = CsvSheets::from_report(&AuditReport::from_text(""));
        assert_eq!(sheets.events.lines().count(), 1);
        assert_eq!(sheets.users.lines().count(), 1);
        assert_eq!(sheets.subjects.lines().count(), 1);
    }
}
