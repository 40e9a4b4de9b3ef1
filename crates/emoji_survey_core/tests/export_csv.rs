use chrono::NaiveDate;
use emoji_survey_core::db::open_db_in_memory;
use emoji_survey_core::{
    render_csv, write_export, ExportError, Frequency, Gender, Impact, ServiceError,
    SqliteResponseRepository, SurveyResponse, SurveyService, CSV_HEADERS,
};

fn response(id: &str) -> SurveyResponse {
    SurveyResponse {
        id: id.to_string(),
        timestamp: "2024-02-10T08:30:00.000Z".to_string(),
        frequency: Frequency::Rarely,
        clarity_impact: Impact::Neutral,
        tone_influence: Impact::Positive,
        professional_context: Impact::Negative,
        age: 64,
        gender: Gender::NonBinary,
    }
}

fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()
}

#[test]
fn empty_dataset_is_an_error() {
    assert!(matches!(render_csv(&[]), Err(ExportError::EmptyDataset)));
}

#[test]
fn single_response_yields_header_and_one_row() {
    let csv = render_csv(&[response("r-1")]).unwrap();
    let lines: Vec<_> = csv.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "ID,Data/Hora,Frequência,Impacto na Clareza,Influência no Tom,Contexto Profissional,Idade,Gênero"
    );
    assert_eq!(lines[0], CSV_HEADERS.join(","));
    assert_eq!(
        lines[1],
        "r-1,2024-02-10T08:30:00.000Z,rarely,neutral,positive,negative,64,non-binary"
    );
    assert_eq!(lines[1].split(',').count(), 8);
    assert!(!csv.ends_with('\n'));
}

#[test]
fn ids_with_commas_are_quoted() {
    let csv = render_csv(&[response("a,b")]).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("\"a,b\","));
}

#[test]
fn service_export_uses_store_order_and_dated_file_name() {
    let conn = open_db_in_memory().unwrap();
    let service = SurveyService::new(SqliteResponseRepository::try_new(&conn).unwrap());

    let err = service.export_all(export_date()).unwrap_err();
    assert!(matches!(err, ServiceError::EmptyDataset));

    service.submit_response(&response("first")).unwrap();
    service.submit_response(&response("second")).unwrap();

    let export = service.export_all(export_date()).unwrap();
    assert_eq!(export.file_name, "emoji_survey_2024-02-11.csv");
    assert_eq!(export.row_count, 2);
    let rows: Vec<_> = export.content.lines().skip(1).collect();
    assert!(rows[0].starts_with("first,"));
    assert!(rows[1].starts_with("second,"));
}

#[test]
fn export_is_written_as_utf8_file() {
    let conn = open_db_in_memory().unwrap();
    let service = SurveyService::new(SqliteResponseRepository::try_new(&conn).unwrap());
    service.submit_response(&response("r-1")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let (path, export) = service.export_to_dir(dir.path(), export_date()).unwrap();

    assert_eq!(path, dir.path().join("emoji_survey_2024-02-11.csv"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, export.content);
    assert!(written.contains("Gênero"));

    let again = write_export(dir.path(), &export).unwrap();
    assert_eq!(again, path);
}
