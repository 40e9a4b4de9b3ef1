use emoji_survey_core::db::open_db_in_memory;
use emoji_survey_core::{ResponseRepository, SqliteResponseRepository, SurveyDraft};

#[test]
fn save_then_get_roundtrips_partial_draft() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteResponseRepository::try_new(&conn).unwrap();

    let draft = SurveyDraft {
        frequency: Some("daily".to_string()),
        clarity_impact: Some("neutral".to_string()),
        age: Some(27),
        ..SurveyDraft::default()
    };
    repo.save_draft(&draft).unwrap();

    assert_eq!(repo.get_draft().unwrap(), Some(draft));
}

#[test]
fn save_overwrites_previous_draft() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteResponseRepository::try_new(&conn).unwrap();

    repo.save_draft(&SurveyDraft {
        frequency: Some("daily".to_string()),
        ..SurveyDraft::default()
    })
    .unwrap();
    let newer = SurveyDraft {
        frequency: Some("rarely".to_string()),
        gender: Some("male".to_string()),
        ..SurveyDraft::default()
    };
    repo.save_draft(&newer).unwrap();

    assert_eq!(repo.get_draft().unwrap(), Some(newer));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM survey_drafts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn clear_then_get_returns_none_and_clear_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteResponseRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_draft().unwrap(), None);
    repo.save_draft(&SurveyDraft {
        tone_influence: Some("positive".to_string()),
        ..SurveyDraft::default()
    })
    .unwrap();

    repo.clear_draft().unwrap();
    assert_eq!(repo.get_draft().unwrap(), None);
    repo.clear_draft().unwrap();
}

#[test]
fn drafts_keep_unvalidated_answers() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteResponseRepository::try_new(&conn).unwrap();

    let draft = SurveyDraft {
        frequency: Some("hourly".to_string()),
        age: Some(500),
        ..SurveyDraft::default()
    };
    repo.save_draft(&draft).unwrap();

    assert_eq!(repo.get_draft().unwrap(), Some(draft));
}
