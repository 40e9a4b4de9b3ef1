use emoji_survey_core::{
    dashboard_summary, distribution_by_age_bracket, distribution_by_clarity, distribution_by_day,
    distribution_by_gender, AgeBracket, AgeBracketDistribution, Frequency, Gender,
    GenderDistribution, Impact, ImpactDistribution, SurveyResponse,
};

fn response(
    id: usize,
    clarity: Impact,
    age: u8,
    gender: Gender,
    timestamp: &str,
) -> SurveyResponse {
    SurveyResponse {
        id: format!("r-{id}"),
        timestamp: timestamp.to_string(),
        frequency: Frequency::Weekly,
        clarity_impact: clarity,
        tone_influence: Impact::Neutral,
        professional_context: Impact::Neutral,
        age,
        gender,
    }
}

fn with_ages(ages: &[u8]) -> Vec<SurveyResponse> {
    ages.iter()
        .enumerate()
        .map(|(index, age)| {
            response(
                index,
                Impact::Positive,
                *age,
                Gender::Other,
                "2024-01-01T10:00:00Z",
            )
        })
        .collect()
}

#[test]
fn empty_input_yields_zero_filled_structures() {
    assert_eq!(distribution_by_clarity(&[]), ImpactDistribution::default());
    assert_eq!(
        distribution_by_age_bracket(&[]),
        AgeBracketDistribution::default()
    );
    assert_eq!(distribution_by_gender(&[]), GenderDistribution::default());
    assert!(distribution_by_day(&[]).is_empty());

    let summary = dashboard_summary(&[]);
    assert_eq!(summary.total_responses, 0);
    assert_eq!(summary.clarity.total(), 0);
}

#[test]
fn clarity_counts_sum_to_number_of_responses() {
    let responses = vec![
        response(1, Impact::Positive, 20, Gender::Male, "2024-01-01T10:00:00Z"),
        response(2, Impact::Positive, 20, Gender::Male, "2024-01-01T10:00:00Z"),
        response(3, Impact::Neutral, 20, Gender::Male, "2024-01-01T10:00:00Z"),
        response(4, Impact::Negative, 20, Gender::Male, "2024-01-01T10:00:00Z"),
    ];

    let counts = distribution_by_clarity(&responses);
    assert_eq!(counts.positive, 2);
    assert_eq!(counts.neutral, 1);
    assert_eq!(counts.negative, 1);
    assert_eq!(counts.total(), responses.len() as u64);
    assert_eq!(counts.get(Impact::Neutral), 1);
}

#[test]
fn one_age_per_bracket_fills_each_bracket_once() {
    let counts = distribution_by_age_bracket(&with_ages(&[20, 30, 40, 50, 60]));

    for bracket in AgeBracket::ALL {
        assert_eq!(counts.get(bracket), 1, "bracket {}", bracket.label());
    }
    assert_eq!(
        counts.entries(),
        vec![
            ("18-25", 1),
            ("26-35", 1),
            ("36-45", 1),
            ("46-55", 1),
            ("56+", 1)
        ]
    );
}

#[test]
fn teenage_ages_fall_into_no_bracket() {
    let counts = distribution_by_age_bracket(&with_ages(&[13, 15, 17, 18]));
    assert_eq!(counts.from_18_to_25, 1);
    let bucketed: u64 = counts.entries().iter().map(|(_, count)| count).sum();
    assert_eq!(bucketed, 1);
}

#[test]
fn gender_counts_cover_all_five_values() {
    let responses: Vec<_> = Gender::ALL
        .iter()
        .chain([Gender::NonBinary].iter())
        .enumerate()
        .map(|(index, gender)| {
            response(index, Impact::Positive, 30, *gender, "2024-01-01T10:00:00Z")
        })
        .collect();

    let counts = distribution_by_gender(&responses);
    assert_eq!(counts.male, 1);
    assert_eq!(counts.female, 1);
    assert_eq!(counts.non_binary, 2);
    assert_eq!(counts.prefer_not_to_say, 1);
    assert_eq!(counts.other, 1);
}

#[test]
fn day_distribution_groups_by_date_prefix() {
    let responses = vec![
        response(1, Impact::Positive, 30, Gender::Male, "2024-01-01T10:00:00Z"),
        response(2, Impact::Positive, 30, Gender::Male, "2024-01-01T11:00:00Z"),
        response(3, Impact::Positive, 30, Gender::Male, "2024-01-02T09:00:00Z"),
    ];

    let counts = distribution_by_day(&responses);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts["2024-01-01"], 2);
    assert_eq!(counts["2024-01-02"], 1);
}

#[test]
fn day_distribution_skips_malformed_timestamps() {
    let responses = vec![
        response(1, Impact::Positive, 30, Gender::Male, "2024-01-01T10:00:00Z"),
        response(2, Impact::Positive, 30, Gender::Male, "garbage"),
        response(3, Impact::Positive, 30, Gender::Male, ""),
    ];

    let counts = distribution_by_day(&responses);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts["2024-01-01"], 1);
}

#[test]
fn summary_serializes_with_chart_labels() {
    let responses = vec![response(
        1,
        Impact::Negative,
        57,
        Gender::PreferNotToSay,
        "2024-05-05T12:00:00Z",
    )];

    let value = serde_json::to_value(dashboard_summary(&responses)).unwrap();
    assert_eq!(value["totalResponses"], 1);
    assert_eq!(value["clarity"]["negative"], 1);
    assert_eq!(value["ageBrackets"]["56+"], 1);
    assert_eq!(value["gender"]["prefer-not-to-say"], 1);
    assert_eq!(value["daily"]["2024-05-05"], 1);
}
