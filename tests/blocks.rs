use perf_import::blocks::{MetricKind, parse_blocks};
use perf_import::dates::date_columns;
use perf_import::model::{Player, PlayerId, Score, round2};
use perf_import::names::PlayerMatcher;
use perf_import::sheet::{Cell, Grid};

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

fn num(v: f64) -> Cell {
    Cell::Number(v)
}

fn header() -> Vec<Cell> {
    vec![
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        text("1/5/25"),
        text("1/12/25"),
    ]
}

fn metric_row(name: Option<&str>, kind: &str, a: Cell, b: Cell) -> Vec<Cell> {
    vec![
        name.map(text).unwrap_or_default(),
        Cell::Empty,
        Cell::Empty,
        text(kind),
        a,
        b,
    ]
}

fn matcher() -> PlayerMatcher {
    PlayerMatcher::from_players(&[
        Player {
            id: PlayerId::from("p-ana"),
            display_name: Some("Ana Lopez".to_string()),
        },
        Player {
            id: PlayerId::from("p-ben"),
            display_name: Some("Ben Okafor".to_string()),
        },
    ])
}

#[test]
fn metric_labels_are_case_and_space_insensitive() {
    assert_eq!(MetricKind::from_label(" Raw Score "), Some(MetricKind::RawScore));
    assert_eq!(MetricKind::from_label("RANKING"), Some(MetricKind::Ranking));
    assert_eq!(MetricKind::from_label("reward"), Some(MetricKind::Reward));
    assert_eq!(MetricKind::from_label("bonus"), None);
}

#[test]
fn groups_rows_into_player_blocks() {
    let grid = Grid::from_rows(vec![
        header(),
        metric_row(Some("Ana Lopez"), "Raw Score", num(85.0), num(85.5)),
        metric_row(None, "Ranking", num(3.9), Cell::Empty),
        metric_row(None, "Reward", num(12.346), text("n/a")),
        metric_row(Some("ben okafor"), "raw score", num(0.0), Cell::Empty),
        metric_row(None, "ranking", num(0.0), num(7.0)),
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());

    assert_eq!(parsed.records.len(), 3);

    let first = &parsed.records[0];
    assert_eq!(first.player_id, PlayerId::from("p-ana"));
    assert_eq!(first.match_date, "2025-01-05");
    assert_eq!(first.raw_score, Some(Score::Int(85)));
    assert_eq!(first.ranking, Some(3));
    assert_eq!(first.reward, Some(12.35));

    let second = &parsed.records[1];
    assert_eq!(second.match_date, "2025-01-12");
    assert_eq!(second.raw_score, Some(Score::Decimal(85.5)));
    assert_eq!(second.ranking, None);
    assert_eq!(second.reward, None);

    // Ben's first date is all zeros and is dropped.
    let third = &parsed.records[2];
    assert_eq!(third.player_id, PlayerId::from("p-ben"));
    assert_eq!(third.match_date, "2025-01-12");
    assert_eq!(third.ranking, Some(7));

    assert_eq!(parsed.matched.len(), 2);
    assert!(parsed.skipped.is_empty());
}

#[test]
fn unmatched_players_are_skipped_with_their_rows() {
    let grid = Grid::from_rows(vec![
        header(),
        metric_row(
            Some("Alexander Hughes McDonald Smith Jones"),
            "raw score",
            num(50.0),
            num(60.0),
        ),
        metric_row(None, "reward", num(1.0), num(2.0)),
        metric_row(Some("Ana Lopez"), "reward", num(4.0), Cell::Empty),
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());

    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].player_id, PlayerId::from("p-ana"));
    assert_eq!(parsed.records[0].reward, Some(4.0));
    assert!(
        parsed
            .skipped
            .contains("Alexander Hughes McDonald Smith Jones")
    );
}

#[test]
fn rows_before_first_player_and_unknown_labels_are_ignored() {
    let grid = Grid::from_rows(vec![
        header(),
        metric_row(None, "raw score", num(10.0), num(10.0)),
        metric_row(Some("Ana Lopez"), "", Cell::Empty, Cell::Empty),
        metric_row(None, "bonus", num(99.0), num(99.0)),
        metric_row(None, "ranking", text(" 4 "), text("first")),
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());

    assert_eq!(parsed.records.len(), 1);
    let record = &parsed.records[0];
    assert_eq!(record.match_date, "2025-01-05");
    assert_eq!(record.ranking, Some(4));
    assert_eq!(record.raw_score, None);
}

#[test]
fn later_rows_overwrite_the_same_metric() {
    let grid = Grid::from_rows(vec![
        header(),
        metric_row(Some("Ana Lopez"), "reward", num(1.0), Cell::Empty),
        metric_row(None, "reward", num(2.5), Cell::Empty),
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].reward, Some(2.5));
}

#[test]
fn record_serializes_all_fields() {
    let grid = Grid::from_rows(vec![
        header(),
        metric_row(Some("Ana Lopez"), "raw score", num(85.0), num(85.5)),
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());

    let json = serde_json::to_value(&parsed.records).expect("records serialize");
    assert_eq!(
        json,
        serde_json::json!([
            {
                "player_id": "p-ana",
                "match_date": "2025-01-05",
                "raw_score": 85,
                "ranking": null,
                "reward": null
            },
            {
                "player_id": "p-ana",
                "match_date": "2025-01-12",
                "raw_score": 85.5,
                "ranking": null,
                "reward": null
            }
        ])
    );
}

#[test]
fn two_decimal_rounding_follows_the_exact_decimal_value() {
    assert_eq!(round2(0.125), 0.12);
    assert_eq!(round2(2.675), 2.67);
    assert_eq!(round2(85.125), 85.12);
    assert_eq!(round2(12.346), 12.35);
    assert_eq!(Score::from_value(85.125), Score::Decimal(85.12));

    let grid = Grid::from_rows(vec![
        header(),
        metric_row(Some("Ana Lopez"), "reward", num(0.125), num(2.675)),
        metric_row(None, "raw score", num(85.125), Cell::Empty),
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());

    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].reward, Some(0.12));
    assert_eq!(parsed.records[0].raw_score, Some(Score::Decimal(85.12)));
    assert_eq!(parsed.records[1].reward, Some(2.67));
}

#[test]
fn repeated_header_date_shares_one_record() {
    let grid = Grid::from_rows(vec![
        vec![
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            text("1/5/25"),
            text("01/05/2025"),
        ],
        metric_row(Some("Ana Lopez"), "raw score", num(40.0), num(45.0)),
        metric_row(None, "ranking", num(2.0), Cell::Empty),
    ]);
    let dates = date_columns(&grid);
    assert_eq!(dates.len(), 2);

    let parsed = parse_blocks(&grid, &dates, &matcher());
    assert_eq!(parsed.records.len(), 1);
    let record = &parsed.records[0];
    assert_eq!(record.match_date, "2025-01-05");
    assert_eq!(record.raw_score, Some(Score::Int(45)));
    assert_eq!(record.ranking, Some(2));
}

#[test]
fn numeric_name_cell_keeps_decimal_form() {
    let grid = Grid::from_rows(vec![
        header(),
        vec![num(5.0), Cell::Empty, Cell::Empty, text("reward"), num(1.0)],
    ]);
    let dates = date_columns(&grid);
    let parsed = parse_blocks(&grid, &dates, &matcher());

    assert!(parsed.records.is_empty());
    assert!(parsed.skipped.contains("5.0"));
}
