use cruzeiro_stats::io::excel_read::{InMemoryWorkbook, WorkbookSource};
use cruzeiro_stats::model::{
    CellValue, CompetitionSelection, ReportMode, SheetTable, SheetWarning, WarningKind,
};
use cruzeiro_stats::{Result, StatsError};
use cruzeiro_stats::orchestrate::{ReportRequest, parse_year_filter, run_report, select_sheets};
use cruzeiro_stats::report::{GeneralRow, RankingEntry, ReportBody, YearCell};

const HEADERS: [&str; 5] = ["Gols", "Assistências", "Partida", " Campeonato", "ANO "];

fn text(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Empty
    } else {
        CellValue::String(value.to_string())
    }
}

fn row(goals: &str, assists: &str, label: &str, competition: &str, year: CellValue) -> Vec<CellValue> {
    vec![text(goals), text(assists), text(label), text(competition), year]
}

fn sheet(name: &str, rows: Vec<Vec<CellValue>>) -> SheetTable {
    let headers: Vec<String> = HEADERS.iter().map(|header| header.to_string()).collect();
    SheetTable::new(name, &headers, rows)
}

fn year(value: i32) -> CellValue {
    CellValue::Number(f64::from(value))
}

fn scenario_workbook() -> InMemoryWorkbook {
    InMemoryWorkbook::new(vec![sheet(
        "2023",
        vec![row("Ana; Ana", "Bia", "Final", "Copa", year(2023))],
    )])
}

fn general_rows(body: &ReportBody) -> &[GeneralRow] {
    match body {
        ReportBody::General(rows) => rows,
        other => panic!("expected general rows, got {other:?}"),
    }
}

fn ranking_rows(body: &ReportBody) -> &[RankingEntry] {
    match body {
        ReportBody::Ranking(rows) => rows,
        other => panic!("expected ranking rows, got {other:?}"),
    }
}

fn lines(body: &ReportBody) -> &[String] {
    match body {
        ReportBody::Lines(lines) => lines,
        other => panic!("expected lines, got {other:?}"),
    }
}

#[test]
fn general_numbers_scenario_appends_subtotal_and_grand_total() {
    let mut workbook = scenario_workbook();
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("Ana");
    let report = run_report(&mut workbook, &request).expect("report computed");

    assert_eq!(
        general_rows(&report.body),
        &[
            GeneralRow {
                competition: "Copa".into(),
                year: YearCell::Year(2023),
                goals: 2,
                assists: 0,
            },
            GeneralRow {
                competition: "Copa".into(),
                year: YearCell::Total,
                goals: 2,
                assists: 0,
            },
            GeneralRow {
                competition: "Total Geral".into(),
                year: YearCell::Blank,
                goals: 2,
                assists: 0,
            },
        ]
    );
    assert!(report.warnings.is_empty());
    assert_eq!(report.title, "Números Gerais de Ana");
}

#[test]
fn ranking_scenario_orders_by_total() {
    let mut workbook = scenario_workbook();
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");

    let entries = ranking_rows(&report.body);
    assert_eq!(entries.len(), 2);
    assert_eq!((entries[0].rank, entries[0].player.as_str()), (1, "Ana"));
    assert_eq!((entries[0].goals, entries[0].assists, entries[0].total), (2, 0, 2));
    assert_eq!((entries[1].rank, entries[1].player.as_str()), (2, "Bia"));
    assert_eq!((entries[1].goals, entries[1].assists, entries[1].total), (0, 1, 1));
}

#[test]
fn ranking_breaks_ties_by_goals_then_assists_then_first_seen() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Liga",
        vec![
            row("Caio", "Davi", "R1", "Liga", year(2022)),
            row("Davi", "Caio; Edu", "R2", "Liga", year(2022)),
            row("Edu; Fábio", "Penalti; Sem assistência", "R3", "Liga", year(2022)),
        ],
    )]);
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");

    let entries = ranking_rows(&report.body);
    let order: Vec<(&str, usize)> = entries
        .iter()
        .map(|entry| (entry.player.as_str(), entry.rank))
        .collect();
    // Caio, Davi and Edu tie on every key and keep first-seen order.
    assert_eq!(
        order,
        vec![("Caio", 1), ("Davi", 2), ("Edu", 3), ("Fábio", 4)]
    );
    for pair in entries.windows(2) {
        let lhs = (pair[0].total, pair[0].goals, pair[0].assists);
        let rhs = (pair[1].total, pair[1].goals, pair[1].assists);
        assert!(lhs >= rhs);
    }
}

#[test]
fn ranking_keeps_differently_cased_names_apart() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Liga",
        vec![row("Ana; ana; Ana", "", "R1", "Liga", year(2022))],
    )]);
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");

    let entries = ranking_rows(&report.body);
    assert_eq!(entries.len(), 2);
    assert_eq!((entries[0].player.as_str(), entries[0].goals), ("Ana", 2));
    assert_eq!((entries[1].player.as_str(), entries[1].goals), ("ana", 1));
}

#[test]
fn ranking_merges_counts_across_sheets() {
    let mut workbook = InMemoryWorkbook::new(vec![
        sheet("Copa", vec![row("Ana", "Bia", "F", "Copa", year(2022))]),
        sheet("Liga", vec![row("Bia; Ana", "Ana", "R1", "Liga", year(2023))]),
    ]);
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");

    let entries = ranking_rows(&report.body);
    assert_eq!(entries[0].player, "Ana");
    assert_eq!((entries[0].goals, entries[0].assists), (2, 1));
    assert_eq!(entries[1].player, "Bia");
    assert_eq!((entries[1].goals, entries[1].assists), (1, 1));
}

#[test]
fn sheet_missing_columns_is_skipped_with_one_warning() {
    let broken = SheetTable::new(
        "Amistosos",
        &["Gols".to_string(), "Partida".to_string()],
        vec![vec![text("Ana"), text("Jogo")]],
    );
    let mut workbook = InMemoryWorkbook::new(vec![
        broken,
        sheet("Copa", vec![row("Ana", "", "Final", "Copa", year(2023))]),
    ]);
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("ana");
    let report = run_report(&mut workbook, &request).expect("report computed");

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].sheet, "Amistosos");
    assert_eq!(
        report.warnings[0].kind,
        WarningKind::MissingColumns(vec![
            "assistências".to_string(),
            "campeonato".to_string(),
            "ano".to_string(),
        ])
    );
    let rows = general_rows(&report.body);
    assert_eq!(rows.last().map(|row| row.goals), Some(1));
}

#[test]
fn ranking_only_needs_one_participation_column() {
    let goals_only = SheetTable::new(
        "Base",
        &["Gols".to_string()],
        vec![vec![text("Ana")]],
    );
    let nothing = SheetTable::new("Vazia", &["Partida".to_string()], vec![]);
    let mut workbook = InMemoryWorkbook::new(vec![goals_only, nothing]);
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");

    assert_eq!(ranking_rows(&report.body).len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        report.warnings[0].kind,
        WarningKind::MissingColumns(vec!["gols".to_string(), "assistências".to_string()])
    );
}

#[test]
fn general_numbers_drops_rows_with_unparseable_year() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Copa",
        vec![
            row("Ana", "", "J1", "Copa", year(2022)),
            row("Ana", "", "J2", "Copa", text("sem data")),
            row("Ana", "", "J3", "Copa", CellValue::Empty),
            row("Ana", "", "J4", "Copa", text("2022")),
        ],
    )]);
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("Ana");
    let report = run_report(&mut workbook, &request).expect("report computed");

    let rows = general_rows(&report.body);
    assert_eq!(rows[0].year, YearCell::Year(2022));
    assert_eq!(rows[0].goals, 2);
    assert_eq!(rows.len(), 3);
}

#[test]
fn fractional_years_are_truncated() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Copa",
        vec![
            row("Ana", "", "J1", "Copa", CellValue::Number(2022.7)),
            row("Ana", "", "J2", "Copa", text("2022.2")),
        ],
    )]);
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("Ana");
    let report = run_report(&mut workbook, &request).expect("report computed");

    let rows = general_rows(&report.body);
    assert_eq!(rows[0].year, YearCell::Year(2022));
    assert_eq!(rows[0].goals, 2);
    assert_eq!(rows.len(), 3);
}

/// Workbook whose sheet list names a sheet that fails to load.
struct BrokenSheetWorkbook {
    names: Vec<String>,
    inner: InMemoryWorkbook,
    broken: &'static str,
}

impl WorkbookSource for BrokenSheetWorkbook {
    fn sheet_names(&self) -> &[String] {
        &self.names
    }

    fn read_sheet(&mut self, name: &str) -> Result<&SheetTable> {
        if name == self.broken {
            return Err(StatsError::InvalidWorkbook(format!("corrupt sheet '{name}'")));
        }
        self.inner.read_sheet(name)
    }
}

#[test]
fn unreadable_sheet_is_skipped_with_one_warning() {
    let mut workbook = BrokenSheetWorkbook {
        names: vec!["Copa".to_string(), "Liga".to_string(), "Estadual".to_string()],
        inner: InMemoryWorkbook::new(vec![
            sheet("Copa", vec![row("Ana", "", "J1", "Copa", year(2023))]),
            sheet("Estadual", vec![row("Ana; Bia", "", "J2", "Estadual", year(2023))]),
        ]),
        broken: "Liga",
    };
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");

    let totals: Vec<(&str, u32)> = ranking_rows(&report.body)
        .iter()
        .map(|entry| (entry.player.as_str(), entry.total))
        .collect();
    assert_eq!(totals, vec![("Ana", 2), ("Bia", 1)]);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].sheet, "Liga");
    assert!(matches!(
        &report.warnings[0].kind,
        WarningKind::Unreadable(message) if message.contains("corrupt sheet 'Liga'")
    ));
}

#[test]
fn general_numbers_lists_each_competition_with_its_subtotal() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Mistura",
        vec![
            row("Ana", "", "J1", "Liga", year(2023)),
            row("", "Ana", "J2", "Copa", year(2022)),
            row("Ana", "", "J3", "Liga", year(2022)),
            row("Bia", "", "J4", "Copa", year(2021)),
        ],
    )]);
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("Ana");
    let report = run_report(&mut workbook, &request).expect("report computed");

    let summary: Vec<(&str, YearCell, u32, u32)> = general_rows(&report.body)
        .iter()
        .map(|row| (row.competition.as_str(), row.year, row.goals, row.assists))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Liga", YearCell::Year(2023), 1, 0),
            ("Liga", YearCell::Year(2022), 1, 0),
            ("Liga", YearCell::Total, 2, 0),
            ("Copa", YearCell::Year(2022), 0, 1),
            ("Copa", YearCell::Total, 0, 1),
            ("Total Geral", YearCell::Blank, 2, 1),
        ]
    );
}

#[test]
fn games_report_emits_one_line_per_participation_sorted() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Copa",
        vec![
            row("Ana; Ana", "Bia", "Final", "Copa", year(2023)),
            row("Bia", "Ana", "Semi", "Copa", year(2022)),
            row("Ana Paula", "", "Quartas", "Copa", year(2021)),
            row("Ana", "", "Oitavas", "Copa", text("?")),
        ],
    )]);
    let request = ReportRequest::new(ReportMode::GamesWithParticipation).with_player(" ana ");
    let report = run_report(&mut workbook, &request).expect("report computed");

    assert_eq!(
        lines(&report.body),
        &[
            "⚽ Gol: 2023 - Copa - Final".to_string(),
            "⚽ Gol: 2023 - Copa - Final".to_string(),
            "⚽ Gol: N/A - Copa - Oitavas".to_string(),
            "👟 Assistência: 2022 - Copa - Semi".to_string(),
        ]
    );
    assert_eq!(report.numbered_lines()[0], "1. ⚽ Gol: 2023 - Copa - Final");
}

#[test]
fn event_lists_scan_every_sheet_whatever_the_competition() {
    let mut workbook = InMemoryWorkbook::new(vec![
        sheet("Copa", vec![row("Ana", "Ana", "Final", "Copa", year(2023))]),
        sheet("Liga", vec![row("Ana", "", "R1", "Liga", year(2022))]),
    ]);
    let request = ReportRequest::new(ReportMode::GoalList)
        .with_player("Ana")
        .with_competition(CompetitionSelection::Named("Copa".into()));
    let report = run_report(&mut workbook, &request).expect("report computed");

    assert_eq!(
        lines(&report.body),
        &["⚽ 2022 - Liga - R1".to_string(), "⚽ 2023 - Copa - Final".to_string()]
    );

    let request = ReportRequest::new(ReportMode::AssistList)
        .with_player("Ana")
        .with_year(Some(2023));
    let report = run_report(&mut workbook, &request).expect("report computed");
    assert_eq!(lines(&report.body), &["👟 2023 - Copa - Final".to_string()]);
}

#[test]
fn year_filter_restricts_ranking_by_year() {
    let rows = vec![
        row("Ana", "", "J1", "Liga", year(2022)),
        row("Bia", "", "J2", "Liga", year(2023)),
        row("Caio", "", "J3", "Liga", text("desconhecido")),
    ];
    let mut workbook = InMemoryWorkbook::new(vec![sheet("Liga", rows)]);

    let filtered = ReportRequest::new(ReportMode::RankingByYear).with_year(Some(2023));
    let report = run_report(&mut workbook, &filtered).expect("report computed");
    let players: Vec<&str> = ranking_rows(&report.body)
        .iter()
        .map(|entry| entry.player.as_str())
        .collect();
    assert_eq!(players, vec!["Bia"]);

    let unfiltered = ReportRequest::new(ReportMode::RankingByYear);
    let report = run_report(&mut workbook, &unfiltered).expect("report computed");
    assert_eq!(ranking_rows(&report.body).len(), 3);
}

#[test]
fn ranking_by_year_requires_year_column_only_when_filtering() {
    let no_year = SheetTable::new("Antigos", &["Gols".to_string()], vec![vec![text("Ana")]]);
    let mut workbook = InMemoryWorkbook::new(vec![no_year]);

    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::RankingByYear))
        .expect("report computed");
    assert_eq!(ranking_rows(&report.body).len(), 1);
    assert!(report.warnings.is_empty());

    let filtered = ReportRequest::new(ReportMode::RankingByYear).with_year(Some(2020));
    let report = run_report(&mut workbook, &filtered).expect("report computed");
    assert!(report.is_empty());
    assert_eq!(
        report.warnings[0].kind,
        WarningKind::MissingColumns(vec!["ano".to_string()])
    );
}

#[test]
fn competition_selection_scopes_ranking_to_one_sheet() {
    let mut workbook = InMemoryWorkbook::new(vec![
        sheet("Copa", vec![row("Ana", "", "Final", "Copa", year(2023))]),
        sheet("Liga", vec![row("Bia", "", "R1", "Liga", year(2023))]),
    ]);
    let request = ReportRequest::new(ReportMode::Ranking)
        .with_competition(CompetitionSelection::from_label("Liga"));
    let report = run_report(&mut workbook, &request).expect("report computed");

    let players: Vec<&str> = ranking_rows(&report.body)
        .iter()
        .map(|entry| entry.player.as_str())
        .collect();
    assert_eq!(players, vec!["Bia"]);
    assert_eq!(report.title, "Ranking de Participações - Competição: Liga");
}

#[test]
fn unknown_competition_yields_empty_report_with_warning() {
    let mut workbook = scenario_workbook();
    let request = ReportRequest::new(ReportMode::Ranking)
        .with_competition(CompetitionSelection::from_label("Liga"));
    let report = run_report(&mut workbook, &request).expect("report computed");

    assert!(report.is_empty());
    assert_eq!(
        report.warnings,
        vec![SheetWarning {
            sheet: "Liga".to_string(),
            kind: WarningKind::UnknownCompetition,
        }]
    );
    assert_eq!(
        report.empty_message(),
        "Nenhum jogador com participação válida encontrado para a competição 'Liga'."
    );

    let names = vec!["2023".to_string()];
    let listing = select_sheets(
        &names,
        ReportMode::GoalList,
        &CompetitionSelection::Named("Liga".into()),
    )
    .expect("lists ignore the competition");
    assert_eq!(listing, names);
}

#[test]
fn player_modes_require_a_player() {
    let mut workbook = scenario_workbook();
    let request = ReportRequest::new(ReportMode::GoalList).with_player("   ");
    let result = run_report(&mut workbook, &request);
    assert!(matches!(
        result,
        Err(StatsError::PlayerRequired(ReportMode::GoalList))
    ));
}

#[test]
fn unknown_player_yields_empty_report_with_message() {
    let mut workbook = scenario_workbook();
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("Zé");
    let report = run_report(&mut workbook, &request).expect("report computed");

    assert!(report.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(
        report.empty_message(),
        "Nenhuma participação em gols ou assistências encontrada para 'Zé' nos filtros selecionados."
    );
}

#[test]
fn non_text_participant_cells_count_as_zero() {
    let mut workbook = InMemoryWorkbook::new(vec![sheet(
        "Copa",
        vec![vec![
            CellValue::Number(7.0),
            CellValue::Boolean(true),
            text("Final"),
            text("Copa"),
            year(2023),
        ]],
    )]);
    let report = run_report(&mut workbook, &ReportRequest::new(ReportMode::Ranking))
        .expect("report computed");
    assert!(report.is_empty());
}

#[test]
fn year_filter_text_falls_back_to_no_filter() {
    assert_eq!(parse_year_filter(" 2023 "), Some(2023));
    assert_eq!(parse_year_filter(""), None);
    assert_eq!(parse_year_filter("dois mil"), None);
}

#[test]
fn general_report_serializes_sentinel_years() {
    let mut workbook = scenario_workbook();
    let request = ReportRequest::new(ReportMode::GeneralNumbers).with_player("Ana");
    let report = run_report(&mut workbook, &request).expect("report computed");

    let json = serde_json::to_value(&report.body).expect("serialized");
    let rows = json["rows"].as_array().expect("rows array");
    assert_eq!(rows[0]["Ano"], serde_json::json!(2023));
    assert_eq!(rows[1]["Ano"], serde_json::json!("Total"));
    assert_eq!(rows[2]["Competição"], serde_json::json!("Total Geral"));
    assert_eq!(rows[2]["Ano"], serde_json::json!(""));
    assert_eq!(rows[2]["Gols"], serde_json::json!(2));
}

#[test]
fn ranking_tally_skips_noise_tokens() {
    use cruzeiro_stats::aggregate;
    use cruzeiro_stats::model::{MatchRecord, PlayerTally};

    let records = vec![MatchRecord {
        scorers: Some("Ana; nan; Gol contra; ; Ana".into()),
        assists: Some("Sem ass; Bia".into()),
        ..MatchRecord::default()
    }];
    let tally = aggregate::ranking(&records);

    assert_eq!(tally.len(), 2);
    assert_eq!(tally.get("Ana"), Some(PlayerTally { goals: 2, assists: 0 }));
    assert_eq!(tally.get("Bia"), Some(PlayerTally { goals: 0, assists: 1 }));
    assert_eq!(tally.get("Gol contra"), None);
}
