// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use adpilot::baseline::single_date_view;
use adpilot::changes::Proposal;
use adpilot::control::{merge_controls, normalize_controls};
use adpilot::error::Error;
use adpilot::filter::{Filters, Selection, StatusFilter, effective_status, filter_options};
use adpilot::identity::UNKNOWN;
use adpilot::models::{RawTable, ViewMode};
use adpilot::normalize::normalize;
use adpilot::pipeline::{Request, Scope, build_report};
use adpilot::range::{DatePreset, aggregate, range_view};
use adpilot::ratio::format_ratio;
use adpilot::sources::{ControlSource, TableSource};
use adpilot::summary::Totals;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

const PERF_HEADER: [&str; 5] = ["Date", "Ad Name", "Spend (USD)", "Revenue (USD)", "ROAS"];
const CONTROL_HEADER: [&str; 4] = ["Ad Name", "Ad Set ID", "Current Budget (ILS)", "Current Status"];

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn perf(rows: &[[&str; 5]]) -> RawTable {
    RawTable::from_rows(PERF_HEADER, rows.iter().map(|r| r.to_vec()))
}

fn control(rows: &[[&str; 4]]) -> RawTable {
    RawTable::from_rows(CONTROL_HEADER, rows.iter().map(|r| r.to_vec()))
}

#[test]
fn normalizes_the_documented_example() {
    let table = perf(&[[
        "2024-01-10",
        "3-ch001_shop_auction_electronics_us_en",
        "100",
        "150",
        "",
    ]]);
    let (records, report) = normalize(&table);
    assert_eq!(report.rows, 1);
    assert!(report.degraded_names.is_empty());
    let r = &records[0];
    assert_eq!(r.date, Some(day("2024-01-10")));
    assert_eq!(r.identity.account, "3");
    assert_eq!(r.channel_id, "ch001");
    assert_eq!(r.identity.domain, "shop");
    assert_eq!(r.identity.buying_method, "auction");
    assert_eq!(r.identity.category, "electronics");
    assert_eq!(r.identity.locale, "us_en");
    assert_eq!(r.profit, d("50"));

    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    assert_eq!(view.rows[0].ratio, d("1.5"));
    assert_eq!(view.rows[0].profit, d("50"));
}

#[test]
fn missing_columns_and_bad_numbers_become_defaults() {
    let table = RawTable::from_rows(
        ["Ad Name", "Spend (USD)", "Profit (USD)"],
        [vec!["1-c1_d_b_c", "abc", "999"], vec!["weird name", "", "1"]],
    );
    let (records, report) = normalize(&table);
    assert_eq!(records[0].spend, Decimal::ZERO);
    assert_eq!(records[0].revenue, Decimal::ZERO);
    // profit column is never trusted
    assert_eq!(records[0].profit, Decimal::ZERO);
    assert_eq!(records[0].date, None);
    assert_eq!(records[0].channel_id, "c1");
    assert_eq!(records[1].channel_id, "");
    assert_eq!(records[1].identity.category, UNKNOWN);
    assert_eq!(report.degraded_names, vec!["weird name".to_string()]);
    assert_eq!(report.invalid_dates, 2);
    // no channel column at all: synthesized, not backfilled
    assert_eq!(report.backfilled_channels, 0);
}

#[test]
fn channel_column_is_backfilled_only_where_blank() {
    let table = RawTable::from_rows(
        ["Date", "Ad Name", "Custom Channel ID"],
        [
            vec!["2024-01-10", "1-fromname_d_b_c", "explicit"],
            vec!["2024-01-10", "1-fromname_d_b_c", "  "],
            vec!["2024-01-10", "1-short_d_b_c"],
        ],
    );
    let (records, report) = normalize(&table);
    assert_eq!(records[0].channel_id, "explicit");
    assert_eq!(records[1].channel_id, "fromname");
    assert_eq!(records[2].channel_id, "short");
    assert_eq!(report.backfilled_channels, 2);
}

#[test]
fn baseline_comes_from_previous_days_by_channel() {
    let table = perf(&[
        ["2024-01-08", "1-ch1_d_b_c", "100", "90", "0.9"],
        ["2024-01-09", "1-ch1_d_b_c", "100", "120", "1.2"],
        ["2024-01-10", "1-ch1_d_b_c", "100", "80", "0.8"],
    ]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    assert_eq!(view.mode, ViewMode::SingleDate);
    assert!(view.mode.has_baselines());
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].ratio, d("0.8"));
    assert_eq!(view.rows[0].baseline_1, Some(d("1.2")));
    assert_eq!(view.rows[0].baseline_2, Some(d("0.9")));
}

#[test]
fn baseline_accepts_percent_text_and_falls_back_to_computed() {
    let table = perf(&[
        ["2024-01-08", "1-ch1_d_b_c", "100", "10", ""],
        ["2024-01-09", "1-ch1_d_b_c", "100", "10", "120%"],
        ["2024-01-10", "1-ch1_d_b_c", "100", "80", ""],
    ]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    assert_eq!(view.rows[0].baseline_1, Some(d("1.2")));
    assert_eq!(view.rows[0].baseline_2, Some(d("0.1")));
}

#[test]
fn missing_prior_day_is_null_not_zero() {
    let table = perf(&[
        ["2024-01-09", "1-other_d_b_c", "100", "120", "1.2"],
        ["2024-01-10", "1-ch1_d_b_c", "100", "80", ""],
    ]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    assert_eq!(view.rows[0].baseline_1, None);
    assert_eq!(view.rows[0].baseline_2, None);
}

#[test]
fn baseline_channel_ids_are_trimmed_and_bad_text_is_an_error() {
    let table = RawTable::from_rows(
        ["Date", "Ad Name", "Custom Channel ID", "ROAS"],
        [
            vec!["2024-01-09", "x", " ch7 ", "oops"],
            vec!["2024-01-10", "y", "ch7", ""],
        ],
    );
    let (records, _) = normalize(&table);
    let err = single_date_view(&records, day("2024-01-10")).unwrap_err();
    assert_eq!(err.raw, "oops");
}

#[test]
fn range_groups_by_full_identity_and_sums() {
    let table = perf(&[
        ["2024-01-01", "1-ch1_d_b_c", "10", "20", ""],
        ["2024-01-02", "1-ch1_d_b_c", "10", "5", ""],
        // same channel, different ad: must stay separate
        ["2024-01-02", "1-ch1_d_b_other", "4", "8", ""],
        ["2024-01-05", "1-ch1_d_b_c", "100", "100", ""],
    ]);
    let (records, _) = normalize(&table);
    let view = range_view(&records, day("2024-01-01"), day("2024-01-03"));
    assert_eq!(view.mode, ViewMode::Range);
    assert!(!view.mode.has_baselines());
    assert_eq!(view.rows.len(), 2);
    let c = view.rows.iter().find(|r| r.ad_name == "1-ch1_d_b_c").unwrap();
    assert_eq!(c.spend, d("20"));
    assert_eq!(c.revenue, d("25"));
    assert_eq!(c.profit, d("5"));
    assert_eq!(c.ratio, d("1.25"));
    assert_eq!(c.baseline_1, None);
    assert_eq!(c.baseline_2, None);
}

#[test]
fn presets_resolve_inclusive_windows() {
    let today = day("2024-03-15");
    assert_eq!(
        DatePreset::Last7Days.resolve(today),
        (day("2024-03-09"), today)
    );
    assert_eq!(
        DatePreset::Last30Days.resolve(today),
        (day("2024-02-15"), today)
    );
    assert_eq!(
        DatePreset::ThisMonth.resolve(today),
        (day("2024-03-01"), today)
    );
    assert_eq!(
        DatePreset::LastMonth.resolve(today),
        (day("2024-02-01"), day("2024-02-29"))
    );
    assert_eq!(
        "last-14-days".parse::<DatePreset>().unwrap(),
        DatePreset::Last14Days
    );
    assert!("yesterday".parse::<DatePreset>().is_err());
}

#[test]
fn control_merge_left_joins_on_ad_name() {
    let table = perf(&[
        ["2024-01-10", "1-ch1_d_b_c", "10", "20", ""],
        ["2024-01-10", "1-ch2_d_b_c", "10", "20", ""],
    ]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    let controls = normalize_controls(&control(&[
        ["1-ch1_d_b_c", "'123456", "50.5", "active "],
        ["1-ch1_d_b_c", "999", "1", "PAUSED"],
    ]));
    let view = merge_controls(view, &controls);

    let a = &view.rows[0];
    assert_eq!(a.ad_set_id, "123456");
    assert_eq!(a.current_budget, d("50.5"));
    assert_eq!(a.current_status.as_deref(), Some("active"));
    assert_eq!(a.proposed_budget, Decimal::ZERO);
    assert_eq!(a.proposed_status, None);

    let b = &view.rows[1];
    assert_eq!(b.ad_set_id, "");
    assert_eq!(b.current_budget, Decimal::ZERO);
    assert_eq!(b.current_status, None);
    assert_eq!(b.key(), "1-ch2_d_b_c|ch2");
}

#[test]
fn effective_status_prefers_proposal_and_scrubs_nulls() {
    let table = perf(&[["2024-01-10", "1-ch1_d_b_c", "10", "20", ""]]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    let mut row = merge_controls(view, &[]).rows.remove(0);

    assert_eq!(effective_status(&row), "");
    row.current_status = Some("nan".into());
    assert_eq!(effective_status(&row), "");
    row.current_status = Some(" paused ".into());
    assert_eq!(effective_status(&row), "PAUSED");
    row.proposed_status = Some("active".into());
    assert_eq!(effective_status(&row), "ACTIVE");
}

fn filter_fixture() -> adpilot::models::View {
    let table = perf(&[
        ["2024-01-10", "2-b_shop_cpc_toys_us", "1", "1", ""],
        ["2024-01-10", "1-a_news_cpc_toys_de_de", "1", "1", ""],
        ["2024-01-10", "1-b_shop_cpm_games_us", "1", "1", ""],
        ["2024-01-10", "1-a_shop_cpc_games", "1", "1", ""],
    ]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    let controls = normalize_controls(&control(&[
        ["2-b_shop_cpc_toys_us", "1", "10", "ACTIVE"],
        ["1-a_news_cpc_toys_de_de", "2", "10", "PAUSED"],
        ["1-b_shop_cpm_games_us", "3", "10", "ACTIVE"],
    ]));
    merge_controls(view, &controls)
}

#[test]
fn filters_compose_and_sort_by_channel_then_name() {
    let all = Filters::default().apply(filter_fixture());
    let names: Vec<&str> = all.rows.iter().map(|r| r.ad_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "1-a_news_cpc_toys_de_de",
            "1-a_shop_cpc_games",
            "1-b_shop_cpm_games_us",
            "2-b_shop_cpc_toys_us",
        ]
    );

    let f = Filters {
        account: Selection::Only("1".into()),
        domain: Selection::Only("shop".into()),
        ..Default::default()
    };
    let names: Vec<String> = f
        .apply(filter_fixture())
        .rows
        .into_iter()
        .map(|r| r.ad_name)
        .collect();
    assert_eq!(names, vec!["1-a_shop_cpc_games", "1-b_shop_cpm_games_us"]);

    let f = Filters {
        status: StatusFilter::Active,
        category: Selection::Only("toys".into()),
        ..Default::default()
    };
    let rows = f.apply(filter_fixture()).rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ad_name, "2-b_shop_cpc_toys_us");

    let f = Filters {
        locale: Selection::Only("de_de".into()),
        ..Default::default()
    };
    assert_eq!(f.apply(filter_fixture()).rows.len(), 1);

    // "All" and blanks mean no restriction
    assert_eq!(Selection::from_option(Some("All")), Selection::All);
    assert_eq!(Selection::from_option(Some("")), Selection::All);
    assert_eq!(Selection::from_option(None), Selection::All);
}

#[test]
fn sort_is_stable_for_ties() {
    let table = perf(&[
        ["2024-01-10", "1-z_d_b_c", "3", "1", ""],
        ["2024-01-10", "1-a_d_b_c", "1", "1", ""],
        ["2024-01-10", "1-a_d_b_c", "2", "1", ""],
    ]);
    let (records, _) = normalize(&table);
    let view = single_date_view(&records, day("2024-01-10")).unwrap();
    let rows = Filters::default().apply(view).rows;
    let spends: Vec<Decimal> = rows.iter().map(|r| r.spend).collect();
    assert_eq!(spends, vec![d("1"), d("2"), d("3")]);
}

#[test]
fn filter_options_are_sorted_and_prefixed() {
    let opts = filter_options(&filter_fixture().rows);
    assert_eq!(opts.accounts, vec!["All", "1", "2"]);
    assert_eq!(opts.categories, vec!["All", "games", "toys"]);
    assert_eq!(opts.domains, vec!["All", "news", "shop"]);
    assert_eq!(opts.locales, vec!["All", UNKNOWN, "de_de", "us"]);
}

struct Sheets(HashMap<String, RawTable>);

impl TableSource for Sheets {
    fn read(&self, name: &str) -> RawTable {
        self.0.get(name).cloned().unwrap_or_default()
    }
}

struct Controls(RawTable);

impl ControlSource for Controls {
    fn read(&self) -> RawTable {
        self.0.clone()
    }
}

#[test]
fn report_runs_the_whole_pass() {
    let mut sheets = HashMap::new();
    sheets.insert(
        "ROAS".to_string(),
        perf(&[
            ["2024-01-09", "1-ch1_d_b_c", "100", "120", "1.2"],
            ["2024-01-10", "1-ch1_d_b_c", "100", "80", "0.8"],
            ["2024-01-10", "2-ch2_d_b_c", "50", "100", "2"],
        ]),
    );
    let controls = Controls(control(&[
        ["1-ch1_d_b_c", "111", "20", "ACTIVE"],
        ["2-ch2_d_b_c", "222", "30", "ACTIVE"],
    ]));
    let mut proposals = HashMap::new();
    proposals.insert(
        "2-ch2_d_b_c".to_string(),
        Proposal {
            budget: Decimal::ZERO,
            status: Some("PAUSED".into()),
        },
    );
    let filters = Filters {
        status: StatusFilter::Active,
        ..Default::default()
    };
    let req = Request {
        performance_sheet: "ROAS",
        scope: Scope::Day(day("2024-01-10")),
        filters: &filters,
        proposals: &proposals,
    };
    let report = build_report(&Sheets(sheets), &controls, &req).unwrap();

    assert_eq!(report.summary.spend, d("150"));
    assert_eq!(report.summary.revenue, d("180"));
    assert_eq!(report.summary.ratio, d("1.2"));
    // ch2 is pending PAUSED, so the ACTIVE filter drops it
    assert_eq!(report.view.rows.len(), 1);
    assert_eq!(report.view.rows[0].baseline_1, Some(d("1.2")));
    assert_eq!(report.totals.spend, d("100"));
    assert_eq!(report.totals.profit, d("-20"));
    assert_eq!(report.options.accounts, vec!["All", "1", "2"]);
}

#[test]
fn report_stops_on_empty_source_and_empty_selection() {
    let filters = Filters::default();
    let proposals = HashMap::new();
    let req = Request {
        performance_sheet: "ROAS",
        scope: Scope::Day(day("2024-01-10")),
        filters: &filters,
        proposals: &proposals,
    };
    let empty = Sheets(HashMap::new());
    let err = build_report(&empty, &Controls(RawTable::default()), &req).unwrap_err();
    assert!(matches!(err, Error::EmptySource { ref name } if name == "ROAS"));
    assert!(err.to_string().contains("empty or not accessible"));

    let mut sheets = HashMap::new();
    sheets.insert(
        "ROAS".to_string(),
        perf(&[["2024-01-01", "1-ch1_d_b_c", "1", "1", ""]]),
    );
    let err = build_report(&Sheets(sheets.clone()), &Controls(RawTable::default()), &req)
        .unwrap_err();
    assert!(matches!(err, Error::EmptySelection { .. }));

    let bad_range = Request {
        scope: Scope::Range {
            start: day("2024-01-05"),
            end: day("2024-01-01"),
        },
        ..req
    };
    let err = build_report(&Sheets(sheets), &Controls(RawTable::default()), &bad_range)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
}

#[test]
fn control_sheet_missing_still_renders() {
    let mut sheets = HashMap::new();
    sheets.insert(
        "ROAS".to_string(),
        perf(&[["2024-01-10", "1-ch1_d_b_c", "10", "20", ""]]),
    );
    let filters = Filters::default();
    let proposals = HashMap::new();
    let req = Request {
        performance_sheet: "ROAS",
        scope: Scope::Range {
            start: day("2024-01-01"),
            end: day("2024-01-31"),
        },
        filters: &filters,
        proposals: &proposals,
    };
    let report = build_report(&Sheets(sheets), &Controls(RawTable::default()), &req).unwrap();
    assert_eq!(report.view.rows[0].current_budget, Decimal::ZERO);
    assert_eq!(report.view.rows[0].current_status, None);
}

fn arb_rows() -> impl Strategy<Value = Vec<(u32, usize, i64, i64)>> {
    prop::collection::vec((1u32..=3, 0usize..3, 0i64..100_000, 0i64..100_000), 0..30)
}

#[test]
fn huge_cells_clamp_instead_of_panicking() {
    let big = "50000000000000000000000000000";
    let table = perf(&[
        ["2024-01-09", "1-ch1_shop_cpc_toys", big, "0", ""],
        ["2024-01-10", "1-ch1_shop_cpc_toys", big, "0", ""],
        ["2024-01-10", "1-ch2_shop_cpc_toys", "-50000000000000000000000000000", big, ""],
    ]);
    let (records, _) = normalize(&table);
    // revenue - spend of the third row does not fit
    assert_eq!(records[2].profit, Decimal::MAX);

    let view = range_view(&records, day("2024-01-09"), day("2024-01-10"));
    assert_eq!(view.rows.len(), 2);
    let ch1 = &view.rows[0];
    assert_eq!(ch1.channel_id, "ch1");
    assert_eq!(ch1.spend, Decimal::MAX);
    assert_eq!(ch1.profit, Decimal::MIN);
    assert_eq!(ch1.ratio, Decimal::ZERO);

    let totals = Totals::of(&view.rows);
    assert_eq!(totals.spend, Decimal::MAX.checked_sub(d(big)).unwrap());
    assert_eq!(totals.revenue, d(big));
    let doubled = Totals::of(&[ch1.clone(), ch1.clone()]);
    assert_eq!(doubled.spend, Decimal::MAX);
    assert_eq!(doubled.profit, Decimal::MIN);

    assert!(format_ratio(Some(Decimal::MAX)).is_none());
    assert_eq!(format_ratio(Some(d("1.5"))).unwrap().text, "150%");
}

proptest! {
    #[test]
    fn range_aggregation_splits_by_day(rows in arb_rows()) {
        let names = ["1-ch1_d_b_c", "1-ch1_d_b_other", "2-ch2_x_y_z_us"];
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|(dd, n, s, r)| vec![
                format!("2024-01-0{}", dd),
                names[*n].to_string(),
                Decimal::new(*s, 2).to_string(),
                Decimal::new(*r, 2).to_string(),
                String::new(),
            ])
            .collect();
        let (records, _) = normalize(&RawTable::from_rows(PERF_HEADER, cells));

        let whole = aggregate(&records, day("2024-01-01"), day("2024-01-03"));
        let mut pieces: HashMap<_, (Decimal, Decimal, Decimal)> = HashMap::new();
        for dd in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            for (k, (_, s)) in aggregate(&records, day(dd), day(dd)) {
                let e = pieces.entry(k).or_default();
                e.0 += s.spend;
                e.1 += s.revenue;
                e.2 += s.profit;
            }
        }
        prop_assert_eq!(whole.len(), pieces.len());
        for (k, (_, s)) in whole {
            let p = pieces[&k];
            prop_assert_eq!((s.spend, s.revenue, s.profit), p);
        }
    }
}
