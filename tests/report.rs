// tests/report.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sumo_scrape::report::{self, views};
use sumo_scrape::store::{self, write_table, BOUTS, SHIKONA};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("sumo_report_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

// basho, day, division, bout_no, east, west, winner, kimarite, east_rank, west_rank, result_type
type B<'a> = (&'a str, u32, &'a str, u32, u32, u32, &'a str, &'a str, &'a str, &'a str, &'a str);

const BOUTS_2025: [B<'static>; 7] = [
    ("202501", 1, "Makuuchi", 1, 1, 2, "E", "yorikiri", "Ye", "M1w", "normal"),
    ("202501", 1, "Makuuchi", 2, 3, 4, "W", "yorikiri", "O1e", "M3w", "normal"),
    ("202501", 2, "Makuuchi", 1, 1, 3, "E", "oshidashi", "Ye", "O1e", "normal"),
    ("202501", 2, "Makuuchi", 2, 2, 4, "E", "fusen", "M1w", "M3w", "fusen"),
    ("202501", 3, "Makuuchi", 1, 1, 0, "", "", "Ye", "", "kyujo"),
    ("202501", 1, "Juryo", 1, 5, 6, "W", "hatakikomi", "J1e", "J1w", "normal"),
    ("202411", 1, "Makuuchi", 1, 1, 2, "W", "yorikiri", "Ye", "M1w", "normal"),
];

fn seed(dir: &Path) -> (PathBuf, PathBuf) {
    let fact = dir.join("fact.csv");
    let dim = dir.join("dim.csv");

    let rows = BOUTS_2025
        .iter()
        .map(|&(basho, day, div, no, e, w, side, kim, er, wr, rt)| {
            BOUTS.row_from(vec![
                format!("honbasho-{basho}"), "honbasho_regular".into(), "T".into(), basho.into(),
                day.to_string(), div.into(), no.to_string(), e.to_string(), w.to_string(),
                side.into(), kim.into(), er.into(), wr.into(), rt.into(), String::new(),
                String::new(), no.to_string(), String::new(),
            ])
        })
        .collect();
    write_table(&fact, &BOUTS, rows).unwrap();

    let dim_rows = [("202411", "1", "大の里"), ("202501", "1", "新大の里"), ("202501", "3", "琴櫻")]
        .into_iter()
        .map(|(b, r, n)| SHIKONA.row_from(vec![b.into(), r.into(), n.into(), String::new(), "Makuuchi".into(), String::new()]))
        .collect();
    write_table(&dim, &SHIKONA, dim_rows).unwrap();
    (fact, dim)
}

#[test]
fn builds_every_site_file() {
    let dir = tmp_dir("all");
    let (fact, dim) = seed(&dir);
    let bouts = store::read_table(&fact).unwrap();
    let dim = store::read_table(&dim).unwrap();
    let out = dir.join("docs").join("data");

    let written = report::build_all(&bouts, &dim, &out).unwrap();
    assert_eq!(written.len(), 9);
    for f in [
        report::KIMARITE_RANKING_FILE,
        report::KIMARITE_TREND_FILE,
        report::RIKISHI_WINS_FILE,
        report::YOKOZUNA_DOMINANCE_FILE,
        report::UPSET_INDEX_FILE,
        report::WINNING_STREAKS_FILE,
        report::SUMMARY_STATS_FILE,
        report::NANAHACHI_ANALYSIS_FILE,
        report::STAR_TRADING_ANALYSIS_FILE,
    ] {
        assert!(out.join(f).is_file(), "{f} missing");
    }

    // Non-ASCII is written as-is.
    let wins = fs::read_to_string(out.join(report::RIKISHI_WINS_FILE)).unwrap();
    assert!(wins.contains("新大の里"));

    let summary: Value = serde_json::from_str(&fs::read_to_string(out.join(report::SUMMARY_STATS_FILE)).unwrap()).unwrap();
    assert_eq!(summary["total_bouts"], 7);
    assert_eq!(summary["total_basho"], 2);
    assert_eq!(summary["year_range"], "2024-2025");
    assert_eq!(summary["makuuchi_bouts"], 6);
    assert_eq!(summary["most_common_kimarite"], "yorikiri");
}

#[test]
fn kimarite_ranking_excludes_fusen_and_blank() {
    let dir = tmp_dir("kimarite");
    let (fact, _) = seed(&dir);
    let bouts = store::read_table(&fact).unwrap();
    let ranking = report::kimarite_ranking(&views(&bouts));

    let maku: Vec<(&str, usize)> = ranking.makuuchi.iter().map(|k| (k.kimarite.as_str(), k.count)).collect();
    assert_eq!(maku, vec![("yorikiri", 3), ("oshidashi", 1)]);
    assert!(ranking.all.iter().all(|k| k.kimarite != "fusen"));
    assert_eq!(ranking.makuuchi[0].pct, 75.0);
}

#[test]
fn rikishi_wins_skip_absences() {
    let dir = tmp_dir("wins");
    let (fact, dim_path) = seed(&dir);
    let bouts = store::read_table(&fact).unwrap();
    let dim = store::read_table(&dim_path).unwrap();
    let wins = report::rikishi_wins(&views(&bouts), &dim);

    // rid 1: W on 202501 d1, d2; L on 202411; kyujo on d3 ignored.
    let top = &wins[0];
    assert_eq!(top.rank, 1);
    assert_eq!(top.shikona, "新大の里");
    assert_eq!((top.wins, top.losses), (2, 1));
    assert_eq!(top.basho_count, 2);
    assert_eq!(top.win_rate, 66.7);

    // rid 4 has no name in the table: falls back to the id.
    assert!(wins.iter().any(|w| w.shikona == "4"));
}

#[test]
fn upset_index_per_basho() {
    let dir = tmp_dir("upset");
    let (fact, _) = seed(&dir);
    let bouts = store::read_table(&fact).unwrap();
    let u = report::upset_index(&views(&bouts));

    assert_eq!(u.basho_list, vec!["202411", "202501"]);
    // 202411: M1w beat Ye. 202501: M3w beat O1e, fusen E M1w over M3w is not an upset.
    assert_eq!(u.upset_rate, vec![100.0, 25.0]);
    assert_eq!(u.avg_upset_rate, 62.5);
}

#[test]
fn yokozuna_and_streak_files_from_seeded_tables() {
    let dir = tmp_dir("yokozuna");
    let (fact, dim) = seed(&dir);
    let out = dir.join("out");
    report::build_all(&store::read_table(&fact).unwrap(), &store::read_table(&dim).unwrap(), &out).unwrap();

    let read = |f: &str| -> Value { serde_json::from_str(&fs::read_to_string(out.join(f)).unwrap()).unwrap() };

    // No `Ye`/`Yw` rows in the seeded banzuke, so no yokozuna.
    assert_eq!(read(report::YOKOZUNA_DOMINANCE_FILE)["rikishi"].as_array().unwrap().len(), 0);

    // rid 1: lost in 202411, then won d1 and d2 of 202501; kyujo on d3 changes nothing.
    let streaks = read(report::WINNING_STREAKS_FILE);
    assert_eq!(streaks[0]["shikona"], "新大の里");
    assert_eq!(streaks[0]["streak"], 2);
    assert_eq!(streaks[0]["end_day"], 0);

    let trend = read(report::KIMARITE_TREND_FILE);
    assert_eq!(trend["years"], serde_json::json!([2024, 2025]));
    assert_eq!(trend["techniques"]["yorikiri"], serde_json::json!([100.0, 66.7]));

    let nana = read(report::NANAHACHI_ANALYSIS_FILE);
    assert_eq!(nana["overall"]["total_bouts"], 0);
    assert_eq!(nana["overall"]["expected_rate"], 50.0);
}
