//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `calendy_core` linkage.
//! - Print the current month grid so calendar arithmetic can be eyeballed.

use calendy_core::{month_title, CalendarGrid};
use chrono::{Datelike, Local};

fn main() {
    println!("calendy_core ping={}", calendy_core::ping());
    println!("calendy_core version={}", calendy_core::core_version());

    let today = Local::now().date_naive();
    let grid = CalendarGrid::default();
    let days = match grid.generate_days(today.year(), today.month()) {
        Ok(days) => days,
        Err(err) => {
            eprintln!("calendy_core grid error={err}");
            std::process::exit(1);
        }
    };

    println!("{}", month_title(today));
    println!("{}", grid.weekday_headers().join("  "));
    for week in days.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|day| match day.day() {
                Some(day) => format!("{day:>2}"),
                None => "  ".to_string(),
            })
            .collect();
        println!("{}", row.join(" "));
    }
}
