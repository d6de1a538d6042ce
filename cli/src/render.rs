use habitgrid_core::model::{ActivityStat, DailyCount, MonthGrid, MonthSummary};
use habitgrid_core::{YearMonth, calendar};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const NAME_COLUMN_WIDTH: usize = 24;

fn short_name(name: &str) -> String {
    if name.chars().count() > NAME_COLUMN_WIDTH {
        let truncated: String = name.chars().take(NAME_COLUMN_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        name.to_string()
    }
}

/// Day-of-week initial for the header row; weekends lowered so they stand
/// out without color.
fn day_initial(month: YearMonth, day: u32) -> char {
    match month.date_at(day) {
        Ok(date) => {
            let initial = date.format("%a").to_string().chars().next().unwrap_or(' ');
            if calendar::is_weekend(date) {
                initial.to_ascii_lowercase()
            } else {
                initial
            }
        }
        Err(_) => ' ',
    }
}

pub fn render_grid(grid: &MonthGrid) {
    if grid.rows.is_empty() {
        println!("No activities to track. Add one with `habitgrid add <name>`.");
        return;
    }

    let month = grid.month;
    print!("{:<width$}", "", width = NAME_COLUMN_WIDTH + 1);
    for day in 1..=grid.days_in_month {
        print!("{:>2} ", day_initial(month, day));
    }
    println!();

    print!("{:<width$}", "Activity", width = NAME_COLUMN_WIDTH + 1);
    for day in 1..=grid.days_in_month {
        let marker = match month.date_at(day) {
            Ok(date) if calendar::is_today(date) => format!("{day:>2}*"),
            _ => format!("{day:>2} "),
        };
        print!("{marker}");
    }
    println!("   (* today)");

    for row in &grid.rows {
        print!("{:<width$}", short_name(&row.name), width = NAME_COLUMN_WIDTH + 1);
        for (i, completed) in row.cells.iter().enumerate() {
            let date = month.date_at(i as u32 + 1).ok();
            let mark = if *completed {
                '✓'
            } else if date.is_some_and(calendar::is_future) {
                ' '
            } else {
                '·'
            };
            print!("{mark:>2} ");
        }
        println!();
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Activity")]
    name: String,
    #[tabled(rename = "Completed")]
    completed: String,
    #[tabled(rename = "Percent")]
    percent: String,
}

pub fn render_stats(stats: &[ActivityStat]) {
    if stats.is_empty() {
        println!("No activities yet.");
        return;
    }
    let rows: Vec<StatRow> = stats
        .iter()
        .map(|stat| StatRow {
            name: stat.name.clone(),
            completed: format!("{}/{}", stat.completed, stat.total),
            percent: format!("{}%", stat.percent),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

pub fn render_summary(month: YearMonth, summary: &MonthSummary) {
    println!("Month:           {month}");
    println!("Cells:           {}", summary.total_cells);
    println!(
        "Completed:       {}/{}",
        summary.completed_cells, summary.total_cells
    );
    println!("Missed:          {}", summary.missed_cells());
    println!("Completion rate: {}%", summary.completion_rate);
}

const BAR_WIDTH: usize = 40;

pub fn render_daily(counts: &[DailyCount]) {
    let max = counts.iter().map(|c| c.completed).max().unwrap_or(0);
    if max == 0 {
        println!("Nothing completed this month yet.");
        return;
    }
    for count in counts {
        let width = (count.completed as usize * BAR_WIDTH) / max as usize;
        println!(
            "{:>2} | {:<bar$} {}",
            count.day,
            "█".repeat(width),
            count.completed,
            bar = BAR_WIDTH
        );
    }
}
