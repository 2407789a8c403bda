use crate::core::day::DayContext;
use crate::models::category::Category;
use crate::models::day_counts::DayCounts;
use crate::utils::colors::{BOLD, CYAN, RED, RESET};

/// Text block with the date display, the two counters and, when present,
/// the error banner on top.
pub fn render_day(day: &DayContext, counts: DayCounts, banner: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(msg) = banner {
        out.push_str(&format!("{RED}{msg}{RESET}\n\n"));
    }

    out.push_str(&format!("{CYAN}{BOLD}📅 {}{RESET}\n", day.label));
    for category in Category::ALL {
        out.push_str(&format!(
            "  {} {}: {}\n",
            category.icon(),
            category.label(),
            counts.get(category)
        ));
    }

    out
}
