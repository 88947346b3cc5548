use crate::application::batch::BatchSummary;
use crate::domain::model::{NearbyAttractionsReport, User};
use crate::presentation::theme::Theme;
use std::fmt::Write;

/// Reward listing for one user
pub fn format_user_rewards(user: &User, theme: &Theme) -> String {
    let mut output = String::new();
    let rewards = user.user_rewards();

    writeln!(
        output,
        "{} {}",
        (theme.title)(user.user_name()),
        (theme.muted)(&format!(
            "({} rewards, {} points)",
            rewards.len(),
            user.total_reward_points()
        ))
    )
    .ok();

    if rewards.is_empty() {
        writeln!(output, "  {}", (theme.muted)("no attractions in range")).ok();
        return output;
    }

    for (i, reward) in rewards.iter().enumerate() {
        let attraction = &reward.attraction;
        let place = match (attraction.city.is_empty(), attraction.state.is_empty()) {
            (false, false) => format!("{}, {}", attraction.city, attraction.state),
            (false, true) => attraction.city.clone(),
            (true, false) => attraction.state.clone(),
            (true, true) => String::new(),
        };
        writeln!(
            output,
            "  {}. {} {} {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.name)(&attraction.attraction_name),
            (theme.place)(&place),
            (theme.points)(&format!("+{}", reward.reward_points))
        )
        .ok();
    }
    output
}

pub fn format_nearby(report: &NearbyAttractionsReport, theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "{} {}",
        (theme.title)(&report.user_name),
        (theme.muted)(&format!("@ {:.5}, {:.5}", report.user_latitude, report.user_longitude))
    )
    .ok();
    writeln!(output, "  {}", (theme.line)(&"⸺".repeat(40))).ok();

    for (i, nearby) in report.attractions.iter().enumerate() {
        writeln!(
            output,
            "  {}. {} {} {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.name)(&nearby.attraction_name),
            (theme.distance)(&format!("{:.1} mi", nearby.distance_miles)),
            (theme.points)(&format!("{} pts", nearby.reward_points))
        )
        .ok();
    }
    output
}

pub fn format_summary(summary: &BatchSummary, theme: &Theme) -> String {
    format!(
        "{} {}\n",
        (theme.line)(&"━".repeat(40)),
        (theme.muted)(&format!(
            "{} users, {} new rewards in {:.2?}",
            summary.users, summary.rewards_granted, summary.elapsed
        ))
    )
}
