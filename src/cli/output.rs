//! Output formatting for CLI

use crate::pipeline::{MetricsSummary, RunSummary};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

pub fn print_run_summary(summary: &RunSummary) {
    print_section("Run Summary");
    print_stats_table(&[
        ("Ticks", summary.ticks.to_string()),
        ("Time step", format!("{}", summary.dt)),
        (
            "Final pose",
            format!(
                "x={:.3} y={:.3} theta={:.3}",
                summary.final_pose.x, summary.final_pose.y, summary.final_pose.heading
            ),
        ),
        ("Final velocity", format!("{:.3}", summary.final_velocity)),
        ("Total reward", format!("{:.1}", summary.total_reward)),
        (
            "On target",
            format!(
                "{} ({:.1}%)",
                summary.on_target_ticks,
                summary.on_target_rate() * 100.0
            ),
        ),
        ("Explored", summary.explored_ticks.to_string()),
        ("Snapshots", summary.snapshots.to_string()),
        ("Final epsilon", format!("{:.4}", summary.final_epsilon)),
        ("Final alpha", format!("{:.4}", summary.final_alpha)),
        ("Table states", summary.table_states.to_string()),
    ]);
}

pub fn print_metrics(metrics: &MetricsSummary) {
    print_subsection("Actions");
    print_stats_table(&[
        ("Accelerate", metrics.accelerations.to_string()),
        ("Decelerate", metrics.decelerations.to_string()),
        (
            "Exploration rate",
            format!("{:.1}%", metrics.exploration_rate * 100.0),
        ),
        ("Mean reward", format!("{:.3}", metrics.mean_reward)),
        (
            "Max |angle error|",
            format!("{:.4}", metrics.max_abs_angle_error),
        ),
    ]);
}
