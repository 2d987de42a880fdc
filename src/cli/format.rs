use crate::game::resources::ResourceBundle;
use crate::game::snapshot::ChatMessage;
use crate::game::view::{OpponentSummary, PlayerStatus};

/// Lines of agent-facing text, printed by the command layer.
pub type Report = Vec<String>;

pub fn header(out: &mut Report, title: &str) {
    out.push(String::new());
    out.push(format!("=== {title} ==="));
}

pub fn section(out: &mut Report, title: &str) {
    out.push(String::new());
    out.push(format!("--- {title} ---"));
}

pub fn print_report(report: &[String]) {
    for line in report {
        println!("{line}");
    }
}

pub fn eprint_report(report: &[String]) {
    for line in report {
        eprintln!("{line}");
    }
}

pub fn resources_line(resources: &ResourceBundle) -> String {
    format!("  {resources}")
}

pub fn render_my_status(out: &mut Report, status: &PlayerStatus) {
    section(out, "Your Status");
    let mut line = format!("  {} | {} VP", status.color, status.victory_points);
    let tags = status.tags();
    if !tags.is_empty() {
        line.push_str(&format!(" | {}", tags.join(", ")));
    }
    out.push(line);

    section(out, "Resources");
    out.push(resources_line(&status.resources));

    if !status.dev_cards.is_empty() {
        section(out, "Dev Cards");
        let parts: Vec<String> = status
            .dev_cards
            .iter()
            .map(|(card, count)| format!("{card}:{count}"))
            .collect();
        out.push(format!("  {}", parts.join(" ")));
    }

    section(out, "Buildings Available");
    let parts: Vec<String> = status
        .buildings
        .iter()
        .map(|(kind, count)| format!("{kind}:{count}"))
        .collect();
    out.push(format!("  {}", parts.join(" ")));
}

pub fn render_opponents(out: &mut Report, opponents: &[OpponentSummary]) {
    section(out, "Opponents");
    for o in opponents {
        let mut line = format!(
            "  {:<8} {}VP  {}cards  {}dev  road:{}  knights:{}",
            o.color, o.victory_points, o.cards, o.dev_cards, o.road_length, o.knights
        );
        if !o.tags.is_empty() {
            line.push_str(&format!("  [{}]", o.tags.join(", ")));
        }
        out.push(line);
    }
}

pub fn render_chat(out: &mut Report, messages: &[ChatMessage], label: &str) {
    if messages.is_empty() {
        return;
    }
    section(out, &format!("{label} ({} messages)", messages.len()));
    out.extend(messages.iter().map(|m| format!("  {m}")));
}
