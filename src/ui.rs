use colored::*;

use crate::{
    hierarchy::{Expansion, HierarchyView, Row},
    models::{area::Area, employee::Employee},
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pick the singular or plural form of a noun for a count
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, singular: &str, plural: &str) {
    println!(
        "\n  {} ({} {})\n",
        title.cyan().bold(),
        count,
        pluralize(count, singular, plural)
    );
}

/// Render a section header (e.g., "Subordinates")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Print `left` and push `right` to the terminal's right edge when both fit
fn print_with_right_context(left: ColoredString, left_visible_len: usize, right: &str) {
    let terminal_width = get_terminal_width();
    let right_visible_len = right.chars().count();
    let total_content = left_visible_len + right_visible_len;

    if !right.is_empty() && total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left, " ".repeat(padding), right.dimmed());
    } else if !right.is_empty() {
        // Not enough space for right alignment, just print both
        println!("{}  {}", left, right.dimmed());
    } else {
        println!("{}", left);
    }
}

pub fn render_area_line(area: &Area) {
    let left = format!("  {:>4}  {}", area.id, area.name);
    let visible = left.chars().count();
    print_with_right_context(left.bold(), visible, "");
}

/// Render an employee with id, name and position, and the area right-aligned
pub fn render_employee_line(employee: &Employee) {
    let left = format!("  {:>4}  {}", employee.id, employee.name);
    let visible = left.chars().count() + 2 + employee.position.chars().count();
    let styled = format!("{}  {}", left.bold(), employee.position.normal());
    print_with_right_context(styled.normal(), visible, employee.area_name().unwrap_or("-"));
}

/// Padded, dimmed label for detail views
fn label(name: &str) -> ColoredString {
    format!("{:<14}", name).dimmed()
}

pub fn render_area_detail(area: &Area) {
    render_section_header(&format!("Area #{}", area.id));
    println!("  {}{}", label("Name"), area.name);
    println!();
}

pub fn render_employee_detail(employee: &Employee) {
    render_section_header(&format!("Employee #{}", employee.id));
    println!("  {}{}", label("Name"), employee.name);
    println!("  {}{}", label("Position"), employee.position);
    println!(
        "  {}{}",
        label("Area"),
        employee.area_name().unwrap_or("-")
    );
    let manager = match &employee.manager {
        Some(manager) => format!("{} (#{})", manager.name, manager.id),
        None => match employee.manager_id {
            Some(id) => format!("#{}", id),
            None => String::from("-"),
        },
    };
    println!("  {}{}", label("Manager"), manager);
    println!(
        "  {}{}",
        label("Reports"),
        employee.subordinates.len()
    );
    println!();
}

/// Marker and hint for a manager's toggle control
pub fn toggle_label(expansion: Expansion) -> (&'static str, &'static str) {
    match expansion {
        Expansion::Collapsed => ("[+]", "show subordinates"),
        Expansion::Expanded => ("[-]", "hide subordinates"),
    }
}

/// Render the hierarchy view, one printed block per row
pub fn render_hierarchy(view: &HierarchyView) {
    for row in view.rows() {
        match row {
            Row::Heading => {
                let count = view.managers().len();
                render_view_header("Managers", count, "manager", "managers");
            }
            Row::Loading => println!("  {}", "Loading employees...".dimmed()),
            Row::Failed(message) => {
                println!("  {} {}", "✗".red(), "Could not load employees".red().bold());
                println!("    {}", message.dimmed());
            }
            Row::NoManagers => println!("  {}", "No employee has direct reports yet".dimmed()),
            Row::Manager {
                employee,
                expansion,
            } => {
                let (marker, hint) = toggle_label(expansion);
                let left = format!("  {}  {}", marker, employee.name);
                let visible = left.chars().count();
                print_with_right_context(
                    left.green().bold(),
                    visible,
                    &format!("#{} · {}", employee.id, hint),
                );
                println!("       {}", employee.position.dimmed());
            }
            Row::Subordinate(employee) => {
                println!(
                    "       {} {}  {}",
                    "│".dimmed(),
                    employee.name.bold(),
                    employee.position.dimmed()
                );
            }
        }
    }
    println!();
}
