//! Diff and status display

use colored::Colorize;
use reconcile::Changes;

use crate::resource::{ManagedResource, ResourceKind};

use super::planner::Plan;

fn kind_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Daemon => "Daemons",
        ResourceKind::Flatpak => "Flatpaks",
        ResourceKind::AppImage => "AppImages",
    }
}

/// Print creations and removals grouped by kind
pub fn display_diff(changes: &Changes<'_, ManagedResource>) {
    if changes.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Configuration Diff".bold()
    );
    println!("│");

    for kind in ResourceKind::ALL {
        let created: Vec<_> = changes
            .creations
            .iter()
            .filter(|r| r.kind() == kind)
            .collect();
        let removed: Vec<_> = changes
            .removals
            .iter()
            .filter(|r| r.kind() == kind)
            .collect();
        if created.is_empty() && removed.is_empty() {
            continue;
        }

        println!("│ {}", kind_title(kind).bold());
        for r in created {
            println!("│   {} {:<30} {}", "+".green(), r.name(), r.detail().dimmed());
        }
        for r in removed {
            println!(
                "│   {} {:<30} {}",
                "-".red(),
                r.name(),
                "(will remove)".dimmed()
            );
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} changes ({} to create, {} to remove)",
        changes.len().to_string().bold(),
        changes.creations.len().to_string().green(),
        changes.removals.len().to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

/// Print every installed and configured resource with its sync state
pub fn display_status(plan: &Plan) {
    let changes = plan.changes();
    let pending = |r: &ManagedResource| {
        changes
            .creations
            .iter()
            .chain(changes.removals.iter())
            .any(|c| std::ptr::eq(*c, r))
    };

    for kind in ResourceKind::ALL {
        let target: Vec<_> = plan.target.iter().filter(|r| r.kind() == kind).collect();
        let extra: Vec<_> = plan
            .current
            .iter()
            .filter(|r| r.kind() == kind && pending(*r))
            .collect();

        println!();
        println!("{}", kind_title(kind).cyan().bold());
        if target.is_empty() && extra.is_empty() {
            println!("  {}", "(none)".dimmed());
            continue;
        }

        for r in target {
            let marker = if pending(r) {
                "○".yellow()
            } else {
                "✓".green()
            };
            println!("  {} {:<30} {}", marker, r.name(), r.detail().dimmed());
        }
        for r in extra {
            println!(
                "  {} {:<30} {}",
                "✗".red(),
                r.name(),
                "(installed, not in config)".dimmed()
            );
        }
    }

    println!();
    if changes.is_empty() {
        println!("  {} Everything in sync", "✓".green());
    } else {
        println!(
            "  {} {} pending changes, run {} to converge",
            "→".cyan(),
            changes.len(),
            "sysman apply".bold()
        );
    }
}
