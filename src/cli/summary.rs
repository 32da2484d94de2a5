use super::ui;
use crate::config::AppConfig;
use crate::core::rollup::ProjectRollup;
use crate::core::{DashboardAggregator, ProjectRef};
use crate::sources::{refresh_dashboard, SnapshotSource};
use anyhow::Result;
use comfy_table::Cell;
use console::style;

fn project_table(project: &ProjectRef, rollup: &ProjectRollup, base_currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Customer"),
        ui::header_cell(&format!("Invoiced ({base_currency})")),
        ui::header_cell(&format!("Unpaid ({base_currency})")),
    ]);
    for (name, totals) in &rollup.customers {
        table.add_row(vec![
            Cell::new(name),
            ui::money_cell(totals.invoiced),
            ui::money_cell(totals.unpaid),
        ]);
    }

    let mut output = format!(
        "Project: {} ({})\n\n",
        ui::style_text(&project.name, ui::StyleType::Title),
        ui::style_text(&project.customer, ui::StyleType::Subtle),
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nExpenses: {}   Invoiced: {}   Paid: {}",
        ui::format_money(rollup.totals.expenses, base_currency),
        ui::format_money(rollup.totals.invoiced, base_currency),
        ui::style_text(
            &ui::format_money(rollup.totals.paid, base_currency),
            ui::StyleType::TotalValue,
        ),
    ));
    output
}

pub async fn run(source: &(dyn SnapshotSource), config: &AppConfig) -> Result<()> {
    let mut aggregator = DashboardAggregator::new();

    let pb = ui::new_spinner(true);
    pb.set_message("Fetching project snapshots...");
    let outcome = refresh_dashboard(source, &mut aggregator, &|| pb.inc(1)).await?;
    pb.finish_and_clear();

    for failure in &outcome.failures {
        eprintln!(
            "{}",
            ui::style_text(
                &format!(
                    "Skipping project '{}': {}",
                    failure.project.name, failure.error
                ),
                ui::StyleType::Error,
            )
        );
    }

    let base_currency = &config.base_currency;
    let tracked: Vec<&ProjectRef> = outcome
        .projects
        .iter()
        .filter(|p| aggregator.rollup(&p.id).is_some())
        .collect();

    for (i, project) in tracked.iter().enumerate() {
        if let Some(rollup) = aggregator.rollup(&project.id) {
            println!("{}", project_table(project, rollup, base_currency));
            if i < tracked.len() - 1 {
                ui::print_separator();
            }
        }
    }

    let totals = aggregator.global_totals();
    println!(
        "\n{}",
        ui::style_text("Dashboard totals", ui::StyleType::Title)
    );
    println!(
        "Expenses: {}   Invoiced: {}   Paid: {}   Unpaid: {}   Net: {}",
        ui::format_money(totals.expenses, base_currency),
        ui::format_money(totals.invoiced, base_currency),
        ui::format_money(totals.paid, base_currency),
        ui::format_money(totals.unpaid(), base_currency),
        style(ui::format_money(totals.net(), base_currency))
            .bold()
            .green(),
    );

    let top = aggregator.top_customers(config.top_customers);
    if !top.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Customer"),
            ui::header_cell(&format!("Invoiced ({base_currency})")),
            ui::header_cell(&format!("Unpaid ({base_currency})")),
        ]);
        for (name, totals) in top {
            table.add_row(vec![
                Cell::new(name),
                ui::money_cell(totals.invoiced),
                ui::money_cell(totals.unpaid),
            ]);
        }
        println!(
            "\n{}\n{table}",
            ui::style_text("Top customers by unpaid balance", ui::StyleType::TotalLabel)
        );
    }

    Ok(())
}
